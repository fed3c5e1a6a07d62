// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Block and section mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn editable_section(
    sections: &mut Sections,
    section: SectionKey,
) -> Result<&mut Section, ApplyError> {
    let entry = sections.entry(section).or_default();
    if entry.completed() {
        return Err(ApplyError::SectionCompleted { section });
    }
    Ok(entry)
}

fn add_block(sections: &mut Sections, section: SectionKey) -> Result<BlockId, ApplyError> {
    let target = editable_section(sections, section)?;
    let block = Block::empty();
    let block_id = block.id().clone();
    target.blocks_mut().push(block);
    Ok(block_id)
}

fn update_block(
    sections: &mut Sections,
    section: SectionKey,
    block_id: &BlockId,
    patch: &BlockPatch,
) -> Result<(), ApplyError> {
    let target = editable_section(sections, section)?;
    let Some(block) = target.block_mut(block_id) else {
        return Err(ApplyError::BlockNotFound {
            section,
            block_id: block_id.clone(),
        });
    };

    if let Some(title) = &patch.title {
        block.set_title(title.clone());
    }
    if let Some(content) = &patch.content {
        block.set_content(content.clone());
    }
    Ok(())
}

fn remove_block(
    sections: &mut Sections,
    section: SectionKey,
    block_id: &BlockId,
) -> Result<(), ApplyError> {
    let target = editable_section(sections, section)?;
    let blocks = target.blocks_mut();
    let Some(position) = blocks.iter().position(|block| block.id() == block_id) else {
        return Err(ApplyError::BlockNotFound {
            section,
            block_id: block_id.clone(),
        });
    };
    blocks.remove(position);
    Ok(())
}

fn set_completed(sections: &mut Sections, section: SectionKey, completed: bool) {
    sections.entry(section).or_default().set_completed(completed);
}
