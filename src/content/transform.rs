// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{ContentTree, Element, Node};

/// Left margin per editor indent level.
pub const INDENT_EM_PER_LEVEL: u32 = 3;

/// Deepest indent level the editor produces; larger levels are clamped to it.
pub const MAX_INDENT_LEVEL: u32 = 8;

const INDENT_CLASS_PREFIX: &str = "ql-indent-";

/// Turns editor indent classes (`ql-indent-N`) into inline `margin-left` declarations.
///
/// The class token is removed (and the `class` attribute with it once empty); existing
/// `style` declarations are kept and the margin is appended after them. Returns whether any
/// element was rewritten.
pub fn apply_indentation(tree: &mut ContentTree) -> bool {
    let mut rewritten = false;
    for node in tree.nodes_mut() {
        rewritten |= visit(node);
    }
    rewritten
}

fn visit(node: &mut Node) -> bool {
    let Node::Element(element) = node else {
        return false;
    };

    let mut rewritten = false;
    if let Some(level) = take_indent_level(element) {
        let margin = level.saturating_mul(INDENT_EM_PER_LEVEL);
        append_style(element, &format!("margin-left: {margin}em"));
        rewritten = true;
    }

    for child in &mut element.children {
        rewritten |= visit(child);
    }
    rewritten
}

fn take_indent_level(element: &mut Element) -> Option<u32> {
    let class = element.attr("class")?;

    let mut level = None;
    let mut kept = Vec::new();
    for token in class.split_whitespace() {
        match token.strip_prefix(INDENT_CLASS_PREFIX).map(str::parse::<u32>) {
            Some(Ok(n)) if n > 0 => {
                level.get_or_insert(n);
            }
            _ => kept.push(token),
        }
    }

    let level = level?.min(MAX_INDENT_LEVEL);
    if kept.is_empty() {
        element.remove_attr("class");
    } else {
        let kept = kept.join(" ");
        element.set_attr("class", kept);
    }
    Some(level)
}

fn append_style(element: &mut Element, declaration: &str) {
    let existing = element.attr("style").map(str::trim).unwrap_or_default();
    let style = if existing.is_empty() {
        declaration.to_owned()
    } else {
        format!("{}; {declaration}", existing.trim_end_matches(';').trim_end())
    };
    element.set_attr("style", style);
}
