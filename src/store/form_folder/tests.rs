// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{encode_persisted_id_segment, FormFolder};
use crate::model::fixtures::sample_form;
use crate::model::{Form, FormId, SectionKey};
use crate::store::{FormBackend, StoreError, WriteDurability};

struct FormFolderTestCtx {
    _tmp: TempDir,
    folder: FormFolder,
}

impl FormFolderTestCtx {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let folder = FormFolder::new(tmp.path().join("data"));
        Self { _tmp: tmp, folder }
    }
}

#[fixture]
fn ctx() -> FormFolderTestCtx {
    FormFolderTestCtx::new()
}

#[rstest]
fn missing_form_loads_as_none(ctx: FormFolderTestCtx) {
    let loaded = ctx.folder.get(&FormId::new("nope").unwrap()).unwrap();
    assert_eq!(loaded, None);
    assert!(ctx.folder.list().unwrap().is_empty());
}

#[rstest]
fn put_then_get_round_trips_the_form(ctx: FormFolderTestCtx) {
    let form = sample_form();
    ctx.folder.put(&form).unwrap();

    let loaded = ctx.folder.get(form.id()).unwrap().expect("stored form");
    assert_eq!(loaded, form);
}

#[rstest]
fn round_trip_keeps_sub_second_timestamps(ctx: FormFolderTestCtx) {
    let form = Form::new(FormId::new("f-now").unwrap(), chrono::Utc::now());
    ctx.folder.put(&form).unwrap();
    assert_eq!(ctx.folder.get(form.id()).unwrap(), Some(form));
}

#[rstest]
fn put_writes_form_file_and_index_entry(ctx: FormFolderTestCtx) {
    let form = sample_form();
    ctx.folder.put(&form).unwrap();

    let form_path = ctx.folder.form_path(form.id());
    assert_eq!(form_path, ctx.folder.root().join("forms/f-sample.json"));
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&form_path).unwrap()).unwrap();
    assert_eq!(stored["id"], "f-sample");
    assert_eq!(stored["header"]["participantsA"], "Ana Souza, Bruno Lima");
    assert_eq!(stored["sections"]["fiscal"]["completed"], true);
    assert_eq!(stored["sections"]["fiscal"]["blocks"][0]["id"], "b-fiscal-1");
    assert_eq!(stored["createdAt"], "2024-03-01T12:00:00Z");

    let index: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(ctx.folder.index_path()).unwrap()).unwrap();
    assert_eq!(
        index,
        serde_json::json!([{ "id": "f-sample", "title": "Padaria Estrela Ltda", "date": "2024-03-05" }])
    );
}

#[rstest]
fn repeated_puts_keep_one_index_entry_per_form(ctx: FormFolderTestCtx) {
    let mut form = sample_form();
    ctx.folder.put(&form).unwrap();

    let mut header = form.header().clone();
    header.company = "Outra Empresa".to_owned();
    form.set_header(header);
    ctx.folder.put(&form).unwrap();

    let summaries = ctx.folder.list().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].title, "Outra Empresa");
}

#[rstest]
fn delete_removes_file_and_index_entry(ctx: FormFolderTestCtx) {
    let form = sample_form();
    let other = Form::new(FormId::new("f-other").unwrap(), chrono::Utc::now());
    ctx.folder.put(&form).unwrap();
    ctx.folder.put(&other).unwrap();

    assert!(ctx.folder.delete(form.id()).unwrap());
    assert!(!ctx.folder.form_path(form.id()).exists());
    let ids = ctx
        .folder
        .list()
        .unwrap()
        .into_iter()
        .map(|summary| summary.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![other.id().clone()]);

    assert!(!ctx.folder.delete(form.id()).unwrap());
}

#[rstest]
fn delete_cleans_up_an_orphaned_index_entry(ctx: FormFolderTestCtx) {
    let form = sample_form();
    ctx.folder.put(&form).unwrap();
    std::fs::remove_file(ctx.folder.form_path(form.id())).unwrap();

    assert!(ctx.folder.delete(form.id()).unwrap());
    assert!(ctx.folder.list().unwrap().is_empty());
}

#[rstest]
fn blocks_without_ids_get_fresh_ones(ctx: FormFolderTestCtx) {
    let form_id = FormId::new("f-legacy").unwrap();
    let path = ctx.folder.form_path(&form_id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{
  "id": "f-legacy",
  "createdAt": "2024-01-02T03:04:05Z",
  "sections": {
    "dp": { "blocks": [{}, { "title": "Férias", "content": "<p>julho</p>" }] }
  }
}"#,
    )
    .unwrap();

    let form = ctx.folder.get(&form_id).unwrap().expect("legacy form");
    let blocks = form.sections()[&SectionKey::Dp].blocks();
    assert_eq!(blocks.len(), 2);
    assert_ne!(blocks[0].id(), blocks[1].id());
    assert_eq!(blocks[1].title(), "Férias");
    assert!(!form.sections()[&SectionKey::Dp].completed());
    assert_eq!(form.header().company, "");
}

#[rstest]
#[case::unknown_section(
    r#"{ "id": "f-bad", "createdAt": "2024-01-02T03:04:05Z", "sections": { "rh": { "blocks": [] } } }"#
)]
#[case::bad_timestamp(r#"{ "id": "f-bad", "createdAt": "yesterday" }"#)]
#[case::bad_block_id(
    r#"{ "id": "f-bad", "createdAt": "2024-01-02T03:04:05Z", "sections": { "dp": { "blocks": [{ "id": "" }] } } }"#
)]
#[case::not_json("{ nope")]
fn corrupt_form_files_are_errors(ctx: FormFolderTestCtx, #[case] contents: &str) {
    let form_id = FormId::new("f-bad").unwrap();
    let path = ctx.folder.form_path(&form_id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, contents).unwrap();

    let err = ctx.folder.get(&form_id).unwrap_err();
    match err {
        StoreError::InvalidSection { .. }
        | StoreError::InvalidTimestamp { .. }
        | StoreError::InvalidId { .. }
        | StoreError::Json { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[cfg(unix)]
#[rstest]
fn writes_refuse_to_follow_symlinks(ctx: FormFolderTestCtx) {
    let form = sample_form();
    let path = ctx.folder.form_path(form.id());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let target = ctx.folder.root().join("elsewhere.json");
    std::fs::write(&target, "{}").unwrap();
    std::os::unix::fs::symlink(&target, &path).unwrap();

    let err = ctx.folder.put(&form).unwrap_err();
    match err {
        StoreError::SymlinkRefused { path: refused } => assert_eq!(refused, path),
        other => panic!("expected SymlinkRefused, got: {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");
}

#[rstest]
fn durable_writes_round_trip(ctx: FormFolderTestCtx) {
    let folder = FormFolder::new(ctx.folder.root()).with_durability(WriteDurability::Durable);
    assert_eq!(folder.durability(), WriteDurability::Durable);

    let form = sample_form();
    folder.put(&form).unwrap();
    assert_eq!(folder.get(form.id()).unwrap(), Some(form));
}

#[rstest]
fn no_temp_files_are_left_behind(ctx: FormFolderTestCtx) {
    ctx.folder.put(&sample_form()).unwrap();

    let leftovers = std::fs::read_dir(ctx.folder.forms_dir())
        .unwrap()
        .chain(std::fs::read_dir(ctx.folder.root()).unwrap())
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".ata.tmp."))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn persisted_id_segments_are_filesystem_safe() {
    assert_eq!(encode_persisted_id_segment("f-123"), "f-123");
    assert_eq!(encode_persisted_id_segment("CON"), "~434f4e");
    assert_eq!(encode_persisted_id_segment("a:b"), "~613a62");
    assert_eq!(encode_persisted_id_segment(".hidden"), "~2e68696464656e");
    assert_eq!(encode_persisted_id_segment("~x"), "~7e78");
}
