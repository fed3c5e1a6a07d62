// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ata::store::{FormFolder, FormStore};
use tempfile::TempDir;

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `store.save_form`, `store.list_forms`
// - Case IDs (the string after the `/`) must remain stable across refactors.
fn benches_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store.save_form");
    for case in fixtures::Case::ALL {
        let form = fixtures::fixture(case);
        group.bench_function(case.id(), move |b| {
            b.iter_batched(
                || {
                    let tmp = TempDir::new().expect("tempdir");
                    let store = FormStore::new(FormFolder::new(tmp.path()));
                    let form_id = store.create_form().expect("create_form");
                    (tmp, store, form_id)
                },
                |(tmp, store, form_id)| {
                    store
                        .save_form(&form_id, form.sections().clone(), Some(form.header().clone()))
                        .expect("save_form");
                    black_box(tmp)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("store.list_forms");
    for count in [10usize, 200] {
        let tmp = TempDir::new().expect("tempdir");
        let store = FormStore::new(FormFolder::new(tmp.path()));
        for _ in 0..count {
            store.create_form().expect("create_form");
        }
        group.bench_function(format!("forms_{count}"), move |b| {
            b.iter(|| {
                let summaries = black_box(&store).list_forms().expect("list_forms");
                black_box(summaries.len())
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_store
}
criterion_main!(benches);
