// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use criterion::Criterion;

use pprof::criterion::{Output, PProfProfiler};

/// Bench run settings, overridable from the environment.
///
/// PDF layout dominates the render group, so sampling is lighter than a pure-CPU suite.
#[derive(Debug, Clone, Copy)]
struct BenchSettings {
    profile_hz: i32,
    samples: usize,
    warm_up: Duration,
    measurement: Duration,
}

impl BenchSettings {
    fn from_env() -> Self {
        Self {
            profile_hz: var_or::<i32>("PROFILE_FREQ", 100).clamp(1, 1000),
            samples: var_or::<usize>("BENCH_SAMPLE_SIZE", 30).clamp(10, 200),
            warm_up: Duration::from_secs(var_or::<u64>("BENCH_WARMUP_SECS", 2).clamp(1, 60)),
            measurement: Duration::from_secs(var_or::<u64>("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120)),
        }
    }
}

fn var_or<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

/// Criterion configured from [`BenchSettings`] with a flamegraph profiler attached.
pub fn criterion() -> Criterion {
    let settings = BenchSettings::from_env();
    Criterion::default()
        .sample_size(settings.samples)
        .warm_up_time(settings.warm_up)
        .measurement_time(settings.measurement)
        .with_profiler(PProfProfiler::new(settings.profile_hz, Output::Flamegraph(None)))
}
