// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Ata server entrypoint.
//!
//! Serves the form editor API on `http://<bind>:<port>/` until interrupted. Forms persist under
//! `--data-dir`; exports land in `--output-dir`.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ata::config::{Cli, Config};
use ata::export::ExportPackager;
use ata::server::{router, AppState};
use ata::store::{FormFolder, FormStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ata=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(&cli)?;

    let folder = FormFolder::new(&config.data_dir).with_durability(config.write_durability());
    let store = FormStore::new(folder);
    let packager = ExportPackager::new(config.export_options());
    let app = router(AppState::new(store, packager));

    let listener = tokio::net::TcpListener::bind((config.bind.as_str(), config.port))
        .await
        .with_context(|| format!("cannot listen on {}:{}", config.bind, config.port))?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        addr = %local_addr,
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        archive = config.archive,
        "ata listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("ata stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
