// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP surface for the browser editor.
//!
//! Every request reloads what it needs from the store; the only state shared between requests
//! is the store handle and the export packager.

pub mod error;
pub mod handlers;
pub mod types;


use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::export::ExportPackager;
use crate::store::FormStore;

pub use error::ApiError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: FormStore,
    pub packager: Arc<ExportPackager>,
}

impl AppState {
    pub fn new(store: FormStore, packager: ExportPackager) -> Self {
        Self {
            store,
            packager: Arc::new(packager),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/forms", get(handlers::list_forms))
        .route("/createForm", post(handlers::create_form))
        .route("/data/{form_id}", get(handlers::get_form))
        .route("/update/{form_id}", post(handlers::update_form))
        .route("/ops/{form_id}", post(handlers::apply_form_ops))
        .route("/reset/{form_id}", post(handlers::reset_form))
        .route("/generate/{form_id}", post(handlers::generate))
        .route("/download/{filename}", get(handlers::download))
        .route("/form/{form_id}", delete(handlers::delete_form))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
