// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::model::{ExportId, FormHeader, FormId};
use crate::ops::{apply_ops, FormOp};

use super::error::ApiError;
use super::types::{
    sections_from_wire, CreatedResponse, FormResponse, GenerateResponse, OpsRequest, OpsResponse,
    SuccessResponse, SummaryWire, UpdateRequest,
};
use super::AppState;

/// Runs blocking store or export work off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

/// Like [`blocking`], but a task that dies without returning still reports a failed export.
pub(crate) async fn blocking_export<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ApiError::Generation(format!("export task failed: {err}")))?
}

fn parse_form_id(raw: String) -> Result<FormId, ApiError> {
    FormId::new(raw).map_err(|err| ApiError::BadRequest(format!("invalid form id: {err}")))
}

pub async fn list_forms(State(state): State<AppState>) -> Result<Json<Vec<SummaryWire>>, ApiError> {
    let store = state.store.clone();
    let summaries = blocking(move || Ok(store.list_forms()?)).await?;
    Ok(Json(summaries.into_iter().map(SummaryWire::from).collect()))
}

pub async fn create_form(State(state): State<AppState>) -> Result<Json<CreatedResponse>, ApiError> {
    let store = state.store.clone();
    let form_id = blocking(move || Ok(store.create_form()?)).await?;
    Ok(Json(CreatedResponse::from(form_id)))
}

pub async fn get_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<FormResponse>, ApiError> {
    let form_id = parse_form_id(raw_id)?;
    let store = state.store.clone();
    let form = blocking(move || Ok(store.read_form(&form_id)?)).await?;
    Ok(Json(FormResponse::from(&form)))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let form_id = parse_form_id(raw_id)?;
    let Json(request) = body?;
    let sections = sections_from_wire(request.sections)?;
    let header = request.header.map(FormHeader::from);

    let store = state.store.clone();
    blocking(move || Ok(store.save_form(&form_id, sections, header)?)).await?;
    Ok(Json(SuccessResponse::OK))
}

pub async fn apply_form_ops(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<OpsRequest>, JsonRejection>,
) -> Result<Json<OpsResponse>, ApiError> {
    let form_id = parse_form_id(raw_id)?;
    let Json(request) = body?;
    let ops = request
        .ops
        .into_iter()
        .map(FormOp::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let store = state.store.clone();
    let result = blocking(move || {
        store.update_form(&form_id, |form| {
            apply_ops(form, &ops).map_err(ApiError::from)
        })
    })
    .await?;

    tracing::debug!(applied = result.applied, added = result.added.len(), "ops applied");
    Ok(Json(OpsResponse {
        success: true,
        added: result.added.into_iter().map(|id| id.into_string()).collect(),
    }))
}

pub async fn reset_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let form_id = parse_form_id(raw_id)?;
    let store = state.store.clone();
    blocking(move || Ok(store.reset_form(&form_id)?)).await?;
    Ok(Json(SuccessResponse::OK))
}

/// Exports the stored form, then deletes it.
///
/// The delete is best-effort: once the artifacts exist the request succeeds even if the form
/// cannot be removed.
pub async fn generate(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let form_id = parse_form_id(raw_id)?;
    let store = state.store.clone();
    let packager = state.packager.clone();

    let export_id = blocking_export(move || {
        let form = store.read_form(&form_id)?;
        let export_id = packager.export(&form)?;
        if let Err(err) = store.delete_form(&form_id) {
            tracing::warn!(form_id = %form_id, export_id = %export_id, error = %err, "form not deleted after export");
        }
        Ok(export_id)
    })
    .await?;

    Ok(Json(GenerateResponse {
        filename: export_id.into_string(),
    }))
}

pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let export_id = ExportId::new(filename)
        .map_err(|err| ApiError::BadRequest(format!("invalid file name: {err}")))?;

    let Some(artifact) = state.packager.locate(&export_id) else {
        return Err(ApiError::NotFound(format!("export not found: {export_id}")));
    };

    let bytes = match tokio::fs::read(&artifact.path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!("export not found: {export_id}")));
        }
        Err(err) => {
            return Err(ApiError::Internal(format!(
                "cannot read {}: {err}",
                artifact.path.display()
            )));
        }
    };

    tracing::debug!(export_id = %export_id, bytes = bytes.len(), "serving export");
    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.download_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let form_id = parse_form_id(raw_id)?;
    let store = state.store.clone();
    blocking(move || Ok(store.delete_form(&form_id)?)).await?;
    Ok(Json(SuccessResponse::OK))
}
