// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::export::ExportError;
use crate::ops::ApplyError;
use crate::store::StoreError;

use super::types::ErrorBody;

pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";
pub const GENERATION_FAILED_MESSAGE: &str = "generation failed";

/// Errors surfaced by the HTTP handlers.
///
/// Client errors carry their message to the caller; server-side failures only carry a detail
/// for the log and answer with an opaque message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("generation failed: {0}")]
    Generation(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) => message.clone(),
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_owned(),
            Self::Generation(_) => GENERATION_FAILED_MESSAGE.to_owned(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ApplyError> for ApiError {
    fn from(err: ApplyError) -> Self {
        match err {
            ApplyError::BlockNotFound { .. } => Self::NotFound(err.to_string()),
            ApplyError::SectionCompleted { .. } => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self::Generation(err.detail())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(detail) | Self::Generation(detail) => {
                tracing::error!(status = status.as_u16(), %detail, "request failed");
            }
            Self::BadRequest(message) | Self::NotFound(message) => {
                tracing::debug!(status = status.as_u16(), %message, "request rejected");
            }
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
