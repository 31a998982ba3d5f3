// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps [`OrchError`] onto HTTP status + `{detail}` bodies (§6, §7).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::OrchError;
use serde_json::json;

pub struct AppError(pub OrchError);

impl From<OrchError> for AppError {
    fn from(e: OrchError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            OrchError::NotFound(_) => StatusCode::NOT_FOUND,
            OrchError::InvalidTransition(_) | OrchError::WouldCycle(_) | OrchError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            OrchError::Busy(_) => StatusCode::CONFLICT,
            OrchError::BridgeUnavailable(_) => StatusCode::BAD_GATEWAY,
            OrchError::BridgeTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            OrchError::BridgeProtocol(_) => StatusCode::BAD_GATEWAY,
            OrchError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.as_detail() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
