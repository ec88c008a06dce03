// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::domain::repositories::webhook_repository::RepositoryError;
use crate::utils::errors::WebhookError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<WebhookError>() {
            return match err {
                WebhookError::InvalidUrl(_)
                | WebhookError::InvalidSecret(_)
                | WebhookError::UnsupportedEvents(_) => StatusCode::BAD_REQUEST,
                WebhookError::NotFound => StatusCode::NOT_FOUND,
                WebhookError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }

        if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            return match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }

        // Malformed request bodies and query strings are the caller's fault
        if self.0.downcast_ref::<JsonRejection>().is_some()
            || self.0.downcast_ref::<QueryRejection>().is_some()
        {
            return StatusCode::BAD_REQUEST;
        }

        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        }

        let body = match self.0.downcast_ref::<WebhookError>() {
            Some(WebhookError::UnsupportedEvents(events)) => json!({
                "error": self.0.to_string(),
                "invalidEvents": events,
            }),
            // Persistence details stay in the logs
            _ if status.is_server_error() => json!({ "error": "Internal server error" }),
            _ => json!({ "error": self.0.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
