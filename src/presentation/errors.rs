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
use validator::ValidationErrors;

use crate::application::use_cases::{
    ingest_use_case::IngestError, query_use_case::QueryUseCaseError,
};
use crate::domain::repositories::ingestion_record_repository::RepositoryError;

const INVALID_BODY: &str = "invalid request body";

/// 应用错误类型
///
/// 封装所有可能的应用层错误，统一转换为 `{message, details}` 响应
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        if self.0.downcast_ref::<JsonRejection>().is_some()
            || self.0.downcast_ref::<QueryRejection>().is_some()
            || self.0.downcast_ref::<ValidationErrors>().is_some()
        {
            return (StatusCode::BAD_REQUEST, INVALID_BODY);
        }

        if let Some(err) = self.0.downcast_ref::<IngestError>() {
            return match err {
                IngestError::ValidationError(_) => (StatusCode::BAD_REQUEST, INVALID_BODY),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to ingest to parquet",
                ),
            };
        }

        if let Some(err) = self.0.downcast_ref::<QueryUseCaseError>() {
            return match err {
                QueryUseCaseError::InvalidArgument(_) | QueryUseCaseError::UnknownVariable(_) => {
                    (StatusCode::BAD_REQUEST, "invalid query arguments")
                }
                QueryUseCaseError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "query failed"),
            };
        }

        match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound) => (StatusCode::NOT_FOUND, "not found"),
            Some(RepositoryError::Database(_)) | None => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let details = self.0.to_string();
        if status.is_server_error() {
            error!("{}: {}", message, details);
        }

        let body = Json(json!({ "message": message, "details": details }));
        (status, body).into_response()
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
