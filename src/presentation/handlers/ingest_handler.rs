// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    application::{dto::ingest_request::IngestRequestDto, use_cases::ingest_use_case::IngestUseCase},
    domain::repositories::ingestion_record_repository::IngestionRecordRepository,
    presentation::errors::AppError,
};

/// 摄取观测文件并替换任务ID对应的 Parquet 数据
///
/// 成功返回 201 `{"message": "ingested"}`
pub async fn replace_json_s3<R>(
    Extension(use_case): Extension<Arc<IngestUseCase<R>>>,
    payload: Result<Json<IngestRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    R: IngestionRecordRepository + 'static,
{
    let Json(payload) = payload?;
    use_case.ingest(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "ingested" }))))
}
