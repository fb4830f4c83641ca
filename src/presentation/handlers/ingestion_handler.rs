// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    application::dto::ingest_request::IngestionListQuery,
    domain::repositories::ingestion_record_repository::{IngestionRecordRepository, RepositoryError},
    presentation::errors::AppError,
};

/// 获取任务ID最近一次的摄取记录
pub async fn get_ingestion<R>(
    Extension(repo): Extension<Arc<R>>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    R: IngestionRecordRepository + 'static,
{
    let record = repo
        .find_by_job_id(&job_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    Ok(Json(record))
}

/// 分页列出摄取记录（新记录在前）
pub async fn list_ingestions<R>(
    Extension(repo): Extension<Arc<R>>,
    params: Result<Query<IngestionListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError>
where
    R: IngestionRecordRepository + 'static,
{
    let Query(params) = params?;
    params.validate()?;
    let records = repo.list(params.limit, params.offset).await?;
    Ok(Json(records))
}
