// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    application::{dto::query_request::QueryRequestDto, use_cases::query_use_case::QueryUseCase},
    domain::models::query_props::QueryProps,
    presentation::errors::AppError,
};

/// 按过滤条件分页查询观测数据
///
/// 返回 `{total, results}`
pub async fn query_data_doms(
    Extension(use_case): Extension<Arc<QueryUseCase>>,
    payload: Result<Json<QueryRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let result = use_case.search(QueryProps::from(payload)).await?;
    Ok(Json(result))
}
