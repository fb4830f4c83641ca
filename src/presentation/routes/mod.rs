// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use crate::application::use_cases::{ingest_use_case::IngestUseCase, query_use_case::QueryUseCase};
use crate::infrastructure::repositories::ingestion_record_repo_impl::IngestionRecordRepositoryImpl;
use crate::presentation::handlers::{ingest_handler, ingestion_handler, query_handler};
use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由（不含依赖注入层）
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route(
            "/1.0/replace_json_s3",
            put(ingest_handler::replace_json_s3::<IngestionRecordRepositoryImpl>),
        )
        .route("/1.0/query_data_doms", post(query_handler::query_data_doms))
        .route(
            "/1.0/ingestions",
            get(ingestion_handler::list_ingestions::<IngestionRecordRepositoryImpl>),
        )
        .route(
            "/1.0/ingestions/{job_id}",
            get(ingestion_handler::get_ingestion::<IngestionRecordRepositoryImpl>),
        );

    Router::new().merge(public_routes).merge(api_routes)
}

/// 组装完整应用：路由、用例注入与请求追踪
pub fn app(
    ingest_use_case: Arc<IngestUseCase<IngestionRecordRepositoryImpl>>,
    query_use_case: Arc<QueryUseCase>,
    record_repo: Arc<IngestionRecordRepositoryImpl>,
) -> Router {
    routes()
        .layer(Extension(ingest_use_case))
        .layer(Extension(query_use_case))
        .layer(Extension(record_repo))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
