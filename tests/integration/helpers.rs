// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use cdms_parquet::application::use_cases::{
    ingest_use_case::IngestUseCase, query_use_case::QueryUseCase,
};
use cdms_parquet::domain::services::query_builder::QueryOptions;
use cdms_parquet::infrastructure::object_store::LocalObjectStore;
use cdms_parquet::infrastructure::parquet::{
    session::ParquetSessionFactory, writer::ParquetWriter,
};
use cdms_parquet::infrastructure::repositories::ingestion_record_repo_impl::IngestionRecordRepositoryImpl;
use cdms_parquet::presentation::routes;
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const MISSING_DEPTH: i64 = -99999;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub record_repo: Arc<IngestionRecordRepositoryImpl>,
    pub source_dir: TempDir,
    pub store_dir: TempDir,
    pub work_dir: TempDir,
}

pub async fn create_test_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to sqlite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    let record_repo = Arc::new(IngestionRecordRepositoryImpl::new(Arc::new(db)));

    let source_dir = tempfile::tempdir().unwrap();
    let store_dir = tempfile::tempdir().unwrap();
    let work_dir = tempfile::tempdir().unwrap();

    let ingest = Arc::new(IngestUseCase::new(
        Arc::new(LocalObjectStore::new()),
        record_repo.clone(),
        ParquetWriter::new(store_dir.path(), MISSING_DEPTH),
        work_dir.path(),
    ));
    let query = Arc::new(QueryUseCase::new(
        ParquetSessionFactory::new(store_dir.path(), "parquet_table", 2),
        QueryOptions {
            missing_depth_value: MISSING_DEPTH,
        },
    ));

    TestApp {
        router: routes::app(ingest, query, record_repo.clone()),
        record_repo,
        source_dir,
        store_dir,
        work_dir,
    }
}

impl TestApp {
    /// 在源目录写入观测文件，返回其 `file://` 地址
    pub fn put_source(&self, name: &str, body: &Value) -> String {
        let path: PathBuf = self.source_dir.path().join(name);
        std::fs::write(&path, body.to_string()).unwrap();
        format!("file://{}", path.display())
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn ingest(&self, url: &str, job_id: &str) -> (StatusCode, Value) {
        self.send(
            Method::PUT,
            "/1.0/replace_json_s3",
            Some(serde_json::json!({ "s3_url": url, "job_id": job_id })),
        )
        .await
    }
}

/// 2017 年 1 至 3 月的三条示例观测
pub fn sample_observations() -> Value {
    serde_json::json!({
        "provider": "NCAR",
        "project": "ICOADS Release 3.0",
        "observations": [
            {"time": "2017-01-05T00:00:00Z", "depth": 1.0, "latitude": 10.0, "longitude": 20.0,
             "air_temperature": 20.5, "air_temperature_quality": 1, "platform": {"code": "30"}},
            {"time": "2017-02-10T12:00:00Z", "latitude": 11.0, "longitude": 21.0,
             "wind_speed": 4.2, "platform": {"code": "41"}},
            {"time": "2017-03-15T00:00:00Z", "depth": 55.0, "latitude": 12.0, "longitude": 22.0,
             "air_temperature": 18.0, "provider": "Florida State University",
             "platform": {"code": "30"}}
        ]
    })
}

/// 覆盖全部数据的查询请求体
pub fn query_body() -> Value {
    serde_json::json!({
        "start_from": 0,
        "size": 10,
        "min_depth": -100.0,
        "max_depth": 100.0,
        "min_time": "2017-01-01T00:00:00Z",
        "max_time": "2017-12-31T23:59:59Z",
        "min_lat_lon": [-90.0, -180.0],
        "max_lat_lon": [90.0, 180.0]
    })
}
