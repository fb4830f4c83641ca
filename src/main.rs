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

use cdms_parquet::application::use_cases::{
    ingest_use_case::IngestUseCase, query_use_case::QueryUseCase,
};
use cdms_parquet::config::settings::Settings;
use cdms_parquet::domain::repositories::object_store::ObjectStore;
use cdms_parquet::domain::services::query_builder::QueryOptions;
use cdms_parquet::infrastructure::database::connection;
use cdms_parquet::infrastructure::object_store::{
    LocalObjectStore, RoutingObjectStore, S3ObjectStore,
};
use cdms_parquet::infrastructure::parquet::{
    session::ParquetSessionFactory, writer::ParquetWriter,
};
use cdms_parquet::infrastructure::repositories::ingestion_record_repo_impl::IngestionRecordRepositoryImpl;
use cdms_parquet::presentation::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use cdms_parquet::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    let json_logs = std::env::var("CDMS_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    telemetry::init_telemetry(json_logs);
    info!("Starting cdms-parquet...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    let missing_depth_value = settings.parquet.missing_depth_value()?;
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    cdms_parquet::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to metadata database and run migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    info!("Database connection established");

    // 4. Initialize stores
    let s3_store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::from_env(&settings.aws).await);
    let local_store: Option<Arc<dyn ObjectStore>> = if settings.ingest.allow_local_sources {
        warn!("Local file sources are enabled");
        Some(Arc::new(LocalObjectStore::new()))
    } else {
        None
    };
    let object_store: Arc<dyn ObjectStore> =
        Arc::new(RoutingObjectStore::new(Some(s3_store), local_store));
    tokio::fs::create_dir_all(&settings.parquet.root).await?;
    tokio::fs::create_dir_all(&settings.ingest.working_dir).await?;
    let writer = ParquetWriter::new(&settings.parquet.root, missing_depth_value);
    let sessions = ParquetSessionFactory::from_settings(&settings.parquet);
    info!("Parquet store at {}", settings.parquet.root);

    // 5. Initialize use cases
    let record_repo = Arc::new(IngestionRecordRepositoryImpl::new(db.clone()));
    let ingest_use_case = Arc::new(IngestUseCase::new(
        object_store,
        record_repo.clone(),
        writer,
        settings.ingest.working_dir.clone(),
    ));
    let query_use_case = Arc::new(QueryUseCase::new(
        sessions,
        QueryOptions {
            missing_depth_value,
        },
    ));

    // 6. Start HTTP server
    let app = routes::app(ingest_use_case, query_use_case, record_repo);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
