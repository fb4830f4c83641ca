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

use crate::{
    application::dto::ingest_request::IngestRequestDto,
    domain::{
        models::{
            cdms_constants::{TAG_JOB_ID, TAG_PARQUET_INGESTED},
            ingestion_record::IngestionRecord,
        },
        repositories::{
            ingestion_record_repository::{IngestionRecordRepository, RepositoryError},
            object_store::{ObjectStore, ObjectStoreError},
        },
    },
    infrastructure::{
        metrics::{
            INGEST_DURATION_SECONDS, INGEST_FAILED_TOTAL, INGEST_RECORDS_TOTAL, INGEST_TOTAL,
        },
        parquet::{
            writer::{validate_job_id, ParquetWriter},
            ParquetStoreError,
        },
    },
    utils::{file_utils, time_utils},
};
use metrics::{counter, histogram};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    ParquetStore(#[from] ParquetStoreError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct IngestUseCase<R> {
    object_store: Arc<dyn ObjectStore>,
    record_repo: Arc<R>,
    writer: ParquetWriter,
    working_dir: PathBuf,
}

impl<R> IngestUseCase<R>
where
    R: IngestionRecordRepository + 'static,
{
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        record_repo: Arc<R>,
        writer: ParquetWriter,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            object_store,
            record_repo,
            writer,
            working_dir: working_dir.into(),
        }
    }

    /// 下载观测文件并替换任务ID对应的 Parquet 数据
    ///
    /// # 返回值
    ///
    /// 写入的记录数
    pub async fn ingest(&self, dto: IngestRequestDto) -> Result<usize, IngestError> {
        dto.validate()
            .map_err(|e| IngestError::ValidationError(e.to_string()))?;
        // 任务ID会成为文件名，下载前先检查
        validate_job_id(&dto.job_id).map_err(|e| IngestError::ValidationError(e.to_string()))?;
        counter!(INGEST_TOTAL).increment(1);

        let start = Instant::now();
        // 每次摄取使用独立的临时目录，避免同名对象互相覆盖
        let scratch = self.working_dir.join(Uuid::new_v4().to_string());
        let result = self.run(&dto, &scratch).await;
        if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to clean up {}: {}", scratch.display(), e);
            }
        }
        histogram!(INGEST_DURATION_SECONDS).record(start.elapsed().as_secs_f64());

        match &result {
            Ok(count) => {
                counter!(INGEST_RECORDS_TOTAL).increment(*count as u64);
                info!("ingested {} records from {} as job {}", count, dto.s3_url, dto.job_id);
            }
            Err(e) => {
                counter!(INGEST_FAILED_TOTAL).increment(1);
                warn!("failed to ingest {}: {}", dto.s3_url, e);
            }
        }
        result
    }

    async fn run(&self, dto: &IngestRequestDto, scratch: &Path) -> Result<usize, IngestError> {
        // 1. Download
        let mut local_file = self.object_store.download(&dto.s3_url, scratch).await?;

        // 2. Unzip
        if file_utils::is_gzipped(&local_file) {
            debug!("file is gzipped. unzipping {}", local_file.display());
            let gz = local_file.clone();
            local_file = tokio::task::spawn_blocking(move || file_utils::gunzip_file(&gz)).await??;
        }

        // 3. Parse and write
        debug!("ingesting file: {}", local_file.display());
        let job_start_time = time_utils::current_time_unix_ms();
        let writer = self.writer.clone();
        let (path, job_id) = (local_file.clone(), dto.job_id.clone());
        let records_count =
            tokio::task::spawn_blocking(move || writer.ingest_file(&path, &job_id)).await??;
        let job_end_time = time_utils::current_time_unix_ms();

        // 4. Metadata row
        debug!("uploading to metadata table");
        let path = local_file.clone();
        let (file_size, checksum) = tokio::task::spawn_blocking(move || {
            Ok::<_, std::io::Error>((file_utils::file_size(&path)?, file_utils::checksum(&path)?))
        })
        .await??;
        let record = IngestionRecord::new(
            dto.s3_url.clone(),
            dto.job_id.clone(),
            time_utils::current_time_unix_ms(),
            file_size as i64,
            checksum,
            job_start_time,
            job_end_time,
            records_count as i64,
        );
        self.record_repo.insert(&record).await?;
        debug!("job {} wrote parquet in {} ms", dto.job_id, record.duration_ms());

        // 5. Cleanup
        debug!("deleting used file");
        file_utils::delete_file(&local_file)?;

        // 6. Tag source object
        let tags = BTreeMap::from([
            (TAG_PARQUET_INGESTED.to_string(), time_utils::current_time_str()),
            (TAG_JOB_ID.to_string(), dto.job_id.clone()),
        ]);
        self.object_store.add_tags(&dto.s3_url, &tags).await?;

        Ok(records_count)
    }
}
