// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ingestion_record::IngestionRecord;
use crate::domain::repositories::ingestion_record_repository::{
    IngestionRecordRepository, RepositoryError,
};
use crate::infrastructure::database::entities::ingestion_record as record_entity;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;

/// 摄取记录仓库实现
pub struct IngestionRecordRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl IngestionRecordRepositoryImpl {
    /// 创建新的摄取记录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<record_entity::Model> for IngestionRecord {
    fn from(m: record_entity::Model) -> Self {
        Self {
            id: m.id,
            s3_url: m.s3_url,
            uuid: m.uuid,
            ingested_date: m.ingested_date,
            file_size: m.file_size,
            checksum: m.checksum,
            job_start_time: m.job_start_time,
            job_end_time: m.job_end_time,
            records_count: m.records_count,
        }
    }
}

#[async_trait]
impl IngestionRecordRepository for IngestionRecordRepositoryImpl {
    async fn insert(&self, record: &IngestionRecord) -> Result<IngestionRecord, RepositoryError> {
        let model = record_entity::ActiveModel {
            id: Set(record.id),
            s3_url: Set(record.s3_url.clone()),
            uuid: Set(record.uuid.clone()),
            ingested_date: Set(record.ingested_date),
            file_size: Set(record.file_size),
            checksum: Set(record.checksum.clone()),
            job_start_time: Set(record.job_start_time),
            job_end_time: Set(record.job_end_time),
            records_count: Set(record.records_count),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(record.clone())
    }

    async fn find_by_job_id(
        &self,
        job_id: &str,
    ) -> Result<Option<IngestionRecord>, RepositoryError> {
        let model = record_entity::Entity::find()
            .filter(record_entity::Column::Uuid.eq(job_id))
            .order_by_desc(record_entity::Column::IngestedDate)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<IngestionRecord>, RepositoryError> {
        let models = record_entity::Entity::find()
            .order_by_desc(record_entity::Column::IngestedDate)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_repo() -> IngestionRecordRepositoryImpl {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        IngestionRecordRepositoryImpl::new(Arc::new(db))
    }

    fn record(job_id: &str, ingested_date: i64) -> IngestionRecord {
        IngestionRecord::new(
            format!("s3://bucket/{job_id}.json.gz"),
            job_id,
            ingested_date,
            1024,
            "abc123",
            ingested_date - 50,
            ingested_date - 10,
            42,
        )
    }

    #[tokio::test]
    async fn test_insert_and_find_latest_by_job_id() {
        let repo = setup_repo().await;
        repo.insert(&record("job-1", 1_000)).await.unwrap();
        let latest = repo.insert(&record("job-1", 2_000)).await.unwrap();
        repo.insert(&record("job-2", 3_000)).await.unwrap();

        let found = repo.find_by_job_id("job-1").await.unwrap().unwrap();
        assert_eq!(found, latest);
        assert_eq!(found.duration_ms(), 40);
        assert!(repo.find_by_job_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let repo = setup_repo().await;
        for (i, job) in ["a", "b", "c"].iter().enumerate() {
            repo.insert(&record(job, (i as i64 + 1) * 100)).await.unwrap();
        }

        let first_page = repo.list(2, 0).await.unwrap();
        assert_eq!(
            first_page.iter().map(|r| r.uuid.as_str()).collect::<Vec<_>>(),
            vec!["c", "b"]
        );
        let second_page = repo.list(2, 2).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].uuid, "a");
    }
}
