// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ingestion_record::IngestionRecord;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 摄取记录仓库特质
///
/// 定义元数据表的数据访问接口
#[async_trait]
pub trait IngestionRecordRepository: Send + Sync {
    /// 插入一条摄取记录
    async fn insert(&self, record: &IngestionRecord) -> Result<IngestionRecord, RepositoryError>;

    /// 根据任务ID查找最近一次摄取记录
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(IngestionRecord))` - 找到记录
    /// * `Ok(None)` - 该任务从未摄取
    /// * `Err(RepositoryError)` - 查询失败
    async fn find_by_job_id(&self, job_id: &str)
        -> Result<Option<IngestionRecord>, RepositoryError>;

    /// 按摄取时间倒序分页列出记录
    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<IngestionRecord>, RepositoryError>;
}
