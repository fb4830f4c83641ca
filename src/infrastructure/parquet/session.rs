// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::sync::Arc;

use datafusion::arrow::array::{Array, Int64Array};
use datafusion::arrow::datatypes::DataType;
use datafusion::arrow::json::writer::JsonArray;
use datafusion::arrow::json::WriterBuilder;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::datasource::file_format::parquet::ParquetFormat;
use datafusion::datasource::listing::ListingOptions;
use datafusion::prelude::{SessionConfig, SessionContext};
use serde_json::{Map, Value};
use tracing::debug;

use super::{collect_parquet_files, ParquetStoreError};
use crate::config::settings::ParquetSettings;
use crate::domain::models::cdms_constants::{MONTH_COL, YEAR_COL};

/// 查询会话工厂
///
/// 每次查询创建新会话，保证能看到最新写入的分区文件。
#[derive(Debug, Clone)]
pub struct ParquetSessionFactory {
    root: PathBuf,
    table_name: String,
    target_partitions: usize,
}

impl ParquetSessionFactory {
    pub fn new(root: impl Into<PathBuf>, table_name: impl Into<String>, target_partitions: usize) -> Self {
        Self {
            root: root.into(),
            table_name: table_name.into(),
            target_partitions: target_partitions.max(1),
        }
    }

    pub fn from_settings(settings: &ParquetSettings) -> Self {
        Self::new(
            settings.root.clone(),
            settings.table_name.clone(),
            settings.target_partitions,
        )
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// 创建会话；存储为空时不注册表
    pub async fn session(&self) -> Result<ParquetSession, ParquetStoreError> {
        let config = SessionConfig::new().with_target_partitions(self.target_partitions);
        let ctx = SessionContext::new_with_config(config);

        let mut files = Vec::new();
        collect_parquet_files(&self.root, &mut files)?;
        if files.is_empty() {
            debug!("no parquet files under {}", self.root.display());
            return Ok(ParquetSession {
                ctx,
                table_name: None,
            });
        }

        let root = std::fs::canonicalize(&self.root)?;
        let mut table_path = root.to_string_lossy().into_owned();
        if !table_path.ends_with('/') {
            table_path.push('/');
        }

        let options = ListingOptions::new(Arc::new(ParquetFormat::default()))
            .with_file_extension(".parquet")
            .with_table_partition_cols(vec![
                (YEAR_COL.to_string(), DataType::Int32),
                (MONTH_COL.to_string(), DataType::Int32),
            ]);
        ctx.register_listing_table(self.table_name.as_str(), &table_path, options, None, None)
            .await?;
        debug!(
            "registered table {} over {} parquet files",
            self.table_name,
            files.len()
        );

        Ok(ParquetSession {
            ctx,
            table_name: Some(self.table_name.clone()),
        })
    }
}

/// 单次查询使用的会话
pub struct ParquetSession {
    ctx: SessionContext,
    table_name: Option<String>,
}

impl ParquetSession {
    /// 存储中是否有已注册的表
    pub fn has_table(&self) -> bool {
        self.table_name.is_some()
    }

    /// 表中的全部列名（含分区列）
    pub async fn columns(&self) -> Result<Vec<String>, ParquetStoreError> {
        let Some(table_name) = &self.table_name else {
            return Ok(Vec::new());
        };
        let df = self.ctx.table(table_name.as_str()).await?;
        Ok(df
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect())
    }

    /// 执行 `SELECT COUNT(*)` 语句并返回计数
    pub async fn count(&self, sql: &str) -> Result<u64, ParquetStoreError> {
        let batches = self.collect(sql).await?;
        let batch = batches
            .iter()
            .find(|b| b.num_rows() > 0)
            .ok_or_else(|| ParquetStoreError::UnexpectedResult("count returned no rows".into()))?;
        let column = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| {
                ParquetStoreError::UnexpectedResult(format!(
                    "count column has type {}",
                    batch.column(0).data_type()
                ))
            })?;
        if column.is_null(0) {
            return Ok(0);
        }
        Ok(column.value(0).max(0) as u64)
    }

    /// 执行查询并把每行转换为 JSON 对象
    pub async fn fetch_json(&self, sql: &str) -> Result<Vec<Map<String, Value>>, ParquetStoreError> {
        let batches = self.collect(sql).await?;
        batches_to_json(&batches)
    }

    async fn collect(&self, sql: &str) -> Result<Vec<RecordBatch>, ParquetStoreError> {
        debug!("executing: {}", sql);
        let df = self.ctx.sql(sql).await?;
        Ok(df.collect().await?)
    }
}

fn batches_to_json(batches: &[RecordBatch]) -> Result<Vec<Map<String, Value>>, ParquetStoreError> {
    let non_empty: Vec<&RecordBatch> = batches.iter().filter(|b| b.num_rows() > 0).collect();
    if non_empty.is_empty() {
        return Ok(Vec::new());
    }

    // 每行保留全部列，缺失值输出为 null
    let mut writer = WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, JsonArray>(Vec::new());
    writer.write_batches(&non_empty)?;
    writer.finish()?;
    let buffer = writer.into_inner();
    if buffer.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<Map<String, Value>> = serde_json::from_slice(&buffer)
        .map_err(|e| ParquetStoreError::UnexpectedResult(e.to_string()))?;
    Ok(rows)
}
