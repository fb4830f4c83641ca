// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Parquet 列式存储模块
///
/// - 写入（writer）：观测 JSON → Arrow → 按年/月分区的 Parquet 文件
/// - 会话（session）：注册 Parquet 根目录的查询引擎会话工厂
pub mod session;
pub mod writer;

use datafusion::arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use datafusion::parquet::errors::ParquetError;
use thiserror::Error;

use crate::domain::models::observation::ObservationError;

/// Parquet 存储错误类型
#[derive(Error, Debug)]
pub enum ParquetStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("Query engine error: {0}")]
    DataFusion(#[from] DataFusionError),

    #[error("invalid job id '{0}'")]
    InvalidJobId(String),

    #[error("unexpected query result: {0}")]
    UnexpectedResult(String),
}

/// 递归收集目录下所有扩展名为 `.parquet` 的文件
pub(crate) fn collect_parquet_files(
    dir: &std::path::Path,
    out: &mut Vec<std::path::PathBuf>,
) -> std::io::Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_parquet_files(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("parquet") {
            out.push(path);
        }
    }
    Ok(())
}
