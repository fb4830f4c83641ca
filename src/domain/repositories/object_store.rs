// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// 对象存储错误类型
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 无法解析的对象地址
    #[error("invalid object url '{0}'")]
    InvalidUrl(String),
    /// 不支持的地址协议
    #[error("unsupported object url scheme '{0}'")]
    UnsupportedScheme(String),
    /// 对象不存在
    #[error("object not found: {0}")]
    NotFound(String),
    /// 存储服务错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 对象存储特质
///
/// 观测文件所在的远端存储，支持下载与写入标签
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 下载对象到 `dir` 目录，返回本地文件路径（文件名取对象键的最后一段）
    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, ObjectStoreError>;

    /// 为对象设置标签集合（覆盖原有标签）
    async fn add_tags(
        &self,
        url: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<(), ObjectStoreError>;
}
