// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::models::cdms_constants::MISSING_DEPTH_VALUE;

/// 应用程序配置设置
///
/// 包含服务器、数据库、Parquet 存储、摄取、AWS 与指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置（元数据表）
    pub database: DatabaseSettings,
    /// Parquet 存储与查询配置
    pub parquet: ParquetSettings,
    /// 摄取配置
    pub ingest: IngestSettings,
    /// AWS 配置
    pub aws: AwsSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// Parquet 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ParquetSettings {
    /// Parquet 根目录（hive 分区布局）
    pub root: String,
    /// 在查询引擎中注册的表名
    pub table_name: String,
    /// 缺失深度的占位值，必须为整数
    pub missing_depth_value: String,
    /// 查询引擎的目标分区数
    pub target_partitions: usize,
}

/// 摄取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct IngestSettings {
    /// 下载文件的临时工作目录
    pub working_dir: String,
    /// 是否接受本地路径与 `file://` 地址，仅用于开发与测试
    pub allow_local_sources: bool,
}

/// AWS 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AwsSettings {
    /// 访问密钥
    pub access_key_id: Option<String>,
    /// 密钥
    pub secret_access_key: Option<String>,
    /// 会话令牌
    pub session_token: Option<String>,
    /// 区域
    pub region: String,
    /// 端点 (可选，用于 MinIO 等兼容服务)
    pub endpoint: Option<String>,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl ParquetSettings {
    /// 解析缺失深度占位值
    pub fn missing_depth_value(&self) -> Result<i64, ConfigError> {
        self.missing_depth_value.trim().parse::<i64>().map_err(|_| {
            ConfigError::Message(format!(
                "parquet.missing_depth_value must be an integer, got '{}'",
                self.missing_depth_value
            ))
        })
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从默认值、配置文件与环境变量加载配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CDMS").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.parquet.missing_depth_value()?;
        Ok(settings)
    }

    /// 仅由默认值构建配置（不读取文件与环境变量）
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::defaults(Config::builder())?.build()?.try_deserialize()
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 9801)?
            // Metadata table
            .set_default("database.url", "sqlite://cdms_metadata.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Parquet store
            .set_default("parquet.root", "./parquet_store")?
            .set_default("parquet.table_name", "parquet_table")?
            .set_default("parquet.missing_depth_value", MISSING_DEPTH_VALUE.to_string())?
            .set_default("parquet.target_partitions", 4)?
            // Ingest
            .set_default("ingest.working_dir", "/tmp")?
            .set_default("ingest.allow_local_sources", false)?
            // AWS
            .set_default("aws.region", "us-west-2")?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}
