// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 数据库（database）：元数据表连接、迁移与实体映射
/// - 指标（metrics）：Prometheus 指标导出
/// - 对象存储（object_store）：S3 与本地文件的下载和标签
/// - 列式存储（parquet）：Parquet 写入与查询会话
/// - 仓库实现（repositories）：领域仓库接口的具体实现
pub mod database;
pub mod metrics;
pub mod object_store;
pub mod parquet;
pub mod repositories;
