// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 摄取记录仓库（ingestion_record_repository）：元数据表的持久化
/// - 对象存储（object_store）：观测文件的下载与打标签
pub mod ingestion_record_repository;
pub mod object_store;
