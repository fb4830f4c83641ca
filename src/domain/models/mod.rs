// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 查询属性（query_props）：一次查询请求的过滤条件集合
/// - 观测文件（observation）：待摄取的 JSON 观测文档
/// - 摄取记录（ingestion_record）：元数据表中的一次摄取记录
/// - 常量（cdms_constants）：列名与元数据键
pub mod cdms_constants;
pub mod ingestion_record;
pub mod observation;
pub mod query_props;
