// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// - 摄取（ingest）：下载观测文件、写入 Parquet、登记元数据、标记源对象
/// - 查询（query）：编译过滤条件并在 Parquet 存储上分页检索
pub mod ingest_use_case;
pub mod query_use_case;
