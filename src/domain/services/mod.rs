// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 查询构建（query_builder）：将查询属性编译为分区感知的过滤条件
pub mod query_builder;
