// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：查询属性、观测文件与摄取记录
/// - 仓库接口（repositories）：元数据表与对象存储的抽象接口
/// - 服务（services）：查询条件编译
///
/// 领域层不依赖于任何外部实现。
pub mod models;
pub mod repositories;
pub mod services;
