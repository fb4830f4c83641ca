// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求数据传输对象与用例实现，
/// 用例只依赖领域层的抽象接口与基础设施层的存储实现
pub mod dto;
pub mod use_cases;
