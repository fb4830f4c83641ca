// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 测试主模块
///
/// 集成测试通过完整路由驱动摄取与查询，单元测试覆盖公开 API 的组合行为
mod integration;

// === Unit Tests ===
mod unit;
