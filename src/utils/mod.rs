// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括文件处理（解压、校验和）、时间解析与遥测初始化
pub mod file_utils;
pub mod telemetry;
pub mod time_utils;
