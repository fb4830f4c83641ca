// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 纬度/经度二元组，顺序为 `[lat, lon]`
pub type LatLon = [f64; 2];

/// 查询属性
///
/// 一次查询请求的扁平过滤条件集合，每个请求构造一次，用后即弃。
/// 所有字段均可选（分页字段除外），未设置的字段不会生成任何过滤条件。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryProps {
    /// 需要存在（非空）的观测变量
    pub variable: Vec<String>,
    /// 是否附带变量的质量标记列
    pub quality_flag: bool,
    pub platform_code: Option<String>,
    pub project: Option<String>,
    pub provider: Option<String>,
    pub device: Option<String>,
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
    /// ISO-8601 时间字符串
    pub min_datetime: Option<String>,
    /// ISO-8601 时间字符串
    pub max_datetime: Option<String>,
    pub min_lat_lon: Option<LatLon>,
    pub max_lat_lon: Option<LatLon>,
    /// 分页偏移
    pub start_at: u64,
    /// 分页大小，为 0 时只返回总数
    pub size: u64,
    /// 需要返回的列，为空表示全部列
    pub columns: Vec<String>,
}
