// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::query_props::QueryProps;

/// 观测查询请求
///
/// 分页、深度、时间与经纬度范围字段为必填；缺失时请求体反序列化失败。
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct QueryRequestDto {
    /// 负数按 0 处理
    pub start_from: i64,
    /// 小于 1 时只返回总数
    pub size: i64,
    pub min_depth: f64,
    pub max_depth: f64,
    pub min_time: String,
    pub max_time: String,
    /// `[lat, lon]`
    #[validate(length(equal = 2))]
    pub min_lat_lon: Vec<f64>,
    /// `[lat, lon]`
    #[validate(length(equal = 2))]
    pub max_lat_lon: Vec<f64>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub variable: Vec<String>,
    #[serde(default)]
    pub quality_flag: bool,
    pub platform_code: Option<String>,
    pub provider: Option<String>,
    pub project: Option<String>,
    pub device: Option<String>,
}

fn lat_lon(values: &[f64]) -> Option<[f64; 2]> {
    match values {
        [lat, lon] => Some([*lat, *lon]),
        _ => None,
    }
}

impl From<QueryRequestDto> for QueryProps {
    fn from(dto: QueryRequestDto) -> Self {
        QueryProps {
            variable: dto.variable,
            quality_flag: dto.quality_flag,
            platform_code: dto.platform_code,
            project: dto.project,
            provider: dto.provider,
            device: dto.device,
            min_depth: Some(dto.min_depth),
            max_depth: Some(dto.max_depth),
            min_datetime: Some(dto.min_time),
            max_datetime: Some(dto.max_time),
            min_lat_lon: lat_lon(&dto.min_lat_lon),
            max_lat_lon: lat_lon(&dto.max_lat_lon),
            start_at: u64::try_from(dto.start_from).unwrap_or(0),
            size: u64::try_from(dto.size).unwrap_or(0),
            columns: dto.columns,
        }
    }
}
