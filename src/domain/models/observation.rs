// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::models::cdms_constants::{
    DEPTH_COL, JOB_ID_COL, LAT_COL, LON_COL, MONTH_COL, PLATFORM_CODE_COL,
    PLATFORM_CODE_KEY, PLATFORM_KEY, PROJECT_COL, PROVIDER_COL, TIME_COL, TIME_OBJ_COL, YEAR_COL,
};
use crate::utils::time_utils;

/// 观测文件解析错误
#[derive(Error, Debug)]
pub enum ObservationError {
    #[error("invalid observation file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("observation #{index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("observation #{index} has no 'time' value")]
    MissingTime { index: usize },

    #[error("observation #{index} has invalid '{field}': {reason}")]
    InvalidField {
        index: usize,
        field: String,
        reason: String,
    },
}

/// 观测文件的原始结构
#[derive(Debug, Deserialize)]
pub struct ObservationFile {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub observations: Vec<Value>,
}

/// 规范化后的单条观测
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// 原始时间字符串
    pub time: String,
    pub time_obj: DateTime<Utc>,
    pub depth: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub provider: Option<String>,
    pub project: Option<String>,
    pub platform_code: Option<String>,
    /// 其余所有键（测量变量、质量标记、meta 等）
    pub variables: BTreeMap<String, Value>,
}

impl Observation {
    /// (年, 月) 分区键
    pub fn partition(&self) -> (i32, u32) {
        (self.time_obj.year(), self.time_obj.month())
    }
}

/// 由固定列占用、不能作为变量列出现的键
const RESERVED_KEYS: [&str; 12] = [
    TIME_COL,
    TIME_OBJ_COL,
    YEAR_COL,
    MONTH_COL,
    DEPTH_COL,
    LAT_COL,
    LON_COL,
    PROVIDER_COL,
    PROJECT_COL,
    PLATFORM_KEY,
    PLATFORM_CODE_COL,
    JOB_ID_COL,
];

/// 解析观测文件字节并规范化每条观测
///
/// 文件级 `provider` / `project` 作为每条观测的默认值；
/// 缺失或为 null 的深度写为 `missing_depth_value`。
pub fn parse_observations(
    bytes: &[u8],
    missing_depth_value: i64,
) -> Result<Vec<Observation>, ObservationError> {
    let file: ObservationFile = serde_json::from_slice(bytes)?;
    file.observations
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let Value::Object(map) = value else {
                return Err(ObservationError::NotAnObject { index });
            };
            normalize(
                index,
                map,
                file.provider.as_deref(),
                file.project.as_deref(),
                missing_depth_value,
            )
        })
        .collect()
}

fn normalize(
    index: usize,
    mut map: Map<String, Value>,
    default_provider: Option<&str>,
    default_project: Option<&str>,
    missing_depth_value: i64,
) -> Result<Observation, ObservationError> {
    let time = match map.remove(TIME_COL) {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => return Err(ObservationError::MissingTime { index }),
        Some(other) => {
            return Err(invalid(index, TIME_COL, format!("expected string, got {other}")))
        }
    };
    let time_obj = time_utils::parse_datetime(&time)
        .map_err(|e| invalid(index, TIME_COL, e.to_string()))?;

    let depth = optional_number(index, DEPTH_COL, map.remove(DEPTH_COL))?
        .unwrap_or(missing_depth_value as f64);
    let latitude = optional_number(index, LAT_COL, map.remove(LAT_COL))?;
    let longitude = optional_number(index, LON_COL, map.remove(LON_COL))?;

    let provider = optional_string(index, PROVIDER_COL, map.remove(PROVIDER_COL))?
        .or_else(|| default_provider.map(str::to_string));
    let project = optional_string(index, PROJECT_COL, map.remove(PROJECT_COL))?
        .or_else(|| default_project.map(str::to_string));

    let platform_code = match map.remove(PLATFORM_KEY) {
        Some(Value::Object(platform)) => match platform.get(PLATFORM_CODE_KEY) {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => None,
        },
        _ => None,
    };
    let platform_code = match map.remove(PLATFORM_CODE_COL) {
        Some(value) => optional_string(index, PLATFORM_CODE_COL, Some(value))?.or(platform_code),
        None => platform_code,
    };

    let variables = map
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .collect();

    Ok(Observation {
        time,
        time_obj,
        depth,
        latitude,
        longitude,
        provider,
        project,
        platform_code,
        variables,
    })
}

fn invalid(index: usize, field: &str, reason: String) -> ObservationError {
    ObservationError::InvalidField {
        index,
        field: field.to_string(),
        reason,
    }
}

fn optional_number(
    index: usize,
    field: &str,
    value: Option<Value>,
) -> Result<Option<f64>, ObservationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(index, field, format!("{n} is not representable"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(index, field, format!("'{s}' is not a number"))),
        Some(other) => Err(invalid(index, field, format!("expected number, got {other}"))),
    }
}

fn optional_string(
    index: usize,
    field: &str,
    value: Option<Value>,
) -> Result<Option<String>, ObservationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(invalid(index, field, format!("expected string, got {other}"))),
    }
}
