// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unrecognized datetime '{0}'")]
pub struct DateTimeParseError(pub String);

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// 解析 ISO-8601 时间字符串
///
/// 支持 RFC 3339（含时区）、不带时区的日期时间（按 UTC 处理）以及纯日期。
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, DateTimeParseError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(DateTimeParseError(raw.to_string()))
}

/// 当前 Unix 毫秒时间戳
pub fn current_time_unix_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// 当前时间的 ISO-8601 字符串
pub fn current_time_str() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
