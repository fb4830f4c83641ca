// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 观测数据列名与元数据键常量

pub const TIME_COL: &str = "time";
pub const TIME_OBJ_COL: &str = "time_obj";
pub const YEAR_COL: &str = "year";
pub const MONTH_COL: &str = "month";
pub const DEPTH_COL: &str = "depth";
pub const LAT_COL: &str = "latitude";
pub const LON_COL: &str = "longitude";
pub const PROVIDER_COL: &str = "provider";
pub const PROJECT_COL: &str = "project";
pub const PLATFORM_CODE_COL: &str = "platform_code";
pub const JOB_ID_COL: &str = "job_id";

/// 质量标记列后缀
pub const QUALITY_SUFFIX: &str = "_quality";

/// 观测中的平台对象键
pub const PLATFORM_KEY: &str = "platform";
/// 平台对象中的平台代码键
pub const PLATFORM_CODE_KEY: &str = "code";

/// 深度缺失时写入的占位值
pub const MISSING_DEPTH_VALUE: i64 = -99999;

/// 查询结果中始终隐藏的内部列
pub const INTERNAL_COLUMNS: [&str; 3] = [TIME_OBJ_COL, YEAR_COL, MONTH_COL];

/// 指定列查询时总是附带的默认列
pub const DEFAULT_COLUMNS: [&str; 7] = [
    TIME_COL,
    DEPTH_COL,
    LAT_COL,
    LON_COL,
    PROVIDER_COL,
    PROJECT_COL,
    PLATFORM_CODE_COL,
];

/// 对象标签：摄取完成时间
pub const TAG_PARQUET_INGESTED: &str = "parquet_ingested";
/// 对象标签：摄取任务ID
pub const TAG_JOB_ID: &str = "job_id";
