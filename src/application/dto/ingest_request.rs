// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 摄取请求：将对象存储中的观测文件写入 Parquet
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct IngestRequestDto {
    #[validate(length(min = 1))]
    pub s3_url: String,
    #[validate(length(min = 1))]
    pub job_id: String,
}

/// 摄取记录分页参数
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct IngestionListQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

impl Default for IngestionListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}
