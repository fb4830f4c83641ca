// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 摄取记录
///
/// 每次成功摄取一个观测文件后写入元数据表的一行。
/// 时间字段均为 Unix 毫秒时间戳。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionRecord {
    /// 记录主键
    pub id: Uuid,
    /// 源对象地址
    pub s3_url: String,
    /// 摄取任务ID（调用方提供）
    pub uuid: String,
    /// 写入时间
    pub ingested_date: i64,
    /// 解压后文件大小（字节）
    pub file_size: i64,
    /// 解压后文件的 sha256
    pub checksum: String,
    pub job_start_time: i64,
    pub job_end_time: i64,
    /// 写入的观测条数
    pub records_count: i64,
}

impl IngestionRecord {
    /// 创建新的摄取记录，自动生成主键
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        s3_url: impl Into<String>,
        job_id: impl Into<String>,
        ingested_date: i64,
        file_size: i64,
        checksum: impl Into<String>,
        job_start_time: i64,
        job_end_time: i64,
        records_count: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            s3_url: s3_url.into(),
            uuid: job_id.into(),
            ingested_date,
            file_size,
            checksum: checksum.into(),
            job_start_time,
            job_end_time,
            records_count,
        }
    }

    /// 任务耗时（毫秒）
    pub fn duration_ms(&self) -> i64 {
        self.job_end_time - self.job_start_time
    }
}
