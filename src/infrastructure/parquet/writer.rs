// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use datafusion::arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, StringBuilder, TimestampMillisecondBuilder,
};
use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use datafusion::parquet::arrow::ArrowWriter;
use datafusion::parquet::basic::Compression;
use datafusion::parquet::file::properties::WriterProperties;
use serde_json::Value;
use tracing::{debug, info};

use super::{collect_parquet_files, ParquetStoreError};
use crate::domain::models::cdms_constants::{
    DEPTH_COL, JOB_ID_COL, LAT_COL, LON_COL, MONTH_COL, PLATFORM_CODE_COL, PROJECT_COL,
    PROVIDER_COL, TIME_COL, TIME_OBJ_COL, YEAR_COL,
};
use crate::domain::models::observation::{parse_observations, Observation};

const UTC: &str = "UTC";

/// 每个文件都有的固定列，类型不随数据变化
const FIXED_COLUMNS: [&str; 9] = [
    TIME_COL,
    TIME_OBJ_COL,
    DEPTH_COL,
    LAT_COL,
    LON_COL,
    PROVIDER_COL,
    PROJECT_COL,
    PLATFORM_CODE_COL,
    JOB_ID_COL,
];

/// 变量列的推断类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VariableKind {
    Number,
    Boolean,
    Text,
}

impl VariableKind {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(_) => Some(Self::Number),
            Value::Bool(_) => Some(Self::Boolean),
            Value::String(_) | Value::Array(_) | Value::Object(_) => Some(Self::Text),
        }
    }

    /// 同一列出现不同类型时退化为文本
    fn merge(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            Self::Text
        }
    }

    /// 已有文件中的列类型，只有数值与布尔保持原样
    fn from_data_type(data_type: &DataType) -> Self {
        match data_type {
            DataType::Float64 => Self::Number,
            DataType::Boolean => Self::Boolean,
            _ => Self::Text,
        }
    }

    fn data_type(self) -> DataType {
        match self {
            Self::Number => DataType::Float64,
            Self::Boolean => DataType::Boolean,
            Self::Text => DataType::Utf8,
        }
    }
}

/// 观测 Parquet 写入器
///
/// 按 `year=Y/month=M/<job_id>.parquet` 的 hive 布局写入根目录，
/// 同一任务ID的再次写入会替换之前写入的全部文件。
#[derive(Debug, Clone)]
pub struct ParquetWriter {
    root: PathBuf,
    missing_depth_value: i64,
}

impl ParquetWriter {
    pub fn new(root: impl Into<PathBuf>, missing_depth_value: i64) -> Self {
        Self {
            root: root.into(),
            missing_depth_value,
        }
    }

    /// 读取观测 JSON 文件并写入 Parquet，返回写入的记录数
    pub fn ingest_file(&self, path: &Path, job_id: &str) -> Result<usize, ParquetStoreError> {
        validate_job_id(job_id)?;
        let bytes = fs::read(path)?;
        let observations = parse_observations(&bytes, self.missing_depth_value)?;
        debug!(
            "parsed {} observations from {}",
            observations.len(),
            path.display()
        );
        self.replace(job_id, &observations)
    }

    /// 用给定观测替换任务ID此前写入的全部数据
    pub fn replace(
        &self,
        job_id: &str,
        observations: &[Observation],
    ) -> Result<usize, ParquetStoreError> {
        validate_job_id(job_id)?;
        let existing = self.existing_variable_kinds(job_id)?;
        let schema = build_schema(observations, &existing);

        let mut partitions: BTreeMap<(i32, u32), Vec<&Observation>> = BTreeMap::new();
        for observation in observations {
            partitions
                .entry(observation.partition())
                .or_default()
                .push(observation);
        }

        // 先写入临时文件，全部成功后再替换旧文件
        let mut staged = Vec::with_capacity(partitions.len());
        let result = partitions.iter().try_for_each(|((year, month), rows)| {
            let dir = self
                .root
                .join(format!("{YEAR_COL}={year}"))
                .join(format!("{MONTH_COL}={month}"));
            fs::create_dir_all(&dir)?;
            let final_path = dir.join(format!("{job_id}.parquet"));
            let tmp_path = dir.join(format!(".{job_id}.parquet.tmp"));
            staged.push((tmp_path.clone(), final_path));
            let batch = build_batch(&schema, job_id, rows)?;
            write_batch(&tmp_path, schema.clone(), &batch)
        });
        if let Err(e) = result {
            for (tmp_path, _) in &staged {
                let _ = fs::remove_file(tmp_path);
            }
            return Err(e);
        }

        let removed = self.remove_job(job_id)?;
        if removed > 0 {
            debug!("removed {} existing parquet files for job {}", removed, job_id);
        }
        for (tmp_path, final_path) in staged {
            fs::rename(tmp_path, final_path)?;
        }

        info!(
            "wrote {} records for job {} into {} partitions",
            observations.len(),
            job_id,
            partitions.len()
        );
        Ok(observations.len())
    }

    /// 读取其他任务已写入文件中的变量列类型
    ///
    /// 同名列沿用已有类型，保证整个存储的文件 schema 可以合并。
    /// 本任务自己的旧文件即将被替换，不参与。
    fn existing_variable_kinds(
        &self,
        job_id: &str,
    ) -> Result<BTreeMap<String, VariableKind>, ParquetStoreError> {
        let own_file = format!("{job_id}.parquet");
        let mut files = Vec::new();
        collect_parquet_files(&self.root, &mut files)?;
        files.sort();

        let mut kinds = BTreeMap::new();
        for path in files {
            if path.file_name().and_then(|n| n.to_str()) == Some(own_file.as_str()) {
                continue;
            }
            let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?;
            for field in builder.schema().fields().iter() {
                if FIXED_COLUMNS.contains(&field.name().as_str()) {
                    continue;
                }
                kinds
                    .entry(field.name().clone())
                    .or_insert_with(|| VariableKind::from_data_type(field.data_type()));
            }
        }
        Ok(kinds)
    }

    /// 删除任务ID写入的全部 Parquet 文件，返回删除的文件数
    fn remove_job(&self, job_id: &str) -> Result<usize, ParquetStoreError> {
        let file_name = format!("{job_id}.parquet");
        let mut files = Vec::new();
        collect_parquet_files(&self.root, &mut files)?;
        let mut removed = 0;
        for path in files {
            if path.file_name().and_then(|n| n.to_str()) == Some(file_name.as_str()) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// 任务ID会成为文件名，只允许字母、数字、`-`、`_`、`.`，且不能以 `.` 开头
pub fn validate_job_id(job_id: &str) -> Result<(), ParquetStoreError> {
    let valid = !job_id.is_empty()
        && !job_id.starts_with('.')
        && job_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ParquetStoreError::InvalidJobId(job_id.to_string()))
    }
}

fn build_schema(
    observations: &[Observation],
    existing: &BTreeMap<String, VariableKind>,
) -> SchemaRef {
    let mut kinds: BTreeMap<&str, VariableKind> = BTreeMap::new();
    for observation in observations {
        for (key, value) in &observation.variables {
            if let Some(kind) = VariableKind::of(value) {
                kinds
                    .entry(key.as_str())
                    .and_modify(|k| *k = k.merge(kind))
                    .or_insert(kind);
            }
        }
    }
    // 存储中已有的列类型优先，不兼容的值写为 null（数值、布尔）或文本
    for (name, kind) in kinds.iter_mut() {
        if let Some(established) = existing.get(*name) {
            *kind = *established;
        }
    }

    let mut fields = vec![
        Field::new(TIME_COL, DataType::Utf8, false),
        Field::new(
            TIME_OBJ_COL,
            DataType::Timestamp(TimeUnit::Millisecond, Some(UTC.into())),
            false,
        ),
        Field::new(DEPTH_COL, DataType::Float64, false),
        Field::new(LAT_COL, DataType::Float64, true),
        Field::new(LON_COL, DataType::Float64, true),
        Field::new(PROVIDER_COL, DataType::Utf8, true),
        Field::new(PROJECT_COL, DataType::Utf8, true),
        Field::new(PLATFORM_CODE_COL, DataType::Utf8, true),
        Field::new(JOB_ID_COL, DataType::Utf8, false),
    ];
    // 全为 null 的变量不建列，避免与其他文件的类型冲突
    fields.extend(
        kinds
            .into_iter()
            .map(|(name, kind)| Field::new(name, kind.data_type(), true)),
    );
    Arc::new(Schema::new(fields))
}

fn build_batch(
    schema: &SchemaRef,
    job_id: &str,
    rows: &[&Observation],
) -> Result<RecordBatch, ParquetStoreError> {
    let mut time = StringBuilder::new();
    let mut time_obj = TimestampMillisecondBuilder::new().with_timezone(UTC);
    let mut depth = Float64Builder::new();
    let mut latitude = Float64Builder::new();
    let mut longitude = Float64Builder::new();
    let mut provider = StringBuilder::new();
    let mut project = StringBuilder::new();
    let mut platform_code = StringBuilder::new();
    let mut job = StringBuilder::new();

    for row in rows {
        time.append_value(&row.time);
        time_obj.append_value(row.time_obj.timestamp_millis());
        depth.append_value(row.depth);
        latitude.append_option(row.latitude);
        longitude.append_option(row.longitude);
        provider.append_option(row.provider.as_deref());
        project.append_option(row.project.as_deref());
        platform_code.append_option(row.platform_code.as_deref());
        job.append_value(job_id);
    }

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(time.finish()),
        Arc::new(time_obj.finish()),
        Arc::new(depth.finish()),
        Arc::new(latitude.finish()),
        Arc::new(longitude.finish()),
        Arc::new(provider.finish()),
        Arc::new(project.finish()),
        Arc::new(platform_code.finish()),
        Arc::new(job.finish()),
    ];

    let fixed = columns.len();
    for field in schema.fields().iter().skip(fixed) {
        let name = field.name();
        let column: ArrayRef = match field.data_type() {
            DataType::Float64 => {
                let mut builder = Float64Builder::with_capacity(rows.len());
                for row in rows {
                    builder.append_option(row.variables.get(name).and_then(Value::as_f64));
                }
                Arc::new(builder.finish())
            }
            DataType::Boolean => {
                let mut builder = BooleanBuilder::with_capacity(rows.len());
                for row in rows {
                    builder.append_option(row.variables.get(name).and_then(Value::as_bool));
                }
                Arc::new(builder.finish())
            }
            _ => {
                let mut builder = StringBuilder::new();
                for row in rows {
                    match row.variables.get(name) {
                        None | Some(Value::Null) => builder.append_null(),
                        Some(Value::String(s)) => builder.append_value(s),
                        Some(other) => builder.append_value(other.to_string()),
                    }
                }
                Arc::new(builder.finish())
            }
        };
        columns.push(column);
    }

    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}

fn write_batch(path: &Path, schema: SchemaRef, batch: &RecordBatch) -> Result<(), ParquetStoreError> {
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}
