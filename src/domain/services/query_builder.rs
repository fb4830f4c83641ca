// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::domain::models::cdms_constants::{
    DEFAULT_COLUMNS, DEPTH_COL, LAT_COL, LON_COL, MISSING_DEPTH_VALUE, MONTH_COL,
    PLATFORM_CODE_COL, PROJECT_COL, PROVIDER_COL, QUALITY_SUFFIX, TIME_OBJ_COL, YEAR_COL,
};
use crate::domain::models::query_props::QueryProps;
use crate::utils::time_utils;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// 查询条件构建错误
#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("invalid {field}: '{value}' is not a recognized datetime")]
    InvalidDatetime { field: &'static str, value: String },

    #[error("invalid time range: min_time '{min}' is after max_time '{max}'")]
    InvalidTimeRange { min: String, max: String },

    #[error("invalid column name: '{0}'")]
    InvalidIdentifier(String),
}

/// 查询构建选项
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// 深度缺失时写入的占位值，深度过滤总是允许该值通过
    pub missing_depth_value: i64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            missing_depth_value: MISSING_DEPTH_VALUE,
        }
    }
}

/// 查询条件编译器
///
/// 将部分填充的 [`QueryProps`] 转换为合取形式的 SQL 过滤条件。
/// 时间范围会被拆分为 `year` / `month` 分区条件，以便查询引擎裁剪分区。
#[derive(Debug, Clone)]
pub struct Query {
    props: QueryProps,
    options: QueryOptions,
}

/// 为 SQL 标识符加双引号
pub fn quote_identifier(name: &str) -> String {
    let escaped = name.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

/// 为 SQL 字符串字面量加单引号
pub fn quote_literal(value: &str) -> String {
    let escaped = value.replace('\'', "''");
    format!("'{escaped}'")
}

fn checked_identifier(name: &str) -> Result<&str, QueryError> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(QueryError::InvalidIdentifier(name.to_string()))
    }
}

fn timestamp_literal(dt: &DateTime<Utc>) -> String {
    quote_literal(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn inclusive_list<T: std::fmt::Display>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

impl Query {
    pub fn new(props: QueryProps, options: QueryOptions) -> Self {
        Self { props, options }
    }

    pub fn with_defaults(props: QueryProps) -> Self {
        Self::new(props, QueryOptions::default())
    }

    pub fn props(&self) -> &QueryProps {
        &self.props
    }

    /// 深度条件
    ///
    /// 形如 `((depth >= MIN AND depth <= MAX) OR depth = MISSING)`，
    /// 只包含已设置的边界；两个边界都未设置时返回 `None`。
    pub fn depth_condition(&self) -> Option<String> {
        if self.props.min_depth.is_none() && self.props.max_depth.is_none() {
            return None;
        }
        let depth = quote_identifier(DEPTH_COL);
        let mut conditions = Vec::with_capacity(2);
        if let Some(min_depth) = self.props.min_depth {
            debug!("setting depth min condition: {}", min_depth);
            conditions.push(format!("{depth} >= {min_depth}"));
        }
        if let Some(max_depth) = self.props.max_depth {
            debug!("setting depth max condition: {}", max_depth);
            conditions.push(format!("{depth} <= {max_depth}"));
        }
        debug!("has depth condition. adding missing depth condition");
        Some(format!(
            "(({}) OR {depth} = {})",
            conditions.join(" AND "),
            self.options.missing_depth_value
        ))
    }

    /// 变量存在条件：任一变量非空即满足
    pub fn variables_condition(&self) -> Result<Option<String>, QueryError> {
        if self.props.variable.is_empty() {
            return Ok(None);
        }
        let filters = self
            .props
            .variable
            .iter()
            .map(|each| {
                debug!("setting not null variable: {}", each);
                checked_identifier(each).map(|v| format!("{} IS NOT NULL", quote_identifier(v)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(format!("({})", filters.join(" OR "))))
    }

    /// 时间条件（分区条件在前，取值条件在后）
    pub fn time_conditions(&self) -> Result<Option<Vec<String>>, QueryError> {
        let min = self
            .props
            .min_datetime
            .as_deref()
            .map(|raw| parse_bound("min_time", raw))
            .transpose()?;
        let max = self
            .props
            .max_datetime
            .as_deref()
            .map(|raw| parse_bound("max_time", raw))
            .transpose()?;
        if let (Some(min), Some(max)) = (&min, &max) {
            if min > max {
                return Err(QueryError::InvalidTimeRange {
                    min: min.to_rfc3339(),
                    max: max.to_rfc3339(),
                });
            }
        }

        let time_obj = quote_identifier(TIME_OBJ_COL);
        let year = quote_identifier(YEAR_COL);
        let month = quote_identifier(MONTH_COL);

        let mut conditions = Vec::new();
        if let Some(min) = &min {
            debug!("setting datetime min condition: {}", min);
            conditions.push(format!("{time_obj} >= {}", timestamp_literal(min)));
        }
        if let Some(max) = &max {
            debug!("setting datetime max condition: {}", max);
            conditions.push(format!("{time_obj} <= {}", timestamp_literal(max)));
        }

        let partition_conditions = match (&min, &max) {
            (None, None) => return Ok(None),
            (None, Some(max)) => vec![format!("{year} <= {}", max.year())],
            (Some(min), None) => vec![format!("{year} >= {}", min.year())],
            (Some(min), Some(max)) if min.year() == max.year() => {
                let (min_month, max_month) = (min.month(), max.month());
                debug!(
                    "setting month duration condition: {} - {}",
                    min_month, max_month
                );
                let month_condition = if min_month == max_month {
                    format!("{month} = {min_month}")
                } else {
                    format!("{month} IN ({})", inclusive_list(min_month..=max_month))
                };
                vec![format!("{year} = {}", max.year()), month_condition]
            }
            (Some(min), Some(max)) => vec![format!(
                "{year} IN ({})",
                inclusive_list(min.year()..=max.year())
            )],
        };

        Ok(Some(partition_conditions.into_iter().chain(conditions).collect()))
    }

    /// 完整的合取过滤条件；没有任何条件时返回空字符串
    pub fn conditions(&self) -> Result<String, QueryError> {
        let mut conditions = Vec::new();
        if let Some(provider) = &self.props.provider {
            debug!("setting provider condition: {}", provider);
            conditions.push(format!(
                "{} = {}",
                quote_identifier(PROVIDER_COL),
                quote_literal(provider)
            ));
        }
        if let Some(project) = &self.props.project {
            debug!("setting project condition: {}", project);
            conditions.push(format!(
                "{} = {}",
                quote_identifier(PROJECT_COL),
                quote_literal(project)
            ));
        }
        if let Some(platform_code) = &self.props.platform_code {
            debug!("setting platform_code condition: {}", platform_code);
            conditions.push(format!(
                "{} = {}",
                quote_identifier(PLATFORM_CODE_COL),
                quote_literal(platform_code)
            ));
        }
        if let Some(time_conditions) = self.time_conditions()? {
            conditions.extend(time_conditions);
        }
        if let Some([lat, lon]) = self.props.min_lat_lon {
            debug!("setting Lat-Lon min condition: [{}, {}]", lat, lon);
            conditions.push(format!("{} >= {lat}", quote_identifier(LAT_COL)));
            conditions.push(format!("{} >= {lon}", quote_identifier(LON_COL)));
        }
        if let Some([lat, lon]) = self.props.max_lat_lon {
            debug!("setting Lat-Lon max condition: [{}, {}]", lat, lon);
            conditions.push(format!("{} <= {lat}", quote_identifier(LAT_COL)));
            conditions.push(format!("{} <= {lon}", quote_identifier(LON_COL)));
        }
        if let Some(depth_condition) = self.depth_condition() {
            conditions.push(depth_condition);
        }
        if let Some(variables_condition) = self.variables_condition()? {
            conditions.push(variables_condition);
        }
        debug!("conditions list: {:?}", conditions);
        Ok(conditions.join(" AND "))
    }

    /// 需要返回的列；为空表示返回全部列
    ///
    /// 指定了 `columns` 时，结果为 `columns`、变量（及其质量标记列）与默认列的并集。
    pub fn selected_columns(&self) -> Result<Vec<String>, QueryError> {
        if self.props.columns.is_empty() {
            return Ok(Vec::new());
        }
        let mut all_columns = BTreeSet::new();
        for column in &self.props.columns {
            all_columns.insert(checked_identifier(column)?.to_string());
        }
        for each in &self.props.variable {
            all_columns.insert(checked_identifier(each)?.to_string());
            if self.props.quality_flag {
                debug!("adding quality flag for : {}", each);
                all_columns.insert(format!("{each}{QUALITY_SUFFIX}"));
            }
        }
        all_columns.extend(DEFAULT_COLUMNS.iter().map(|c| c.to_string()));
        Ok(all_columns.into_iter().collect())
    }

    /// 统计满足条件的记录数的语句
    pub fn count_statement(&self, table: &str) -> Result<String, QueryError> {
        let conditions = self.conditions()?;
        let mut sql_stmt = format!("SELECT COUNT(*) AS total FROM {}", quote_identifier(table));
        if !conditions.is_empty() {
            sql_stmt = format!("{sql_stmt} WHERE {conditions}");
        }
        debug!("query statement: {}", sql_stmt);
        Ok(sql_stmt)
    }

    /// 分页检索语句，`projection` 为空时选择全部列
    pub fn select_statement(&self, table: &str, projection: &[String]) -> Result<String, QueryError> {
        let conditions = self.conditions()?;
        let columns = if projection.is_empty() {
            "*".to_string()
        } else {
            projection
                .iter()
                .map(|c| quote_identifier(c))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut sql_stmt = format!("SELECT {columns} FROM {}", quote_identifier(table));
        if !conditions.is_empty() {
            sql_stmt = format!("{sql_stmt} WHERE {conditions}");
        }
        sql_stmt = format!(
            "{sql_stmt} LIMIT {} OFFSET {}",
            self.props.size, self.props.start_at
        );
        debug!("query statement: {}", sql_stmt);
        Ok(sql_stmt)
    }
}

fn parse_bound(field: &'static str, raw: &str) -> Result<DateTime<Utc>, QueryError> {
    time_utils::parse_datetime(raw).map_err(|_| QueryError::InvalidDatetime {
        field,
        value: raw.to_string(),
    })
}
