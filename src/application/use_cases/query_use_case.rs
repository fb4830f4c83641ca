// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::models::cdms_constants::INTERNAL_COLUMNS;
use crate::domain::models::query_props::QueryProps;
use crate::domain::services::query_builder::{Query, QueryError, QueryOptions};
use crate::infrastructure::metrics::{QUERY_DURATION_SECONDS, QUERY_FAILED_TOTAL, QUERY_TOTAL};
use crate::infrastructure::parquet::session::ParquetSessionFactory;
use crate::infrastructure::parquet::ParquetStoreError;

#[derive(Error, Debug)]
pub enum QueryUseCaseError {
    #[error(transparent)]
    InvalidArgument(#[from] QueryError),
    #[error("unknown variable: '{0}'")]
    UnknownVariable(String),
    #[error("query failed: {0}")]
    Store(#[from] ParquetStoreError),
}

/// 查询结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub total: u64,
    pub results: Vec<Map<String, Value>>,
}

pub struct QueryUseCase {
    sessions: ParquetSessionFactory,
    options: QueryOptions,
}

impl QueryUseCase {
    pub fn new(sessions: ParquetSessionFactory, options: QueryOptions) -> Self {
        Self { sessions, options }
    }

    pub async fn search(&self, props: QueryProps) -> Result<QueryResult, QueryUseCaseError> {
        counter!(QUERY_TOTAL).increment(1);
        let start = Instant::now();
        let result = self.run(props).await;
        histogram!(QUERY_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
        if result.is_err() {
            counter!(QUERY_FAILED_TOTAL).increment(1);
        }
        result
    }

    async fn run(&self, props: QueryProps) -> Result<QueryResult, QueryUseCaseError> {
        let query = Query::new(props, self.options);
        // 先编译条件，非法参数不必打开会话
        query.conditions()?;
        let selected = query.selected_columns()?;

        let stage = Instant::now();
        let session = self.sessions.session().await?;
        debug!("session created in {:?}", stage.elapsed());
        if !session.has_table() {
            info!("parquet store is empty, returning no results");
            return Ok(QueryResult::default());
        }

        let table_columns = session.columns().await?;
        let known: HashSet<&str> = table_columns.iter().map(String::as_str).collect();
        if let Some(missing) = query
            .props()
            .variable
            .iter()
            .find(|v| !known.contains(v.as_str()))
        {
            return Err(QueryUseCaseError::UnknownVariable(missing.clone()));
        }

        let table = self.sessions.table_name();
        let stage = Instant::now();
        let total = session.count(&query.count_statement(table)?).await?;
        debug!("counted {} rows in {:?}", total, stage.elapsed());

        if query.props().size < 1 {
            return Ok(QueryResult {
                total,
                results: Vec::new(),
            });
        }

        let candidates = if selected.is_empty() {
            &table_columns
        } else {
            &selected
        };
        let projection: Vec<String> = candidates
            .iter()
            .filter(|c| known.contains(c.as_str()) && !INTERNAL_COLUMNS.contains(&c.as_str()))
            .cloned()
            .collect();

        let stage = Instant::now();
        let results = session
            .fetch_json(&query.select_statement(table, &projection)?)
            .await?;
        debug!("retrieved {} rows in {:?}", results.len(), stage.elapsed());

        Ok(QueryResult { total, results })
    }
}
