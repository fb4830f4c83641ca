// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

pub const INGEST_TOTAL: &str = "ingest_total";
pub const INGEST_FAILED_TOTAL: &str = "ingest_failed_total";
pub const INGEST_RECORDS_TOTAL: &str = "ingest_records_total";
pub const INGEST_DURATION_SECONDS: &str = "ingest_duration_seconds";
pub const QUERY_TOTAL: &str = "query_total";
pub const QUERY_FAILED_TOTAL: &str = "query_failed_total";
pub const QUERY_DURATION_SECONDS: &str = "query_duration_seconds";

/// 初始化 Prometheus 指标导出器
///
/// 未启用或监听地址无效时只记录日志，不影响服务启动
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics listen address {}: {}",
                settings.listen_addr, e
            );
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(INGEST_TOTAL, "Total number of observation files ingested");
    describe_counter!(INGEST_FAILED_TOTAL, "Total number of failed ingestions");
    describe_counter!(
        INGEST_RECORDS_TOTAL,
        "Total number of observation records written to parquet"
    );
    describe_histogram!(
        INGEST_DURATION_SECONDS,
        "Duration of ingestion jobs in seconds"
    );
    describe_counter!(QUERY_TOTAL, "Total number of queries executed");
    describe_counter!(QUERY_FAILED_TOTAL, "Total number of failed queries");
    describe_histogram!(QUERY_DURATION_SECONDS, "Duration of queries in seconds");

    info!("Metrics exporter listening on {}", addr);
}
