// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 安装 Prometheus 导出器并注册投递指标的描述
///
/// 地址无效或端口被占用时只记录警告，服务照常运行
pub fn init_metrics(address: &str) {
    let addr: SocketAddr = match address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}. Metrics disabled.", address, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_counter!(
        "webhook_delivery_attempts_total",
        "Individual HTTP delivery attempts"
    );
    describe_counter!(
        "webhook_delivery_success_total",
        "Attempts answered with a 2xx status"
    );
    describe_counter!(
        "webhook_delivery_failed_total",
        "Failed attempts by reason"
    );
    describe_counter!(
        "webhook_delivery_exhausted_total",
        "Delivery cycles that used every attempt without success"
    );
    describe_counter!(
        "webhook_auto_disabled_total",
        "Subscriptions disabled after repeated failed cycles"
    );
    describe_counter!("webhook_jobs_queued_total", "Delivery jobs placed on the queue");
    describe_histogram!(
        "webhook_delivery_duration_seconds",
        Unit::Seconds,
        "Duration of a single delivery attempt"
    );

    info!("Metrics exporter listening on {}", addr);
}
