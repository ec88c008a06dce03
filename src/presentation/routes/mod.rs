// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::event_trigger::EventTrigger;
use crate::domain::services::webhook_service::WebhookService;
use crate::presentation::handlers::{event_handler, webhook_handler};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `service` - Webhook 注册表服务
/// * `trigger` - 事件触发器
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(service: Arc<WebhookService>, trigger: Arc<EventTrigger>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let webhook_routes = Router::new()
        .route(
            "/integrations/webhooks",
            get(webhook_handler::list_webhooks).post(webhook_handler::create_webhook),
        )
        .route(
            "/integrations/webhooks/events",
            get(webhook_handler::list_supported_events),
        )
        .route(
            "/integrations/webhooks/{id}",
            get(webhook_handler::get_webhook)
                .patch(webhook_handler::update_webhook)
                .delete(webhook_handler::delete_webhook),
        )
        .route(
            "/integrations/webhooks/{id}/test",
            post(webhook_handler::test_webhook),
        )
        .route(
            "/integrations/webhooks/{id}/logs",
            get(webhook_handler::webhook_logs),
        )
        .layer(Extension(service));

    let internal_routes = Router::new()
        .route("/internal/events", post(event_handler::publish_event))
        .layer(Extension(trigger));

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(internal_routes)
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
