// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::webhook::{DeliveryLogEntry, DeliveryResult, WebhookSubscription};
use crate::domain::services::webhook_service::{
    CreateWebhookRequest, UpdateWebhookRequest, WebhookService,
};
use crate::presentation::errors::AppError;
use crate::presentation::extractors::owner_id::OwnerId;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::{http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 列表视图中的订阅，不含密钥
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSummary {
    pub id: Uuid,
    pub url: String,
    pub events: Vec<String>,
    pub active: bool,
    pub failure_count: i32,
    pub created_at: DateTime<Utc>,
    pub last_triggered_at: Option<DateTime<Utc>>,
}

impl From<WebhookSubscription> for WebhookSummary {
    fn from(sub: WebhookSubscription) -> Self {
        Self {
            id: sub.id,
            url: sub.url,
            events: sub.events,
            active: sub.active,
            failure_count: sub.failure_count,
            created_at: sub.created_at,
            last_triggered_at: sub.last_triggered_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u64>,
}

/// 列出可订阅的事件
pub async fn list_supported_events(
    Extension(service): Extension<Arc<WebhookService>>,
) -> Json<Vec<&'static str>> {
    Json(service.supported_events())
}

pub async fn list_webhooks(
    OwnerId(owner_id): OwnerId,
    Extension(service): Extension<Arc<WebhookService>>,
) -> Result<Json<Vec<WebhookSummary>>, AppError> {
    let webhooks = service.list(owner_id).await?;
    Ok(Json(webhooks.into_iter().map(WebhookSummary::from).collect()))
}

pub async fn get_webhook(
    OwnerId(owner_id): OwnerId,
    Extension(service): Extension<Arc<WebhookService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WebhookSubscription>, AppError> {
    Ok(Json(service.get(owner_id, id).await?))
}

/// 创建订阅，响应中包含密钥
pub async fn create_webhook(
    OwnerId(owner_id): OwnerId,
    Extension(service): Extension<Arc<WebhookService>>,
    payload: Result<Json<CreateWebhookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WebhookSubscription>), AppError> {
    let Json(request) = payload?;
    let webhook = service.create(owner_id, request).await?;
    Ok((StatusCode::CREATED, Json(webhook)))
}

pub async fn update_webhook(
    OwnerId(owner_id): OwnerId,
    Extension(service): Extension<Arc<WebhookService>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateWebhookRequest>, JsonRejection>,
) -> Result<Json<WebhookSubscription>, AppError> {
    let Json(request) = payload?;
    Ok(Json(service.update(owner_id, id, request).await?))
}

pub async fn delete_webhook(
    OwnerId(owner_id): OwnerId,
    Extension(service): Extension<Arc<WebhookService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete(owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 发送测试投递
pub async fn test_webhook(
    OwnerId(owner_id): OwnerId,
    Extension(service): Extension<Arc<WebhookService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryResult>, AppError> {
    Ok(Json(service.test(owner_id, id).await?))
}

/// 查询投递日志，最新的在前
pub async fn webhook_logs(
    OwnerId(owner_id): OwnerId,
    Extension(service): Extension<Arc<WebhookService>>,
    Path(id): Path<Uuid>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Result<Json<Vec<DeliveryLogEntry>>, AppError> {
    let Query(query) = query?;
    Ok(Json(service.logs(owner_id, id, query.limit).await?))
}
