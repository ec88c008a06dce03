// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::WebhookEventType;
use crate::domain::services::event_trigger::EventTrigger;
use crate::presentation::errors::AppError;
use crate::utils::errors::WebhookError;
use axum::extract::rejection::JsonRejection;
use axum::{http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// 内部事件上报请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEventRequest {
    pub owner_id: Uuid,
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub project_id: Option<Uuid>,
}

/// 接收宿主其他服务上报的领域事件并扇出投递
///
/// 只等待入队，不等待投递完成
pub async fn publish_event(
    Extension(trigger): Extension<Arc<EventTrigger>>,
    payload: Result<Json<PublishEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload?;
    let event = WebhookEventType::parse(&request.event)
        .ok_or_else(|| WebhookError::UnsupportedEvents(vec![request.event.clone()]))?;

    let queued = trigger
        .trigger(request.owner_id, event, request.data, request.project_id)
        .await?;

    Ok((StatusCode::ACCEPTED, Json(json!({ "queued": queued }))))
}
