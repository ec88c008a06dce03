// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::{
    DeliveryLogEntry, DeliveryResult, WebhookEventType, WebhookPayload, WebhookSubscription,
};
use crate::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use crate::domain::repositories::webhook_repository::WebhookRepository;
use crate::domain::services::webhook_sender::{to_delivery_result, WebhookSender};
use crate::utils::errors::WebhookError;
use crate::utils::signature::generate_secret;
use crate::utils::validators::{validate_events, validate_url};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 日志查询默认条数
pub const DEFAULT_LOG_LIMIT: u64 = 50;
/// 日志查询最大条数
pub const MAX_LOG_LIMIT: u64 = 500;

/// 创建订阅请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    pub url: String,
    pub events: Vec<String>,
    /// 省略时由服务生成，显式提供时不能为空
    #[serde(default)]
    pub secret: Option<String>,
}

/// 更新订阅请求，只有提供的字段会被修改
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhookRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub events: Option<Vec<String>>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Webhook 注册表服务
///
/// 负责订阅的增删改查、测试投递和投递日志查询。
/// 每个操作都以调用方账户为范围，跨账户访问一律视为不存在。
pub struct WebhookService {
    webhooks: Arc<dyn WebhookRepository>,
    logs: Arc<dyn DeliveryLogRepository>,
    sender: Arc<dyn WebhookSender>,
}

impl WebhookService {
    /// 创建新的注册表服务实例
    pub fn new(
        webhooks: Arc<dyn WebhookRepository>,
        logs: Arc<dyn DeliveryLogRepository>,
        sender: Arc<dyn WebhookSender>,
    ) -> Self {
        Self {
            webhooks,
            logs,
            sender,
        }
    }

    /// 列出账户的全部订阅，最新的在前
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<WebhookSubscription>, WebhookError> {
        Ok(self.webhooks.list_by_owner(owner_id).await?)
    }

    /// 获取单个订阅
    ///
    /// # 返回值
    ///
    /// * `Ok(WebhookSubscription)` - 订阅（含密钥）
    /// * `Err(WebhookError::NotFound)` - 不存在或不属于该账户
    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<WebhookSubscription, WebhookError> {
        self.webhooks
            .find_by_owner_and_id(owner_id, id)
            .await?
            .ok_or(WebhookError::NotFound)
    }

    /// 创建订阅
    ///
    /// 校验URL和事件，未提供密钥时自动生成，提供的密钥原样保存。
    /// 新订阅总是启用的。
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateWebhookRequest,
    ) -> Result<WebhookSubscription, WebhookError> {
        validate_url(&request.url)?;
        let events = validate_events(&request.events)?;
        let secret = match request.secret {
            Some(secret) if secret.is_empty() => {
                return Err(WebhookError::InvalidSecret(
                    "secret must not be empty".to_string(),
                ))
            }
            Some(secret) => secret,
            None => generate_secret(),
        };

        let subscription = WebhookSubscription::new(owner_id, request.url, events, secret);
        let created = self.webhooks.create(&subscription).await?;

        info!(
            "Created webhook {} for owner {} ({} events)",
            created.id,
            owner_id,
            created.events.len()
        );

        Ok(created)
    }

    /// 更新订阅
    ///
    /// 只校验和修改请求中出现的字段。`active = true` 是手动重新启用的途径，
    /// 不会清零失败计数。
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        request: UpdateWebhookRequest,
    ) -> Result<WebhookSubscription, WebhookError> {
        // Ownership first: another owner's subscription is NotFound whatever the body
        let mut subscription = self.get(owner_id, id).await?;

        if let Some(url) = request.url.as_deref() {
            validate_url(url)?;
        }
        let events = request
            .events
            .as_deref()
            .map(validate_events)
            .transpose()?;

        if let Some(url) = request.url {
            subscription.url = url;
        }
        if let Some(events) = events {
            subscription.events = events;
        }
        if let Some(active) = request.active {
            subscription.active = active;
        }

        let updated = self.webhooks.update(&subscription).await?;
        info!("Updated webhook {} for owner {}", id, owner_id);

        Ok(updated)
    }

    /// 永久删除订阅
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), WebhookError> {
        if self.webhooks.delete(owner_id, id).await? {
            info!("Deleted webhook {} for owner {}", id, owner_id);
            Ok(())
        } else {
            Err(WebhookError::NotFound)
        }
    }

    /// 发送一次测试投递
    ///
    /// 只做一次HTTP尝试，不写日志，不修改失败计数和启用状态。
    pub async fn test(&self, owner_id: Uuid, id: Uuid) -> Result<DeliveryResult, WebhookError> {
        let subscription = self.get(owner_id, id).await?;
        let payload = WebhookPayload::test(&subscription);

        let outcome = self.sender.send(&subscription, &payload).await;
        let result = to_delivery_result(&outcome);

        info!(
            "Test delivery for webhook {} finished: success={}",
            id, result.success
        );

        Ok(result)
    }

    /// 查询订阅的投递日志，最新的在前
    ///
    /// `limit` 缺省为50，并被限制在 1..=500 之间
    pub async fn logs(
        &self,
        owner_id: Uuid,
        id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<DeliveryLogEntry>, WebhookError> {
        let subscription = self.get(owner_id, id).await?;
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);

        Ok(self.logs.list_by_webhook(subscription.id, limit).await?)
    }

    /// 可订阅的事件目录
    pub fn supported_events(&self) -> Vec<&'static str> {
        WebhookEventType::catalog()
    }
}

#[cfg(test)]
#[path = "webhook_service_test.rs"]
mod tests;
