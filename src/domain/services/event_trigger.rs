// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::{WebhookEventType, WebhookPayload};
use crate::domain::repositories::webhook_repository::{RepositoryError, WebhookRepository};
use crate::queue::delivery_queue::{DeliveryJob, DeliveryQueue};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// 事件触发器
///
/// 把领域事件扇出到账户下所有匹配的启用订阅。只负责入队，
/// 从不等待投递完成，投递失败也不会反馈到这里。
pub struct EventTrigger {
    webhooks: Arc<dyn WebhookRepository>,
    queue: Arc<dyn DeliveryQueue>,
}

impl EventTrigger {
    pub fn new(webhooks: Arc<dyn WebhookRepository>, queue: Arc<dyn DeliveryQueue>) -> Self {
        Self { webhooks, queue }
    }

    /// 触发事件
    ///
    /// # 参数
    ///
    /// * `owner_id` - 事件所属账户
    /// * `event` - 事件类型
    /// * `data` - 事件数据
    /// * `project_id` - 关联的项目
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 入队的投递任务数
    /// * `Err(RepositoryError)` - 查询订阅失败
    pub async fn trigger(
        &self,
        owner_id: Uuid,
        event: WebhookEventType,
        data: serde_json::Value,
        project_id: Option<Uuid>,
    ) -> Result<usize, RepositoryError> {
        let subscriptions = self
            .webhooks
            .find_active_by_event(owner_id, event.as_str())
            .await?;

        if subscriptions.is_empty() {
            debug!("No active webhooks for {} on owner {}", event, owner_id);
            return Ok(0);
        }

        // One payload, one timestamp for every matching subscription
        let payload = WebhookPayload::new(event.as_str(), data, project_id, Some(owner_id));

        let mut queued = 0;
        for subscription in subscriptions {
            let webhook_id = subscription.id;
            let job = DeliveryJob {
                subscription,
                payload: payload.clone(),
            };

            match self.queue.enqueue(job).await {
                Ok(()) => queued += 1,
                Err(e) => warn!("Dropping {} delivery for webhook {}: {}", event, webhook_id, e),
            }
        }

        debug!("Queued {} deliveries of {} for owner {}", queued, event, owner_id);
        Ok(queued)
    }
}

#[cfg(test)]
#[path = "event_trigger_test.rs"]
mod tests;
