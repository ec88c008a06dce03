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

use crate::domain::models::webhook::{
    DeliveryLogEntry, DeliveryResult, WebhookPayload, WebhookSubscription,
};
use crate::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use crate::domain::repositories::webhook_repository::{RepositoryError, WebhookRepository};
use crate::domain::services::webhook_sender::{to_delivery_result, WebhookSender};
use crate::utils::errors::DeliveryError;
use crate::utils::retry_policy::RetryPolicy;
use chrono::Utc;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Webhook投递工作器
///
/// 执行单次尝试（`send_once`）和带重试的完整投递周期（`deliver`）
#[derive(Clone)]
pub struct WebhookWorker {
    /// 发送实现
    sender: Arc<dyn WebhookSender>,
    /// 订阅仓库
    webhooks: Arc<dyn WebhookRepository>,
    /// 日志仓库
    logs: Arc<dyn DeliveryLogRepository>,
    /// 重试策略
    policy: RetryPolicy,
}

impl WebhookWorker {
    /// 创建新的Webhook工作器实例
    pub fn new(
        sender: Arc<dyn WebhookSender>,
        webhooks: Arc<dyn WebhookRepository>,
        logs: Arc<dyn DeliveryLogRepository>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            sender,
            webhooks,
            logs,
            policy,
        }
    }

    /// 执行一次投递尝试并追加一条日志
    ///
    /// # 返回值
    ///
    /// * `Ok(DeliveryResult)` - 尝试结果，失败也在这里返回
    /// * `Err(RepositoryError)` - 日志写入失败
    pub async fn send_once(
        &self,
        subscription: &WebhookSubscription,
        payload: &WebhookPayload,
    ) -> Result<DeliveryResult, RepositoryError> {
        counter!("webhook_delivery_attempts_total").increment(1);
        let start = Instant::now();

        let outcome = self.sender.send(subscription, payload).await;

        histogram!("webhook_delivery_duration_seconds").record(start.elapsed().as_secs_f64());

        match &outcome {
            Ok(response) if response.is_success() => {
                counter!("webhook_delivery_success_total").increment(1);
            }
            Ok(response) => {
                debug!(
                    "Webhook {} responded with status {}",
                    subscription.id, response.status_code
                );
                counter!("webhook_delivery_failed_total", "reason" => "http_error").increment(1);
            }
            Err(DeliveryError::Timeout(_)) => {
                debug!("Webhook {} timed out", subscription.id);
                counter!("webhook_delivery_failed_total", "reason" => "timeout").increment(1);
            }
            Err(e) => {
                debug!("Webhook {} delivery error: {}", subscription.id, e);
                counter!("webhook_delivery_failed_total", "reason" => "network_error").increment(1);
            }
        }

        let result = to_delivery_result(&outcome);
        let entry = DeliveryLogEntry::from_attempt(subscription, payload, &result)?;
        self.logs.append(&entry).await?;

        Ok(result)
    }

    /// 执行完整的投递周期
    ///
    /// 最多尝试 `max_attempts` 次，两次尝试之间线性退避。周期结束时
    /// 恰好更新一次订阅状态：成功则清零失败计数，全部失败则计数加一，
    /// 达到阈值时停用订阅。
    ///
    /// # 返回值
    ///
    /// * `Ok(DeliveryResult)` - 最后一次尝试的结果
    /// * `Err(RepositoryError)` - 持久化失败
    pub async fn deliver(
        &self,
        subscription: &WebhookSubscription,
        payload: &WebhookPayload,
    ) -> Result<DeliveryResult, RepositoryError> {
        info!(
            "Delivering {} to webhook {} at {}",
            payload.event, subscription.id, subscription.url
        );

        let mut attempt = 1;
        loop {
            let result = self.send_once(subscription, payload).await?;

            if result.success {
                let outcome = self.webhooks.record_success(subscription.id, Utc::now()).await;
                self.finish(outcome, subscription)?;
                info!("Webhook {} delivered on attempt {}", subscription.id, attempt);
                return Ok(result);
            }

            if !self.policy.has_next_attempt(attempt) {
                counter!("webhook_delivery_exhausted_total").increment(1);
                warn!(
                    "Webhook {} failed after {} attempts: {}",
                    subscription.id,
                    attempt,
                    result.error.as_deref().unwrap_or("unknown error")
                );

                let outcome = self
                    .webhooks
                    .record_failure(subscription.id, Utc::now(), &self.policy)
                    .await;
                if let Some(updated) = self.finish(outcome, subscription)? {
                    if subscription.active && !updated.active {
                        counter!("webhook_auto_disabled_total").increment(1);
                        warn!(
                            "Webhook {} disabled after {} consecutive failed deliveries",
                            updated.id, updated.failure_count
                        );
                    }
                }
                return Ok(result);
            }

            let backoff = self.policy.backoff_for(attempt);
            debug!(
                "Retrying webhook {} in {:?} (attempt {} of {})",
                subscription.id, backoff, attempt, self.policy.max_attempts
            );
            sleep(backoff).await;
            attempt += 1;
        }
    }

    /// 处理周期结束时的状态更新结果
    ///
    /// 订阅在周期内被删除时不视为错误
    fn finish(
        &self,
        outcome: Result<WebhookSubscription, RepositoryError>,
        subscription: &WebhookSubscription,
    ) -> Result<Option<WebhookSubscription>, RepositoryError> {
        match outcome {
            Ok(updated) => Ok(Some(updated)),
            Err(RepositoryError::NotFound) => {
                warn!(
                    "Webhook {} was removed during delivery, skipping state update",
                    subscription.id
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "webhook_worker_test.rs"]
mod tests;
