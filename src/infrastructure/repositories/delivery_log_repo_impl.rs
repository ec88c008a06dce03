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

use crate::domain::models::webhook::DeliveryLogEntry;
use crate::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use crate::domain::repositories::webhook_repository::RepositoryError;
use crate::infrastructure::database::entities::webhook_delivery_log;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 投递日志仓库实现
#[derive(Clone)]
pub struct DeliveryLogRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl DeliveryLogRepoImpl {
    /// 创建新的投递日志仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeliveryLogRepository for DeliveryLogRepoImpl {
    async fn append(&self, entry: &DeliveryLogEntry) -> Result<(), RepositoryError> {
        let active_model: webhook_delivery_log::ActiveModel = entry.clone().into();

        webhook_delivery_log::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn list_by_webhook(
        &self,
        webhook_id: Uuid,
        limit: u64,
    ) -> Result<Vec<DeliveryLogEntry>, RepositoryError> {
        let models = webhook_delivery_log::Entity::find()
            .filter(webhook_delivery_log::Column::WebhookId.eq(webhook_id))
            .order_by_desc(webhook_delivery_log::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

impl From<webhook_delivery_log::Model> for DeliveryLogEntry {
    fn from(model: webhook_delivery_log::Model) -> Self {
        Self {
            id: model.id,
            webhook_id: model.webhook_id,
            event: model.event,
            payload: model.payload,
            success: model.success,
            status_code: model.status_code,
            response_body: model.response_body,
            error_message: model.error_message,
            created_at: model.created_at.into(),
        }
    }
}

impl From<DeliveryLogEntry> for webhook_delivery_log::ActiveModel {
    fn from(entry: DeliveryLogEntry) -> Self {
        Self {
            id: Set(entry.id),
            webhook_id: Set(entry.webhook_id),
            event: Set(entry.event),
            payload: Set(entry.payload),
            success: Set(entry.success),
            status_code: Set(entry.status_code),
            response_body: Set(entry.response_body),
            error_message: Set(entry.error_message),
            created_at: Set(entry.created_at.into()),
        }
    }
}
