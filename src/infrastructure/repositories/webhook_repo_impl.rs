// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::WebhookSubscription;
use crate::domain::repositories::webhook_repository::{RepositoryError, WebhookRepository};
use crate::infrastructure::database::entities::webhook;
use crate::utils::retry_policy::RetryPolicy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// Webhook订阅仓库实现
#[derive(Clone)]
pub struct WebhookRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl WebhookRepoImpl {
    /// 创建新的Webhook订阅仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> Result<webhook::Model, RepositoryError> {
        webhook::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl WebhookRepository for WebhookRepoImpl {
    async fn create(
        &self,
        subscription: &WebhookSubscription,
    ) -> Result<WebhookSubscription, RepositoryError> {
        let model = webhook::ActiveModel {
            id: Set(subscription.id),
            owner_id: Set(subscription.owner_id),
            url: Set(subscription.url.clone()),
            events: Set(serde_json::to_value(&subscription.events)?),
            secret: Set(subscription.secret.clone()),
            active: Set(subscription.active),
            failure_count: Set(subscription.failure_count),
            created_at: Set(subscription.created_at.into()),
            last_triggered_at: Set(subscription.last_triggered_at.map(Into::into)),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(subscription.clone())
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<WebhookSubscription>, RepositoryError> {
        let models = webhook::Entity::find()
            .filter(webhook::Column::OwnerId.eq(owner_id))
            .order_by_desc(webhook::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        models
            .into_iter()
            .map(WebhookSubscription::try_from)
            .collect()
    }

    async fn find_by_owner_and_id(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<WebhookSubscription>, RepositoryError> {
        let model = webhook::Entity::find()
            .filter(webhook::Column::Id.eq(id))
            .filter(webhook::Column::OwnerId.eq(owner_id))
            .one(self.db.as_ref())
            .await?;

        model.map(WebhookSubscription::try_from).transpose()
    }

    async fn find_active_by_event(
        &self,
        owner_id: Uuid,
        event: &str,
    ) -> Result<Vec<WebhookSubscription>, RepositoryError> {
        let models = webhook::Entity::find()
            .filter(webhook::Column::OwnerId.eq(owner_id))
            .filter(webhook::Column::Active.eq(true))
            .all(self.db.as_ref())
            .await?;

        // Event membership is matched here so the JSON column stays portable
        // between Postgres and SQLite.
        let mut matching = Vec::new();
        for model in models {
            let subscription: WebhookSubscription = model.try_into()?;
            if subscription.subscribes_to(event) {
                matching.push(subscription);
            }
        }

        Ok(matching)
    }

    async fn update(
        &self,
        subscription: &WebhookSubscription,
    ) -> Result<WebhookSubscription, RepositoryError> {
        let mut active: webhook::ActiveModel = webhook::Entity::find()
            .filter(webhook::Column::Id.eq(subscription.id))
            .filter(webhook::Column::OwnerId.eq(subscription.owner_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into();

        active.url = Set(subscription.url.clone());
        active.events = Set(serde_json::to_value(&subscription.events)?);
        active.active = Set(subscription.active);

        let updated = active.update(self.db.as_ref()).await?;
        updated.try_into()
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, RepositoryError> {
        let result = webhook::Entity::delete_many()
            .filter(webhook::Column::Id.eq(id))
            .filter(webhook::Column::OwnerId.eq(owner_id))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn record_success(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<WebhookSubscription, RepositoryError> {
        let mut active: webhook::ActiveModel = self.find_model(id).await?.into();

        active.failure_count = Set(0);
        active.last_triggered_at = Set(Some(at.into()));

        let updated = active.update(self.db.as_ref()).await?;
        updated.try_into()
    }

    async fn record_failure(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        policy: &RetryPolicy,
    ) -> Result<WebhookSubscription, RepositoryError> {
        let model = self.find_model(id).await?;
        let failure_count = model.failure_count.saturating_add(1);
        let still_active = model.active && !policy.should_disable(failure_count);

        let mut active: webhook::ActiveModel = model.into();
        active.failure_count = Set(failure_count);
        active.active = Set(still_active);
        active.last_triggered_at = Set(Some(at.into()));

        let updated = active.update(self.db.as_ref()).await?;
        updated.try_into()
    }
}

impl TryFrom<webhook::Model> for WebhookSubscription {
    type Error = RepositoryError;

    fn try_from(model: webhook::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            owner_id: model.owner_id,
            url: model.url,
            events: serde_json::from_value(model.events)?,
            secret: model.secret,
            active: model.active,
            failure_count: model.failure_count,
            created_at: model.created_at.into(),
            last_triggered_at: model.last_triggered_at.map(Into::into),
        })
    }
}

#[cfg(test)]
#[path = "webhook_repo_impl_test.rs"]
mod tests;
