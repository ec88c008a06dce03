// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::WebhookSubscription;
use crate::utils::retry_policy::RetryPolicy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 存储的数据无法解析
    #[error("Corrupt record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Webhook订阅仓库特质
///
/// 定义订阅数据访问接口。所有面向账户的查询都把 `owner_id`
/// 与 `id` 合并为同一个查询条件。
#[async_trait]
pub trait WebhookRepository: Send + Sync {
    /// 创建订阅
    async fn create(
        &self,
        subscription: &WebhookSubscription,
    ) -> Result<WebhookSubscription, RepositoryError>;

    /// 列出账户的全部订阅，按创建时间倒序
    async fn list_by_owner(&self, owner_id: Uuid)
        -> Result<Vec<WebhookSubscription>, RepositoryError>;

    /// 根据账户和ID查找订阅
    async fn find_by_owner_and_id(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<WebhookSubscription>, RepositoryError>;

    /// 查找账户下订阅了指定事件的启用订阅
    async fn find_active_by_event(
        &self,
        owner_id: Uuid,
        event: &str,
    ) -> Result<Vec<WebhookSubscription>, RepositoryError>;

    /// 更新订阅的可编辑字段（url、events、active）
    async fn update(
        &self,
        subscription: &WebhookSubscription,
    ) -> Result<WebhookSubscription, RepositoryError>;

    /// 删除订阅，返回是否删除了记录
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, RepositoryError>;

    /// 记录一次成功的投递周期：失败计数清零
    async fn record_success(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<WebhookSubscription, RepositoryError>;

    /// 记录一次失败的投递周期：失败计数加一，`policy` 判定需要停用时停用
    async fn record_failure(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        policy: &RetryPolicy,
    ) -> Result<WebhookSubscription, RepositoryError>;
}
