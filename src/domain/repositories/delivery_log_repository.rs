// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::webhook_repository::RepositoryError;
use crate::domain::models::webhook::DeliveryLogEntry;
use async_trait::async_trait;
use uuid::Uuid;

/// 投递日志仓库特质
///
/// 日志只追加，不提供修改和删除
#[async_trait]
pub trait DeliveryLogRepository: Send + Sync {
    /// 追加日志条目
    async fn append(&self, entry: &DeliveryLogEntry) -> Result<(), RepositoryError>;
    /// 查询订阅的日志，按时间倒序
    async fn list_by_webhook(
        &self,
        webhook_id: Uuid,
        limit: u64,
    ) -> Result<Vec<DeliveryLogEntry>, RepositoryError>;
}
