// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::webhook_repository::RepositoryError;
use crate::utils::validators::ValidationError;
use thiserror::Error;

/// Webhook 注册表错误类型
#[derive(Error, Debug)]
pub enum WebhookError {
    /// URL无效
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// 显式提供的密钥无效
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    /// 存在不支持的事件
    #[error("Unsupported events: {}", .0.join(", "))]
    UnsupportedEvents(Vec<String>),

    /// 订阅不存在或不属于当前账户
    #[error("Webhook not found")]
    NotFound,

    /// 仓库错误
    #[error(transparent)]
    Repository(RepositoryError),
}

impl WebhookError {
    /// 是否为输入校验错误
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            WebhookError::InvalidUrl(_)
                | WebhookError::InvalidSecret(_)
                | WebhookError::UnsupportedEvents(_)
        )
    }
}

impl From<ValidationError> for WebhookError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidUrl(msg) => WebhookError::InvalidUrl(msg),
            ValidationError::UnsupportedEvents(events) => WebhookError::UnsupportedEvents(events),
        }
    }
}

impl From<RepositoryError> for WebhookError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => WebhookError::NotFound,
            other => WebhookError::Repository(other),
        }
    }
}

/// 单次投递尝试的错误类型
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// 请求超时
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// 网络或传输层错误
    #[error("Transport error: {0}")]
    Transport(String),

    /// 负载序列化失败
    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}
