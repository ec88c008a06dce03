// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::{DeliveryResult, WebhookPayload, WebhookSubscription};
use crate::utils::errors::DeliveryError;
use async_trait::async_trait;

/// 响应体最大保留长度（字符）
pub const MAX_RESPONSE_BODY_CHARS: usize = 1000;

/// 订阅方返回的HTTP响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 截断后的响应体
    pub body: String,
}

impl DeliveryResponse {
    pub fn new(status_code: u16, body: &str) -> Self {
        Self {
            status_code,
            body: truncate_body(body),
        }
    }

    /// 状态码是否在 [200, 300) 之间
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// 把一次发送的结果转换为投递结果
pub fn to_delivery_result(outcome: &Result<DeliveryResponse, DeliveryError>) -> DeliveryResult {
    match outcome {
        Ok(response) => DeliveryResult {
            success: response.is_success(),
            status_code: Some(response.status_code),
            response: Some(response.body.clone()),
            error: if response.is_success() {
                None
            } else {
                Some(format!("HTTP {}", response.status_code))
            },
        },
        Err(e) => DeliveryResult {
            success: false,
            status_code: None,
            response: None,
            error: Some(e.to_string()),
        },
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_RESPONSE_BODY_CHARS).collect()
}

/// Webhook发送特质
///
/// 定义单次签名HTTP投递。实现不写日志、不修改订阅状态。
#[async_trait]
pub trait WebhookSender: Send + Sync {
    /// 向订阅地址发送一次负载
    ///
    /// # 返回值
    ///
    /// * `Ok(DeliveryResponse)` - 收到了HTTP响应（不论状态码）
    /// * `Err(DeliveryError)` - 超时、传输失败或序列化失败
    async fn send(
        &self,
        subscription: &WebhookSubscription,
        payload: &WebhookPayload,
    ) -> Result<DeliveryResponse, DeliveryError>;
}
