// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::{WebhookPayload, WebhookSubscription};
use crate::domain::services::webhook_sender::{
    DeliveryResponse, WebhookSender, MAX_RESPONSE_BODY_CHARS,
};
use crate::utils::errors::DeliveryError;
use crate::utils::signature::{self, EVENT_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::header;
use std::time::Duration;
use tracing::debug;

/// 响应体最多读取的字节数，足以容纳截断后的字符数
const MAX_RESPONSE_BODY_BYTES: usize = MAX_RESPONSE_BODY_CHARS * 4;

/// 基于 reqwest 的 Webhook 发送实现
#[derive(Clone)]
pub struct HttpWebhookSender {
    /// HTTP 客户端
    client: reqwest::Client,
    /// 请求超时
    timeout: Duration,
}

impl HttpWebhookSender {
    /// 创建新的发送实现
    ///
    /// # 参数
    ///
    /// * `user_agent` - 出站请求的 User-Agent
    /// * `timeout` - 单次请求超时
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn send(
        &self,
        subscription: &WebhookSubscription,
        payload: &WebhookPayload,
    ) -> Result<DeliveryResponse, DeliveryError> {
        // The exact string that is signed is the exact string that is sent
        let body = serde_json::to_string(payload)?;
        let signature = signature::sign(&subscription.secret, &body);

        debug!(
            "Posting {} to webhook {} at {}",
            payload.event, subscription.id, subscription.url
        );

        let response = self
            .client
            .post(&subscription.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            // Same rendering as the `timestamp` field of the signed body
            .header(
                TIMESTAMP_HEADER,
                payload.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )
            .header(EVENT_HEADER, payload.event.as_str())
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let text = read_capped(response, MAX_RESPONSE_BODY_BYTES, subscription).await;

        Ok(DeliveryResponse::new(status, &text))
    }
}

/// 读取响应体，最多 `limit` 字节，其余部分直接丢弃
///
/// 读取中途出错时保留已读到的内容，状态码依然有效
async fn read_capped(
    mut response: reqwest::Response,
    limit: usize,
    subscription: &WebhookSubscription,
) -> String {
    let mut buf: Vec<u8> = Vec::new();

    while buf.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(limit - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                debug!(
                    "Failed to read response body from webhook {}: {}",
                    subscription.id, e
                );
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

impl HttpWebhookSender {
    fn classify(&self, error: reqwest::Error) -> DeliveryError {
        if error.is_timeout() {
            DeliveryError::Timeout(self.timeout.as_secs())
        } else {
            DeliveryError::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
#[path = "webhook_sender_impl_test.rs"]
mod tests;
