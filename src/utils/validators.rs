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

use crate::domain::models::webhook::WebhookEventType;
use thiserror::Error;
use url::Url;

/// 验证错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// URL无效
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// 存在不支持的事件
    #[error("Unsupported events: {}", .0.join(", "))]
    UnsupportedEvents(Vec<String>),
}

/// 验证回调URL
///
/// URL必须是带主机名的绝对 http/https 地址
///
/// # 参数
///
/// * `url` - URL字符串
///
/// # 返回值
///
/// * `Ok(Url)` - 解析后的URL
/// * `Err(ValidationError)` - URL无效
pub fn validate_url(url: &str) -> Result<Url, ValidationError> {
    let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl(format!("{url}: {e}")))?;

    // Check scheme
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidUrl(format!(
            "{url}: unsupported scheme {}",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl(format!("{url}: missing host")));
    }

    Ok(parsed)
}

/// 验证事件列表
///
/// 所有事件都必须属于事件目录。返回去重后的事件列表（保持原顺序），
/// 否则返回全部不支持的事件名。
pub fn validate_events(events: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut accepted: Vec<String> = Vec::with_capacity(events.len());
    let mut rejected: Vec<String> = Vec::new();

    for event in events {
        if WebhookEventType::parse(event).is_some() {
            if !accepted.contains(event) {
                accepted.push(event.clone());
            }
        } else if !rejected.contains(event) {
            rejected.push(event.clone());
        }
    }

    if !rejected.is_empty() {
        return Err(ValidationError::UnsupportedEvents(rejected));
    }

    Ok(accepted)
}
