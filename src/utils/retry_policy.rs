// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::WebhookSettings;
use std::time::Duration;

/// 投递重试策略配置
///
/// 线性退避：第 n 次失败后等待 `n * base_delay`，最后一次尝试后不再等待。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 每个投递周期的最大尝试次数
    pub max_attempts: u32,
    /// 退避基础间隔
    pub base_delay: Duration,
    /// 自动停用阈值（累计失败周期数）
    pub disable_threshold: i32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            disable_threshold: 10,
        }
    }
}

impl RetryPolicy {
    /// 从配置构造
    pub fn from_settings(settings: &WebhookSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            disable_threshold: settings.disable_threshold,
        }
    }

    /// 第 `attempt` 次（从1开始）尝试失败后的等待时间
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// 第 `attempt` 次尝试失败后是否还有下一次
    pub fn has_next_attempt(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// 给定失败计数是否应当停用订阅
    pub fn should_disable(&self, failure_count: i32) -> bool {
        failure_count >= self.disable_threshold
    }
}
