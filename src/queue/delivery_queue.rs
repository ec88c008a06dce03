// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::{WebhookPayload, WebhookSubscription};
use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;
use tokio::sync::mpsc;

/// 投递任务：一个订阅和一份负载
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    /// 触发时的订阅快照
    pub subscription: WebhookSubscription,
    /// 所有匹配订阅共享的负载
    pub payload: WebhookPayload,
}

/// 队列错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// 消费端已退出
    #[error("Delivery queue is closed")]
    Closed,
}

/// 投递队列特质
#[async_trait]
pub trait DeliveryQueue: Send + Sync {
    /// 入队投递任务
    ///
    /// 队列已满时等待空位，不会丢弃任务
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 入队成功
    /// * `Err(QueueError::Closed)` - 消费端已关闭
    async fn enqueue(&self, job: DeliveryJob) -> Result<(), QueueError>;
}

/// 基于有界 mpsc 通道的投递队列
#[derive(Clone)]
pub struct ChannelDeliveryQueue {
    tx: mpsc::Sender<DeliveryJob>,
}

impl ChannelDeliveryQueue {
    /// 创建有界队列，返回发送端和由工作管理器消费的接收端
    ///
    /// # 参数
    ///
    /// * `capacity` - 队列容量，最小为1
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<DeliveryJob>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl DeliveryQueue for ChannelDeliveryQueue {
    async fn enqueue(&self, job: DeliveryJob) -> Result<(), QueueError> {
        self.tx.send(job).await.map_err(|_| QueueError::Closed)?;
        counter!("webhook_jobs_queued_total").increment(1);
        Ok(())
    }
}
