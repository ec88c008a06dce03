// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::queue::delivery_queue::DeliveryJob;
use crate::workers::webhook_worker::WebhookWorker;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 工作管理器
///
/// 持有后台投递任务。该任务从队列接收端读取投递任务，
/// 以有限并发执行完整的投递周期，直到所有发送端被释放且队列清空。
pub struct WorkerManager {
    handle: JoinHandle<()>,
}

impl WorkerManager {
    /// 启动后台投递任务
    ///
    /// # 参数
    ///
    /// * `worker` - 投递工作器
    /// * `receiver` - 队列接收端
    /// * `max_in_flight` - 同时进行的投递周期上限
    pub fn start(
        worker: WebhookWorker,
        receiver: mpsc::Receiver<DeliveryJob>,
        max_in_flight: usize,
    ) -> Self {
        let limit = max_in_flight.max(1);

        let handle = tokio::spawn(async move {
            info!("Webhook delivery worker started (max in flight: {})", limit);

            let jobs = futures::stream::unfold(receiver, |mut rx| async move {
                rx.recv().await.map(|job| (job, rx))
            });

            jobs.for_each_concurrent(limit, |job| {
                let w = &worker;
                async move {
                    let webhook_id = job.subscription.id;
                    if let Err(e) = w.deliver(&job.subscription, &job.payload).await {
                        error!("Delivery cycle for webhook {} failed: {}", webhook_id, e);
                    }
                }
            })
            .await;

            info!("Webhook delivery queue drained");
        });

        Self { handle }
    }

    /// 等待后台任务处理完剩余任务后退出
    ///
    /// 调用前必须释放所有队列发送端，否则只能等到超时。
    /// 超时后中止后台任务。
    pub async fn shutdown(mut self, timeout: Duration) {
        info!("Waiting for in-flight webhook deliveries...");

        match tokio::time::timeout(timeout, &mut self.handle).await {
            Ok(Ok(())) => info!("Webhook workers shut down successfully"),
            Ok(Err(e)) => error!("Webhook delivery task ended abnormally: {}", e),
            Err(_) => {
                warn!(
                    "Webhook deliveries still running after {:?}, aborting",
                    timeout
                );
                self.handle.abort();
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
