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

use deckhooks::config::settings::Settings;
use deckhooks::domain::services::event_trigger::EventTrigger;
use deckhooks::domain::services::webhook_service::WebhookService;
use deckhooks::infrastructure::database::connection;
use deckhooks::infrastructure::repositories::delivery_log_repo_impl::DeliveryLogRepoImpl;
use deckhooks::infrastructure::repositories::webhook_repo_impl::WebhookRepoImpl;
use deckhooks::infrastructure::services::webhook_sender_impl::HttpWebhookSender;
use deckhooks::presentation::routes;
use deckhooks::queue::delivery_queue::ChannelDeliveryQueue;
use deckhooks::utils::retry_policy::RetryPolicy;
use deckhooks::utils::telemetry;
use deckhooks::workers::manager::WorkerManager;
use deckhooks::workers::webhook_worker::WebhookWorker;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting deckhooks...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    if settings.metrics.enabled {
        deckhooks::infrastructure::metrics::init_metrics(&settings.metrics.address);
    }

    // 3. Connect to database and run migrations
    let db = connection::connect_and_migrate(&settings.database).await?;
    info!("Database connection established");

    // 4. Initialize components
    let webhook_repository = Arc::new(WebhookRepoImpl::new(db.clone()));
    let delivery_log_repository = Arc::new(DeliveryLogRepoImpl::new(db.clone()));
    let sender = Arc::new(HttpWebhookSender::new(
        &settings.webhook.user_agent,
        settings.webhook.request_timeout(),
    )?);

    // 5. Start the delivery worker
    let (queue, receiver) = ChannelDeliveryQueue::bounded(settings.webhook.queue_capacity);
    let webhook_worker = WebhookWorker::new(
        sender.clone(),
        webhook_repository.clone(),
        delivery_log_repository.clone(),
        RetryPolicy::from_settings(&settings.webhook),
    );
    let worker_manager =
        WorkerManager::start(webhook_worker, receiver, settings.webhook.max_in_flight);

    let service = Arc::new(WebhookService::new(
        webhook_repository.clone(),
        delivery_log_repository,
        sender,
    ));
    let trigger = Arc::new(EventTrigger::new(webhook_repository, Arc::new(queue)));

    // 6. Start HTTP server
    let app = routes::routes(service, trigger);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last queue sender; the worker now drains and exits
    worker_manager
        .shutdown(settings.webhook.shutdown_timeout())
        .await;

    info!("deckhooks stopped");
    Ok(())
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Unable to listen for shutdown signal: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Unable to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
