// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use deckhooks::domain::models::webhook::DeliveryLogEntry;
use deckhooks::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use deckhooks::domain::services::event_trigger::EventTrigger;
use deckhooks::domain::services::webhook_service::WebhookService;
use deckhooks::infrastructure::repositories::delivery_log_repo_impl::DeliveryLogRepoImpl;
use deckhooks::infrastructure::repositories::webhook_repo_impl::WebhookRepoImpl;
use deckhooks::infrastructure::services::webhook_sender_impl::HttpWebhookSender;
use deckhooks::presentation::routes;
use deckhooks::queue::delivery_queue::ChannelDeliveryQueue;
use deckhooks::utils::retry_policy::RetryPolicy;
use deckhooks::workers::manager::WorkerManager;
use deckhooks::workers::webhook_worker::WebhookWorker;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db_pool: Arc<DatabaseConnection>,
    pub webhooks: Arc<WebhookRepoImpl>,
    pub logs: Arc<DeliveryLogRepoImpl>,
    pub trigger: Arc<EventTrigger>,
    pub worker_manager: WorkerManager,
}

/// Full application over an in-memory database with a fast retry policy
pub async fn create_test_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to sqlite");
    let db = Arc::new(db);
    Migrator::up(db.as_ref(), None)
        .await
        .expect("Failed to run migrations");

    let webhooks = Arc::new(WebhookRepoImpl::new(db.clone()));
    let logs = Arc::new(DeliveryLogRepoImpl::new(db.clone()));
    let sender = Arc::new(
        HttpWebhookSender::new("Deckhooks-Webhook/test", Duration::from_secs(2))
            .expect("Failed to build HTTP client"),
    );

    let policy = RetryPolicy {
        base_delay: Duration::from_millis(20),
        ..RetryPolicy::default()
    };
    let (queue, receiver) = ChannelDeliveryQueue::bounded(64);
    let worker = WebhookWorker::new(sender.clone(), webhooks.clone(), logs.clone(), policy);
    let worker_manager = WorkerManager::start(worker, receiver, 8);

    let service = Arc::new(WebhookService::new(webhooks.clone(), logs.clone(), sender));
    let trigger = Arc::new(EventTrigger::new(webhooks.clone(), Arc::new(queue)));

    let app = routes::routes(service, trigger.clone());
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        db_pool: db,
        webhooks,
        logs,
        trigger,
        worker_manager,
    }
}

impl TestApp {
    /// Polls the delivery log until `count` entries exist or five seconds pass
    pub async fn wait_for_logs(&self, webhook_id: Uuid, count: usize) -> Vec<DeliveryLogEntry> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let entries = self.logs.list_by_webhook(webhook_id, 500).await.unwrap();
            if entries.len() >= count || tokio::time::Instant::now() >= deadline {
                return entries;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}
