use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WebhookDeliveryLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WebhookDeliveryLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WebhookDeliveryLogs::WebhookId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WebhookDeliveryLogs::Event).string().not_null())
                    .col(ColumnDef::new(WebhookDeliveryLogs::Payload).json().not_null())
                    .col(
                        ColumnDef::new(WebhookDeliveryLogs::Success)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WebhookDeliveryLogs::StatusCode).integer())
                    .col(ColumnDef::new(WebhookDeliveryLogs::ResponseBody).text())
                    .col(ColumnDef::new(WebhookDeliveryLogs::ErrorMessage).text())
                    .col(
                        ColumnDef::new(WebhookDeliveryLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_logs_webhook_created")
                    .table(WebhookDeliveryLogs::Table)
                    .col(WebhookDeliveryLogs::WebhookId)
                    .col(WebhookDeliveryLogs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WebhookDeliveryLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WebhookDeliveryLogs {
    Table,
    Id,
    WebhookId,
    Event,
    Payload,
    Success,
    StatusCode,
    ResponseBody,
    ErrorMessage,
    CreatedAt,
}
