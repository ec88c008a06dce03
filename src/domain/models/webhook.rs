// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 测试投递使用的合成事件名，不可被订阅
pub const TEST_EVENT: &str = "webhook.test";

/// Webhook订阅实体
///
/// 表示一个账户对某个回调地址和一组事件的订阅。
/// 所有查询都必须以 `owner_id` 作为限定条件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    /// 订阅唯一标识符
    pub id: Uuid,
    /// 所属账户ID，用于权限隔离
    pub owner_id: Uuid,
    /// 回调URL，接收通知的目标地址
    pub url: String,
    /// 订阅的事件名列表，均来自事件目录
    pub events: Vec<String>,
    /// 签名密钥
    pub secret: String,
    /// 是否启用
    pub active: bool,
    /// 连续失败次数
    pub failure_count: i32,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 最近一次投递周期结束的时间
    pub last_triggered_at: Option<DateTime<Utc>>,
}

impl WebhookSubscription {
    /// 创建一个新的订阅
    ///
    /// 新订阅总是处于启用状态，失败计数为0
    pub fn new(owner_id: Uuid, url: String, events: Vec<String>, secret: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            url,
            events,
            secret,
            active: true,
            failure_count: 0,
            created_at: Utc::now(),
            last_triggered_at: None,
        }
    }

    /// 订阅是否关注指定事件
    pub fn subscribes_to(&self, event: &str) -> bool {
        self.events.iter().any(|e| e == event)
    }
}

/// 支持订阅的事件目录
///
/// 目录是固定的，创建和更新订阅时的事件名必须全部属于此目录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    #[serde(rename = "project.created")]
    ProjectCreated,
    #[serde(rename = "project.updated")]
    ProjectUpdated,
    #[serde(rename = "project.deleted")]
    ProjectDeleted,
    #[serde(rename = "project.shared")]
    ProjectShared,
    #[serde(rename = "project.exported")]
    ProjectExported,
    #[serde(rename = "slide.created")]
    SlideCreated,
    #[serde(rename = "slide.updated")]
    SlideUpdated,
    #[serde(rename = "slide.deleted")]
    SlideDeleted,
    #[serde(rename = "slide.reordered")]
    SlideReordered,
    #[serde(rename = "block.created")]
    BlockCreated,
    #[serde(rename = "block.updated")]
    BlockUpdated,
    #[serde(rename = "block.deleted")]
    BlockDeleted,
    #[serde(rename = "comment.created")]
    CommentCreated,
    #[serde(rename = "collaborator.added")]
    CollaboratorAdded,
    #[serde(rename = "collaborator.removed")]
    CollaboratorRemoved,
    #[serde(rename = "ai.generation.started")]
    AiGenerationStarted,
    #[serde(rename = "ai.generation.completed")]
    AiGenerationCompleted,
    #[serde(rename = "ai.generation.failed")]
    AiGenerationFailed,
}

impl WebhookEventType {
    /// 目录中的全部事件，顺序即对外展示顺序
    pub const ALL: [WebhookEventType; 18] = [
        WebhookEventType::ProjectCreated,
        WebhookEventType::ProjectUpdated,
        WebhookEventType::ProjectDeleted,
        WebhookEventType::ProjectShared,
        WebhookEventType::ProjectExported,
        WebhookEventType::SlideCreated,
        WebhookEventType::SlideUpdated,
        WebhookEventType::SlideDeleted,
        WebhookEventType::SlideReordered,
        WebhookEventType::BlockCreated,
        WebhookEventType::BlockUpdated,
        WebhookEventType::BlockDeleted,
        WebhookEventType::CommentCreated,
        WebhookEventType::CollaboratorAdded,
        WebhookEventType::CollaboratorRemoved,
        WebhookEventType::AiGenerationStarted,
        WebhookEventType::AiGenerationCompleted,
        WebhookEventType::AiGenerationFailed,
    ];

    /// 事件的线上名称
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::ProjectCreated => "project.created",
            WebhookEventType::ProjectUpdated => "project.updated",
            WebhookEventType::ProjectDeleted => "project.deleted",
            WebhookEventType::ProjectShared => "project.shared",
            WebhookEventType::ProjectExported => "project.exported",
            WebhookEventType::SlideCreated => "slide.created",
            WebhookEventType::SlideUpdated => "slide.updated",
            WebhookEventType::SlideDeleted => "slide.deleted",
            WebhookEventType::SlideReordered => "slide.reordered",
            WebhookEventType::BlockCreated => "block.created",
            WebhookEventType::BlockUpdated => "block.updated",
            WebhookEventType::BlockDeleted => "block.deleted",
            WebhookEventType::CommentCreated => "comment.created",
            WebhookEventType::CollaboratorAdded => "collaborator.added",
            WebhookEventType::CollaboratorRemoved => "collaborator.removed",
            WebhookEventType::AiGenerationStarted => "ai.generation.started",
            WebhookEventType::AiGenerationCompleted => "ai.generation.completed",
            WebhookEventType::AiGenerationFailed => "ai.generation.failed",
        }
    }

    /// 解析事件名，不在目录中时返回 `None`
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.as_str() == name)
    }

    /// 以字符串形式列出目录
    pub fn catalog() -> Vec<&'static str> {
        Self::ALL.iter().map(WebhookEventType::as_str).collect()
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知事件名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEvent(pub String);

impl fmt::Display for UnknownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported event: {}", self.0)
    }
}

impl std::error::Error for UnknownEvent {}

impl FromStr for WebhookEventType {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

/// 发送给订阅方的线上负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// 事件名
    pub event: String,
    /// 事件发生时间（ISO-8601）
    pub timestamp: DateTime<Utc>,
    /// 事件数据
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
}

impl WebhookPayload {
    /// 以当前时间构造负载
    pub fn new(
        event: impl Into<String>,
        data: serde_json::Value,
        project_id: Option<Uuid>,
        owner_id: Option<Uuid>,
    ) -> Self {
        Self {
            event: event.into(),
            timestamp: Utc::now(),
            data,
            project_id,
            owner_id,
        }
    }

    /// 构造测试事件负载
    pub fn test(subscription: &WebhookSubscription) -> Self {
        Self::new(
            TEST_EVENT,
            serde_json::json!({
                "message": "This is a test webhook delivery",
                "webhookId": subscription.id,
            }),
            None,
            Some(subscription.owner_id),
        )
    }
}

/// 投递日志条目
///
/// 每次HTTP尝试的结果都会追加一条，写入后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLogEntry {
    pub id: Uuid,
    pub webhook_id: Uuid,
    pub event: String,
    /// 序列化后的负载
    pub payload: serde_json::Value,
    pub success: bool,
    pub status_code: Option<i32>,
    /// 截断后的响应体
    pub response_body: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 单次投递尝试的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryLogEntry {
    /// 根据一次尝试的结果构造日志条目
    ///
    /// 负载无法序列化时返回错误，不写入空负载
    pub fn from_attempt(
        subscription: &WebhookSubscription,
        payload: &WebhookPayload,
        result: &DeliveryResult,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            webhook_id: subscription.id,
            event: payload.event.clone(),
            payload: serde_json::to_value(payload)?,
            success: result.success,
            status_code: result.status_code.map(i32::from),
            response_body: result.response.clone(),
            error_message: result.error.clone(),
            created_at: Utc::now(),
        })
    }
}
