// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务。
///
/// 包含的服务：
/// - 事件触发（event_trigger）：把领域事件扇出为投递任务
/// - 发送接口（webhook_sender）：单次签名HTTP投递的抽象
/// - 注册表服务（webhook_service）：订阅的管理、测试投递和日志查询
pub mod event_trigger;
pub mod webhook_sender;
pub mod webhook_service;
