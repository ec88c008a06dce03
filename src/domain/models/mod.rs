// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义 Webhook 订阅、线上负载、投递日志条目和固定的事件目录。
pub mod webhook;
