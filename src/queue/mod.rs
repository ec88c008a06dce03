// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供有界的投递任务队列
/// 事件触发端入队，后台工作管理器出队并执行投递
pub mod delivery_queue;
