// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台投递处理和工作器管理功能
/// 包括带重试的投递周期、有限并发和优雅关闭
pub mod manager;
pub mod webhook_worker;
