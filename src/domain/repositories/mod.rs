// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 投递日志仓库（delivery_log_repository）：只追加的投递记录
/// - Webhook仓库（webhook_repository）：管理订阅及其投递状态
pub mod delivery_log_repository;
pub mod webhook_repository;
