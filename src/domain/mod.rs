// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：评论、分析结果与站点布局
/// - 服务（services）：抽取、去重、收集与分类
///
/// 领域层只通过 `engines::traits` 中的特质接触浏览器。
pub mod models;
pub mod services;
