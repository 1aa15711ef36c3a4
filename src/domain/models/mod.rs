// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 评论（review）：原始评论、抓取目标与抓取结果
/// - 分析（analysis）：情感标签、方面情感与分析报告
/// - 站点布局（site_layout）：评论页面的选择器表
pub mod analysis;
pub mod review;
pub mod site_layout;
