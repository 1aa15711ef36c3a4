// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 字段抽取（field_extractor）：按策略表从评论卡片抽取字段
/// - 去重（deduplicator）：按正文拒绝重复评论
/// - 页面引导（page_bootstrapper）：URL 规范化与商品名抽取
/// - 收集循环（review_collector）：逐轮滚动直到达到目标或预算耗尽
/// - 评论抓取（review_scraper）：管理单次抓取的浏览器会话
/// - 分类（classifier、llm_classifier、lexicon_classifier）：可替换的情感分类提供方
/// - 分析（analysis_service）：汇总分类结果与店铺摘要
pub mod analysis_service;
pub mod classifier;
pub mod deduplicator;
pub mod field_extractor;
pub mod lexicon_classifier;
pub mod llm_classifier;
pub mod page_bootstrapper;
pub mod review_collector;
pub mod review_scraper;
