// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::domain::models::site_layout::SiteLayout;
use crate::domain::services::page_bootstrapper::normalize_url;

/// 原始评论
///
/// 字段抽取器从单个评论卡片中得到的结果，被收集循环接受后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReview {
    /// 评论作者，缺失时为布局中的占位符
    pub author: String,
    /// 评论正文，至少 3 个字符
    pub text: String,
    /// 星级评分，取值 1..=5
    pub rating: u8,
    /// 站点原始格式的日期，未解析
    pub date: String,
}

/// 抓取目标
///
/// 由请求派生一次，`normalized_url` 总是指向评论子页面。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    pub normalized_url: String,
    pub max_reviews: usize,
}

impl ScrapeTarget {
    pub fn new(url: &str, max_reviews: usize, layout: &SiteLayout) -> Self {
        Self {
            normalized_url: normalize_url(url, &layout.reviews_marker),
            max_reviews,
        }
    }
}

/// 抓取结果
///
/// 交给分类协作方的唯一产物，评论按页面渲染顺序排列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub reviews: Vec<RawReview>,
    pub business_name: String,
}

impl ScrapeResult {
    /// 空结果，商品名使用占位符
    pub fn empty(layout: &SiteLayout) -> Self {
        Self {
            reviews: Vec::new(),
            business_name: layout.default_business_name.clone(),
        }
    }

    /// 评论正文列表，保持原有顺序
    pub fn texts(&self) -> Vec<String> {
        self.reviews.iter().map(|r| r.text.clone()).collect()
    }
}
