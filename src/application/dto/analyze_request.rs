// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 默认抓取的评论数
pub const DEFAULT_LIMIT: u32 = 50;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// 评论分析请求数据传输对象
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AnalyzeRequestDto {
    /// 商品页面或评论页面 URL
    #[validate(length(min = 1, message = "url cannot be empty"))]
    pub url: String,
    /// 最多抓取的评论数
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 500, message = "limit must be between 1 and 500"))]
    pub limit: u32,
}
