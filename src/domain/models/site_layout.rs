// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

/// 站点布局
///
/// 评论页面的全部选择器与默认值。字段抽取器、滚动驱动和页面引导器
/// 都从这里读取选择器，配置文件可以按字段覆盖。
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteLayout {
    /// 评论子页面的路径标记
    pub reviews_marker: String,
    /// 评论卡片的主选择器
    pub container: String,
    /// 主选择器无结果时使用的宽泛选择器
    pub fallback_container: String,
    /// 评论正文的站点专用选择器
    pub text: String,
    /// 类名包含 "comment-text" 的正文元素
    pub comment_text: String,
    /// 段落选择器
    pub paragraph: String,
    /// 星级容器内的实心星
    pub full_star: String,
    /// 旧版星标图标
    pub legacy_star: String,
    /// 作者元素
    pub author: String,
    /// 日期元素
    pub date: String,
    /// 页面主标题
    pub heading: String,
    /// 品牌名元素
    pub brand_name: String,
    /// 商品名元素
    pub product_name: String,
    /// 作者缺失时的占位符
    pub default_author: String,
    /// 商品名抽取失败时的占位符
    pub default_business_name: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            reviews_marker: "/yorumlar".to_string(),
            container: ".rnr-com-w".to_string(),
            fallback_container: "div[class*='comment']".to_string(),
            text: ".rnr-com-tx".to_string(),
            comment_text: "div[class*='comment-text']".to_string(),
            paragraph: "p".to_string(),
            full_star: ".rnr-com-sr .full".to_string(),
            legacy_star: "i.i-star-orange".to_string(),
            author: ".rnr-com-usr".to_string(),
            date: ".rnr-com-dt".to_string(),
            heading: "h1".to_string(),
            brand_name: ".brand-name".to_string(),
            product_name: ".product-name".to_string(),
            default_author: "Müşteri".to_string(),
            default_business_name: "Trendyol Product".to_string(),
        }
    }
}
