// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing::{debug, info, warn};
use url::Url;

use crate::domain::models::review::ScrapeTarget;
use crate::domain::models::site_layout::SiteLayout;
use crate::engines::traits::{EngineError, ScrollDriver};

/// 将任意商品 URL 规范化为评论子页面 URL
///
/// 路径中没有评论标记段时追加该段，查询字符串重新接在标记之后，
/// 输出中最多只有一个 `?`。已经包含标记的 URL 原样返回。
pub fn normalize_url(raw: &str, marker: &str) -> String {
    let raw = raw.trim();
    let segment = marker.trim_matches('/');
    if segment.is_empty() {
        return raw.to_string();
    }

    match Url::parse(raw) {
        Ok(mut url) => {
            let has_marker = url
                .path_segments()
                .is_some_and(|mut segments| segments.any(|s| s == segment));
            if has_marker || url.cannot_be_a_base() {
                return raw.to_string();
            }
            let path = format!("{}/{}", url.path().trim_end_matches('/'), segment);
            url.set_path(&path);
            url.set_fragment(None);
            url.to_string()
        }
        Err(e) => {
            debug!("URL {} is not absolute ({}), normalizing as plain text", raw, e);
            normalize_plain(raw, segment)
        }
    }
}

fn normalize_plain(raw: &str, segment: &str) -> String {
    let without_fragment = raw.split('#').next().unwrap_or(raw);
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (without_fragment, None),
    };
    if base.split('/').any(|s| s == segment) {
        return raw.to_string();
    }

    let mut target = format!("{}/{}", base.trim_end_matches('/'), segment);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    target
}

async fn non_empty_text(driver: &dyn ScrollDriver, selector: &str) -> Option<String> {
    match driver.text_of(selector).await {
        Ok(Some(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => None,
        Err(e) => {
            debug!("Lookup of {} failed: {}", selector, e);
            None
        }
    }
}

/// 抽取商品（店铺）名称
///
/// 依次尝试页面主标题，以及品牌名与商品名的拼接；全部失败时返回布局中的占位符。
/// 该步骤永远不会中止抓取。
pub async fn extract_business_name(driver: &dyn ScrollDriver, layout: &SiteLayout) -> String {
    if let Some(heading) = non_empty_text(driver, &layout.heading).await {
        return heading;
    }

    let brand = non_empty_text(driver, &layout.brand_name).await;
    let product = non_empty_text(driver, &layout.product_name).await;
    let joined = [brand, product]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        return joined;
    }

    warn!(
        "Could not find product name, using default: {}",
        layout.default_business_name
    );
    layout.default_business_name.clone()
}

/// 加载目标页面并解析商品名
///
/// # 返回值
///
/// * `Ok(String)` - 页面已就绪，返回商品名
/// * `Err(EngineError)` - 页面无法加载
pub async fn bootstrap(
    driver: &mut dyn ScrollDriver,
    target: &ScrapeTarget,
    layout: &SiteLayout,
) -> Result<String, EngineError> {
    info!("Navigating to: {}", target.normalized_url);
    driver.open(&target.normalized_url).await?;

    let business_name = extract_business_name(driver, layout).await;
    info!("Found product name: {}", business_name);
    Ok(business_name)
}
