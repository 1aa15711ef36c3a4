// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::domain::models::review::{ScrapeResult, ScrapeTarget};
use crate::domain::models::site_layout::SiteLayout;
use crate::domain::services::field_extractor::FieldExtractor;
use crate::domain::services::page_bootstrapper::bootstrap;
use crate::domain::services::review_collector::{CollectorConfig, ReviewCollector};
use crate::engines::traits::{DriverFactory, ScrollDriver};
use crate::utils::errors::ScrapeError;

/// 评论抓取器
///
/// 一次 `scrape` 调用拥有一个独立的驱动会话和一个独立的去重集合。
/// 会话在每条退出路径上都会被关闭。
pub struct ReviewScraper {
    factory: Arc<dyn DriverFactory>,
    layout: SiteLayout,
    extractor: FieldExtractor,
    config: CollectorConfig,
}

impl ReviewScraper {
    pub fn new(
        factory: Arc<dyn DriverFactory>,
        layout: SiteLayout,
        config: CollectorConfig,
    ) -> Result<Self, ScrapeError> {
        let extractor = FieldExtractor::new(&layout)?;
        Ok(Self {
            factory,
            layout,
            extractor,
            config,
        })
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// 抓取商品评论
    ///
    /// # 参数
    ///
    /// * `url` - 商品页面或评论页面 URL
    /// * `max_reviews` - 请求的最大评论数
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeResult)` - 已收集的评论（可能少于请求数量，甚至为空）
    /// * `Err(ScrapeError)` - 无法获得浏览器会话
    pub async fn scrape(&self, url: &str, max_reviews: usize) -> Result<ScrapeResult, ScrapeError> {
        let target = ScrapeTarget::new(url, max_reviews, &self.layout);
        let mut driver = self.factory.launch().await.map_err(ScrapeError::Launch)?;

        let start = Instant::now();
        let result = self.run(driver.as_mut(), &target).await;
        driver.close().await;

        info!(
            "Scraped {} reviews for {} in {} ms",
            result.reviews.len(),
            result.business_name,
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    async fn run(&self, driver: &mut dyn ScrollDriver, target: &ScrapeTarget) -> ScrapeResult {
        let business_name = match bootstrap(driver, target, &self.layout).await {
            Ok(name) => name,
            Err(e) => {
                error!("Global scraping error for {}: {}", target.normalized_url, e);
                return ScrapeResult::empty(&self.layout);
            }
        };

        let (reviews, _report) = ReviewCollector::new(&self.extractor, target.max_reviews, self.config)
            .collect(driver)
            .await;

        ScrapeResult {
            reviews,
            business_name,
        }
    }
}
