// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Extension;
use axum_test::TestServer;
use reviewrs::application::use_cases::analyze_product::AnalyzeProductUseCase;
use reviewrs::domain::models::site_layout::SiteLayout;
use reviewrs::domain::services::analysis_service::AnalysisService;
use reviewrs::domain::services::classifier::{ClassifierChain, SentimentProvider};
use reviewrs::domain::services::lexicon_classifier::LexiconClassifier;
use reviewrs::domain::services::review_collector::CollectorConfig;
use reviewrs::domain::services::review_scraper::ReviewScraper;
use reviewrs::engines::snapshot_driver::SnapshotDriverFactory;
use reviewrs::engines::traits::ScrollTimings;
use reviewrs::presentation::routes;
use std::sync::Arc;

/// 测试用评论卡片
pub struct Card<'a> {
    pub author: &'a str,
    pub text: &'a str,
    pub stars: usize,
    pub date: &'a str,
}

impl<'a> Card<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            author: "A** K**",
            text,
            stars: 5,
            date: "12 Ocak 2026",
        }
    }

    pub fn stars(mut self, stars: usize) -> Self {
        self.stars = stars;
        self
    }

    fn html(&self) -> String {
        format!(
            r#"<div class="rnr-com-w">
                <div class="rnr-com-sr">{}</div>
                <div class="rnr-com-usr">{}</div>
                <div class="rnr-com-dt">{}</div>
                <div class="rnr-com-tx"><p>{}</p></div>
            </div>"#,
            r#"<div class="full"></div>"#.repeat(self.stars),
            self.author,
            self.date,
            self.text
        )
    }
}

/// 使用当前站点布局渲染的评论页快照
pub fn review_page(title: &str, cards: &[Card<'_>]) -> String {
    let body: String = cards.iter().map(Card::html).collect();
    format!(
        r#"<html><head><title>{title}</title></head>
        <body><h1>{title}</h1><section class="reviews">{body}</section></body></html>"#
    )
}

/// 旧版布局：通用 comment 类名，没有标题，只有品牌和商品名
pub fn legacy_page(brand: &str, product: &str, texts: &[&str]) -> String {
    let body: String = texts
        .iter()
        .map(|t| {
            format!(
                r#"<div class="comment-item"><i class="i-star-orange"></i><i class="i-star-orange"></i><div class="comment-text">{t}</div></div>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><span class="brand-name">{brand}</span><span class="product-name">{product}</span>{body}</body></html>"#
    )
}

pub fn scraper(snapshots: Vec<String>, config: CollectorConfig) -> ReviewScraper {
    let layout = SiteLayout::default();
    let factory = SnapshotDriverFactory::new(snapshots, ScrollTimings::immediate(), &layout)
        .expect("layout selectors are valid");
    ReviewScraper::new(Arc::new(factory), layout, config).expect("layout selectors are valid")
}

/// 基于快照驱动和本地词典分类器的测试服务器
pub fn test_server(snapshots: Vec<String>) -> TestServer {
    let scraper = Arc::new(scraper(snapshots, CollectorConfig::default()));
    let providers: Vec<Arc<dyn SentimentProvider>> = vec![Arc::new(LexiconClassifier::new())];
    let analysis = Arc::new(AnalysisService::new(
        Arc::new(ClassifierChain::new(providers)),
        20,
        50,
    ));
    let use_case = Arc::new(AnalyzeProductUseCase::new(scraper, analysis));

    let app = routes::routes().layer(Extension(use_case));
    TestServer::new(app).unwrap()
}
