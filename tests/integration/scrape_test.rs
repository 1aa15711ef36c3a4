// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use reviewrs::domain::services::review_collector::{CollectorConfig, StallPolicy};

use super::helpers::{legacy_page, review_page, scraper, Card};

const URL: &str = "https://www.trendyol.com/stanley/termos-p-123";

fn texts(result: &reviewrs::domain::models::review::ScrapeResult) -> Vec<&str> {
    result.reviews.iter().map(|r| r.text.as_str()).collect()
}

/// 一轮即可满足较小的请求数量，并按页面顺序截断
#[tokio::test]
async fn test_single_pass_stops_at_limit() {
    let cards: Vec<Card> = [
        "Birinci yorum", "İkinci yorum", "Üçüncü yorum", "Dördüncü yorum",
        "Beşinci yorum", "Altıncı yorum", "Yedinci yorum", "Sekizinci yorum",
    ]
    .into_iter()
    .map(Card::new)
    .collect();
    let page = review_page("Stanley Termos", &cards);

    let result = scraper(vec![page], CollectorConfig::default())
        .scrape(URL, 5)
        .await
        .unwrap();

    assert_eq!(result.business_name, "Stanley Termos");
    assert_eq!(
        texts(&result),
        vec!["Birinci yorum", "İkinci yorum", "Üçüncü yorum", "Dördüncü yorum", "Beşinci yorum"]
    );
    assert!(result.reviews.iter().all(|r| r.author == "A** K**"));
}

/// 无限滚动页面：每轮返回全部卡片，旧卡片被去重
#[tokio::test]
async fn test_growing_page_is_deduplicated() {
    let first = review_page(
        "Termos",
        &[Card::new("Harika ürün").stars(5), Card::new("Kargo geç geldi").stars(2)],
    );
    let second = review_page(
        "Termos",
        &[
            Card::new("Harika ürün").stars(5),
            Card::new("Kargo geç geldi").stars(2),
            Card::new("Fiyatına göre iyi").stars(4),
            Card::new("Harika ürün").stars(5),
        ],
    );

    let result = scraper(vec![first, second], CollectorConfig::default())
        .scrape(URL, 30)
        .await
        .unwrap();

    assert_eq!(
        texts(&result),
        vec!["Harika ürün", "Kargo geç geldi", "Fiyatına göre iyi"]
    );
    let ratings: Vec<u8> = result.reviews.iter().map(|r| r.rating).collect();
    assert_eq!(ratings, vec![5, 2, 4]);
}

/// 静态页面在预算耗尽或停滞策略触发后结束，返回少于请求数量的评论
#[tokio::test]
async fn test_static_page_returns_partial_result() {
    let page = review_page("Termos", &[Card::new("Tek yorum burada")]);

    for policy in [StallPolicy::KeepScrolling, StallPolicy::StopAfter(1)] {
        let config = CollectorConfig {
            stall_policy: policy,
            ..CollectorConfig::default()
        };
        let result = scraper(vec![page.clone()], config)
            .scrape(URL, 40)
            .await
            .unwrap();
        assert_eq!(texts(&result), vec!["Tek yorum burada"]);
    }
}

/// 旧版布局走回退选择器，店铺名来自品牌和商品名
#[tokio::test]
async fn test_legacy_layout_uses_fallbacks() {
    let page = legacy_page("Stanley", "Klasik Termos", &["Gayet başarılı", "ok", "Sıcak tutuyor"]);

    let result = scraper(vec![page], CollectorConfig::default())
        .scrape(URL, 10)
        .await
        .unwrap();

    assert_eq!(result.business_name, "Stanley Klasik Termos");
    assert_eq!(texts(&result), vec!["Gayet başarılı", "Sıcak tutuyor"]);
    assert!(result.reviews.iter().all(|r| r.rating == 2));
    assert!(result.reviews.iter().all(|r| r.author == "Müşteri"));
}

/// 没有评论卡片的页面返回空结果，但保留店铺名
#[tokio::test]
async fn test_page_without_reviews() {
    let page = review_page("Boş Ürün", &[]);

    let result = scraper(vec![page], CollectorConfig::default())
        .scrape(URL, 20)
        .await
        .unwrap();

    assert!(result.reviews.is_empty());
    assert_eq!(result.business_name, "Boş Ürün");
}

/// 无法获得会话时抓取失败
#[tokio::test]
async fn test_launch_failure() {
    let err = scraper(Vec::new(), CollectorConfig::default())
        .scrape(URL, 20)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        reviewrs::utils::errors::ScrapeError::Launch(_)
    ));
}
