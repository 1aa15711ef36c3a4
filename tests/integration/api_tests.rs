// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use reviewrs::domain::models::analysis::{AnalysisReport, SentimentLabel};
use serde_json::json;

use super::helpers::{review_page, test_server, Card};

/// 健康检查测试
#[tokio::test]
async fn health_check_works() {
    let server = test_server(Vec::new());

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");

    let version = server.get("/v1/version").await;
    version.assert_text(env!("CARGO_PKG_VERSION"));
}

/// 完整分析流程：抓取快照、分类并生成摘要
#[tokio::test]
async fn analyze_returns_report() {
    let page = review_page(
        "Çelik Termos",
        &[
            Card::new("Harika termos, çok kaliteli").stars(5),
            Card::new("Kapağı bozuk geldi, berbat").stars(1),
            Card::new("Dün teslim aldım").stars(3),
        ],
    );
    let server = test_server(vec![page]);

    let response = server
        .post("/analyze")
        .json(&json!({ "url": "https://www.trendyol.com/celik-termos-p-42", "limit": 10 }))
        .await;
    response.assert_status_ok();

    let report: AnalysisReport = response.json();
    assert_eq!(report.business_name, "Çelik Termos");
    assert_eq!(report.total_reviews, 3);
    let labels: Vec<SentimentLabel> = report.reviews.iter().map(|r| r.sentiment).collect();
    assert_eq!(
        labels,
        vec![
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral
        ]
    );
    assert_eq!(report.reviews[1].rating, 1);
    assert!((report.overall_sentiment_score - 0.5).abs() < 1e-9);
    assert!(report.summary.is_some());
}

/// 默认 limit 为 50
#[tokio::test]
async fn analyze_uses_default_limit() {
    let page = review_page("Termos", &[Card::new("Gayet iyi bir ürün")]);
    let server = test_server(vec![page]);

    let response = server
        .post("/analyze")
        .json(&json!({ "url": "https://www.trendyol.com/termos-p-1/yorumlar" }))
        .await;
    response.assert_status_ok();

    let report: AnalysisReport = response.json();
    assert_eq!(report.total_reviews, 1);
}

#[tokio::test]
async fn analyze_rejects_invalid_request() {
    let server = test_server(vec![review_page("Termos", &[])]);

    let empty_url = server
        .post("/analyze")
        .json(&json!({ "url": "", "limit": 10 }))
        .expect_failure()
        .await;
    empty_url.assert_status(StatusCode::BAD_REQUEST);

    let zero_limit = server
        .post("/analyze")
        .json(&json!({ "url": "https://www.trendyol.com/termos-p-1", "limit": 0 }))
        .expect_failure()
        .await;
    zero_limit.assert_status(StatusCode::BAD_REQUEST);

    let too_many = server
        .post("/analyze")
        .json(&json!({ "url": "https://www.trendyol.com/termos-p-1", "limit": 501 }))
        .expect_failure()
        .await;
    too_many.assert_status(StatusCode::BAD_REQUEST);
}

/// 无法获得浏览器会话时返回 502
#[tokio::test]
async fn analyze_reports_launch_failure() {
    let server = test_server(Vec::new());

    let response = server
        .post("/analyze")
        .json(&json!({ "url": "https://www.trendyol.com/termos-p-1", "limit": 10 }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}
