// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use reviewrs::domain::models::analysis::SentimentLabel;
use reviewrs::domain::services::classifier::{ClassifierChain, SentimentProvider};
use reviewrs::domain::services::lexicon_classifier::LexiconClassifier;
use reviewrs::domain::services::llm_classifier::LlmClassifier;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> LlmClassifier {
    LlmClassifier::new(
        "gemini",
        Some("test-key".to_string()),
        "gemini-2.0-flash",
        server.uri(),
        Duration::from_secs(5),
    )
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

fn reviews() -> Vec<String> {
    vec![
        "Kargo çok hızlıydı, teşekkürler".to_string(),
        "Ürün kırık geldi".to_string(),
    ]
}

#[tokio::test]
async fn test_batch_classification() {
    let server = MockServer::start().await;
    let content = r#"```json
[
  {"sentiment": "Positive", "score": 0.93, "aspects": [{"aspect": "Kargo", "sentiment": "Positive", "confidence": 0.9}]},
  {"sentiment": "Negative", "score": 0.88, "aspects": [{"aspect": "Kalite", "sentiment": "Negative", "confidence": 0.85}]}
]
```"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .expect(1)
        .mount(&server)
        .await;

    let results = provider(&server).classify_batch(&reviews()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].sentiment, SentimentLabel::Positive);
    assert_eq!(results[0].aspects[0].aspect, "Kargo");
    assert_eq!(results[1].sentiment, SentimentLabel::Negative);
    assert_eq!(results[1].score, 0.88);
}

#[tokio::test]
async fn test_summary() {
    let server = MockServer::start().await;
    let content = json!({
        "strengths": ["Hızlı kargo", "Sağlam ambalaj"],
        "weaknesses": ["Kırık ürün şikayetleri"],
        "advice": ["Kalite kontrolü artırın", "Ambalajı güçlendirin", "Kargo firmasını değerlendirin", "Fazla"]
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content)))
        .mount(&server)
        .await;

    let chain = ClassifierChain::new(vec![Arc::new(provider(&server))]);
    let summary = chain.summarize(&reviews()).await.unwrap();

    assert_eq!(summary.strengths, vec!["Hızlı kargo", "Sağlam ambalaj"]);
    assert_eq!(summary.weaknesses.len(), 1);
    assert_eq!(summary.advice.len(), 3);
}

#[tokio::test]
async fn test_server_error_falls_back_to_lexicon() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let providers: Vec<Arc<dyn SentimentProvider>> = vec![
        Arc::new(provider(&server)),
        Arc::new(LexiconClassifier::new()),
    ];
    let chain = ClassifierChain::new(providers);

    let results = chain.classify_batch(&reviews()).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].sentiment, SentimentLabel::Positive);
    assert_eq!(results[1].sentiment, SentimentLabel::Negative);

    let summary = chain.summarize(&reviews()).await.unwrap();
    assert!(!summary.strengths.is_empty());
}

#[tokio::test]
async fn test_short_answer_falls_through() {
    let server = MockServer::start().await;
    let content = r#"[{"sentiment": "Positive", "score": 0.9}]"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(&server)
        .await;

    let chain = ClassifierChain::new(vec![Arc::new(provider(&server))]);
    let results = chain.classify_batch(&reviews()).await;

    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r.sentiment == SentimentLabel::Neutral));
}

#[tokio::test]
async fn test_provider_without_key_is_skipped() {
    let classifier = LlmClassifier::new(
        "openai",
        None,
        "gpt-4o-mini",
        "http://127.0.0.1:9",
        Duration::from_secs(1),
    );
    let chain = ClassifierChain::new(vec![Arc::new(classifier)]);

    assert_eq!(chain.available(), vec!["neutral"]);
    assert!(chain.summarize(&reviews()).await.is_none());
}
