// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::domain::models::analysis::{
    AspectSentiment, BusinessSummary, ReviewSentiment, SentimentLabel,
};
use crate::domain::services::classifier::SentimentProvider;
use crate::utils::errors::ClassifierError;

/// 提示中列出的标准方面标签
pub const STANDARD_ASPECTS: [&str; 8] = [
    "Kargo",
    "Paketleme",
    "Kalite",
    "Fiyat",
    "Müşteri Hizmetleri",
    "Kullanım Kolaylığı",
    "Tasarım",
    "Orijinallik",
];

const DEFAULT_SCORE: f64 = 0.8;

/// LLM 分类器 - 兼容 OpenAI chat completions 接口的提供方
///
/// # 配置
///
/// - `api_key` - API 密钥，未配置时提供方不可用
/// - `model` - 模型名称
/// - `api_base_url` - API 基础 URL，例如 Gemini 的 OpenAI 兼容端点
pub struct LlmClassifier {
    name: String,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    client: reqwest::Client,
}

impl LlmClassifier {
    pub fn new(
        name: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            name: name.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// 发送一次对话请求并返回模型输出中的 JSON
    async fn complete_json(&self, prompt: String) -> Result<Value, ClassifierError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ClassifierError::NotConfigured("api key"))?;

        let request_body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an e-commerce review analyst. You output only valid JSON."
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": 0.0
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status { status, body });
        }

        let body: Value = response.json().await?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ClassifierError::InvalidResponse("missing message content".to_string()))?;

        parse_json_content(content)
    }
}

/// 去掉 markdown 代码块标记后解析 JSON
pub fn parse_json_content(content: &str) -> Result<Value, ClassifierError> {
    let clean = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(clean).map_err(|e| ClassifierError::InvalidResponse(e.to_string()))
}

fn score_of(value: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(Value::as_f64))
        .unwrap_or(DEFAULT_SCORE)
        .clamp(0.0, 1.0)
}

fn parse_aspect(value: &Value, review_sentiment: SentimentLabel) -> AspectSentiment {
    let aspect = ["aspect", "feature"]
        .iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .unwrap_or("General")
        .to_string();
    let sentiment = value
        .get("sentiment")
        .and_then(Value::as_str)
        .map(SentimentLabel::parse_lenient)
        .unwrap_or(review_sentiment);
    AspectSentiment {
        aspect,
        sentiment,
        confidence: score_of(value, &["confidence", "score"]),
    }
}

fn parse_review(value: &Value) -> ReviewSentiment {
    let sentiment = value
        .get("sentiment")
        .and_then(Value::as_str)
        .map(SentimentLabel::parse_lenient)
        .unwrap_or(SentimentLabel::Neutral);
    let aspects = value
        .get("aspects")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|a| parse_aspect(a, sentiment)).collect())
        .unwrap_or_default();
    ReviewSentiment {
        sentiment,
        score: score_of(value, &["score", "confidence"]),
        aspects,
    }
}

/// 解析批量分类结果：接受裸数组或 `{"reviews": [...]}` 包装
pub fn parse_batch(value: &Value) -> Result<Vec<ReviewSentiment>, ClassifierError> {
    let items = value
        .as_array()
        .or_else(|| value.get("reviews").and_then(Value::as_array))
        .ok_or_else(|| ClassifierError::InvalidResponse("expected a JSON array".to_string()))?;
    Ok(items.iter().map(parse_review).collect())
}

fn batch_prompt(texts: &[String]) -> String {
    format!(
        "Analyze the following product reviews. Return ONLY a JSON array with exactly one \
        object per review, in the same order:\n\
        {{\"sentiment\": \"Positive\" | \"Negative\" | \"Neutral\", \"score\": 0.95, \
        \"aspects\": [{{\"aspect\": \"Kargo\", \"sentiment\": \"Positive\", \"confidence\": 0.9}}]}}\n\
        Use these aspect labels: {}. Leave 'aspects' empty when no topic is clear.\n\
        Reviews: {}",
        serde_json::to_string(&STANDARD_ASPECTS).unwrap_or_default(),
        serde_json::to_string(texts).unwrap_or_default()
    )
}

fn summary_prompt(texts: &[String]) -> String {
    format!(
        "You are an e-commerce consultant. Analyze the product reviews below and prepare a \
        report for the seller. Return ONLY this JSON object:\n\
        {{\"strengths\": [\"...\"], \"weaknesses\": [\"...\"], \"advice\": [\"...\"]}}\n\
        Give 3 to 5 short, concrete items per list, in the language of the reviews.\n\
        Reviews: {}",
        serde_json::to_string(texts).unwrap_or_default()
    )
}

#[async_trait]
impl SentimentProvider for LlmClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<ReviewSentiment>, ClassifierError> {
        let value = self.complete_json(batch_prompt(texts)).await?;
        let results = parse_batch(&value)?;
        debug!("{} returned {} results", self.name, results.len());
        Ok(results)
    }

    async fn summarize(&self, texts: &[String]) -> Result<BusinessSummary, ClassifierError> {
        let value = self.complete_json(summary_prompt(texts)).await?;
        serde_json::from_value(value).map_err(|e| ClassifierError::InvalidResponse(e.to_string()))
    }
}
