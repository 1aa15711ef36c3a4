// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::review::RawReview;

/// 情感标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// 宽松解析提供方返回的标签，未知值视为中性
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "pos" | "olumlu" => SentimentLabel::Positive,
            "negative" | "neg" | "olumsuz" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    /// 用于整体得分的权重
    pub fn weight(self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Neutral => 0.5,
            SentimentLabel::Negative => 0.0,
        }
    }
}

/// 方面级情感
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSentiment {
    pub aspect: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
}

/// 单条评论的分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSentiment {
    pub sentiment: SentimentLabel,
    /// 置信度，范围 [0, 1]
    pub score: f64,
    pub aspects: Vec<AspectSentiment>,
}

impl ReviewSentiment {
    pub fn neutral() -> Self {
        Self {
            sentiment: SentimentLabel::Neutral,
            score: 0.5,
            aspects: Vec::new(),
        }
    }
}

/// 店铺级战略摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessSummary {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub advice: Vec<String>,
}

impl BusinessSummary {
    /// 按上限截断各列表
    pub fn capped(mut self) -> Self {
        self.strengths.truncate(5);
        self.weaknesses.truncate(5);
        self.advice.truncate(3);
        self
    }
}

/// 带分类结果的评论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedReview {
    pub author: String,
    pub text: String,
    pub rating: u8,
    pub date: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub aspects: Vec<AspectSentiment>,
}

impl AnalyzedReview {
    pub fn new(review: RawReview, sentiment: ReviewSentiment) -> Self {
        Self {
            author: review.author,
            text: review.text,
            rating: review.rating,
            date: review.date,
            sentiment: sentiment.sentiment,
            confidence: sentiment.score,
            aspects: sentiment.aspects,
        }
    }
}

/// 分析报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub reviews: Vec<AnalyzedReview>,
    pub total_reviews: usize,
    pub overall_sentiment_score: f64,
    pub business_name: String,
    pub summary: Option<BusinessSummary>,
    pub generated_at: DateTime<Utc>,
}
