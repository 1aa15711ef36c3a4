// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::models::analysis::{BusinessSummary, ReviewSentiment};
use crate::utils::errors::ClassifierError;

/// 情感分类提供方特质
///
/// 接收有序的评论正文，逐条返回情感标签、置信度和可选的方面标签。
/// 提供方可能不可用，调用方必须容忍。
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// 提供方名称
    fn name(&self) -> &str;

    /// 当前是否可用（例如是否配置了 API 密钥）
    fn is_available(&self) -> bool {
        true
    }

    /// 批量分类，结果与输入一一对应
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<ReviewSentiment>, ClassifierError>;

    /// 生成店铺级摘要
    async fn summarize(&self, texts: &[String]) -> Result<BusinessSummary, ClassifierError>;
}

/// 中性默认提供方
///
/// 链条的最后一环，总是成功，所有评论标记为中性。
pub struct NeutralClassifier;

#[async_trait]
impl SentimentProvider for NeutralClassifier {
    fn name(&self) -> &str {
        "neutral"
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<ReviewSentiment>, ClassifierError> {
        Ok(texts.iter().map(|_| ReviewSentiment::neutral()).collect())
    }

    async fn summarize(&self, _texts: &[String]) -> Result<BusinessSummary, ClassifierError> {
        Err(ClassifierError::Unsupported("summary"))
    }
}

/// 分类器链
///
/// 按顺序尝试提供方，第一个可用且返回有效结果的胜出。
/// 链条末尾总是中性默认提供方，因此分类永远不会失败。
pub struct ClassifierChain {
    providers: Vec<Arc<dyn SentimentProvider>>,
}

impl ClassifierChain {
    pub fn new(mut providers: Vec<Arc<dyn SentimentProvider>>) -> Self {
        providers.push(Arc::new(NeutralClassifier));
        Self { providers }
    }

    /// 当前可用的提供方名称，按尝试顺序
    pub fn available(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.name())
            .collect()
    }

    /// 批量分类，结果数量总是与输入一致
    pub async fn classify_batch(&self, texts: &[String]) -> Vec<ReviewSentiment> {
        if texts.is_empty() {
            return Vec::new();
        }
        for provider in self.providers.iter().filter(|p| p.is_available()) {
            match provider.classify_batch(texts).await {
                Ok(results) if results.len() == texts.len() => {
                    debug!("{} classified {} reviews", provider.name(), texts.len());
                    return results;
                }
                Ok(results) => warn!(
                    "{} error: {}",
                    provider.name(),
                    ClassifierError::CountMismatch {
                        expected: texts.len(),
                        actual: results.len(),
                    }
                ),
                Err(e) => warn!("{} error: {}", provider.name(), e),
            }
        }
        texts.iter().map(|_| ReviewSentiment::neutral()).collect()
    }

    /// 生成摘要，没有提供方能生成时返回 `None`
    pub async fn summarize(&self, texts: &[String]) -> Option<BusinessSummary> {
        if texts.is_empty() {
            return None;
        }
        for provider in self.providers.iter().filter(|p| p.is_available()) {
            match provider.summarize(texts).await {
                Ok(summary) => return Some(summary.capped()),
                Err(ClassifierError::Unsupported(_)) => {}
                Err(e) => warn!("{} summary error: {}", provider.name(), e),
            }
        }
        None
    }
}
