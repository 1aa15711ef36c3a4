// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::domain::models::analysis::{AnalysisReport, AnalyzedReview};
use crate::domain::models::review::ScrapeResult;
use crate::domain::services::classifier::ClassifierChain;

/// 分析服务
///
/// 把抓取结果交给分类器链，按批次分类并生成店铺级摘要与整体得分。
pub struct AnalysisService {
    chain: Arc<ClassifierChain>,
    batch_size: usize,
    summary_sample: usize,
}

impl AnalysisService {
    pub fn new(chain: Arc<ClassifierChain>, batch_size: usize, summary_sample: usize) -> Self {
        Self {
            chain,
            batch_size: batch_size.max(1),
            summary_sample,
        }
    }

    /// 分析抓取结果
    pub async fn analyze(&self, result: ScrapeResult) -> AnalysisReport {
        let texts = result.texts();

        let mut sentiments = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            sentiments.extend(self.chain.classify_batch(batch).await);
        }

        let summary = if texts.is_empty() {
            None
        } else {
            info!("Generating executive summary");
            let sample = &texts[..texts.len().min(self.summary_sample)];
            self.chain.summarize(sample).await
        };

        let reviews: Vec<AnalyzedReview> = result
            .reviews
            .into_iter()
            .zip(sentiments)
            .map(|(review, sentiment)| AnalyzedReview::new(review, sentiment))
            .collect();

        let overall_sentiment_score = overall_score(&reviews);
        info!("Finalizing {} reviews", reviews.len());

        AnalysisReport {
            total_reviews: reviews.len(),
            reviews,
            overall_sentiment_score,
            business_name: result.business_name,
            summary,
            generated_at: Utc::now(),
        }
    }
}

/// 整体情感得分：正面 1.0、中性 0.5、负面 0.0 的平均值，没有评论时为 0
pub fn overall_score(reviews: &[AnalyzedReview]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    reviews.iter().map(|r| r.sentiment.weight()).sum::<f64>() / reviews.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::analysis::SentimentLabel;
    use crate::domain::models::review::RawReview;
    use crate::domain::services::classifier::SentimentProvider;
    use crate::domain::services::lexicon_classifier::LexiconClassifier;

    fn result(texts: &[&str]) -> ScrapeResult {
        ScrapeResult {
            reviews: texts
                .iter()
                .map(|t| RawReview {
                    author: "Müşteri".to_string(),
                    text: t.to_string(),
                    rating: 4,
                    date: String::new(),
                })
                .collect(),
            business_name: "Termos".to_string(),
        }
    }

    fn service() -> AnalysisService {
        let providers: Vec<Arc<dyn SentimentProvider>> = vec![Arc::new(LexiconClassifier::new())];
        AnalysisService::new(Arc::new(ClassifierChain::new(providers)), 2, 50)
    }

    #[tokio::test]
    async fn test_report_keeps_order_across_batches() {
        let report = service()
            .analyze(result(&["Harika ürün", "Berbat ürün", "Dün aldım"]))
            .await;

        assert_eq!(report.total_reviews, 3);
        assert_eq!(report.business_name, "Termos");
        let labels: Vec<_> = report.reviews.iter().map(|r| r.sentiment).collect();
        assert_eq!(
            labels,
            vec![
                SentimentLabel::Positive,
                SentimentLabel::Negative,
                SentimentLabel::Neutral
            ]
        );
        assert!((report.overall_sentiment_score - 0.5).abs() < f64::EPSILON);
        assert!(report.summary.is_some());
    }

    #[tokio::test]
    async fn test_empty_result() {
        let report = service().analyze(result(&[])).await;

        assert_eq!(report.total_reviews, 0);
        assert_eq!(report.overall_sentiment_score, 0.0);
        assert!(report.summary.is_none());
    }
}
