// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use validator::Validate;

use crate::{
    application::dto::analyze_request::AnalyzeRequestDto,
    domain::{
        models::analysis::AnalysisReport,
        services::{analysis_service::AnalysisService, review_scraper::ReviewScraper},
    },
    utils::errors::ScrapeError,
};

#[derive(Error, Debug)]
pub enum AnalyzeUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
}

/// 商品评论分析用例
///
/// 抓取评论后交给分析服务，生成完整的分析报告。
pub struct AnalyzeProductUseCase {
    scraper: Arc<ReviewScraper>,
    analysis: Arc<AnalysisService>,
}

impl AnalyzeProductUseCase {
    pub fn new(scraper: Arc<ReviewScraper>, analysis: Arc<AnalysisService>) -> Self {
        Self { scraper, analysis }
    }

    pub async fn execute(
        &self,
        request: AnalyzeRequestDto,
    ) -> Result<AnalysisReport, AnalyzeUseCaseError> {
        request
            .validate()
            .map_err(|e| AnalyzeUseCaseError::ValidationError(e.to_string()))?;

        info!("Analyzing {} (limit {})", request.url, request.limit);
        let result = self
            .scraper
            .scrape(&request.url, request.limit as usize)
            .await?;

        Ok(self.analysis.analyze(result).await)
    }
}
