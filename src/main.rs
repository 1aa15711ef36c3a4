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

use axum::Extension;
use reviewrs::application::use_cases::analyze_product::AnalyzeProductUseCase;
use reviewrs::config::settings::{ClassifierSettings, Settings};
use reviewrs::domain::services::analysis_service::AnalysisService;
use reviewrs::domain::services::classifier::{ClassifierChain, SentimentProvider};
use reviewrs::domain::services::lexicon_classifier::LexiconClassifier;
use reviewrs::domain::services::llm_classifier::LlmClassifier;
use reviewrs::domain::services::review_scraper::ReviewScraper;
use reviewrs::engines::chromium_driver::ChromiumDriverFactory;
use reviewrs::engines::snapshot_driver::SnapshotDriverFactory;
use reviewrs::engines::traits::DriverFactory;
use reviewrs::presentation::routes;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use reviewrs::utils::telemetry;

/// 按配置构建分类器链：LLM 提供方在前，本地词典回退在后
fn build_classifier_chain(settings: &ClassifierSettings) -> ClassifierChain {
    let timeout = Duration::from_secs(settings.request_timeout_secs);
    let mut providers: Vec<Arc<dyn SentimentProvider>> = settings
        .providers
        .iter()
        .map(|p| {
            Arc::new(LlmClassifier::new(
                p.name.clone(),
                p.resolve_api_key(),
                p.model.clone(),
                p.api_base_url.clone(),
                timeout,
            )) as Arc<dyn SentimentProvider>
        })
        .collect();
    if settings.local_fallback {
        providers.push(Arc::new(LexiconClassifier::new()));
    }
    ClassifierChain::new(providers)
}

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting reviewrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Initialize driver factory
    let timings = settings.scraper.timings();
    let factory: Arc<dyn DriverFactory> = if settings.scraper.snapshot_paths.is_empty() {
        Arc::new(ChromiumDriverFactory::new(
            settings.scraper.browser_options(),
            timings,
            &settings.layout,
        ))
    } else {
        warn!("Snapshot paths configured, replaying saved pages instead of launching Chromium");
        Arc::new(SnapshotDriverFactory::from_paths(
            settings.scraper.snapshot_paths.as_slice(),
            timings,
            &settings.layout,
        )?)
    };

    let scraper = Arc::new(ReviewScraper::new(
        factory,
        settings.layout.clone(),
        settings.scraper.collector(),
    )?);

    // 4. Initialize classifiers
    let chain = Arc::new(build_classifier_chain(&settings.classifier));
    let available = chain.available();
    info!("Classifier chain: {}", available.join(" -> "));
    let analysis = Arc::new(AnalysisService::new(
        chain.clone(),
        settings.classifier.batch_size,
        settings.classifier.summary_sample,
    ));

    let use_case = Arc::new(AnalyzeProductUseCase::new(scraper, analysis));

    // 5. Start HTTP server
    let app = routes::routes().layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(use_case)),
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
