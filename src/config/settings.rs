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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::models::site_layout::SiteLayout;
use crate::domain::services::review_collector::{CollectorConfig, StallPolicy};
use crate::engines::chromium_driver::{BrowserOptions, DESKTOP_USER_AGENT};
use crate::engines::traits::ScrollTimings;

/// 应用程序配置设置
///
/// 包含服务器、抓取器、站点布局和分类器等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取器配置
    pub scraper: ScraperSettings,
    /// 站点布局覆盖
    #[serde(default)]
    pub layout: SiteLayout,
    /// 分类器配置
    pub classifier: ClassifierSettings,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取器配置设置
#[derive(Debug, Deserialize)]
pub struct ScraperSettings {
    /// 首次加载后的等待时间（毫秒）
    pub settle_ms: u64,
    /// 每轮 PageDown 次数
    pub scroll_steps: u32,
    /// 每次 PageDown 后的暂停（毫秒）
    pub step_pause_ms: u64,
    /// 每轮结束后的渲染等待（毫秒）
    pub render_pause_ms: u64,
    /// 每轮期望的评论数，用于推导轮次预算
    pub reviews_per_pass: usize,
    /// 停滞策略
    pub stall_policy: StallPolicy,
    /// 是否无头运行
    pub headless: bool,
    /// 浏览器 User-Agent
    pub user_agent: String,
    /// 远程 DevTools 地址
    pub remote_debugging_url: Option<String>,
    /// CDP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 离线回放的页面快照，设置后不启动浏览器
    #[serde(default)]
    pub snapshot_paths: Vec<String>,
}

impl ScraperSettings {
    pub fn timings(&self) -> ScrollTimings {
        ScrollTimings {
            settle: Duration::from_millis(self.settle_ms),
            scroll_steps: self.scroll_steps,
            step_pause: Duration::from_millis(self.step_pause_ms),
            render_pause: Duration::from_millis(self.render_pause_ms),
        }
    }

    pub fn collector(&self) -> CollectorConfig {
        CollectorConfig {
            reviews_per_pass: self.reviews_per_pass,
            stall_policy: self.stall_policy,
        }
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            headless: self.headless,
            user_agent: self.user_agent.clone(),
            remote_debugging_url: self
                .remote_debugging_url
                .clone()
                .filter(|u| !u.is_empty())
                .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok()),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// 单个 LLM 提供方配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// 提供方名称，用于日志
    pub name: String,
    /// API 密钥，为空时从 `api_key_env` 指定的环境变量读取
    pub api_key: Option<String>,
    /// 存放 API 密钥的环境变量名
    pub api_key_env: Option<String>,
    /// 模型名称
    pub model: String,
    /// OpenAI 兼容的 API 基础 URL
    pub api_base_url: String,
}

impl ProviderSettings {
    /// 解析最终使用的 API 密钥
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key_env.as_ref().and_then(|v| std::env::var(v).ok()))
            .filter(|k| !k.is_empty())
    }
}

/// 分类器配置设置
#[derive(Debug, Deserialize)]
pub struct ClassifierSettings {
    /// 每批发送给提供方的评论数
    pub batch_size: usize,
    /// 生成摘要时使用的最多评论数
    pub summary_sample: usize,
    /// 是否启用本地词典回退
    pub local_fallback: bool,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 按优先级排列的 LLM 提供方
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderSettings>,
}

fn default_providers() -> Vec<ProviderSettings> {
    vec![
        ProviderSettings {
            name: "gemini".to_string(),
            api_key: None,
            api_key_env: Some("GOOGLE_API_KEY".to_string()),
            model: "gemini-2.0-flash".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
        },
        ProviderSettings {
            name: "openai".to_string(),
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            model: "gpt-4o-mini".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
        },
    ]
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("REVIEWRS").separator("__"))
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// 拒绝无法按字面含义执行的取值
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.scraper.stall_policy == StallPolicy::StopAfter(0) {
            return Err(ConfigError::Message(
                "scraper.stall_policy.stop_after must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    /// 仅包含默认值的配置构建器
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Default server settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8001)?
            // Default scraper settings
            .set_default("scraper.settle_ms", 5000)?
            .set_default("scraper.scroll_steps", 3)?
            .set_default("scraper.step_pause_ms", 300)?
            .set_default("scraper.render_pause_ms", 1000)?
            .set_default("scraper.reviews_per_pass", 10)?
            .set_default("scraper.stall_policy", "keep_scrolling")?
            .set_default("scraper.headless", true)?
            .set_default("scraper.user_agent", DESKTOP_USER_AGENT)?
            .set_default("scraper.request_timeout_secs", 30)?
            // Default classifier settings
            .set_default("classifier.batch_size", 20)?
            .set_default("classifier.summary_sample", 50)?
            .set_default("classifier.local_fallback", true)?
            .set_default("classifier.request_timeout_secs", 60)
    }
}
