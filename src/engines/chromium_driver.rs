// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::models::site_layout::SiteLayout;
use crate::engines::traits::{
    DriverFactory, EngineError, ReviewContainer, ScrollDriver, ScrollTimings,
};

/// 桌面浏览器 User-Agent
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// Injected before any page script runs.
const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined, configurable: true });
Object.defineProperty(navigator, 'languages', { get: () => ['tr-TR', 'tr', 'en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
window.chrome = window.chrome || { runtime: {} };
"#;

const SCROLL_FALLBACK_SCRIPT: &str = "window.scrollBy(0, window.innerHeight);";

/// 浏览器启动选项
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// 是否无头运行
    pub headless: bool,
    pub user_agent: String,
    /// 远程 DevTools 地址，设置后连接已有浏览器而不是启动新进程
    pub remote_debugging_url: Option<String>,
    /// 单个 CDP 请求及页面导航的超时
    pub request_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            remote_debugging_url: std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Chromium 驱动工厂
///
/// 每次 `launch` 都会启动（或连接）一个独立的浏览器会话。
pub struct ChromiumDriverFactory {
    options: BrowserOptions,
    timings: ScrollTimings,
    container: String,
    fallback_container: String,
}

impl ChromiumDriverFactory {
    pub fn new(options: BrowserOptions, timings: ScrollTimings, layout: &SiteLayout) -> Self {
        Self {
            options,
            timings,
            container: layout.container.clone(),
            fallback_container: layout.fallback_container.clone(),
        }
    }

    /// 为一次本地启动创建独立的浏览器配置目录，随 `TempDir` 析构删除
    fn new_profile() -> Result<TempDir, EngineError> {
        tempfile::Builder::new()
            .prefix("reviewrs-chromium-")
            .tempdir()
            .map_err(|e| EngineError::Launch(format!("Failed to create profile dir: {}", e)))
    }

    async fn start_browser(&self) -> Result<BrowserSession, EngineError> {
        let (browser, mut handler, profile) =
            if let Some(ref url) = self.options.remote_debugging_url {
                info!("Connecting to remote Chrome instance at: {}", url);
                let (browser, handler) = Browser::connect(url.as_str()).await.map_err(|e| {
                    EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e))
                })?;
                (browser, handler, None)
            } else {
                let profile = Self::new_profile()?;
                let mut builder = BrowserConfig::builder()
                    .no_sandbox()
                    .user_data_dir(profile.path())
                    .request_timeout(self.options.request_timeout)
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    .arg("--disable-blink-features=AutomationControlled")
                    .arg(format!("--user-agent={}", self.options.user_agent));
                if !self.options.headless {
                    builder = builder.with_head();
                }
                let config = builder.build().map_err(EngineError::Launch)?;
                let (browser, handler) = Browser::launch(config)
                    .await
                    .map_err(|e| EngineError::Launch(e.to_string()))?;
                debug!("Launched Chromium with profile {}", profile.path().display());
                (browser, handler, Some(profile))
            };

        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(BrowserSession {
            browser,
            handler_task,
            profile,
        })
    }

    async fn prepare_page(&self, browser: &Browser) -> Result<Page, EngineError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Launch(e.to_string()))?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
            .await
            .map_err(|e| EngineError::Launch(format!("Failed to inject stealth script: {}", e)))?;

        if let Err(e) = page.set_user_agent(self.options.user_agent.as_str()).await {
            warn!("Failed to override user agent: {}", e);
        }
        Ok(page)
    }
}

#[async_trait]
impl DriverFactory for ChromiumDriverFactory {
    async fn launch(&self) -> Result<Box<dyn ScrollDriver>, EngineError> {
        let BrowserSession {
            mut browser,
            handler_task,
            profile,
        } = self.start_browser().await?;
        let owned = profile.is_some();

        let page = match self.prepare_page(&browser).await {
            Ok(page) => page,
            Err(e) => {
                if owned {
                    let _ = browser.close().await;
                    let _ = browser.wait().await;
                }
                handler_task.abort();
                return Err(e);
            }
        };

        Ok(Box::new(ChromiumDriver {
            browser,
            page,
            handler_task,
            profile,
            closed: false,
            timings: self.timings,
            request_timeout: self.options.request_timeout,
            container: self.container.clone(),
            fallback_container: self.fallback_container.clone(),
        }))
    }
}

/// 已启动或已连接的浏览器
struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// 本地启动时的独立配置目录，连接远程浏览器时为 `None`
    profile: Option<TempDir>,
}

/// Chromium 滚动驱动
///
/// 基于 chromiumoxide 的浏览器会话，通过 PageDown 按键驱动无限滚动。
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    /// 本会话启动的浏览器进程的配置目录，远程会话为 `None`
    profile: Option<TempDir>,
    closed: bool,
    timings: ScrollTimings,
    request_timeout: Duration,
    container: String,
    fallback_container: String,
}

impl ChromiumDriver {
    async fn snapshot(element: &Element) -> Option<ReviewContainer> {
        match element.outer_html().await {
            Ok(Some(html)) => {
                let visible_text = element.inner_text().await.ok().flatten().unwrap_or_default();
                Some(ReviewContainer { html, visible_text })
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Container detached before snapshot: {}", e);
                None
            }
        }
    }

    async fn scroll_step(&self, body: Option<&Element>) -> Result<(), EngineError> {
        if let Some(body) = body {
            match body.press_key("PageDown").await {
                Ok(_) => return Ok(()),
                Err(e) => debug!("PageDown failed, scrolling by script: {}", e),
            }
        }
        self.page
            .evaluate(SCROLL_FALLBACK_SCRIPT)
            .await
            .map(|_| ())
            .map_err(|e| EngineError::Query(format!("Scroll failed: {}", e)))
    }
}

#[async_trait]
impl ScrollDriver for ChromiumDriver {
    async fn open(&mut self, url: &str) -> Result<(), EngineError> {
        tokio::time::timeout(self.request_timeout, self.page.goto(url))
            .await
            .map_err(|_| EngineError::Timeout)?
            .map_err(|e| EngineError::Navigation(e.to_string()))?;

        // Blind wait for client-side rendering.
        tokio::time::sleep(self.timings.settle).await;
        Ok(())
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>, EngineError> {
        match self.page.find_element(selector).await {
            Ok(element) => element
                .inner_text()
                .await
                .map_err(|e| EngineError::Query(e.to_string())),
            Err(e) => {
                debug!("No element for {}: {}", selector, e);
                Ok(None)
            }
        }
    }

    async fn scroll_pass(&mut self) -> Result<Vec<ReviewContainer>, EngineError> {
        let body = self.page.find_element("body").await.ok();
        for _ in 0..self.timings.scroll_steps {
            self.scroll_step(body.as_ref()).await?;
            tokio::time::sleep(self.timings.step_pause).await;
        }
        tokio::time::sleep(self.timings.render_pause).await;

        let mut elements = match self.page.find_elements(self.container.as_str()).await {
            Ok(elements) => elements,
            Err(e) => {
                warn!("Primary container query failed: {}", e);
                Vec::new()
            }
        };
        if elements.is_empty() {
            debug!("No {} containers, trying {}", self.container, self.fallback_container);
            elements = self
                .page
                .find_elements(self.fallback_container.as_str())
                .await
                .map_err(|e| EngineError::Query(e.to_string()))?;
        }

        let mut containers = Vec::with_capacity(elements.len());
        for element in &elements {
            if let Some(container) = Self::snapshot(element).await {
                containers.push(container);
            }
        }
        Ok(containers)
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(profile) = self.profile.take() {
            if let Err(e) = self.browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                warn!("Failed to reap browser process: {}", e);
            }
            if let Err(e) = profile.close() {
                warn!("Failed to remove browser profile: {}", e);
            }
        } else if let Err(e) = self.page.clone().close().await {
            warn!("Failed to close remote page: {}", e);
        }
        self.handler_task.abort();
        debug!("Browser session closed");
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        // A locally launched Browser kills its child process on drop.
        if !self.closed {
            self.handler_task.abort();
        }
    }
}
