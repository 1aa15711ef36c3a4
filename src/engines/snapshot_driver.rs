// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::models::site_layout::SiteLayout;
use crate::engines::traits::{
    DriverFactory, EngineError, ReviewContainer, ScrollDriver, ScrollTimings,
};
use crate::utils::html_text::{element_text, visible_lines};

/// 快照驱动工厂
///
/// 回放事先保存的页面 HTML：第 n 轮滚动返回第 n 个快照，之后重复最后一个。
/// 用于离线运行和测试，选择器规则与 Chromium 驱动一致。
#[derive(Clone)]
pub struct SnapshotDriverFactory {
    snapshots: Arc<Vec<String>>,
    timings: ScrollTimings,
    container: Selector,
    fallback_container: Selector,
}

impl SnapshotDriverFactory {
    pub fn new(
        snapshots: Vec<String>,
        timings: ScrollTimings,
        layout: &SiteLayout,
    ) -> Result<Self, EngineError> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|_| EngineError::InvalidSelector(css.to_string()))
        };
        Ok(Self {
            snapshots: Arc::new(snapshots),
            timings,
            container: parse(&layout.container)?,
            fallback_container: parse(&layout.fallback_container)?,
        })
    }

    /// 从文件读取快照，按给定顺序回放
    pub fn from_paths<P: AsRef<Path>>(
        paths: &[P],
        timings: ScrollTimings,
        layout: &SiteLayout,
    ) -> Result<Self, EngineError> {
        let snapshots = paths
            .iter()
            .map(|p| {
                std::fs::read_to_string(p.as_ref()).map_err(|e| {
                    EngineError::Launch(format!("{}: {}", p.as_ref().display(), e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!("Loaded {} page snapshots", snapshots.len());
        Self::new(snapshots, timings, layout)
    }
}

#[async_trait]
impl DriverFactory for SnapshotDriverFactory {
    async fn launch(&self) -> Result<Box<dyn ScrollDriver>, EngineError> {
        if self.snapshots.is_empty() {
            return Err(EngineError::Launch("no snapshots to replay".to_string()));
        }
        Ok(Box::new(SnapshotDriver {
            factory: self.clone(),
            opened: false,
            passes: 0,
        }))
    }
}

/// 快照滚动驱动
pub struct SnapshotDriver {
    factory: SnapshotDriverFactory,
    opened: bool,
    passes: usize,
}

impl SnapshotDriver {
    fn current(&self) -> &str {
        let snapshots = &self.factory.snapshots;
        let index = self.passes.saturating_sub(1).min(snapshots.len() - 1);
        &snapshots[index]
    }

    fn select_containers(&self, html: &str) -> Vec<ReviewContainer> {
        let document = Html::parse_document(html);
        let snapshot = |selector: &Selector| {
            document
                .select(selector)
                .map(|element| ReviewContainer {
                    html: element.html(),
                    visible_text: visible_lines(&element),
                })
                .collect::<Vec<_>>()
        };

        let containers = snapshot(&self.factory.container);
        if containers.is_empty() {
            debug!("No primary containers, using fallback selector");
            snapshot(&self.factory.fallback_container)
        } else {
            containers
        }
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.opened {
            Ok(())
        } else {
            Err(EngineError::Other("page not opened".to_string()))
        }
    }
}

#[async_trait]
impl ScrollDriver for SnapshotDriver {
    async fn open(&mut self, url: &str) -> Result<(), EngineError> {
        debug!("Replaying snapshots for {}", url);
        tokio::time::sleep(self.factory.timings.settle).await;
        self.opened = true;
        Ok(())
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>, EngineError> {
        self.ensure_open()?;
        let selector = Selector::parse(selector)
            .map_err(|_| EngineError::InvalidSelector(selector.to_string()))?;
        let document = Html::parse_document(self.current());
        let text = document.select(&selector).next().map(|e| element_text(&e));
        Ok(text)
    }

    async fn scroll_pass(&mut self) -> Result<Vec<ReviewContainer>, EngineError> {
        self.ensure_open()?;
        let timings = self.factory.timings;
        for _ in 0..timings.scroll_steps {
            tokio::time::sleep(timings.step_pause).await;
        }
        tokio::time::sleep(timings.render_pause).await;

        self.passes += 1;
        Ok(self.select_containers(self.current()))
    }

    async fn close(&mut self) {
        self.opened = false;
    }

    fn name(&self) -> &'static str {
        "snapshot"
    }
}
