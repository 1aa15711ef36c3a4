// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::models::review::RawReview;
use crate::domain::services::deduplicator::ReviewDeduplicator;
use crate::domain::services::field_extractor::FieldExtractor;
use crate::engines::traits::{ReviewContainer, ScrollDriver};

/// 停滞策略
///
/// 一轮没有新增评论即为停滞。默认继续滚动直到轮次预算耗尽，
/// 以容忍偶发的渲染抖动。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StallPolicy {
    #[default]
    KeepScrolling,
    /// 连续停滞达到 n 轮后提前结束
    ///
    /// 配置加载时拒绝 0；直接构造的 `StopAfter(0)` 与 `StopAfter(1)` 等价。
    StopAfter(u32),
}

/// 收集循环配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorConfig {
    /// 每轮期望的评论数，用于推导轮次预算
    pub reviews_per_pass: usize,
    pub stall_policy: StallPolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            reviews_per_pass: 10,
            stall_policy: StallPolicy::KeepScrolling,
        }
    }
}

impl CollectorConfig {
    /// 轮次预算，至少为 1
    pub fn pass_budget(&self, max_reviews: usize) -> u32 {
        (max_reviews / self.reviews_per_pass.max(1)).max(1) as u32
    }
}

/// 收集循环状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    Init,
    PassRunning,
    Continue,
    TargetReached,
    Stalled,
    Done(CollectionOutcome),
}

/// 收集循环的结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOutcome {
    /// 达到请求的评论数
    TargetReached,
    /// 轮次预算耗尽
    BudgetExhausted,
    /// 停滞策略要求提前结束
    Stalled,
    /// 驱动在某一轮中出错，返回已收集的部分结果
    DriverFailed,
}

/// 收集报告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionReport {
    pub passes: u32,
    pub stalled_passes: u32,
    pub outcome: CollectionOutcome,
}

/// 收集循环
///
/// 编排滚动驱动、字段抽取器与去重器，按容器出现顺序追加评论，
/// 直到达到目标数量或轮次预算耗尽。
pub struct ReviewCollector<'a> {
    extractor: &'a FieldExtractor,
    config: CollectorConfig,
    max_reviews: usize,
    dedup: ReviewDeduplicator,
    reviews: Vec<RawReview>,
}

impl<'a> ReviewCollector<'a> {
    pub fn new(extractor: &'a FieldExtractor, max_reviews: usize, config: CollectorConfig) -> Self {
        Self {
            extractor,
            config,
            max_reviews,
            dedup: ReviewDeduplicator::new(),
            reviews: Vec::new(),
        }
    }

    fn target_reached(&self) -> bool {
        self.reviews.len() >= self.max_reviews
    }

    /// 处理一轮返回的全部卡片，返回本轮新接受的评论数
    ///
    /// 达到目标数量后不再接受新的评论。
    pub fn process_pass(&mut self, containers: &[ReviewContainer]) -> usize {
        let mut accepted = 0;
        for (index, container) in containers.iter().enumerate() {
            if self.target_reached() {
                break;
            }
            let admitted = self
                .extractor
                .extract(container)
                .and_then(|review| self.dedup.admit(review));
            match admitted {
                Ok(review) => {
                    self.reviews.push(review);
                    accepted += 1;
                }
                Err(reason) => debug!("Skipping container {}: {}", index, reason),
            }
        }
        accepted
    }

    /// 运行完整的收集循环
    pub async fn collect(mut self, driver: &mut dyn ScrollDriver) -> (Vec<RawReview>, CollectionReport) {
        let budget = self.config.pass_budget(self.max_reviews);
        let mut passes = 0u32;
        let mut stalled_passes = 0u32;
        let mut consecutive_stalls = 0u32;
        let mut state = CollectionState::Init;

        loop {
            state = match state {
                CollectionState::Init => {
                    if self.target_reached() {
                        CollectionState::TargetReached
                    } else {
                        CollectionState::PassRunning
                    }
                }
                CollectionState::PassRunning => {
                    passes += 1;
                    info!("--- Pass {}/{} ---", passes, budget);
                    match driver.scroll_pass().await {
                        Ok(containers) => {
                            info!("Found {} review containers", containers.len());
                            let accepted = self.process_pass(&containers);
                            info!(
                                "Added {} new reviews. Total: {}",
                                accepted,
                                self.reviews.len()
                            );
                            if self.target_reached() {
                                CollectionState::TargetReached
                            } else if accepted == 0 {
                                CollectionState::Stalled
                            } else {
                                consecutive_stalls = 0;
                                CollectionState::Continue
                            }
                        }
                        Err(e) => {
                            warn!("Pass {} failed on {}: {}", passes, driver.name(), e);
                            CollectionState::Done(CollectionOutcome::DriverFailed)
                        }
                    }
                }
                CollectionState::Stalled => {
                    stalled_passes += 1;
                    consecutive_stalls += 1;
                    match self.config.stall_policy {
                        StallPolicy::StopAfter(limit) if consecutive_stalls >= limit => {
                            info!("No new reviews for {} passes, stopping", consecutive_stalls);
                            CollectionState::Done(CollectionOutcome::Stalled)
                        }
                        _ if passes >= budget => {
                            CollectionState::Done(CollectionOutcome::BudgetExhausted)
                        }
                        _ => CollectionState::PassRunning,
                    }
                }
                CollectionState::Continue => {
                    if passes >= budget {
                        CollectionState::Done(CollectionOutcome::BudgetExhausted)
                    } else {
                        CollectionState::PassRunning
                    }
                }
                CollectionState::TargetReached => {
                    CollectionState::Done(CollectionOutcome::TargetReached)
                }
                CollectionState::Done(outcome) => {
                    let report = CollectionReport {
                        passes,
                        stalled_passes,
                        outcome,
                    };
                    info!(
                        "Collection finished after {} passes with {} reviews ({:?})",
                        passes,
                        self.reviews.len(),
                        outcome
                    );
                    return (self.reviews, report);
                }
            };
        }
    }
}
