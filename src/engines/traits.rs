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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 无法启动或连接浏览器
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// DOM 查询失败
    #[error("DOM query failed: {0}")]
    Query(String),
    /// 无效的选择器
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 评论卡片快照
///
/// 当前页面加载中单个评论卡片的不透明句柄：外层 HTML 与渲染后的可见文本。
/// 只在当前页面加载期间有效，由字段抽取器立即消费。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewContainer {
    /// 卡片的 outerHTML
    pub html: String,
    /// 卡片的 innerText，按行分隔
    pub visible_text: String,
}

impl ReviewContainer {
    pub fn new(html: impl Into<String>, visible_text: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            visible_text: visible_text.into(),
        }
    }
}

/// 滚动节奏
///
/// 所有等待都是固定时长的盲等，测试中可以设置为接近零。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTimings {
    /// 首次加载后等待客户端渲染的时间
    pub settle: Duration,
    /// 每轮发送的 PageDown 次数
    pub scroll_steps: u32,
    /// 每次 PageDown 之后的短暂停
    pub step_pause: Duration,
    /// 每轮结束后等待懒加载内容的时间
    pub render_pause: Duration,
}

impl Default for ScrollTimings {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(5),
            scroll_steps: 3,
            step_pause: Duration::from_millis(300),
            render_pause: Duration::from_millis(1000),
        }
    }
}

impl ScrollTimings {
    /// 全部等待为零，用于测试和离线回放
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            scroll_steps: 3,
            step_pause: Duration::ZERO,
            render_pause: Duration::ZERO,
        }
    }
}

/// 滚动驱动特质
///
/// 拥有一个浏览器会话：加载页面、逐轮滚动，并在每轮后返回当前可见的全部评论卡片。
/// 新旧判断由收集循环通过去重器完成。
#[async_trait]
pub trait ScrollDriver: Send + Sync {
    /// 导航到目标页面并等待首次渲染
    async fn open(&mut self, url: &str) -> Result<(), EngineError>;

    /// 返回第一个匹配元素的文本，不存在时为 `None`
    async fn text_of(&self, selector: &str) -> Result<Option<String>, EngineError>;

    /// 执行一轮滚动并返回当前全部评论卡片
    async fn scroll_pass(&mut self) -> Result<Vec<ReviewContainer>, EngineError>;

    /// 结束会话并释放浏览器进程
    async fn close(&mut self);

    /// 驱动名称
    fn name(&self) -> &'static str;
}

/// 驱动工厂
///
/// 每次抓取调用都获得独立的会话，会话之间不共享。
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn ScrollDriver>, EngineError>;
}
