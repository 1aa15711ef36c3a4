// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::engines::traits::EngineError;

/// 抓取错误类型
///
/// 只有无法获得浏览器会话和无效的布局配置会让一次抓取失败，
/// 其余错误都在产生处降级处理。
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("无法启动浏览器会话: {0}")]
    Launch(#[source] EngineError),

    #[error("无效的选择器 {field}: {selector}")]
    InvalidSelector { field: &'static str, selector: String },
}

/// 评论卡片被拒绝的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("评论正文为空")]
    EmptyText,

    #[error("评论正文过短: {0} 个字符")]
    TooShort(usize),

    #[error("重复的评论正文")]
    Duplicate,
}

/// 分类提供方错误类型
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("提供方未配置: {0}")]
    NotConfigured(&'static str),

    #[error("请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("提供方返回错误: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("无法解析提供方响应: {0}")]
    InvalidResponse(String),

    #[error("结果数量不匹配: 期望 {expected}, 实际 {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("提供方不支持: {0}")]
    Unsupported(&'static str),
}
