// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};

use crate::domain::models::review::RawReview;
use crate::domain::models::site_layout::SiteLayout;
use crate::engines::traits::ReviewContainer;
use crate::utils::errors::{Rejection, ScrapeError};
use crate::utils::html_text::{element_text, visible_lines};

/// 评论正文的最少字符数
pub const MIN_TEXT_CHARS: usize = 3;

/// 默认评分，没有任何星标匹配时使用
pub const DEFAULT_RATING: u8 = 5;

const MAX_RATING: usize = 5;

/// 正文抽取策略
#[derive(Debug, Clone)]
pub enum TextStrategy {
    /// 第一个匹配元素的文本
    Select(Selector),
    /// 卡片可见文本中最长的一行
    LongestLine,
}

impl TextStrategy {
    fn attempt(&self, card: &Card<'_>) -> Option<String> {
        match self {
            TextStrategy::Select(selector) => card.first_text(selector),
            TextStrategy::LongestLine => longest_line(card.visible_text()),
        }
    }
}

/// 单个卡片的解析视图
struct Card<'a> {
    root: ElementRef<'a>,
    container: &'a ReviewContainer,
}

impl<'a> Card<'a> {
    fn first_text(&self, selector: &Selector) -> Option<String> {
        self.root
            .select(selector)
            .map(|element| element_text(&element))
            .find(|text| !text.is_empty())
    }

    fn count(&self, selector: &Selector) -> usize {
        self.root.select(selector).count()
    }

    fn visible_text(&self) -> String {
        if self.container.visible_text.trim().is_empty() {
            visible_lines(&self.root)
        } else {
            self.container.visible_text.clone()
        }
    }
}

/// 依次执行策略，第一个成功的结果胜出
pub fn first_success<S, T>(strategies: &[S], attempt: impl FnMut(&S) -> Option<T>) -> Option<T> {
    strategies.iter().find_map(attempt)
}

/// 最长行启发式：非结构化卡片中，评论正文通常是最长的连续一行
///
/// 长度相同时取最先出现的一行。
pub fn longest_line(text: String) -> Option<String> {
    let mut best: Option<&str> = None;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if best.map_or(true, |b| line.chars().count() > b.chars().count()) {
            best = Some(line);
        }
    }
    best.map(str::to_string)
}

/// 字段抽取器
///
/// 对每个字段维护一张有序策略表。正文是唯一的硬性拒绝条件，
/// 其余字段失败时回退到默认值。
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    text: Vec<TextStrategy>,
    rating: Vec<Selector>,
    author: Selector,
    date: Selector,
    default_author: String,
}

fn compile(field: &'static str, css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector {
        field,
        selector: css.to_string(),
    })
}

impl FieldExtractor {
    /// 根据站点布局编译全部选择器
    pub fn new(layout: &SiteLayout) -> Result<Self, ScrapeError> {
        Ok(Self {
            text: vec![
                TextStrategy::Select(compile("text", &layout.text)?),
                TextStrategy::Select(compile("comment_text", &layout.comment_text)?),
                TextStrategy::Select(compile("paragraph", &layout.paragraph)?),
                TextStrategy::LongestLine,
            ],
            rating: vec![
                compile("full_star", &layout.full_star)?,
                compile("legacy_star", &layout.legacy_star)?,
            ],
            author: compile("author", &layout.author)?,
            date: compile("date", &layout.date)?,
            default_author: layout.default_author.clone(),
        })
    }

    /// 从一个评论卡片抽取尽力而为的评论
    ///
    /// # 返回值
    ///
    /// * `Ok(RawReview)` - 正文有效的评论，其余字段可能是默认值
    /// * `Err(Rejection)` - 正文为空或过短，整张卡片被跳过
    pub fn extract(&self, container: &ReviewContainer) -> Result<RawReview, Rejection> {
        let fragment = Html::parse_fragment(&container.html);
        let card = Card {
            root: fragment.root_element(),
            container,
        };

        let text = first_success(&self.text, |strategy| strategy.attempt(&card))
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        let length = text.chars().count();
        if length == 0 {
            return Err(Rejection::EmptyText);
        }
        if length < MIN_TEXT_CHARS {
            return Err(Rejection::TooShort(length));
        }

        // Zero matches never mean zero stars.
        let rating = first_success(&self.rating, |selector| match card.count(selector) {
            0 => None,
            n => Some(n.min(MAX_RATING) as u8),
        })
        .unwrap_or(DEFAULT_RATING);

        let author = card
            .first_text(&self.author)
            .unwrap_or_else(|| self.default_author.clone());
        let date = card.first_text(&self.date).unwrap_or_default();

        Ok(RawReview {
            author,
            text,
            rating,
            date,
        })
    }
}
