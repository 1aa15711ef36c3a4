// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;

use crate::domain::models::review::RawReview;
use crate::utils::errors::Rejection;

/// 评论去重器
///
/// 持有本次抓取中已接受的评论正文集合，按正文精确匹配拒绝重复。
/// 作用域为一次抓取调用。
#[derive(Debug, Default)]
pub struct ReviewDeduplicator {
    seen_texts: HashSet<String>,
}

impl ReviewDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 正文是否已被接受
    pub fn is_duplicate(&self, text: &str) -> bool {
        self.seen_texts.contains(text)
    }

    /// 接受一条评论，正文已出现过时拒绝
    pub fn admit(&mut self, review: RawReview) -> Result<RawReview, Rejection> {
        if self.seen_texts.insert(review.text.clone()) {
            Ok(review)
        } else {
            Err(Rejection::Duplicate)
        }
    }

    /// 已接受的正文数量
    pub fn len(&self) -> usize {
        self.seen_texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen_texts.is_empty()
    }
}
