// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::ElementRef;

/// 元素的文本内容，内部空白折叠为单个空格
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 渲染时独占一行的块级元素
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template", "noscript", "head"];

#[derive(Default)]
struct Lines {
    lines: Vec<String>,
    current: Vec<String>,
}

impl Lines {
    fn push_text(&mut self, text: &str) {
        self.current
            .extend(text.split_whitespace().map(str::to_string));
    }

    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(self.current.join(" "));
            self.current.clear();
        }
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.push_text(text);
                continue;
            }
            let Some(child) = ElementRef::wrap(child) else {
                continue;
            };
            let name = child.value().name();
            if HIDDEN_ELEMENTS.contains(&name) {
                continue;
            }
            if name == "br" {
                self.break_line();
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                self.break_line();
            }
            self.walk(child);
            if block {
                self.break_line();
            }
        }
    }
}

/// 近似浏览器 innerText 的可见文本
///
/// 只在块级元素边界和 `<br>` 处换行，行内元素中的文本与相邻文本合并为一行。
/// `script`、`style` 与 `template` 中的文本不可见，被跳过。
pub fn visible_lines(element: &ElementRef<'_>) -> String {
    let mut lines = Lines::default();
    lines.walk(*element);
    lines.break_line();
    lines.lines.join("\n")
}
