// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::analysis::{
    AspectSentiment, BusinessSummary, ReviewSentiment, SentimentLabel,
};
use crate::domain::services::classifier::SentimentProvider;
use crate::utils::errors::ClassifierError;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+").expect("valid word regex"));

const POSITIVE_WORDS: &[&str] = &[
    "güzel", "harika", "mükemmel", "süper", "kaliteli", "sağlam", "beğendim", "memnunum",
    "memnun", "tavsiye", "hızlı", "teşekkürler", "teşekkür", "bayıldım", "şahane", "iyi",
    "özenli", "rahat", "great", "good", "excellent", "perfect", "love",
];

const NEGATIVE_WORDS: &[&str] = &[
    "kötü", "berbat", "rezalet", "bozuk", "yırtık", "geç", "iade", "pişman", "beğenmedim",
    "memnun değilim", "sahte", "kırık", "eksik", "özensiz", "vasat", "yanlış", "değil",
    "gelmedi", "bad", "terrible", "broken", "worst",
];

const ASPECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Kargo", &["kargo", "teslimat", "paket", "ulaşım", "hızlı", "geç", "gün"]),
    ("Kalite", &["kalite", "kumaş", "sağlam", "bozuk", "yırtık", "dikiş", "materyal"]),
    ("Beden/Uyum", &["beden", "kalıp", "dar", "bol", "küçük", "büyük", "tam"]),
    ("Fiyat/Performans", &["fiyat", "pahalı", "ucuz", "değer", "indirim", "performans"]),
    ("Satıcı", &["satıcı", "ilgi", "cevap", "yanlış", "eksik", "hediye"]),
];

const ASPECT_CONFIDENCE: f64 = 0.8;

/// 词典分类器
///
/// 本地回退提供方：基于正负面词表的情感判断、关键词方面标签，
/// 以及基于规则的店铺摘要。不依赖任何外部服务。
#[derive(Debug, Default)]
pub struct LexiconClassifier;

fn lowercase(text: &str) -> String {
    // Turkish dotted capital I would otherwise lower to "i\u{307}".
    text.replace('İ', "i").replace('I', "ı").to_lowercase()
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 单条评论的情感
    pub fn classify(&self, text: &str) -> ReviewSentiment {
        let lower = lowercase(text);
        // Words inside a matched phrase count only through the phrase.
        let phrases: Vec<(usize, usize)> = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .filter(|entry| entry.contains(' '))
            .flat_map(|entry| {
                lower
                    .match_indices(entry)
                    .map(|(start, m)| (start, start + m.len()))
            })
            .collect();
        let words: Vec<&str> = WORD
            .find_iter(&lower)
            .filter(|m| {
                !phrases
                    .iter()
                    .any(|&(start, end)| m.start() >= start && m.end() <= end)
            })
            .map(|m| m.as_str())
            .collect();
        let count = |lexicon: &[&str]| {
            lexicon
                .iter()
                .map(|entry| {
                    if entry.contains(' ') {
                        lower.matches(entry).count()
                    } else {
                        words.iter().filter(|w| *w == entry).count()
                    }
                })
                .sum::<usize>()
        };
        let positive = count(POSITIVE_WORDS);
        let negative = count(NEGATIVE_WORDS);

        let total = positive + negative;
        let (sentiment, score) = if positive == negative {
            (SentimentLabel::Neutral, 0.5)
        } else {
            let margin = positive.abs_diff(negative) as f64 / total as f64;
            let label = if positive > negative {
                SentimentLabel::Positive
            } else {
                SentimentLabel::Negative
            };
            (label, 0.5 + 0.45 * margin)
        };

        ReviewSentiment {
            sentiment,
            score,
            aspects: Self::aspects(&lower, sentiment),
        }
    }

    fn aspects(lower: &str, sentiment: SentimentLabel) -> Vec<AspectSentiment> {
        ASPECT_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(aspect, _)| AspectSentiment {
                aspect: aspect.to_string(),
                sentiment,
                confidence: ASPECT_CONFIDENCE,
            })
            .collect()
    }

    /// 基于关键词规则的店铺摘要
    pub fn rule_based_summary(&self, texts: &[String]) -> BusinessSummary {
        let all = lowercase(&texts.join(" "));
        let has = |w: &str| all.contains(w);

        let mut strengths = Vec::new();
        if has("hızlı") && has("kargo") {
            strengths.push("Kargo süreçleri hızlı işliyor".to_string());
        }
        if has("kaliteli") || has("sağlam") {
            strengths.push("Ürün kalitesi beğeniliyor".to_string());
        }
        if has("hediye") {
            strengths.push("Hediye gönderimi memnuniyet yaratmış".to_string());
        }

        let mut weaknesses = Vec::new();
        let late = has("geç") && has("geldi");
        let packaging = has("özensiz") || has("yırtık");
        let sizing = has("küçük") || has("dar");
        if late {
            weaknesses.push("Teslimat sürelerinde gecikmeler yaşanıyor".to_string());
        }
        if packaging {
            weaknesses.push("Paketleme konusunda şikayetler var".to_string());
        }
        if sizing {
            weaknesses.push("Beden/Boyut konusunda uyumsuzluklar var".to_string());
        }

        if strengths.is_empty() {
            strengths.push("Genel müşteri memnuniyeti yüksek görünüyor".to_string());
        }
        if weaknesses.is_empty() {
            weaknesses.push("Belirgin bir sistemsel sorun tespit edilemedi".to_string());
        }

        let mut advice = Vec::new();
        if packaging {
            advice.push(
                "Paketleme standartlarınızı gözden geçirin, daha korunaklı ambalaj kullanın."
                    .to_string(),
            );
        }
        if sizing {
            advice.push("Ürün açıklamalarına detaylı beden tablosu ekleyin.".to_string());
        } else {
            advice.push(
                "Mevcut hizmet kalitesini koruyarak kampanyalarla satışı artırın.".to_string(),
            );
        }

        BusinessSummary {
            strengths,
            weaknesses,
            advice,
        }
        .capped()
    }
}

#[async_trait]
impl SentimentProvider for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<ReviewSentiment>, ClassifierError> {
        Ok(texts.iter().map(|t| self.classify(t)).collect())
    }

    async fn summarize(&self, texts: &[String]) -> Result<BusinessSummary, ClassifierError> {
        Ok(self.rule_based_summary(texts))
    }
}
