//! # Price Extraction
//!
//! Pulls menu prices out of free-form review text in two passes:
//!
//! | Pass | Pattern | Guard |
//! |------|---------|-------|
//! | strict | `8,000원`, `8000 원` | amount in [500, 50000] |
//! | loose | `8,000` (comma-grouped, no 원) | amount in range **and** a menu keyword inside the context window |
//!
//! Every match carries a ±35-char context window for auditing and for the
//! item guess: the longest menu keyword found in the window becomes the
//! item (length ties keep keyword-list order). Strict matches keep an
//! empty item when nothing is found; loose matches without an item are
//! dropped entirely.
//!
//! Duplicates are removed on `(item, price, raw)`, first occurrence kept.

use std::fmt;

use regex::Regex;

use crate::lexicon::menu_keywords;
use crate::model::{PriceItem, PriceSummary};

const PRICE_MIN: u32 = 500;
const PRICE_MAX: u32 = 50_000;
const CONTEXT_WINDOW: usize = 35;

/// Which pass produced a price match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Strict,
    Loose,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::Strict => f.write_str("strict"),
            PriceSource::Loose => f.write_str("loose"),
        }
    }
}

pub struct PriceExtractor {
    strict_re: Regex,
    loose_re: Regex,
    /// Menu keywords, longest first; length ties keep list order.
    keywords_by_len: Vec<&'static str>,
}

impl PriceExtractor {
    pub fn new() -> Self {
        let mut keywords_by_len = menu_keywords();
        keywords_by_len.sort_by_key(|kw| std::cmp::Reverse(kw.chars().count()));
        Self {
            strict_re: Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)\s*원").unwrap(),
            loose_re: Regex::new(r"\b(\d{1,3}(?:,\d{3})+)\b").unwrap(),
            keywords_by_len,
        }
    }

    /// Extracts all price mentions from `text`, strict pass first.
    pub fn extract(&self, text: &str) -> Vec<PriceItem> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();

        for m in self.strict_re.captures_iter(text) {
            let whole = m.get(0).unwrap();
            let raw_amount = m.get(1).unwrap().as_str();
            let Some(price) = parse_amount(raw_amount) else { continue };
            if !(PRICE_MIN..=PRICE_MAX).contains(&price) {
                continue;
            }
            let context = context_window(text, whole.start(), whole.end());
            let item = self.guess_item(&context);
            out.push(PriceItem {
                item,
                price,
                raw: whole.as_str().to_string(),
                source: PriceSource::Strict,
                context,
            });
        }

        for m in self.loose_re.captures_iter(text) {
            let whole = m.get(0).unwrap();
            let raw_amount = m.get(1).unwrap().as_str();
            let Some(price) = parse_amount(raw_amount) else { continue };
            if !(PRICE_MIN..=PRICE_MAX).contains(&price) {
                continue;
            }
            let context = context_window(text, whole.start(), whole.end());
            let item = self.guess_item(&context);
            if item.is_empty() {
                continue;
            }
            out.push(PriceItem {
                item,
                price,
                raw: raw_amount.to_string(),
                source: PriceSource::Loose,
                context,
            });
        }

        dedup(out)
    }

    /// Roll-up over one venue's extracted items. `None` when no prices.
    pub fn summarize(items: &[PriceItem]) -> Option<PriceSummary> {
        let mut prices: Vec<u32> = items.iter().map(|p| p.price).collect();
        prices.sort_unstable();
        prices.dedup();
        if prices.is_empty() {
            return None;
        }
        let min = prices[0];
        let max = *prices.last().unwrap();
        let median = median_of(&prices);
        let label = format!("{min}~{max}원(대표 {median}원)");
        Some(PriceSummary { prices, min, max, median, label })
    }

    fn guess_item(&self, context: &str) -> String {
        for kw in &self.keywords_by_len {
            if context.contains(kw) {
                return kw.to_string();
            }
        }
        String::new()
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_amount(raw: &str) -> Option<u32> {
    raw.replace(',', "").parse().ok()
}

/// Median of a sorted distinct list; even length averages the middle pair
/// with integer truncation.
fn median_of(sorted: &[u32]) -> u32 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2
    }
}

/// ±`CONTEXT_WINDOW` chars around a byte-offset match, char-aligned.
fn context_window(text: &str, start: usize, end: usize) -> String {
    let mut from = start;
    for _ in 0..CONTEXT_WINDOW {
        if from == 0 {
            break;
        }
        from -= 1;
        while !text.is_char_boundary(from) {
            from -= 1;
        }
    }
    let mut to = end;
    for _ in 0..CONTEXT_WINDOW {
        if to == text.len() {
            break;
        }
        to += 1;
        while !text.is_char_boundary(to) {
            to += 1;
        }
    }
    text[from..to].to_string()
}

fn dedup(items: Vec<PriceItem>) -> Vec<PriceItem> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|p| seen.insert((p.item.clone(), p.price, p.raw.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_match_with_item_guess() {
        let ex = PriceExtractor::new();
        let items = ex.extract("8,000원 아메리카노 맛있어요 주차 가능");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, 8000);
        assert_eq!(items[0].raw, "8,000원");
        assert_eq!(items[0].item, "아메리카노");
        assert_eq!(items[0].source, PriceSource::Strict);
    }

    #[test]
    fn strict_keeps_empty_item() {
        let ex = PriceExtractor::new();
        let items = ex.extract("입장료 5000원 입니다");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item, "");
    }

    #[test]
    fn loose_requires_menu_keyword_nearby() {
        let ex = PriceExtractor::new();
        assert!(ex.extract("전화번호 뒷자리 1,234").is_empty());
        let items = ex.extract("소금빵 3,500 추천");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, PriceSource::Loose);
        assert_eq!(items[0].item, "소금빵");
        assert_eq!(items[0].raw, "3,500");
    }

    #[test]
    fn out_of_range_amounts_are_dropped() {
        let ex = PriceExtractor::new();
        assert!(ex.extract("100원 동전").is_empty());
        assert!(ex.extract("보증금 100,000원").is_empty());
    }

    #[test]
    fn longest_keyword_wins_the_item_guess() {
        let ex = PriceExtractor::new();
        let items = ex.extract("치즈케이크 6,500원");
        assert_eq!(items[0].item, "치즈케이크");
    }

    #[test]
    fn duplicates_are_removed() {
        let ex = PriceExtractor::new();
        let items = ex.extract("아메리카노 4,000원 리필도 아메리카노 4,000원");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn summary_reports_min_max_median() {
        let ex = PriceExtractor::new();
        let items = ex.extract("아메리카노 4,000원 케이크 6,000원 빙수 13,000원");
        let summary = PriceExtractor::summarize(&items).unwrap();
        assert_eq!(summary.min, 4000);
        assert_eq!(summary.max, 13000);
        assert_eq!(summary.median, 6000);
        assert_eq!(summary.label, "4000~13000원(대표 6000원)");
    }

    #[test]
    fn summary_even_count_averages_middle_pair() {
        assert_eq!(median_of(&[4000, 6000]), 5000);
        assert_eq!(median_of(&[4000, 6500]), 5250);
    }

    #[test]
    fn empty_text_yields_nothing() {
        let ex = PriceExtractor::new();
        assert!(ex.extract("").is_empty());
        assert!(PriceExtractor::summarize(&[]).is_none());
    }
}
