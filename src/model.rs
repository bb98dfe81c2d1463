//! # Data Model
//!
//! Plain records that flow through the pipeline:
//!
//! | Type | Role |
//! |------|------|
//! | [`VenueRecord`] | one venue after input merge, before enrichment |
//! | [`TokenCounts`] | insertion-ordered token counter |
//! | [`EnrichedVenue`] | one fully enriched venue, ready for table output |
//! | [`PriceItem`] | one extracted price mention with provenance |
//!
//! [`TokenCounts`] is the deterministic backbone: it remembers first-seen
//! order, so two tokens with the same count always rank in the order they
//! first appeared in the text. Every downstream ranking (tags, menus,
//! frequency tables, TOP40) inherits that tie-break.

use std::collections::HashMap;

use serde::Serialize;

use crate::price::PriceSource;
use crate::score::Parking;

/// One venue row after the place, blog, and map-candidate inputs are merged.
/// Built field-by-field at the CSV boundary; nothing deserializes it.
#[derive(Clone, Debug, Default)]
pub struct VenueRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub district: String,
    pub lat: String,
    pub lng: String,
    pub map_link: String,
    pub image_url: String,
    pub review_count: u32,
    /// All blog/review text for this venue, cleaned and space-joined.
    pub combined_text: String,
}

/// Token counter that preserves first-seen insertion order.
#[derive(Clone, Debug, Default)]
pub struct TokenCounts {
    counts: HashMap<String, u32>,
    order: Vec<String>,
}

impl TokenCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens<I: IntoIterator<Item = String>>(tokens: I) -> Self {
        let mut counts = Self::new();
        for token in tokens {
            counts.add(token);
        }
        counts
    }

    pub fn add(&mut self, token: String) {
        match self.counts.get_mut(&token) {
            Some(n) => *n += 1,
            None => {
                self.counts.insert(token.clone(), 1);
                self.order.push(token);
            }
        }
    }

    pub fn get(&self, token: &str) -> u32 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tokens in first-seen order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.order.iter().map(move |t| (t.as_str(), self.counts[t]))
    }

    /// Tokens ranked by count descending; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(String, u32)> {
        let mut out: Vec<(String, u32)> =
            self.iter().map(|(t, n)| (t.to_string(), n)).collect();
        out.sort_by_key(|&(_, n)| std::cmp::Reverse(n));
        out
    }

    /// Folds another counter into this one, preserving this counter's order
    /// for tokens already seen.
    pub fn merge(&mut self, other: &TokenCounts) {
        for (token, n) in other.iter() {
            match self.counts.get_mut(token) {
                Some(m) => *m += n,
                None => {
                    self.counts.insert(token.to_string(), n);
                    self.order.push(token.to_string());
                }
            }
        }
    }
}

/// One extracted price mention.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceItem {
    /// Guessed menu item from the surrounding context, may be empty.
    pub item: String,
    /// Parsed amount in won.
    pub price: u32,
    /// Matched text exactly as it appeared.
    pub raw: String,
    pub source: PriceSource,
    /// Context window the match came from, for auditability.
    pub context: String,
}

/// Price roll-up for one venue.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PriceSummary {
    /// Distinct prices, ascending.
    pub prices: Vec<u32>,
    pub min: u32,
    pub max: u32,
    pub median: u32,
    /// Display label, e.g. `4500~8000원(대표 6000원)`.
    pub label: String,
}

/// Fully enriched venue, one master-table row.
#[derive(Clone, Debug)]
pub struct EnrichedVenue {
    pub record: VenueRecord,
    pub mood_tags: Vec<String>,
    pub taste_tags: Vec<String>,
    pub companion_tags: Vec<String>,
    pub menus: Vec<String>,
    pub primary_menus: Vec<String>,
    pub parking: Parking,
    pub score: f64,
    pub recommend_type: String,
    pub recommend_tags: String,
    pub recommend_msg: String,
    pub price_items: Vec<PriceItem>,
    pub price_summary: Option<PriceSummary>,
    pub top40: Vec<(String, u32)>,
    /// Per-venue counts from the keyword profile; feeds the per-venue and
    /// global frequency tables.
    pub top_counts: TokenCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate() {
        let mut c = TokenCounts::new();
        c.add("케이크".to_string());
        c.add("케이크".to_string());
        c.add("스콘".to_string());
        assert_eq!(c.get("케이크"), 2);
        assert_eq!(c.get("스콘"), 1);
        assert_eq!(c.get("빙수"), 0);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn iter_preserves_first_seen_order() {
        let c = TokenCounts::from_tokens(
            ["b", "a", "b", "c"].iter().map(|s| s.to_string()),
        );
        let order: Vec<&str> = c.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn ranked_breaks_ties_by_first_seen() {
        let c = TokenCounts::from_tokens(
            ["a", "b", "b", "c"].iter().map(|s| s.to_string()),
        );
        let ranked = c.ranked();
        assert_eq!(ranked[0], ("b".to_string(), 2));
        // a and c both count 1; a was seen first.
        assert_eq!(ranked[1].0, "a");
        assert_eq!(ranked[2].0, "c");
    }

    #[test]
    fn merge_adds_counts_and_appends_new_tokens() {
        let mut left = TokenCounts::from_tokens(["a", "b"].iter().map(|s| s.to_string()));
        let right = TokenCounts::from_tokens(["b", "c"].iter().map(|s| s.to_string()));
        left.merge(&right);
        assert_eq!(left.get("a"), 1);
        assert_eq!(left.get("b"), 2);
        assert_eq!(left.get("c"), 1);
        let order: Vec<&str> = left.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
