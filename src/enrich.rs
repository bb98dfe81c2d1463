//! # Enrichment Pipeline
//!
//! Per-venue orchestration, fanned out with rayon and collected back in
//! input order:
//!
//! ```text
//! VenueRecord
//!    │ coordinate backfill (map candidates)
//!    │ per-venue stopwords (own name + geography)
//!    ├─ tokenize (tagging profile) ──► tag scores, menus
//!    ├─ tokenize (keyword profile) ──► TOP40, frequency counts
//!    ├─ parking detection
//!    ├─ price extraction + summary
//!    └─ score / recommendation columns
//!    ▼
//! EnrichedVenue
//! ```
//!
//! Determinism: `par_iter().map().collect()` preserves input order, every
//! ranking ties back to [`TokenCounts`](crate::model::TokenCounts)
//! first-seen order, and the global counter is folded sequentially after
//! the parallel phase.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::geo::GeoMatcher;
use crate::lexicon::{Category, LexiconTagger};
use crate::model::{EnrichedVenue, TokenCounts, VenueRecord};
use crate::price::PriceExtractor;
use crate::score::{build_reason, ParkingDetector, RecommendType, ScoreCalculator};
use crate::text::stopwords::RowStopwordBuilder;
use crate::text::tokenizer::{Profile, Tokenizer};

const TOP_KEYWORDS: usize = 40;
const MENU_TOPK: usize = 8;

/// All per-run state, built once and shared read-only across workers.
pub struct Pipeline {
    tokenizer: Tokenizer,
    row_stopwords: RowStopwordBuilder,
    prices: PriceExtractor,
    parking: ParkingDetector,
    geo: GeoMatcher,
}

impl Pipeline {
    pub fn new(geo: GeoMatcher) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            row_stopwords: RowStopwordBuilder::new(),
            prices: PriceExtractor::new(),
            parking: ParkingDetector::new(),
            geo,
        }
    }

    /// Enriches every venue in parallel; output order matches input order.
    pub fn run(&self, venues: Vec<VenueRecord>) -> Vec<EnrichedVenue> {
        info!(venues = venues.len(), "enrichment started");
        let out: Vec<EnrichedVenue> =
            venues.into_par_iter().map(|v| self.enrich_one(v)).collect();
        info!(venues = out.len(), "enrichment finished");
        out
    }

    fn enrich_one(&self, mut record: VenueRecord) -> EnrichedVenue {
        self.backfill_coordinates(&mut record);

        let extra_stopwords = self.row_stopwords.build(
            &self.tokenizer,
            &record.name,
            &record.district,
            &record.address,
        );

        let text = record.combined_text.as_str();

        let tag_tokens =
            self.tokenizer.tokenize(text, &extra_stopwords, false, Profile::Tagging);
        let tag_counts = TokenCounts::from_tokens(tag_tokens);

        let top_tokens =
            self.tokenizer.tokenize(text, &extra_stopwords, false, Profile::Top40);
        let top_counts = TokenCounts::from_tokens(top_tokens);
        let top40: Vec<(String, u32)> =
            top_counts.ranked().into_iter().take(TOP_KEYWORDS).collect();

        let mood_scored = LexiconTagger::score(&tag_counts, Category::Mood);
        let taste_scored = LexiconTagger::score(&tag_counts, Category::Taste);
        let companion_scored = LexiconTagger::score(&tag_counts, Category::Companion);

        let top3 = |scored: &[(String, u32)]| -> Vec<String> {
            scored.iter().take(3).map(|(label, _)| label.clone()).collect()
        };
        let mood_tags = top3(&mood_scored);
        let taste_tags = top3(&taste_scored);
        let companion_tags = top3(&companion_scored);

        let menus = LexiconTagger::extract_menus(text, &tag_counts, MENU_TOPK);
        let primary_menus: Vec<String> = menus.iter().take(3).cloned().collect();

        let parking = self.parking.detect(text);

        let price_items = self.prices.extract(text);
        let price_summary = PriceExtractor::summarize(&price_items);

        // Score totals sum every matched label, not just the top three.
        let taste_total: u32 = taste_scored.iter().map(|&(_, v)| v).sum();
        let mood_total: u32 = mood_scored.iter().map(|&(_, v)| v).sum();
        let score = ScoreCalculator::score(
            record.review_count,
            menus.len(),
            taste_total,
            mood_total,
            parking,
        );

        let rec_type = RecommendType::from_companion_tags(&companion_tags);
        let reason = build_reason(&primary_menus, &mood_tags, &taste_tags, parking);
        let recommend_msg = if reason.is_empty() {
            format!("{} 추천", rec_type.label())
        } else {
            format!("{} 추천 · {}", rec_type.label(), reason)
        };
        let recommend_tags: String = mood_tags
            .iter()
            .take(2)
            .chain(taste_tags.iter().take(2))
            .chain(companion_tags.iter().take(1))
            .cloned()
            .collect::<Vec<_>>()
            .join(",");

        debug!(
            venue = %record.name,
            score,
            parking = parking.label(),
            menus = menus.len(),
            "venue enriched"
        );

        EnrichedVenue {
            record,
            mood_tags,
            taste_tags,
            companion_tags,
            menus,
            primary_menus,
            parking,
            score,
            recommend_type: rec_type.label().to_string(),
            recommend_tags,
            recommend_msg,
            price_items,
            price_summary,
            top40,
            top_counts,
        }
    }

    fn backfill_coordinates(&self, record: &mut VenueRecord) {
        if !record.lat.is_empty() && !record.lng.is_empty() {
            return;
        }
        let Some(cand) =
            self.geo.find(&record.name, &record.address, &record.district)
        else {
            return;
        };
        if record.lat.is_empty() {
            record.lat = cand.lat.trim().to_string();
        }
        if record.lng.is_empty() {
            record.lng = cand.lng.trim().to_string();
        }
        if record.map_link.is_empty() {
            record.map_link = cand.url.trim().to_string();
        }
    }
}

/// Folds per-venue keyword counts into one corpus-wide counter,
/// sequentially and in venue order.
pub fn global_counts(venues: &[EnrichedVenue]) -> TokenCounts {
    let mut global = TokenCounts::new();
    for v in venues {
        global.merge(&v.top_counts);
    }
    global
}
