//! # Tokenizer — Two Filtering Profiles Over One Candidate Pipeline
//!
//! Wraps the morphological [`Analyzer`] and applies the shared candidate
//! filter, then a profile-dependent gate:
//!
//! | Profile | Used for | Extra filtering |
//! |---------|----------|-----------------|
//! | [`Tagging`](Profile::Tagging) | dictionary scoring, menu/price context | none — permissive |
//! | [`Top40`](Profile::Top40) | public keyword surface, global frequency | top40-only stopwords **and** a positive allow-list gate |
//!
//! ## Candidate Pipeline (identical for both profiles)
//!
//! ```text
//! morpheme
//!   ├── 1. skip empty surface forms
//!   ├── 2. skip pure-numeric tokens (prices handled elsewhere)
//!   ├── 3. lowercase + strip embedded digits (미미당906 → 미미당)
//!   ├── 4. literal normalization map (크루 → 크루아상, corp → ∅)
//!   ├── 5. reject road-suffix forms (…로/길/대로 — address leakage)
//!   ├── 6. POS filter (nouns only, or the full nominal+stem set with
//!   │      adjective/verb stems canonicalized by appending 다)
//!   ├── 7. [top40] allow-list gate (exact ∪ substring ∪ short stems)
//!   ├── 8. stopword rejection (base ∪ domain ∪ caller extras [∪ top40-only])
//!   ├── 9. single-char rejection (except 빵/차/떡/…)
//!   └── 10. name-suffix dual emission (미미당 → 미미 **and** 미미당)
//! ```
//!
//! The allow-list inversion in step 7 is deliberate: everywhere else a
//! deny-list suffices, but the top-40 output is public-facing and must not
//! leak incidental vocabulary, so only tokens related to the known
//! mood/taste/companion/menu vocabulary survive.

use std::collections::HashSet;

use regex::Regex;

use crate::lexicon;
use crate::text::analyzer::{Analyzer, LexiconAnalyzer, PosTag};
use crate::text::stopwords;

/// Tokenizer profile — controls stopword aggressiveness and allow-listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// Permissive: dictionary tagging and menu/price-adjacent context.
    Tagging,
    /// Restrictive: public keyword surface (top-40, global frequency).
    Top40,
}

/// Literal normalization map for known orthographic variants.
/// An empty replacement acts as a hard removal (platform noise).
const NORMALIZE_TOKEN_MAP: &[(&str, &str)] = &[
    ("이드", "에이드"),
    ("크로", "크로아상"),
    ("크로아", "크로아상"),
    ("크루", "크루아상"),
    ("corp", ""),
    ("next", ""),
    ("image", ""),
];

/// Short stems (≤ 2 chars) allowed to substring-match in the top-40
/// allow-list, so inflected forms of short roots (넓다, 진하다) survive.
const TOP40_SHORT_STEMS: &[&str] = &[
    "넓", "진하", "쫀득", "쫄깃", "부드럽", "폭신", "따뜻", "산뜻", "묵직", "리치", "쓴", "달달",
];

/// Morphological tokenizer with all process-lifetime state built once:
/// compiled regexes, merged stopword sets and the top-40 allow-list.
pub struct Tokenizer {
    analyzer: Box<dyn Analyzer>,
    /// Plain or comma-grouped integers, optional decimal (8000 / 8,000 / 8,000.0).
    numeric_re: Regex,
    /// Full-form road designator match (…로/길/대로/번길/번안길/마을길/강로).
    road_re: Regex,
    /// Base linguistic ∪ domain stopwords (facility tokens already protected).
    shared_stopwords: HashSet<String>,
    /// Additional stopwords applied only in the `Top40` profile.
    top40_stopwords: HashSet<String>,
    /// Allow-list: exact matches.
    allow_exact: HashSet<String>,
    /// Allow-list: substring entries, longest first.
    allow_substr: Vec<String>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_analyzer(Box::new(LexiconAnalyzer::new()))
    }

    pub fn with_analyzer(analyzer: Box<dyn Analyzer>) -> Self {
        let mut shared_stopwords: HashSet<String> = stopwords::BASE_STOPWORDS
            .iter()
            .map(|s| s.to_string())
            .collect();
        shared_stopwords.extend(stopwords::domain_stopwords());

        let top40_stopwords: HashSet<String> = stopwords::TOP40_ONLY_STOPWORDS
            .iter()
            .map(|s| s.to_string())
            .collect();

        let (allow_exact, allow_substr) = build_allowlists();

        Self {
            analyzer,
            numeric_re: Regex::new(r"^(?:\d+|\d{1,3}(?:,\d{3})+)(?:\.\d+)?$").unwrap(),
            road_re: Regex::new(r"^.+(?:로|길|대로|번길|번안길|마을길|강로)$").unwrap(),
            shared_stopwords,
            top40_stopwords,
            allow_exact,
            allow_substr,
        }
    }

    /// Tokenizes `text` into surface forms, input order preserved and
    /// duplicates retained — downstream counts via a multiset.
    pub fn tokenize(
        &self,
        text: &str,
        extra_stopwords: &HashSet<String>,
        nouns_only: bool,
        profile: Profile,
    ) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for m in self.analyzer.analyze(text) {
            let form = m.form.trim();
            if form.is_empty() {
                continue;
            }
            // Numeric tokens are frequency noise — price extraction owns them.
            if self.numeric_re.is_match(form) {
                continue;
            }

            let mut form_l = form.to_lowercase();
            // Embedded digits are store-name/unit artifacts (미미당906).
            let no_digits: String = form_l.chars().filter(|c| !c.is_ascii_digit()).collect();
            if !no_digits.is_empty() {
                form_l = no_digits;
            }

            if let Some(&(_, mapped)) = NORMALIZE_TOKEN_MAP.iter().find(|(k, _)| *k == form_l) {
                if mapped.is_empty() {
                    continue;
                }
                form_l = mapped.to_string();
            }

            if self.road_re.is_match(&form_l) {
                continue;
            }

            if nouns_only {
                if !matches!(m.tag, PosTag::CommonNoun | PosTag::ProperNoun) {
                    continue;
                }
            } else if matches!(m.tag, PosTag::Adjective | PosTag::Verb) {
                // Canonicalize conjugating stems to their dictionary form.
                form_l.push('다');
            }

            if profile == Profile::Top40 && !self.allowed_for_top40(&form_l) {
                continue;
            }

            if self.is_stopword(&form_l, extra_stopwords, profile) {
                continue;
            }

            if form_l.chars().count() == 1 && !stopwords::ALLOWED_SINGLE.contains(&form_l.as_str()) {
                continue;
            }

            // Secondary emission: a brand root recovered by suffix stripping
            // is emitted alongside the original form.
            for &suf in stopwords::NAME_SUFFIXES {
                if form_l.ends_with(suf)
                    && form_l.chars().count() - suf.chars().count() >= 2
                {
                    out.push(form_l[..form_l.len() - suf.len()].to_string());
                }
            }
            out.push(form_l);
        }
        out
    }

    /// Raw nominal pass used by the row stopword builder: noun/foreign/
    /// number/root tags only, no stopword or road filtering, same digit
    /// stripping, normalization map, single-char rule and suffix emission.
    pub fn raw_nominal_tokens(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for m in self.analyzer.analyze(text) {
            let form = m.form.trim();
            if form.is_empty() || self.numeric_re.is_match(form) {
                continue;
            }
            let mut form_l = form.to_lowercase();
            let no_digits: String = form_l.chars().filter(|c| !c.is_ascii_digit()).collect();
            if !no_digits.is_empty() {
                form_l = no_digits;
            }
            if let Some(&(_, mapped)) = NORMALIZE_TOKEN_MAP.iter().find(|(k, _)| *k == form_l) {
                if mapped.is_empty() {
                    continue;
                }
                form_l = mapped.to_string();
            }
            if !m.tag.is_nominal() {
                continue;
            }
            if form_l.chars().count() == 1 && !stopwords::ALLOWED_SINGLE.contains(&form_l.as_str()) {
                continue;
            }
            for &suf in stopwords::NAME_SUFFIXES {
                if form_l.ends_with(suf)
                    && form_l.chars().count() - suf.chars().count() >= 2
                {
                    out.push(form_l[..form_l.len() - suf.len()].to_string());
                }
            }
            out.push(form_l);
        }
        out
    }

    fn allowed_for_top40(&self, token: &str) -> bool {
        self.allow_exact.contains(token)
            || self.allow_substr.iter().any(|s| token.contains(s.as_str()))
    }

    fn is_stopword(&self, token: &str, extra: &HashSet<String>, profile: Profile) -> bool {
        self.shared_stopwords.contains(token)
            || extra.contains(token)
            || (profile == Profile::Top40 && self.top40_stopwords.contains(token))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the top-40 allow-list from the union of all dictionary trigger
/// words and the menu keyword list.
///
/// - exact: the full vocabulary
/// - substring: vocabulary entries ≥ 3 chars, plus the enumerated short
///   stems, sorted longest-first so long tokens are checked before short
fn build_allowlists() -> (HashSet<String>, Vec<String>) {
    let mut exact: HashSet<String> = HashSet::new();
    for dict in [lexicon::MOOD_DICT, lexicon::TASTE_DICT, lexicon::COMPANION_DICT] {
        for (_, triggers) in dict {
            for &w in triggers.iter() {
                let w = w.trim();
                if !w.is_empty() {
                    exact.insert(w.to_string());
                }
            }
        }
    }
    for &w in lexicon::MENU_KEYWORDS {
        let w = w.trim();
        if !w.is_empty() {
            exact.insert(w.to_string());
        }
    }

    let mut substr: HashSet<String> = exact
        .iter()
        .filter(|w| w.chars().count() >= 3)
        .cloned()
        .collect();
    substr.extend(TOP40_SHORT_STEMS.iter().map(|s| s.to_string()));

    let mut substr: Vec<String> = substr.into_iter().collect();
    substr.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    (exact, substr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_extra() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn empty_text_yields_nothing() {
        let t = Tokenizer::new();
        assert!(t.tokenize("", &no_extra(), false, Profile::Tagging).is_empty());
    }

    #[test]
    fn numeric_tokens_are_skipped() {
        let t = Tokenizer::new();
        let toks = t.tokenize("8,000 아메리카노 12000", &no_extra(), false, Profile::Tagging);
        assert_eq!(toks, vec!["아메리카노"]);
    }

    #[test]
    fn normalization_map_merges_variants() {
        let t = Tokenizer::new();
        let toks = t.tokenize("크루 크로아", &no_extra(), false, Profile::Tagging);
        assert_eq!(toks, vec!["크루아상", "크로아상"]);
    }

    #[test]
    fn road_suffix_tokens_are_rejected() {
        let t = Tokenizer::new();
        // 백운로 is not in the location table — only the road filter can
        // catch it.
        let toks = t.tokenize("백운로", &no_extra(), false, Profile::Tagging);
        assert!(toks.is_empty(), "{toks:?}");
    }

    #[test]
    fn adjective_stems_are_canonicalized() {
        let t = Tokenizer::new();
        let toks = t.tokenize("맛있어요", &no_extra(), false, Profile::Tagging);
        assert_eq!(toks, vec!["맛있다"]);
    }

    #[test]
    fn stopwords_are_removed() {
        let t = Tokenizer::new();
        let toks = t.tokenize("그리고 네이버 블로그 케이크", &no_extra(), false, Profile::Tagging);
        assert_eq!(toks, vec!["케이크"]);
    }

    #[test]
    fn caller_extra_stopwords_apply() {
        let t = Tokenizer::new();
        let extra: HashSet<String> = ["케이크".to_string()].into_iter().collect();
        let toks = t.tokenize("케이크 스콘", &extra, false, Profile::Tagging);
        assert_eq!(toks, vec!["스콘"]);
    }

    #[test]
    fn single_chars_filtered_except_allowlist() {
        let t = Tokenizer::new();
        let toks = t.tokenize("빵 꿀", &no_extra(), false, Profile::Tagging);
        // 빵 is a meaningful single char, 꿀 is not on the allow list.
        assert_eq!(toks, vec!["빵"]);
    }

    #[test]
    fn name_suffix_emits_both_forms() {
        let t = Tokenizer::new();
        let toks = t.tokenize("미미당906", &no_extra(), false, Profile::Tagging);
        assert_eq!(toks, vec!["미미", "미미당"]);
    }

    #[test]
    fn facility_tokens_survive_everywhere() {
        let t = Tokenizer::new();
        for text in ["주차", "와이파이", "콘센트"] {
            let toks = t.tokenize(text, &no_extra(), false, Profile::Tagging);
            assert_eq!(toks, vec![text.to_string()], "facility token {text} was filtered");
        }
    }

    #[test]
    fn top40_gate_blocks_incidental_vocabulary() {
        let t = Tokenizer::new();
        // 미술관-adjacent chatter has no dictionary/menu relation.
        let toks = t.tokenize("건물 카운터 안녕", &no_extra(), false, Profile::Top40);
        assert!(toks.is_empty(), "{toks:?}");
    }

    #[test]
    fn top40_keeps_dictionary_and_menu_tokens() {
        let t = Tokenizer::new();
        let toks = t.tokenize("포토존 티라미수 달콤", &no_extra(), false, Profile::Top40);
        assert_eq!(toks, vec!["포토존", "티라미수", "달콤"]);
    }

    #[test]
    fn top40_short_stem_substring_matches() {
        let t = Tokenizer::new();
        // 진하다 is not an exact allow-list entry but contains the stem 진하.
        let toks = t.tokenize("진하다", &no_extra(), false, Profile::Top40);
        assert_eq!(toks, vec!["진하다"]);
    }

    #[test]
    fn top40_containment_property() {
        let t = Tokenizer::new();
        let text = "조용하고 아늑한 카페 소금빵 맛있어요 주차 가능 포토존 분위기 최고";
        let toks = t.tokenize(text, &no_extra(), false, Profile::Top40);
        let (exact, substr) = build_allowlists();
        for tok in &toks {
            let ok = exact.contains(tok) || substr.iter().any(|s| tok.contains(s.as_str()));
            assert!(ok, "token {tok} escaped the allow-list gate");
        }
    }

    #[test]
    fn tokenize_is_deterministic() {
        let t = Tokenizer::new();
        let text = "달콤한 케이크와 고소한 스콘";
        let a = t.tokenize(text, &no_extra(), false, Profile::Tagging);
        let b = t.tokenize(text, &no_extra(), false, Profile::Tagging);
        assert_eq!(a, b);
    }

    #[test]
    fn nouns_only_drops_stems() {
        let t = Tokenizer::new();
        let toks = t.tokenize("맛있어요 케이크", &no_extra(), true, Profile::Tagging);
        assert_eq!(toks, vec!["케이크"]);
    }
}
