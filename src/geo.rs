//! # Geo Matching — Coordinate Backfill From Map Candidates
//!
//! Venues scraped from the place source sometimes lack coordinates. This
//! module fills the gap from a second map-provider dump:
//!
//! ```text
//! venue (name, address, district)
//!    │ norm(name) exact lookup
//!    ▼
//! candidate bucket ──► score each ──► best (strict >, first max wins)
//! ```
//!
//! Scoring per candidate:
//!
//! | Signal | Points |
//! |--------|--------|
//! | venue district is a substring of candidate gu | +3 |
//! | normalized addresses contain one another | +5 |
//! | 4-char shingle overlap (both ≥ 4 chars) | +min(\|∩\|, 10)/10 |
//!
//! The shingle term is a weak tie-breaker for same-named venues in
//! different neighborhoods; it never outweighs a district or address hit.

use std::collections::HashMap;

/// Matching key: lowercase, parenthesized spans dropped, then only
/// `[0-9a-z가-힣]` kept.
pub fn norm(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut stripped = String::with_capacity(lower.len());
    let mut rest = lower.as_str();
    // Drop "(...)" spans; an unmatched '(' keeps its trailing text.
    while let Some(i) = rest.find('(') {
        stripped.push_str(&rest[..i]);
        match rest[i..].find(')') {
            Some(j) => rest = &rest[i + j + 1..],
            None => {
                stripped.push_str(&rest[i..]);
                rest = "";
            }
        }
    }
    stripped.push_str(rest);
    stripped
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_ascii_lowercase() || ('가'..='힣').contains(c))
        .collect()
}

/// One row from the map-provider dump, pre-normalized for matching.
#[derive(Clone, Debug, Default)]
pub struct KakaoCandidate {
    pub name_norm: String,
    pub addr_norm: String,
    /// Provider's `y` column.
    pub lat: String,
    /// Provider's `x` column.
    pub lng: String,
    pub url: String,
    pub gu: String,
}

/// Name-keyed candidate index.
pub struct GeoMatcher {
    by_name: HashMap<String, Vec<KakaoCandidate>>,
}

impl GeoMatcher {
    pub fn new(candidates: Vec<KakaoCandidate>) -> Self {
        let mut by_name: HashMap<String, Vec<KakaoCandidate>> = HashMap::new();
        for cand in candidates {
            by_name.entry(cand.name_norm.clone()).or_default().push(cand);
        }
        Self { by_name }
    }

    /// Finds the best candidate for a venue, or `None` when no candidate
    /// shares the normalized name.
    pub fn find(&self, name: &str, address: &str, district: &str) -> Option<&KakaoCandidate> {
        let candidates = self.by_name.get(&norm(name))?;
        let addr_norm = norm(address);

        let mut best: Option<&KakaoCandidate> = None;
        let mut best_score = -1.0f64;
        for cand in candidates {
            let mut score = 0.0f64;
            if !district.is_empty() && cand.gu.contains(district) {
                score += 3.0;
            }
            if !addr_norm.is_empty() && !cand.addr_norm.is_empty() {
                if addr_norm.contains(&cand.addr_norm) || cand.addr_norm.contains(&addr_norm) {
                    score += 5.0;
                }
                score += shingle_overlap(&addr_norm, &cand.addr_norm);
            }
            if score > best_score {
                best_score = score;
                best = Some(cand);
            }
        }
        best
    }
}

/// 4-char shingle intersection, capped at 10 and scaled to [0, 1].
fn shingle_overlap(a: &str, b: &str) -> f64 {
    let ca: Vec<char> = a.chars().collect();
    let cb: Vec<char> = b.chars().collect();
    if ca.len() < 4 || cb.len() < 4 {
        return 0.0;
    }
    let sa: std::collections::HashSet<&[char]> = ca.windows(4).collect();
    let sb: std::collections::HashSet<&[char]> = cb.windows(4).collect();
    let common = sa.intersection(&sb).count().min(10);
    common as f64 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_lowercases_and_strips() {
        assert_eq!(norm("Cafe MIMI 906"), "cafemimi906");
        assert_eq!(norm("미미당 (본점)"), "미미당");
        assert_eq!(norm("카페-온도, 2호점"), "카페온도2호점");
    }

    #[test]
    fn norm_keeps_text_after_unmatched_paren() {
        assert_eq!(norm("카페(온도"), "카페온도");
    }

    fn cand(name: &str, addr: &str, gu: &str, lat: &str) -> KakaoCandidate {
        KakaoCandidate {
            name_norm: norm(name),
            addr_norm: norm(addr),
            lat: lat.to_string(),
            lng: "126.9".to_string(),
            url: String::new(),
            gu: gu.to_string(),
        }
    }

    #[test]
    fn no_candidates_for_unknown_name() {
        let m = GeoMatcher::new(vec![cand("미미당", "광주 북구 용봉로 1", "북구", "35.1")]);
        assert!(m.find("다른카페", "광주 북구", "북구").is_none());
    }

    #[test]
    fn district_and_address_pick_the_right_twin() {
        let m = GeoMatcher::new(vec![
            cand("미미당", "광주 남구 백운로 10", "남구", "35.0"),
            cand("미미당", "광주 북구 용봉로 1", "북구", "35.2"),
        ]);
        let best = m
            .find("미미당", "광주 북구 용봉로 1", "북구")
            .expect("name bucket exists");
        assert_eq!(best.lat, "35.2");
    }

    #[test]
    fn first_candidate_wins_a_scoreless_tie() {
        let m = GeoMatcher::new(vec![
            cand("미미당", "", "", "35.0"),
            cand("미미당", "", "", "35.2"),
        ]);
        let best = m.find("미미당", "", "").expect("name bucket exists");
        assert_eq!(best.lat, "35.0");
    }

    #[test]
    fn shingle_overlap_requires_four_chars() {
        assert_eq!(shingle_overlap("용봉로", "용봉로"), 0.0);
        assert!(shingle_overlap("광주북구용봉로", "광주북구용봉로일대") > 0.0);
    }
}
