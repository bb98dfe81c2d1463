//! # Scoring & Recommendation
//!
//! Turns enrichment signals into the user-facing recommendation columns:
//!
//! ```text
//! review count ─┐
//! menu count  ──┤
//! taste total ──┼──► weighted score (0..=100, one decimal)
//! mood total  ──┤
//! parking     ──┘
//! ```
//!
//! | Component | Cap | Weight |
//! |-----------|-----|--------|
//! | review count | 30 | 40 |
//! | menu count | 8 | 15 |
//! | taste score total | 15 | 20 |
//! | mood score total | 15 | 15 |
//! | parking available | — | +10 flat |
//!
//! Parking is detected from a declarative `(pattern, polarity)` table;
//! positive-only hits → available, negative-only → unavailable, both →
//! mixed, neither → unknown.

use regex::Regex;

/// Parking verdict for a venue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parking {
    Available,
    Unavailable,
    Mixed,
    #[default]
    Unknown,
}

impl Parking {
    /// Display label; unknown renders empty.
    pub fn label(self) -> &'static str {
        match self {
            Parking::Available => "가능",
            Parking::Unavailable => "불가",
            Parking::Mixed => "혼재(확인필요)",
            Parking::Unknown => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Polarity {
    Positive,
    Negative,
}

const PARKING_PATTERNS: &[(&str, Polarity)] = &[
    (r"주차\s*가능", Polarity::Positive),
    (r"무료\s*주차", Polarity::Positive),
    (r"주차장", Polarity::Positive),
    (r"전용\s*주차", Polarity::Positive),
    (r"매장\s*앞\s*주차", Polarity::Positive),
    (r"공영\s*주차", Polarity::Positive),
    (r"주차\s*불가", Polarity::Negative),
    (r"주차\s*안\s*됨", Polarity::Negative),
    (r"주차\s*어려", Polarity::Negative),
    (r"주차\s*힘들", Polarity::Negative),
    (r"주차\s*불편", Polarity::Negative),
];

pub struct ParkingDetector {
    patterns: Vec<(Regex, Polarity)>,
}

impl ParkingDetector {
    pub fn new() -> Self {
        let patterns = PARKING_PATTERNS
            .iter()
            .map(|&(p, pol)| (Regex::new(p).unwrap(), pol))
            .collect();
        Self { patterns }
    }

    pub fn detect(&self, text: &str) -> Parking {
        if text.is_empty() {
            return Parking::Unknown;
        }
        let mut pos = false;
        let mut neg = false;
        for (re, pol) in &self.patterns {
            if re.is_match(text) {
                match pol {
                    Polarity::Positive => pos = true,
                    Polarity::Negative => neg = true,
                }
            }
        }
        match (pos, neg) {
            (true, false) => Parking::Available,
            (false, true) => Parking::Unavailable,
            (true, true) => Parking::Mixed,
            (false, false) => Parking::Unknown,
        }
    }
}

impl Default for ParkingDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Recommendation type, picked from the venue's top companion tags by
/// fixed priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecommendType {
    Date,
    SoloWork,
    Family,
    Friends,
    #[default]
    Default,
}

impl RecommendType {
    pub fn label(self) -> &'static str {
        match self {
            RecommendType::Date => "데이트",
            RecommendType::SoloWork => "혼카페/작업",
            RecommendType::Family => "가족",
            RecommendType::Friends => "친구",
            RecommendType::Default => "기본",
        }
    }

    /// Priority order: date > solo/work > family > friends > default.
    pub fn from_companion_tags(tags: &[String]) -> Self {
        let has = |label: &str| tags.iter().any(|t| t == label);
        if tags.is_empty() {
            RecommendType::Default
        } else if has("데이트") {
            RecommendType::Date
        } else if has("혼카페/작업") {
            RecommendType::SoloWork
        } else if has("가족") {
            RecommendType::Family
        } else if has("친구") {
            RecommendType::Friends
        } else {
            RecommendType::Default
        }
    }
}

pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Weighted 0..=100 score, rounded to one decimal.
    pub fn score(
        review_count: u32,
        menu_count: usize,
        taste_total: u32,
        mood_total: u32,
        parking: Parking,
    ) -> f64 {
        let review_score = review_count.min(30) as f64 / 30.0 * 40.0;
        let menu_score = menu_count.min(8) as f64 / 8.0 * 15.0;
        let taste_score = taste_total.min(15) as f64 / 15.0 * 20.0;
        let mood_score = mood_total.min(15) as f64 / 15.0 * 15.0;
        let parking_bonus = if parking == Parking::Available { 10.0 } else { 0.0 };
        let total = review_score + menu_score + taste_score + mood_score + parking_bonus;
        // Ties round to even: the menu weight alone can land on an exact
        // .x5 (6/8 × 15 = 11.25), which must come out as 11.2, not 11.3.
        (total.min(100.0) * 10.0).round_ties_even() / 10.0
    }
}

/// One-line reason string, e.g.
/// `대표메뉴: 소금빵, 라떼 / 분위기: 조용, 아늑 / 주차: 가능`.
pub fn build_reason(
    primary_menus: &[String],
    mood_tags: &[String],
    taste_tags: &[String],
    parking: Parking,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !primary_menus.is_empty() {
        let top: Vec<&str> = primary_menus.iter().take(3).map(|s| s.as_str()).collect();
        parts.push(format!("대표메뉴: {}", top.join(", ")));
    }
    if !mood_tags.is_empty() {
        let top: Vec<&str> = mood_tags.iter().take(2).map(|s| s.as_str()).collect();
        parts.push(format!("분위기: {}", top.join(", ")));
    }
    if !taste_tags.is_empty() {
        let top: Vec<&str> = taste_tags.iter().take(2).map(|s| s.as_str()).collect();
        parts.push(format!("맛: {}", top.join(", ")));
    }
    if parking != Parking::Unknown {
        parts.push(format!("주차: {}", parking.label()));
    }
    parts.join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parking_positive_only() {
        let d = ParkingDetector::new();
        assert_eq!(d.detect("가게 앞 주차 가능 합니다"), Parking::Available);
        assert_eq!(d.detect("공영주차장 이용"), Parking::Available);
    }

    #[test]
    fn parking_negative_only() {
        let d = ParkingDetector::new();
        assert_eq!(d.detect("주차 불가, 대중교통 추천"), Parking::Unavailable);
        assert_eq!(d.detect("주차 어려워요"), Parking::Unavailable);
    }

    #[test]
    fn parking_mixed_when_both() {
        let d = ParkingDetector::new();
        assert_eq!(d.detect("주차장 있지만 주차 힘들어요"), Parking::Mixed);
    }

    #[test]
    fn parking_unknown_when_silent() {
        let d = ParkingDetector::new();
        assert_eq!(d.detect(""), Parking::Unknown);
        assert_eq!(d.detect("케이크가 맛있어요"), Parking::Unknown);
    }

    #[test]
    fn recommend_type_priority() {
        let tags = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            RecommendType::from_companion_tags(&tags(&["친구", "데이트"])),
            RecommendType::Date
        );
        assert_eq!(
            RecommendType::from_companion_tags(&tags(&["가족", "혼카페/작업"])),
            RecommendType::SoloWork
        );
        assert_eq!(
            RecommendType::from_companion_tags(&tags(&["단체/대관"])),
            RecommendType::Default
        );
        assert_eq!(RecommendType::from_companion_tags(&[]), RecommendType::Default);
    }

    #[test]
    fn score_is_bounded() {
        let max = ScoreCalculator::score(100, 20, 100, 100, Parking::Available);
        assert_eq!(max, 100.0);
        let min = ScoreCalculator::score(0, 0, 0, 0, Parking::Unknown);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn score_component_weights() {
        // Reviews saturate at 30 → full 40 points.
        assert_eq!(ScoreCalculator::score(30, 0, 0, 0, Parking::Unknown), 40.0);
        // 4 menus out of 8 → half of 15.
        assert_eq!(ScoreCalculator::score(0, 4, 0, 0, Parking::Unknown), 7.5);
        // Parking bonus is flat 10.
        assert_eq!(ScoreCalculator::score(0, 0, 0, 0, Parking::Available), 10.0);
    }

    #[test]
    fn score_monotone_in_review_count_until_cap() {
        let mut prev = -1.0;
        for n in 0..=35 {
            let s = ScoreCalculator::score(n, 0, 0, 0, Parking::Unknown);
            assert!(s >= prev, "score dropped at {n} reviews: {s} < {prev}");
            prev = s;
        }
        // Saturates at the 30-review cap.
        assert_eq!(ScoreCalculator::score(30, 0, 0, 0, Parking::Unknown), 40.0);
        assert_eq!(ScoreCalculator::score(35, 0, 0, 0, Parking::Unknown), 40.0);
    }

    #[test]
    fn score_rounds_to_one_decimal() {
        // 10 reviews → 10/30*40 = 13.333... → 13.3
        assert_eq!(ScoreCalculator::score(10, 0, 0, 0, Parking::Unknown), 13.3);
    }

    #[test]
    fn score_rounds_exact_ties_to_even() {
        // 6 menus → 6/8*15 = 11.25, a representable tie → 11.2.
        assert_eq!(ScoreCalculator::score(0, 6, 0, 0, Parking::Unknown), 11.2);
        // With the parking bonus the tie moves to 21.25 → 21.2.
        assert_eq!(ScoreCalculator::score(0, 6, 0, 0, Parking::Available), 21.2);
    }

    #[test]
    fn reason_joins_present_parts() {
        let menus = vec!["소금빵".to_string(), "라떼".to_string()];
        let moods = vec!["조용".to_string()];
        let reason = build_reason(&menus, &moods, &[], Parking::Available);
        assert_eq!(reason, "대표메뉴: 소금빵, 라떼 / 분위기: 조용 / 주차: 가능");
    }

    #[test]
    fn reason_empty_when_no_signals() {
        assert_eq!(build_reason(&[], &[], &[], Parking::Unknown), "");
    }
}
