//! # Lexicon Tagger — Dictionary-Based Multi-Label Tagging
//!
//! Three independent labeled-word dictionaries turn token counts into
//! descriptive tags:
//!
//! | Category | Example label | Example triggers |
//! |----------|---------------|------------------|
//! | [`Mood`](Category::Mood) | 조용 | 조용, 차분, 한적, 잔잔, 힐링 |
//! | [`Taste`](Category::Taste) | 달콤 | 달콤, 달다, 단맛, 꿀, 카라멜 |
//! | [`Companion`](Category::Companion) | 데이트 | 데이트, 연인, 커플, 분위기 |
//!
//! For each dictionary, `score(label) = Σ counts[trigger]` over the label's
//! trigger words. Only labels with score > 0 are kept, ranked descending;
//! the sort is stable so ties preserve dictionary definition order.
//!
//! Menu extraction uses the flat [`MENU_KEYWORDS`] list: a keyword scores
//! once per raw substring occurrence in the full text **and** once per
//! tokenized count, then the top-K survive (K = 8; the first 3 of those
//! are the "primary menu" subset).

use std::cmp::Reverse;

use crate::model::TokenCounts;

/// Mood dictionary — label → trigger words, definition order preserved.
pub const MOOD_DICT: &[(&str, &[&str])] = &[
    ("감성", &["감성", "인스타", "포토존", "무드", "빈티지", "유럽", "감각"]),
    ("조용", &["조용", "차분", "한적", "잔잔", "힐링"]),
    ("아늑", &["아늑", "포근", "따뜻", "편안", "안락"]),
    ("모던", &["모던", "깔끔", "심플", "세련", "미니멀"]),
    ("넓음", &["넓", "좌석", "자리", "쾌적", "넉넉"]),
    ("뷰/통창", &["통창", "뷰", "전망", "창가", "햇살", "채광"]),
    ("테라스", &["테라스", "야외", "루프탑", "마당"]),
    ("한옥/전통", &["한옥", "전통", "고택", "기와", "마을"]),
    ("키즈/가족친화", &["키즈", "유모차", "어린이", "아이"]),
    ("반려동물", &["애견", "반려", "강아지", "펫", "애견동반"]),
];

/// Taste dictionary.
pub const TASTE_DICT: &[(&str, &[&str])] = &[
    ("달콤", &["달콤", "달다", "단맛", "꿀", "카라멜"]),
    ("고소", &["고소", "견과", "버터", "피넛", "피스타치오"]),
    ("진함", &["진하", "풍미", "농도", "리치", "묵직"]),
    ("담백", &["담백", "깔끔", "산뜻"]),
    ("촉촉/쫀득", &["촉촉", "부드럽", "폭신", "쫀득", "쫄깃"]),
    ("상큼", &["상큼", "새콤", "과일", "레몬", "딸기", "망고"]),
    ("단짠/짭짤", &["소금", "짭짤", "단짠", "솔티"]),
    ("쌉싸름/다크", &["쌉싸름", "쓴", "다크", "에스프레소", "말차"]),
];

/// Companion dictionary. Label order doubles as the recommendation-type
/// priority further down the pipeline.
pub const COMPANION_DICT: &[(&str, &[&str])] = &[
    ("데이트", &["데이트", "연인", "커플", "분위기"]),
    ("가족", &["가족", "부모", "아이", "어린이", "아기", "유모차"]),
    ("친구", &["친구", "모임", "수다"]),
    ("혼카페/작업", &["혼자", "혼카페", "혼공", "작업", "공부", "노트북", "콘센트", "와이파이"]),
    ("반려동물/애견동반", &["애견", "반려", "강아지", "펫", "애견동반"]),
    ("단체/대관", &["단체", "대관", "예약", "모임"]),
];

/// Flat menu keyword list, order preserved (ranking tie-break depends on it).
pub const MENU_KEYWORDS: &[&str] = &[
    // shaved ice / desserts
    "빙수", "팥빙수", "망고빙수", "딸기빙수", "흑임자빙수",
    "케이크", "치즈케이크", "티라미수", "롤케이크", "바스크치즈케이크",
    "스콘", "쿠키", "휘낭시에", "마들렌", "브라우니", "버터바",
    "소금빵", "크루아상", "베이글", "식빵", "크림빵", "잠봉뵈르",
    "푸딩", "파르페", "타르트", "파이", "애플파이",
    "젤라또", "아이스크림",
    // meals / brunch
    "브런치", "와플", "토스트", "샌드위치", "파니니", "파스타", "피자", "스테이크", "포케", "샐러드",
    // drinks
    "라떼", "카페라떼", "아메리카노", "콜드브루", "핸드드립", "에스프레소",
    "말차", "초코", "바닐라", "딸기라떼", "레몬에이드", "에이드", "밀크티", "자몽에이드",
    // trend / ingredients
    "카다이프", "피스타치오",
];

/// Tag category — a closed set; each holds an ordered label → triggers map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Mood,
    Taste,
    Companion,
}

impl Category {
    pub fn dict(self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            Category::Mood => MOOD_DICT,
            Category::Taste => TASTE_DICT,
            Category::Companion => COMPANION_DICT,
        }
    }
}

/// Menu keyword list with duplicates removed, first occurrence wins.
pub fn menu_keywords() -> Vec<&'static str> {
    let mut seen = std::collections::HashSet::new();
    MENU_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| seen.insert(*kw))
        .collect()
}

/// Stateless dictionary scorer.
pub struct LexiconTagger;

impl LexiconTagger {
    /// Scores every label of `category` against the venue's token counts.
    ///
    /// Returns `(label, score)` pairs with score > 0, descending; ties keep
    /// dictionary definition order (stable sort).
    pub fn score(counts: &TokenCounts, category: Category) -> Vec<(String, u32)> {
        let mut scored: Vec<(String, u32)> = category
            .dict()
            .iter()
            .map(|(label, triggers)| {
                let total: u32 = triggers.iter().map(|&w| counts.get(w)).sum();
                (label.to_string(), total)
            })
            .filter(|&(_, total)| total > 0)
            .collect();
        scored.sort_by_key(|&(_, total)| Reverse(total));
        scored
    }

    /// Extracts the top-K menu keywords for a venue.
    ///
    /// A keyword scores twice: raw substring containment in the full text
    /// (keywords ≥ 2 chars only) plus its tokenized count. Ranking is
    /// descending by combined score; score ties put substring-matched
    /// keywords before token-only ones, then keyword-list order.
    pub fn extract_menus(text: &str, counts: &TokenCounts, topk: usize) -> Vec<String> {
        let keywords = menu_keywords();
        let mut found: Vec<(&str, u32)> = Vec::new();
        if !text.is_empty() {
            for &kw in &keywords {
                if kw.chars().count() >= 2 && text.contains(kw) {
                    found.push((kw, 1));
                }
            }
        }
        for &kw in &keywords {
            let n = counts.get(kw);
            if n == 0 {
                continue;
            }
            match found.iter_mut().find(|(k, _)| *k == kw) {
                Some((_, score)) => *score += n,
                None => found.push((kw, n)),
            }
        }
        found.sort_by_key(|&(_, score)| Reverse(score));
        found.into_iter().take(topk).map(|(kw, _)| kw.to_string()).collect()
    }
}
