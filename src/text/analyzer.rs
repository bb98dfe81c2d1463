//! # Morphological Analyzer — Surface Forms + POS Tags
//!
//! Dictionary scoring, stopwording and the keyword surface all operate on
//! *morphemes*, not raw words: "조용한" must yield the stem 조용, "카페에서"
//! must yield 카페. The [`Analyzer`] trait is the seam for that capability —
//! the pipeline only requires `analyze(text) → sequence of (form, tag)` with
//! the closed tag set in [`PosTag`].
//!
//! ## Tag Set
//!
//! | Tag | Meaning | Example |
//! |-----|---------|---------|
//! | [`CommonNoun`](PosTag::CommonNoun) | common noun | 카페, 케이크 |
//! | [`ProperNoun`](PosTag::ProperNoun) | place / proper name | 광주, 전남대 |
//! | [`Foreign`](PosTag::Foreign) | Latin-script run | wifi, naver |
//! | [`Number`](PosTag::Number) | numeral run | 8,000 |
//! | [`Adjective`](PosTag::Adjective) | adjective stem | 맛있, 넓 |
//! | [`Verb`](PosTag::Verb) | verb stem | 먹, 마시 |
//! | [`Root`](PosTag::Root) | bare descriptive root | 달콤, 아늑 |
//!
//! ## Default Implementation
//!
//! [`LexiconAnalyzer`] segments Hangul runs by longest-match against a
//! morpheme lexicon built from the domain vocabulary (dictionaries, menu
//! keywords, facility tokens, stopword vocabulary) plus curated stem tables.
//! After a stem match it consumes the inflectional tail; after a nominal
//! match it consumes trailing particles. Unknown spans between matches are
//! flushed as common nouns. This is a heuristic segmentation, not a full
//! morphological model — unknown inflected forms come out as opaque noun
//! tokens and are filtered downstream by the stopword and allow-list gates.

use std::collections::HashMap;

use regex::Regex;

use crate::lexicon;
use crate::text::stopwords;

/// Part-of-speech class of a morpheme. Closed set — every emitted morpheme
/// carries exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PosTag {
    CommonNoun,
    ProperNoun,
    Foreign,
    Number,
    Adjective,
    Verb,
    Root,
}

impl PosTag {
    /// `true` for the nominal tags kept by the raw-tokenization pass
    /// (common/proper nouns, foreign, numeral and root forms).
    pub fn is_nominal(self) -> bool {
        matches!(
            self,
            PosTag::CommonNoun | PosTag::ProperNoun | PosTag::Foreign | PosTag::Number | PosTag::Root
        )
    }
}

/// One analyzed morpheme: normalized surface form plus its tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Morpheme {
    pub form: String,
    pub tag: PosTag,
}

/// Abstract morphological capability consumed by the tokenizer.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<Morpheme>;
}

/// Adjective stems that conjugate (맛있어요 → 맛있). The tokenizer
/// canonicalizes these by appending 다.
const ADJECTIVE_STEMS: &[&str] = &[
    "맛있", "좋", "많", "넓", "진하", "부드럽", "비싸", "달", "있", "없",
];

/// Verb stems that conjugate (먹었어요 → 먹). Includes the common
/// contracted past stems (갔/왔/됐) that do not decompose by suffix.
const VERB_STEMS: &[&str] = &[
    "먹", "마시", "찍", "만들", "즐기", "기다리", "앉", "들르", "꾸미", "어울리",
    "나오", "들어가", "보이", "찾", "느끼", "시키", "가", "오", "갔", "왔", "됐",
];

/// Bare descriptive roots emitted as-is — exactly the forms the tagging
/// dictionaries look up.
const DESCRIPTIVE_ROOTS: &[&str] = &[
    "조용", "차분", "한적", "잔잔", "아늑", "포근", "따뜻", "편안", "안락",
    "깔끔", "심플", "세련", "모던", "쾌적", "넉넉", "감각", "다양",
    "달콤", "달달", "고소", "담백", "산뜻", "촉촉", "폭신", "쫀득", "쫄깃",
    "상큼", "새콤", "짭짤", "솔티", "쌉싸름", "묵직", "리치", "쓴",
];

/// Inflectional tails consumed after an adjective/verb/root stem.
/// Checked longest-first, stripped greedily.
const ENDINGS: &[&str] = &[
    "었습니다", "았습니다", "했습니다", "더라고요", "습니다", "합니다",
    "었어요", "았어요", "했어요", "었는데", "았는데", "는데요",
    "네요", "어요", "아요", "해요", "여요", "고요", "세요", "지요",
    "었다", "았다", "했다", "는데", "지만", "아서", "어서", "어도", "아도",
    "으니", "으면", "으며", "하게", "하고", "해서", "하며", "하던",
    "했", "한", "할", "함", "었", "았",
    "다", "고", "게", "지", "면", "며", "은", "는", "을", "음", "기", "요", "죠", "서", "니",
];

/// Particles consumed after a nominal match. Checked longest-first.
const PARTICLES: &[&str] = &[
    "에서는", "에서도", "에서", "으로는", "으로", "이랑", "에게", "까지", "부터",
    "처럼", "보다", "조차", "밖에", "마다", "입니다", "이에요", "예요",
    "은", "는", "이", "가", "을", "를", "에", "의", "도", "만", "와", "과", "랑", "요", "로", "께",
];

/// Single trailing particle characters stripped from unknown spans.
const PARTICLE_CHARS: &[char] = &[
    '은', '는', '이', '가', '을', '를', '에', '의', '도', '만', '와', '과', '랑', '요', '께',
];

/// Lexicon-driven analyzer. Built once at pipeline start and shared.
pub struct LexiconAnalyzer {
    /// Word scanner: comma-grouped/plain numbers, Latin runs, Hangul runs.
    scan_re: Regex,
    /// Morpheme lexicon — form → tag.
    entries: HashMap<String, PosTag>,
    /// Longest entry length in chars (bounds the prefix search).
    max_entry_len: usize,
    /// [`ENDINGS`] sorted longest-first.
    endings: Vec<&'static str>,
    /// [`PARTICLES`] sorted longest-first.
    particles: Vec<&'static str>,
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        let mut entries: HashMap<String, PosTag> = HashMap::new();

        // Stems first — they must win over later nominal insertions.
        for &s in ADJECTIVE_STEMS {
            entries.insert(s.to_string(), PosTag::Adjective);
        }
        for &s in VERB_STEMS {
            entries.entry(s.to_string()).or_insert(PosTag::Verb);
        }
        for &s in DESCRIPTIVE_ROOTS {
            entries.entry(s.to_string()).or_insert(PosTag::Root);
        }

        // Place names from the location stopword table are proper nouns.
        for &w in stopwords::LOCATION_STOPWORDS {
            if is_hangul_word(w) {
                entries.entry(w.to_string()).or_insert(PosTag::ProperNoun);
            }
        }

        // Everything else in the domain vocabulary is a common noun:
        // dictionary triggers, menu keywords, facility tokens and the
        // Hangul stopword vocabulary (so compounds like 주차가능 split
        // cleanly and stopwords are isolated for the downstream filter).
        let mut nouns: Vec<&str> = Vec::new();
        for dict in [lexicon::MOOD_DICT, lexicon::TASTE_DICT, lexicon::COMPANION_DICT] {
            for (_, triggers) in dict {
                nouns.extend(triggers.iter().copied());
            }
        }
        nouns.extend(lexicon::MENU_KEYWORDS.iter().copied());
        nouns.extend(stopwords::FACILITY_TOKENS.iter().copied());
        nouns.extend(stopwords::BASE_STOPWORDS.iter().copied());
        nouns.extend(stopwords::PLATFORM_STOPWORDS.iter().copied());
        nouns.extend(stopwords::REVIEW_STOPWORDS.iter().copied());
        nouns.extend(stopwords::PROCESS_STOPWORDS.iter().copied());
        nouns.extend(stopwords::TOP40_ONLY_STOPWORDS.iter().copied());
        for w in nouns {
            // Dictionary-form verbs (먹다, 좋다 …) are reached through the
            // stem tables instead.
            if is_hangul_word(w) && !w.ends_with('다') {
                entries.entry(w.to_string()).or_insert(PosTag::CommonNoun);
            }
        }

        let max_entry_len = entries.keys().map(|k| k.chars().count()).max().unwrap_or(1);

        let mut endings: Vec<&'static str> = ENDINGS.to_vec();
        endings.sort_by_key(|e| std::cmp::Reverse(e.chars().count()));
        let mut particles: Vec<&'static str> = PARTICLES.to_vec();
        particles.sort_by_key(|p| std::cmp::Reverse(p.chars().count()));

        Self {
            scan_re: Regex::new(r"(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|[A-Za-z]+|[가-힣]+").unwrap(),
            entries,
            max_entry_len,
            endings,
            particles,
        }
    }

    /// Longest lexicon entry that is a prefix of `rest`.
    fn longest_entry(&self, rest: &[char]) -> Option<(usize, String, PosTag)> {
        let max = self.max_entry_len.min(rest.len());
        for len in (1..=max).rev() {
            let cand: String = rest[..len].iter().collect();
            if let Some(&tag) = self.entries.get(&cand) {
                return Some((len, cand, tag));
            }
        }
        None
    }

    /// Length (in chars) of the longest suffix string from `table` that is
    /// a prefix of `rest`, or `None`.
    fn longest_prefix(rest: &[char], table: &[&'static str]) -> Option<usize> {
        for &s in table {
            let len = s.chars().count();
            if len <= rest.len() && rest[..len].iter().collect::<String>() == s {
                return Some(len);
            }
        }
        None
    }

    /// Segments one Hangul run into morphemes.
    fn segment_hangul(&self, run: &str, out: &mut Vec<Morpheme>) {
        let chars: Vec<char> = run.chars().collect();
        let mut pending = String::new();
        let mut i = 0;
        while i < chars.len() {
            match self.longest_entry(&chars[i..]) {
                Some((len, form, tag)) => {
                    flush_pending(&mut pending, out);
                    i += len;
                    // Consume the inflectional tail / trailing particles so
                    // they do not surface as bogus noun fragments. A multi-char
                    // lexicon entry at the current position wins over the tail
                    // consumption (주차가능 must split as 주차+가능, while
                    // 커피가 sheds the particle 가).
                    let table: &[&'static str] =
                        if matches!(tag, PosTag::Adjective | PosTag::Verb | PosTag::Root) {
                            &self.endings
                        } else {
                            &self.particles
                        };
                    loop {
                        let rest = &chars[i..];
                        if rest.is_empty() {
                            break;
                        }
                        if let Some((elen, _, _)) = self.longest_entry(rest) {
                            if elen >= 2 {
                                break;
                            }
                        }
                        match Self::longest_prefix(rest, table) {
                            Some(n) => i += n,
                            None => break,
                        }
                    }
                    out.push(Morpheme { form, tag });
                }
                None => {
                    pending.push(chars[i]);
                    i += 1;
                }
            }
        }
        flush_pending(&mut pending, out);
    }
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Vec<Morpheme> {
        let mut out = Vec::new();
        for m in self.scan_re.find_iter(text) {
            let word = m.as_str();
            let first = word.chars().next().unwrap_or(' ');
            if first.is_ascii_digit() {
                out.push(Morpheme {
                    form: word.to_string(),
                    tag: PosTag::Number,
                });
            } else if first.is_ascii_alphabetic() {
                out.push(Morpheme {
                    form: word.to_string(),
                    tag: PosTag::Foreign,
                });
            } else {
                self.segment_hangul(word, &mut out);
            }
        }
        out
    }
}

/// Flushes an unknown span as a common noun, dropping one trailing
/// particle character when the remainder stays ≥ 2 chars.
fn flush_pending(pending: &mut String, out: &mut Vec<Morpheme>) {
    if pending.is_empty() {
        return;
    }
    let mut form = std::mem::take(pending);
    let chars: Vec<char> = form.chars().collect();
    if chars.len() >= 2 {
        if let Some(&last) = chars.last() {
            if PARTICLE_CHARS.contains(&last) {
                form = chars[..chars.len() - 1].iter().collect();
            }
        }
    }
    out.push(Morpheme {
        form,
        tag: PosTag::CommonNoun,
    });
}

fn is_hangul_word(w: &str) -> bool {
    !w.is_empty() && w.chars().all(|c| ('가'..='힣').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms(morphemes: &[Morpheme]) -> Vec<&str> {
        morphemes.iter().map(|m| m.form.as_str()).collect()
    }

    #[test]
    fn numbers_keep_comma_grouping() {
        let a = LexiconAnalyzer::new();
        let out = a.analyze("8,000");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].form, "8,000");
        assert_eq!(out[0].tag, PosTag::Number);
    }

    #[test]
    fn latin_runs_are_foreign() {
        let a = LexiconAnalyzer::new();
        let out = a.analyze("wifi");
        assert_eq!(out[0].tag, PosTag::Foreign);
    }

    #[test]
    fn menu_keyword_is_single_noun() {
        let a = LexiconAnalyzer::new();
        assert_eq!(forms(&a.analyze("아메리카노")), vec!["아메리카노"]);
        assert_eq!(a.analyze("아메리카노")[0].tag, PosTag::CommonNoun);
    }

    #[test]
    fn adjective_stem_sheds_ending() {
        let a = LexiconAnalyzer::new();
        let out = a.analyze("맛있어요");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].form, "맛있");
        assert_eq!(out[0].tag, PosTag::Adjective);
    }

    #[test]
    fn descriptive_root_sheds_ending() {
        let a = LexiconAnalyzer::new();
        let out = a.analyze("조용한 카페");
        assert_eq!(forms(&out), vec!["조용", "카페"]);
        assert_eq!(out[0].tag, PosTag::Root);
    }

    #[test]
    fn noun_sheds_particle() {
        let a = LexiconAnalyzer::new();
        // 에서 is itself a lexicon entry (base stopword) — it surfaces here
        // and is removed by the stopword filter downstream.
        assert_eq!(forms(&a.analyze("카페에서")), vec!["카페", "에서"]);
        assert_eq!(forms(&a.analyze("케이크를")), vec!["케이크"]);
    }

    #[test]
    fn compound_facility_phrase_splits() {
        let a = LexiconAnalyzer::new();
        assert_eq!(forms(&a.analyze("주차가능")), vec!["주차", "가능"]);
    }

    #[test]
    fn unknown_brand_with_unit_number() {
        let a = LexiconAnalyzer::new();
        let out = a.analyze("미미당906");
        assert_eq!(forms(&out), vec!["미미당", "906"]);
        assert_eq!(out[0].tag, PosTag::CommonNoun);
        assert_eq!(out[1].tag, PosTag::Number);
    }

    #[test]
    fn proper_noun_for_place_names() {
        let a = LexiconAnalyzer::new();
        let out = a.analyze("광주");
        assert_eq!(out[0].tag, PosTag::ProperNoun);
    }
}
