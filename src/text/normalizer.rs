//! # Text Normalizer — Review Text Cleanup
//!
//! Raw blog review text arrives full of emoji, URLs and layout whitespace.
//! The [`TextNormalizer`] turns it into a single clean line before any
//! tokenization or pattern matching happens.
//!
//! ## Cleanup Steps (in order)
//!
//! | Step | What it does |
//! |------|--------------|
//! | 1 | NFC Unicode normalization (composed Hangul) |
//! | 2 | Emoji code blocks → space (plus U+FE0F / U+200D markers) |
//! | 3 | `http(s)://…` and `www.…` spans removed |
//! | 4 | CR/LF/tab runs → single space |
//! | 5 | Any whitespace run → single space, ends trimmed |
//!
//! Cleaning is total: there is no input that makes it fail. Empty input
//! yields an empty string, and cleaning already-clean text is a no-op.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Emoji code blocks replaced by a space before tokenization.
///
/// Declarative table of inclusive (start, end) code point ranges.
/// Covers emoticons, pictographs, transport, flags, dingbats and the
/// supplemental/extended blocks that show up in review text.
const EMOJI_BLOCKS: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F680, 0x1F6FF), // transport and map symbols
    (0x1F1E0, 0x1F1FF), // regional indicators (flags)
    (0x2700, 0x27BF),   // dingbats
    (0x1F900, 0x1F9FF), // supplemental symbols
    (0x1FA70, 0x1FAFF), // symbols extended-A
    (0x2600, 0x26FF),   // misc symbols
];

/// Marker code points that glue emoji sequences together.
///
/// U+FE0F (variation selector) and U+200D (zero-width joiner) survive the
/// block ranges above, so they are replaced separately.
const EMOJI_MARKERS: &[char] = &['\u{FE0F}', '\u{200D}'];

/// Normalizes raw review text into a single clean line.
///
/// The regexes are compiled once at construction and reused for every
/// record — the normalizer is built at pipeline start and shared.
pub struct TextNormalizer {
    /// Matches `http://…`, `https://…` and `www.…` spans up to whitespace.
    url_re: Regex,
    /// Matches runs of carriage returns, newlines and tabs.
    crlf_re: Regex,
    /// Matches any whitespace run (final collapse pass).
    ws_re: Regex,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            url_re: Regex::new(r"https?://\S+|www\.\S+").unwrap(),
            crlf_re: Regex::new(r"[\r\n\t]+").unwrap(),
            ws_re: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Cleans one text field. Never fails — worst case is an empty string.
    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        // NFC first so composed/decomposed Hangul compare equal downstream
        let text: String = text.nfc().collect();
        let text = strip_emoji(&text);
        let text = self.url_re.replace_all(&text, " ");
        let text = self.crlf_re.replace_all(&text, " ");
        let text = self.ws_re.replace_all(&text, " ");
        text.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces emoji block characters and joiner markers with a space.
pub fn strip_emoji(text: &str) -> String {
    text.chars()
        .map(|c| if is_emoji(c) { ' ' } else { c })
        .collect()
}

/// `true` if the character falls in one of the [`EMOJI_BLOCKS`] ranges
/// or is one of the [`EMOJI_MARKERS`].
fn is_emoji(c: char) -> bool {
    if EMOJI_MARKERS.contains(&c) {
        return true;
    }
    let cp = c as u32;
    EMOJI_BLOCKS.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let n = TextNormalizer::new();
        assert_eq!(n.clean(""), "");
    }

    #[test]
    fn already_clean_text_is_unchanged() {
        let n = TextNormalizer::new();
        let text = "조용한 카페 분위기 좋아요";
        assert_eq!(n.clean(text), text);
    }

    #[test]
    fn strips_emoji_blocks() {
        let n = TextNormalizer::new();
        assert_eq!(n.clean("커피 ☕ 좋아요 😀"), "커피 좋아요");
    }

    #[test]
    fn strips_joiner_markers() {
        let n = TextNormalizer::new();
        assert_eq!(n.clean("좋아요\u{FE0F}\u{200D} 카페"), "좋아요 카페");
    }

    #[test]
    fn removes_urls() {
        let n = TextNormalizer::new();
        assert_eq!(
            n.clean("후기 https://blog.naver.com/abc 입니다 www.example.com 끝"),
            "후기 입니다 끝"
        );
    }

    #[test]
    fn collapses_whitespace_runs() {
        let n = TextNormalizer::new();
        assert_eq!(n.clean("  케이크\r\n맛집\t\t추천   "), "케이크 맛집 추천");
    }

    #[test]
    fn clean_is_idempotent() {
        let n = TextNormalizer::new();
        let once = n.clean("빙수 🍧 먹고 왔어요\nhttps://x.com/1");
        assert_eq!(n.clean(&once), once);
    }
}
