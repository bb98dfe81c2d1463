//! # Stopword Tables — Linguistic, Domain and Per-Venue
//!
//! Keyword output is only as good as what it leaves out. This module holds
//! the curated stopword tables and the per-venue stopword builder.
//!
//! ## Table Layers
//!
//! | Layer | Applied to | Purpose |
//! |-------|-----------|---------|
//! | base | both profiles | functional words, filler adverbs |
//! | location | both | region/address vocabulary (worst top-40 polluter) |
//! | platform | both | crawler/platform noise (naver, 블로그, …) |
//! | review | both | low-information review meta words |
//! | process | both | ordering/payment/opening-hours process words |
//! | verb | both | semantically empty verbs (가다, 먹다, …) |
//! | top40-only | `top40` profile | generic category + meta words too broad for a public tag surface |
//! | row-level | both, per venue | venue-name/address fragments (brand leakage) |
//!
//! ## Protected Tokens
//!
//! Facility/amenity tokens (주차, 와이파이, 콘센트, …) are high-value tagging
//! signal. They are subtracted from the domain set at construction and from
//! every row-level set, so no stopword layer can ever remove them.

use std::collections::HashSet;

use regex::Regex;

use crate::lexicon;
use crate::text::tokenizer::Tokenizer;

/// Functional words and filler adverbs (both profiles).
pub const BASE_STOPWORDS: &[&str] = &[
    "그리고", "그러나", "그런데", "또한", "그래서", "그러면", "하지만", "때문에", "위해", "통해",
    "대한", "대해", "저는", "제가", "우리는", "우리", "너는", "너가", "여러분", "이", "그", "저",
    "것", "거", "수", "등", "등등", "정말", "너무", "아주", "진짜", "그냥", "약간", "조금", "많이",
    "운영", "품절", "모드라", "전화", "나누다", "오더", "에서", "으로", "로", "에게", "보다",
    "처럼", "같이", "마련", "안쪽", "고민", "취향", "바우", "있다", "없다", "되다", "하다", "이다",
    "아니다", "같다", "미술관", "카운터", "기대", "복합", "거북", "오늘", "어제", "내일", "이번",
    "지난", "다음", "처음", "식물", "가게", "선택", "판매", "지구", "안녕", "사진", "영상", "글",
    "포스팅", "후기", "리뷰", "방문", "방문자", "구성", "추가", "카페", "가능", "공간", "화순",
];

/// Amenity tokens that must survive every stopword layer.
pub const FACILITY_TOKENS: &[&str] = &[
    "주차", "주차장", "와이파이", "wifi", "콘센트", "좌석", "자리", "테이블", "의자",
    "화장실", "흡연", "금연",
    "노키즈", "노키즈존", "키즈", "키즈존",
    "애견", "반려견", "애견동반", "반려동물", "펫프렌들리",
    "유아", "유아의자", "수유실",
    "휠체어", "장애인", "엘리베이터",
];

/// Region/address vocabulary — the number-one source of top-40 pollution.
pub const LOCATION_STOPWORDS: &[&str] = &[
    // metropolitan / administrative
    "광주", "광주광역시", "전남", "전라남도", "북구", "남구", "동구", "서구", "광산구",
    // neighbourhoods / campuses / stations
    "동명동", "양림동", "봉선동", "상무지구", "수완지구", "첨단", "쌍촌동", "용봉동", "일곡동",
    "중흥동", "용전동", "치평동", "화정동", "풍암동", "금호동", "선운지구", "신창동", "신가동",
    "운남동", "장덕동", "오치동", "정문", "후문", "상대", "예대", "전대", "조대", "호대",
    "광주대", "광주역", "터미널", "송정역", "전남대",
    // road names
    "제봉로", "백서로", "운천로", "상무대로", "우치로", "설죽로", "대남대로", "서문대로",
    // generic location words
    "근처", "주변", "인근", "골목", "위치", "주소", "지도", "빌딩", "건물", "아파트", "상가",
    "상무", "중흥",
    // other regions (narrative noise)
    "서울", "부산", "대구", "대전", "울산", "인천", "제주",
    "나주", "담양", "화순", "곡성", "군산", "포항", "전주", "목포", "순천", "여수",
];

/// Crawler/platform noise. 인스타 stays out of this list on purpose —
/// "인스타 감성" is a mood signal used by the tagging dictionaries.
pub const PLATFORM_STOPWORDS: &[&str] = &[
    "naver", "네이버", "블로그", "방문기", "포스팅", "링크", "공유", "업로드",
    "정보", "확인", "참고", "검색", "사이트", "영수증", "인증", "내돈내산",
    "corp", "corp.", "next", "image", "light",
    "tistory", "유튜브", "youtube",
    "cafe", "dessert", "brunch", "insta", "instagram", "instagram.com",
];

/// Low-information review meta/evaluation words.
pub const REVIEW_STOPWORDS: &[&str] = &[
    "종류", "느낌", "정도", "개인", "총평", "솔직", "기대", "만족",
    "유명", "인기", "핫플", "신상", "인생", "최고",
    "최근", "주말", "평일", "처음", "마지막", "취향",
    "생각", "비주얼", "모습", "이름",
];

/// Ordering/payment/opening-hours process words. 주차 is deliberately
/// absent — it belongs to [`FACILITY_TOKENS`].
pub const PROCESS_STOPWORDS: &[&str] = &[
    "사장님", "사장", "직원", "알바", "서비스", "친절", "응대",
    "가격", "가성비", "비싸다", "저렴",
    "메뉴판", "키오스크", "주문", "결제", "카드", "현금", "선불", "후불",
    "포장", "배달", "테이크아웃", "픽업", "예약", "대기", "웨이팅",
    "영업시간", "휴무", "정기", "오픈", "마감", "라스트오더",
    "매장", "내부", "외부", "외관", "간판", "입구", "출구", "계단", "지하",
];

/// Semantically empty verbs that dominate raw frequency counts.
pub const VERB_STOPWORDS: &[&str] = &[
    "오다", "가다", "들르다", "방문", "나오다", "들어가다", "보이다", "찍다", "찾다", "주다",
    "들다", "맞다", "만들다", "알다", "느끼다", "먹다", "마시다", "사다", "구매", "시키다",
    "즐기다", "기다리다", "앉다", "꾸미다", "어울리다",
];

/// Extra stopwords for the `top40` profile only — words that are fine for
/// dictionary tagging but too generic for a public keyword surface.
pub const TOP40_ONLY_STOPWORDS: &[&str] = &[
    // overly broad nouns
    "가게", "매장", "내부", "외부", "공간", "장소", "곳",
    // evaluation words with no descriptive power
    "좋다", "맛있다", "추천", "맛집", "인기", "유명", "최고", "만족", "기대", "솔직", "취향",
    "많다", "다양",
    // categories every cafe matches anyway
    "분위기", "메뉴", "커피", "음료", "디저트",
    // review meta/content words
    "리뷰", "후기", "블로그", "포스팅", "사진", "포토", "동영상",
    // weak action/planning fragments
    "시간", "전체", "예상", "준비", "제작", "기념", "선물", "단체",
    // process words (duplicated here so the top40 union stays complete)
    "메뉴판", "키오스크", "주문", "결제", "포장", "테이크아웃", "픽업", "예약", "대기", "웨이팅",
    // campus landmarks (covered by the address column)
    "전남대학교", "전대", "전대정", "정문", "후문", "기숙사", "예대",
    // franchise context
    "가맹점", "사이렌", "패스",
];

/// Meaningful single-character tokens kept despite the single-char filter.
pub const ALLOWED_SINGLE: &[&str] = &["빵", "차", "떡", "잼", "쌀", "귤", "밤", "팥"];

/// Business-name suffixes used for the secondary brand-root emission
/// (미미당 → 미미) and by the row stopword builder.
pub const NAME_SUFFIXES: &[&str] = &[
    "당", "카페", "커피", "베이커리", "브로트", "로스터리", "로스터", "로스터스",
    "하우스", "스튜디오", "제과", "디저트", "도넛", "케이크", "마카롱", "빙수",
    "티룸", "티", "바", "랩",
];

/// Domain stopword set shared by both profiles: the five domain layers,
/// minus the protected facility tokens.
pub fn domain_stopwords() -> HashSet<String> {
    let mut set: HashSet<String> = HashSet::new();
    for layer in [
        LOCATION_STOPWORDS,
        PLATFORM_STOPWORDS,
        REVIEW_STOPWORDS,
        PROCESS_STOPWORDS,
        VERB_STOPWORDS,
    ] {
        set.extend(layer.iter().map(|s| s.to_string()));
    }
    for &t in FACILITY_TOKENS {
        set.remove(t);
    }
    set
}

/// Derives the per-venue stopword set from the venue name, district and
/// address, so recurring brand/location mentions in review text stay out
/// of the public keyword surface.
///
/// ## Derivation
///
/// 1. Split the raw and match-normalized name on whitespace/punctuation.
/// 2. Strip branch markers (N호점, 본점/지점/점) and embedded digits.
/// 3. Re-tokenize each fragment, the district and the address through the
///    raw nominal pass (noun/foreign/number/root tags only).
/// 4. Subtract the protected set (menu keywords ∪ facility tokens).
/// 5. Drop fragments shorter than 2 chars.
pub struct RowStopwordBuilder {
    split_re: Regex,
    branch_no_re: Regex,
    branch_re: Regex,
    protected: HashSet<String>,
}

impl RowStopwordBuilder {
    pub fn new() -> Self {
        let mut protected: HashSet<String> =
            lexicon::MENU_KEYWORDS.iter().map(|s| s.to_string()).collect();
        protected.extend(FACILITY_TOKENS.iter().map(|s| s.to_string()));
        Self {
            split_re: Regex::new(r"[\s\-_/()\[\]{}]+").unwrap(),
            branch_no_re: Regex::new(r"\d+\s*호점$").unwrap(),
            branch_re: Regex::new(r"(?:본점|지점|점)$").unwrap(),
            protected,
        }
    }

    pub fn build(
        &self,
        tokenizer: &Tokenizer,
        name: &str,
        district: &str,
        address: &str,
    ) -> HashSet<String> {
        let mut sw: HashSet<String> = HashSet::new();

        // ─── 1. Venue name: raw and normalized variants ──────────
        for base in [name.to_string(), crate::geo::norm(name)] {
            if base.is_empty() {
                continue;
            }
            for part in self.split_re.split(&base) {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                let part = self.branch_no_re.replace(part, "");
                let part = self.branch_re.replace(&part, "");
                let part: String = part.chars().filter(|c| !c.is_ascii_digit()).collect();
                let part = part.trim();
                if !part.is_empty() {
                    sw.extend(tokenizer.raw_nominal_tokens(part));
                }
            }
        }

        // ─── 2. District and address ─────────────────────────────
        for s in [district, address] {
            if !s.is_empty() {
                sw.extend(tokenizer.raw_nominal_tokens(s));
            }
        }

        // Protected tokens are never excluded, short fragments are noise.
        sw.retain(|t| !self.protected.contains(t) && t.chars().count() >= 2);
        sw
    }
}

impl Default for RowStopwordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_set_never_contains_facility_tokens() {
        let domain = domain_stopwords();
        for &t in FACILITY_TOKENS {
            assert!(!domain.contains(t), "protected token {t} in domain stopwords");
        }
    }

    #[test]
    fn row_stopwords_cover_brand_fragments() {
        let tok = Tokenizer::new();
        let b = RowStopwordBuilder::new();
        let sw = b.build(&tok, "미미당906 2호점", "북구", "광주 북구 설죽로 123");
        assert!(sw.contains("미미당"), "expected 미미당 in {sw:?}");
        assert!(sw.contains("미미"), "expected stripped brand root 미미 in {sw:?}");
    }

    #[test]
    fn row_stopwords_never_swallow_menu_keywords() {
        let tok = Tokenizer::new();
        let b = RowStopwordBuilder::new();
        // A venue literally named after a menu item must not suppress it.
        let sw = b.build(&tok, "소금빵 하우스", "북구", "");
        assert!(!sw.contains("소금빵"), "menu keyword leaked into {sw:?}");
    }

    #[test]
    fn row_stopwords_drop_single_char_fragments() {
        let tok = Tokenizer::new();
        let b = RowStopwordBuilder::new();
        let sw = b.build(&tok, "봄 카페", "", "");
        assert!(sw.iter().all(|t| t.chars().count() >= 2), "{sw:?}");
    }
}
