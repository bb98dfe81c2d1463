//! # Tabular I/O
//!
//! The crate's only filesystem boundary: three CSV inputs in, five CSV
//! outputs out.
//!
//! | Direction | File | Content |
//! |-----------|------|---------|
//! | in | place CSV | scraped venue rows (`name`, `address`, `place_url`, `place_image_url`, `naver_place_html`) |
//! | in | blog CSV | review posts (`name`, `content`, `link`) |
//! | in | map CSV | provider candidates (`name`, `address`, `x`, `y`, `url`, `gu`) |
//! | out | master | one enriched row per venue |
//! | out | freq / global | per-venue and corpus keyword counts |
//! | out | price items / summary | extracted prices with provenance |
//!
//! Missing input columns default to empty; unreadable or unparsable input
//! files are fatal before any output is written. All outputs are UTF-8
//! with a BOM so spreadsheet tools detect the encoding.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::StringRecord;
use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::geo::{norm, KakaoCandidate};
use crate::model::{EnrichedVenue, TokenCounts, VenueRecord};
use crate::text::normalizer::TextNormalizer;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("io error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ─── Input parsing ───────────────────────────────────────────────

/// Field extractors for the scraped place rows.
pub struct PlaceParser {
    coord_re: Regex,
    id_url_re: Regex,
    id_html_re: Regex,
    district_re: Regex,
}

impl PlaceParser {
    pub fn new() -> Self {
        Self {
            coord_re: Regex::new(r"lng=([0-9.]+)&(?:amp;)?lat=([0-9.]+)").unwrap(),
            id_url_re: Regex::new(r"/place/(\d+)").unwrap(),
            id_html_re: Regex::new(r#""id"\s*:\s*"(\d{6,})""#).unwrap(),
            district_re: Regex::new(r"\s(동구|서구|남구|북구|광산구)\s").unwrap(),
        }
    }

    /// `(lat, lng)` from the embedded map URL, both empty when absent.
    pub fn coordinates(&self, html: &str) -> (String, String) {
        match self.coord_re.captures(html) {
            Some(c) => (c[2].to_string(), c[1].to_string()),
            None => (String::new(), String::new()),
        }
    }

    /// Gwangju district from the address, padded so the word boundaries hold.
    pub fn district(&self, address: &str) -> String {
        let padded = format!(" {address} ");
        self.district_re
            .captures(&padded)
            .map(|c| c[1].to_string())
            .unwrap_or_default()
    }

    /// Stable venue id: place URL id, then an id embedded in the page,
    /// then a 12-hex content hash of name and address.
    pub fn venue_id(&self, place_url: &str, html: &str, name: &str, address: &str) -> String {
        if let Some(c) = self.id_url_re.captures(place_url) {
            return c[1].to_string();
        }
        if let Some(c) = self.id_html_re.captures(html) {
            return c[1].to_string();
        }
        let hash = blake3::hash(format!("{name}_{address}").as_bytes());
        hash.to_hex().as_str()[..12].to_string()
    }
}

impl Default for PlaceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Trims a cell; the literal strings `nan`/`NaN` count as empty.
fn clean_cell(raw: &str) -> String {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("nan") {
        String::new()
    } else {
        s.to_string()
    }
}

struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        Self { index }
    }

    /// Missing columns read as empty, mirroring the defaulted-column rule.
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
    }
}

fn read_rows(path: &Path) -> Result<(Columns, Vec<StringRecord>), TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| TableError::Read { path: display(path), source })?;
    let headers = reader
        .headers()
        .map_err(|source| TableError::Read { path: display(path), source })?
        .clone();
    let columns = Columns::from_headers(&headers);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|source| TableError::Read { path: display(path), source })?;
        rows.push(record);
    }
    Ok((columns, rows))
}

/// Loads and merges the place and blog inputs into venue records.
///
/// Blog posts are grouped by normalized venue name; each venue gets its
/// post count and the space-joined cleaned text of all its posts.
pub fn load_venues(place_path: &Path, blog_path: &Path) -> Result<Vec<VenueRecord>, TableError> {
    let parser = PlaceParser::new();
    let normalizer = TextNormalizer::new();

    let (blog_cols, blog_rows) = read_rows(blog_path)?;
    let mut blog_groups: HashMap<String, (u32, String)> = HashMap::new();
    for row in &blog_rows {
        let key = norm(blog_cols.get(row, "name"));
        let content = normalizer.clean(blog_cols.get(row, "content"));
        let entry = blog_groups.entry(key).or_default();
        entry.0 += 1;
        if !entry.1.is_empty() {
            entry.1.push(' ');
        }
        entry.1.push_str(&content);
    }
    info!(posts = blog_rows.len(), venues = blog_groups.len(), "blog input grouped");

    let (place_cols, place_rows) = read_rows(place_path)?;
    let mut venues = Vec::with_capacity(place_rows.len());
    for row in &place_rows {
        let name = clean_cell(place_cols.get(row, "name"));
        let address = clean_cell(place_cols.get(row, "address"));
        let place_url = clean_cell(place_cols.get(row, "place_url"));
        let html = place_cols.get(row, "naver_place_html");

        let (lat, lng) = parser.coordinates(html);
        let (review_count, combined_text) = blog_groups
            .get(&norm(&name))
            .cloned()
            .unwrap_or((0, String::new()));

        venues.push(VenueRecord {
            id: parser.venue_id(&place_url, html, &name, &address),
            district: parser.district(&address),
            lat,
            lng,
            map_link: place_url,
            image_url: clean_cell(place_cols.get(row, "place_image_url")),
            review_count,
            combined_text,
            name,
            address,
        });
    }
    info!(venues = venues.len(), "place input loaded");
    Ok(venues)
}

/// Loads the map-provider dump, pre-normalizing the match keys.
pub fn load_candidates(path: &Path) -> Result<Vec<KakaoCandidate>, TableError> {
    let (cols, rows) = read_rows(path)?;
    let candidates = rows
        .iter()
        .map(|row| KakaoCandidate {
            name_norm: norm(cols.get(row, "name")),
            addr_norm: norm(cols.get(row, "address")),
            lat: clean_cell(cols.get(row, "y")),
            lng: clean_cell(cols.get(row, "x")),
            url: clean_cell(cols.get(row, "url")),
            gu: clean_cell(cols.get(row, "gu")),
        })
        .collect::<Vec<_>>();
    info!(candidates = candidates.len(), "map candidates loaded");
    Ok(candidates)
}

// ─── Output writing ──────────────────────────────────────────────

fn writer_with_bom(path: &Path) -> Result<csv::Writer<File>, TableError> {
    let mut file =
        File::create(path).map_err(|source| TableError::Io { path: display(path), source })?;
    file.write_all("\u{FEFF}".as_bytes())
        .map_err(|source| TableError::Io { path: display(path), source })?;
    Ok(csv::Writer::from_writer(file))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// JSON array cell, element-quoted but spaced like a display list.
fn json_str_list(items: &[String]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|s| serde_json::to_string(s).unwrap_or_default())
        .collect();
    format!("[{}]", parts.join(", "))
}

fn json_u32_list(items: &[u32]) -> String {
    let parts: Vec<String> = items.iter().map(|n| n.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

pub fn write_master(path: &Path, venues: &[EnrichedVenue]) -> Result<(), TableError> {
    let mut w = writer_with_bom(path)?;
    let wrap = |source| TableError::Write { path: display(path), source };
    w.write_record([
        "카페id",
        "카페이름",
        "주소",
        "지역(구단위)",
        "좌표(lat)",
        "좌표(lng)",
        "지도링크",
        "카페이미지url",
        "분위기",
        "맛",
        "동반자",
        "메뉴",
        "주요메뉴",
        "주차여부",
        "블로그수",
        "추천점수(0-100)",
        "추천유형",
        "추천태그",
        "추천문구",
        "가격요약",
        "가격목록",
        "키워드TOP40",
    ])
    .map_err(wrap)?;

    for v in venues {
        let r = &v.record;
        let prices: Vec<u32> =
            v.price_summary.as_ref().map(|s| s.prices.clone()).unwrap_or_default();
        let top40: Vec<String> = v.top40.iter().map(|(t, _)| t.clone()).collect();
        w.write_record([
            clean_cell(&r.id),
            clean_cell(&r.name),
            clean_cell(&r.address),
            clean_cell(&r.district),
            clean_cell(&r.lat),
            clean_cell(&r.lng),
            clean_cell(&r.map_link),
            clean_cell(&r.image_url),
            v.mood_tags.join(", "),
            v.taste_tags.join(", "),
            v.companion_tags.join(", "),
            v.menus.join(", "),
            v.primary_menus.join(", "),
            v.parking.label().to_string(),
            r.review_count.to_string(),
            format!("{:.1}", v.score),
            v.recommend_type.clone(),
            v.recommend_tags.clone(),
            v.recommend_msg.clone(),
            v.price_summary.as_ref().map(|s| s.label.clone()).unwrap_or_default(),
            json_u32_list(&prices),
            json_str_list(&top40),
        ])
        .map_err(wrap)?;
    }
    w.flush().map_err(|source| TableError::Io { path: display(path), source })?;
    info!(path = %path.display(), venues = venues.len(), "master table written");
    Ok(())
}

/// Per-venue keyword counts, sorted by venue name ascending then count
/// descending; ties keep first-seen token order.
pub fn write_freq(path: &Path, venues: &[EnrichedVenue]) -> Result<(), TableError> {
    let mut rows: Vec<(&str, &str, &str, u32)> = Vec::new();
    for v in venues {
        for (token, count) in v.top_counts.iter() {
            rows.push((v.record.id.as_str(), v.record.name.as_str(), token, count));
        }
    }
    rows.sort_by(|a, b| a.1.cmp(b.1).then(b.3.cmp(&a.3)));

    let mut w = writer_with_bom(path)?;
    let wrap = |source| TableError::Write { path: display(path), source };
    w.write_record(["cafe_id", "name", "token", "count"]).map_err(wrap)?;
    for (id, name, token, count) in &rows {
        let count = count.to_string();
        w.write_record([*id, *name, *token, count.as_str()]).map_err(wrap)?;
    }
    w.flush().map_err(|source| TableError::Io { path: display(path), source })?;
    info!(path = %path.display(), rows = rows.len(), "frequency table written");
    Ok(())
}

/// Corpus-wide keyword counts, top `limit`.
pub fn write_global(path: &Path, global: &TokenCounts, limit: usize) -> Result<(), TableError> {
    let mut w = writer_with_bom(path)?;
    let wrap = |source| TableError::Write { path: display(path), source };
    w.write_record(["token", "count"]).map_err(wrap)?;
    for (token, count) in global.ranked().into_iter().take(limit) {
        let count = count.to_string();
        w.write_record([token.as_str(), count.as_str()]).map_err(wrap)?;
    }
    w.flush().map_err(|source| TableError::Io { path: display(path), source })?;
    info!(path = %path.display(), "global frequency table written");
    Ok(())
}

pub fn write_price_items(path: &Path, venues: &[EnrichedVenue]) -> Result<(), TableError> {
    let mut w = writer_with_bom(path)?;
    let wrap = |source| TableError::Write { path: display(path), source };
    w.write_record(["카페id", "카페이름", "item(추정)", "price(원)", "raw", "source", "context"])
        .map_err(wrap)?;
    let mut rows = 0usize;
    for v in venues {
        for p in &v.price_items {
            let price = p.price.to_string();
            let source = p.source.to_string();
            w.write_record([
                v.record.id.as_str(),
                v.record.name.as_str(),
                p.item.as_str(),
                price.as_str(),
                p.raw.as_str(),
                source.as_str(),
                p.context.as_str(),
            ])
            .map_err(wrap)?;
            rows += 1;
        }
    }
    w.flush().map_err(|source| TableError::Io { path: display(path), source })?;
    info!(path = %path.display(), rows, "price items written");
    Ok(())
}

/// One summary row per venue that had at least one price mention.
pub fn write_price_summary(path: &Path, venues: &[EnrichedVenue]) -> Result<(), TableError> {
    let mut w = writer_with_bom(path)?;
    let wrap = |source| TableError::Write { path: display(path), source };
    w.write_record(["카페id", "카페이름", "가격목록", "가격종류수", "최소가", "최대가", "대표가(중앙값)"])
        .map_err(wrap)?;
    for v in venues {
        let Some(summary) = &v.price_summary else { continue };
        let prices = json_u32_list(&summary.prices);
        let kinds = summary.prices.len().to_string();
        let min = summary.min.to_string();
        let max = summary.max.to_string();
        let median = summary.median.to_string();
        w.write_record([
            v.record.id.as_str(),
            v.record.name.as_str(),
            prices.as_str(),
            kinds.as_str(),
            min.as_str(),
            max.as_str(),
            median.as_str(),
        ])
        .map_err(wrap)?;
    }
    w.flush().map_err(|source| TableError::Io { path: display(path), source })?;
    info!(path = %path.display(), "price summary written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_from_embedded_map_url() {
        let p = PlaceParser::new();
        let html = r#"<iframe src="/map?lng=126.912&amp;lat=35.175&zoom=15">"#;
        assert_eq!(p.coordinates(html), ("35.175".to_string(), "126.912".to_string()));
        // Unescaped form works too.
        let html = "map?lng=126.9&lat=35.1";
        assert_eq!(p.coordinates(html), ("35.1".to_string(), "126.9".to_string()));
        assert_eq!(p.coordinates("no coords here"), (String::new(), String::new()));
    }

    #[test]
    fn district_needs_word_boundaries() {
        let p = PlaceParser::new();
        assert_eq!(p.district("광주 북구 용봉로 1"), "북구");
        assert_eq!(p.district("광주 광산구 수완로 2"), "광산구");
        assert_eq!(p.district("서울 강북구청"), "");
    }

    #[test]
    fn venue_id_prefers_url_then_html_then_hash() {
        let p = PlaceParser::new();
        assert_eq!(
            p.venue_id("https://m.place.naver.com/place/12345678/home", "", "a", "b"),
            "12345678"
        );
        assert_eq!(p.venue_id("", r#"{"id" : "987654"}"#, "a", "b"), "987654");
        let hashed = p.venue_id("", "", "미미당", "광주 북구");
        assert_eq!(hashed.len(), 12);
        assert!(hashed.chars().all(|c| c.is_ascii_hexdigit()));
        // Deterministic for the same name and address.
        assert_eq!(hashed, p.venue_id("", "", "미미당", "광주 북구"));
    }

    #[test]
    fn html_id_requires_six_digits() {
        let p = PlaceParser::new();
        let short = p.venue_id("", r#"{"id": "12345"}"#, "a", "b");
        assert_eq!(short.len(), 12);
    }

    #[test]
    fn clean_cell_drops_nan_markers() {
        assert_eq!(clean_cell(" 미미당 "), "미미당");
        assert_eq!(clean_cell("nan"), "");
        assert_eq!(clean_cell("NaN"), "");
        assert_eq!(clean_cell(""), "");
    }

    #[test]
    fn json_cells_keep_display_spacing() {
        assert_eq!(json_u32_list(&[4000, 6000]), "[4000, 6000]");
        assert_eq!(
            json_str_list(&["케이크".to_string(), "스콘".to_string()]),
            r#"["케이크", "스콘"]"#
        );
        assert_eq!(json_str_list(&[]), "[]");
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let mut headers = StringRecord::new();
        headers.push_field("name");
        let cols = Columns::from_headers(&headers);
        let mut row = StringRecord::new();
        row.push_field("미미당");
        assert_eq!(cols.get(&row, "name"), "미미당");
        assert_eq!(cols.get(&row, "address"), "");
    }
}
