#![allow(dead_code)]
#![allow(rustdoc::broken_intra_doc_links)]
//! # cafe-enrich — Dessert Cafe Review Enrichment
//!
//! Entry point of the enrichment batch. Three scraped CSV inputs go in,
//! five enriched CSV outputs come out:
//!
//! ```text
//! main()
//!   ├── Configure tracing/logging
//!   ├── Parse CLI arguments (input/output paths)
//!   ├── Load place + blog CSVs ──► VenueRecord per venue
//!   ├── Load map-candidate CSV ──► GeoMatcher
//!   ├── Pipeline::run (rayon, per venue)
//!   │     ├── coordinate backfill
//!   │     ├── tokenize (two profiles)
//!   │     ├── mood/taste/companion tagging + menus
//!   │     ├── parking + prices
//!   │     └── score + recommendation columns
//!   └── Write master / freq / global / price tables
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Run with default file names (info logs)
//! cargo run --release
//!
//! # Verbose logs, custom inputs
//! RUST_LOG=debug cargo run --release -- \
//!     --place-csv places.csv --blog-csv posts.csv --kakao-csv map.csv
//! ```
//!
//! Input files are fatal when unreadable; no output is written in that
//! case. Per-row oddities (missing columns, venues without reviews) are
//! handled inline and never abort the run.

/// `enrich` module — per-venue pipeline orchestration.
mod enrich;

/// `geo` module — coordinate backfill from map-provider candidates.
mod geo;

/// `lexicon` module — mood/taste/companion dictionaries and menu keywords.
mod lexicon;

/// `model` module — venue records, token counter, enriched rows.
mod model;

/// `price` module — strict/loose price extraction and roll-ups.
mod price;

/// `score` module — parking detection, weighted score, recommendations.
mod score;

/// `tables` module — CSV input loading and output writing.
mod tables;

/// `text` module — normalization, morphology, tokenization, stopwords.
mod text;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::enrich::{global_counts, Pipeline};
use crate::geo::GeoMatcher;

const GLOBAL_TOP: usize = 300;

#[derive(Parser, Debug)]
#[command(name = "cafe-enrich", about = "Enrich scraped dessert-cafe data into recommendation tables")]
struct Args {
    /// Scraped place rows (name, address, place_url, naver_place_html, ...).
    #[arg(long, default_value = "gwangju_dessert_cafes_naver_place_bukgu.csv")]
    place_csv: PathBuf,

    /// Blog posts keyed by venue name.
    #[arg(long, default_value = "gwangju_dessert_cafes_blog_links_bukgu.csv")]
    blog_csv: PathBuf,

    /// Map-provider candidates for coordinate backfill.
    #[arg(long, default_value = "gwangju_dessert_cafes_kakao_bukgu.csv")]
    kakao_csv: PathBuf,

    /// Master table, one enriched row per venue.
    #[arg(long, default_value = "cafes_db_enriched_with_kakao_and_reco.csv")]
    out_master: PathBuf,

    /// Per-venue keyword frequency table.
    #[arg(long, default_value = "cafe_token_freq_v2.csv")]
    out_freq: PathBuf,

    /// Corpus-wide keyword frequency table.
    #[arg(long, default_value = "global_token_freq_v2.csv")]
    out_global: PathBuf,

    /// Extracted price mentions with provenance.
    #[arg(long, default_value = "cafe_price_items_v1.csv")]
    out_price_items: PathBuf,

    /// Per-venue price roll-up.
    #[arg(long, default_value = "cafe_price_summary_v1.csv")]
    out_price_summary: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let venues = tables::load_venues(&args.place_csv, &args.blog_csv)
        .context("loading place/blog inputs")?;
    let candidates =
        tables::load_candidates(&args.kakao_csv).context("loading map candidates")?;

    let pipeline = Pipeline::new(GeoMatcher::new(candidates));
    let enriched = pipeline.run(venues);
    let global = global_counts(&enriched);

    tables::write_master(&args.out_master, &enriched)?;
    tables::write_freq(&args.out_freq, &enriched)?;
    tables::write_global(&args.out_global, &global, GLOBAL_TOP)?;
    tables::write_price_items(&args.out_price_items, &enriched)?;
    tables::write_price_summary(&args.out_price_summary, &enriched)?;

    info!(
        master = %args.out_master.display(),
        freq = %args.out_freq.display(),
        global = %args.out_global.display(),
        price_items = %args.out_price_items.display(),
        price_summary = %args.out_price_summary.display(),
        "all tables written"
    );
    Ok(())
}
