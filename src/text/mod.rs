//! # Text Processing Layer
//!
//! Everything between raw review text and countable tokens:
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`normalizer`] | emoji/URL/whitespace cleanup |
//! | [`analyzer`] | morphological analysis (surface form + POS tag) |
//! | [`tokenizer`] | candidate filtering, two profiles, allow-list gate |
//! | [`stopwords`] | curated stopword tables + per-venue stopword builder |

pub mod analyzer;
pub mod normalizer;
pub mod stopwords;
pub mod tokenizer;
