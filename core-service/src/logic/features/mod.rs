//! Features Module - Lexical Feature Extraction
//!
//! Turns text into the fixed 13-field snippet vector (or the 12-field line
//! vector used by the diff scanner). Keyword lists live in `patterns`, the
//! field order in `layout`.

pub mod layout;
pub mod patterns;
pub mod vector;
pub mod extract;


// Re-export common types
pub use extract::{
    extract_features, extract_line_features, ExtractorConfig, LexicalCounts,
};
pub use layout::{
    feature_index, feature_name, layout_hash, validate_layout, LayoutMismatchError,
    FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LINE_FEATURE_COUNT,
};
pub use vector::{serialize_named, FeatureExtractor, FeatureVector, LineFeatures};
