//! Logic Module - Scoring engines
//!
//! - `features/` - Lexical feature extraction (snippet + line mode)
//! - `model/` - Random forest, fallback heuristic, model store
//! - `alert/` - Alert level decision and pattern tags
//! - `diff/` - Added-line scanner with deterministic risk score
//! - `pipeline/` - Extract → classify → decide, plus offline evaluation
//! - `dataset/` - Header-less training table loader

pub mod features;
pub mod model;
pub mod alert;
pub mod diff;
pub mod pipeline;
pub mod dataset;
