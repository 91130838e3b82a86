//! Alert Module
//!
//! Turns a vulnerability probability into a tier (BAJA / MEDIA / CRITICA)
//! with its advisory message, and tags the raw text with the risk pattern
//! categories it contains. Tags are independent of the tier.
//!
//! ## Structure
//! - `types`: AlertLevel, PatternTag, AlertDecision
//! - `rules`: thresholds, messages and tag keywords
//! - `engine`: decision logic

pub mod types;
pub mod rules;
pub mod engine;


pub use types::{AlertDecision, AlertLevel, PatternTag};
pub use rules::{AlertThresholds, CRITICAL_THRESHOLD, MEDIUM_THRESHOLD};
pub use engine::{assess, decide, decide_with_thresholds, detect_patterns};
