//! Dataset Module - Training table input
//!
//! Reads the header-less numeric table produced by the offline preprocessing
//! step and turns it into [`Sample`]s. Also provides the hold-out split used by
//! the `train` command and a content fingerprint recorded in model metadata.

pub mod record;
pub mod loader;


pub use loader::{
    fingerprint, load_table, parse_table, split_holdout, to_table, DatasetError, TABLE_COLUMNS,
};
pub use record::Sample;
