//! Flat-file minute-bar dataset.
//!
//! Layout: header row `Date,Open,High,Low,Close,Volume`, one bar per line,
//! `Date` as `YYYY-MM-DD HH:MM:SS`. The whole file is read into memory;
//! writes replace the file (last write wins).

pub mod errors;
pub mod merge;
pub mod store;

pub use errors::DatasetError;
pub use merge::merge_rolling;
pub use store::{CsvDataset, REQUIRED_COLUMNS};
