use serde::{Deserialize, Serialize};

pub mod bar;

pub use bar::{Bar, Sample, TIMESTAMP_FORMAT};

/// Classification of a local extremum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumKind {
    Peak,
    Valley,
}
