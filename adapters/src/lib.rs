//! Collaborators around the analysis core: market-data acquisition over HTTP
//! and the rolling CSV dataset on disk.

pub mod dataset;
pub mod fmp;
pub mod sync;
