use thiserror::Error;

/// Failures raised by the analysis core.
///
/// Empty or too-short inputs are not errors; they produce sentinel results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
