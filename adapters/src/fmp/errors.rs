use thiserror::Error;

#[derive(Error, Debug)]
pub enum FmpError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api rejected request: {0}")]
    Api(String),

    #[error("undecodable response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid bar timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("missing api key")]
    MissingApiKey,
}
