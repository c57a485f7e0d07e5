use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A source record lacks a required field. Fatal for that record only;
    /// the pipeline's invalid-record policy decides skip vs abort.
    #[error("missing required field `{field}` in record from source `{source}`")]
    MissingField { r#source: String, field: &'static str },

    /// Internal consistency failure. Indicates a logic bug and aborts the run.
    #[error("invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, MatcherError>;
