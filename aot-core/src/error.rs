use thiserror::Error;

/// Result type for configuration access.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid boolean '{value}' for '{key}', expected 'true' or 'false'")]
    InvalidBoolean { key: String, value: String },
}
