use serde_json::Value;
use thiserror::Error;

/// Errors raised while converting between Esri JSON and GeoJSON.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The object matches none of the known Esri shapes, or its GeoJSON
    /// `type` tag is missing or unknown.
    #[error("unrecognized geometry format: {0}")]
    UnrecognizedFormat(Value),

    /// The shape was recognized but its contents are not usable geometry.
    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ConversionError::MalformedGeometry(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
