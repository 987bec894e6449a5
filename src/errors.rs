// ABOUTME: Error types for the cranio-deck application
// ABOUTME: Provides structured error handling for each stage of the pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("File system error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("HTTP error {status} for {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Malformed lookup response: {0}")]
    LookupError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PPTX generation error: {0}")]
    PptxError(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for DeckError {
    fn from(err: zip::result::ZipError) -> Self {
        DeckError::PptxError(format!("ZIP operation failed: {}", err))
    }
}

impl From<image::ImageError> for DeckError {
    fn from(err: image::ImageError) -> Self {
        DeckError::ImageError(err.to_string())
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(err: serde_json::Error) -> Self {
        DeckError::LookupError(err.to_string())
    }
}

impl From<std::fmt::Error> for DeckError {
    fn from(err: std::fmt::Error) -> Self {
        DeckError::PptxError(format!("XML formatting failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
