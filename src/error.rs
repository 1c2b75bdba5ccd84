// src/error.rs
// Error types shared by the parser, mutator, builder and CLI

use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The input did not yield exactly one `statement` root
    #[error("input shape error: {0}")]
    InputShape(String),

    /// Statement/query options or match hints reached the builder
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A node shape the builder cannot print as query text
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// Tokenizer or parser failure
    #[error("parse error: {0}")]
    Parse(String),

    /// Unknown category name or malformed category map
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
