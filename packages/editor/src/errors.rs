//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] maily_parser::ParseError),

    #[error("Invalid document: {0}")]
    Content(#[from] maily_parser::ContentError),

    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Range {from}..{to} does not cover whole nodes of one parent")]
    InvalidRange { from: usize, to: usize },

    #[error("Position {pos} is outside the document (size {size})")]
    PositionOutOfRange { pos: usize, size: usize },

    #[error("Transaction built against version {expected}, document is at version {found}")]
    StaleTransaction { expected: u64, found: u64 },
}
