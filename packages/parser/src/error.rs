//! Error types for the Maily parser

use std::ops::Range;
use thiserror::Error;

/// Byte range in the HTML source
pub type TokenSpan = Range<usize>;

pub type ParseResult<T> = Result<T, ParseError>;

/// Editor-HTML parse error with location
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: TokenSpan,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Invalid markup at {span:?}: {message}")]
    InvalidSyntax { span: TokenSpan, message: String },

    #[error("Lexer error at {span:?}")]
    LexError { span: TokenSpan },
}

impl ParseError {
    pub fn unexpected_token(span: TokenSpan, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: TokenSpan, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<TokenSpan> {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexError { span } => Some(span.clone()),
            ParseError::UnexpectedEof { .. } => None,
        }
    }

    /// Short label for the offending span
    pub fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. } | ParseError::UnexpectedEof { expected } => {
                format!("expected {}", expected)
            }
            ParseError::InvalidSyntax { message, .. } => message.clone(),
            ParseError::LexError { .. } => "unrecognized input".to_string(),
        }
    }
}

/// A document that violates the schema's content rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    #[error("Unknown node type '{node_type}' at {}", display_path(.path))]
    UnknownType { node_type: String, path: Vec<usize> },

    #[error("Invalid content for '{node_type}' at {}: {message}", display_path(.path))]
    InvalidContent {
        node_type: String,
        path: Vec<usize>,
        message: String,
    },
}

impl ContentError {
    pub fn unknown_type(node_type: &str, path: &[usize]) -> Self {
        Self::UnknownType {
            node_type: node_type.to_string(),
            path: path.to_vec(),
        }
    }

    pub fn invalid(node_type: &str, path: &[usize], message: impl Into<String>) -> Self {
        Self::InvalidContent {
            node_type: node_type.to_string(),
            path: path.to_vec(),
            message: message.into(),
        }
    }

    pub fn path(&self) -> &[usize] {
        match self {
            ContentError::UnknownType { path, .. } | ContentError::InvalidContent { path, .. } => path,
        }
    }
}

/// Render a child-index path as `root/0/2/1`.
pub fn display_path(path: &[usize]) -> String {
    let mut out = String::from("root");
    for index in path {
        out.push('/');
        out.push_str(&index.to_string());
    }
    out
}

/// Pretty-print a parse error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error
        .span()
        .unwrap_or(source.len().saturating_sub(1)..source.len());

    let mut output = Vec::new();
    let report = Report::build(ReportKind::Error, filename, span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, span.clone()))
                .with_color(Color::Red)
                .with_message(error.label()),
        )
        .finish();

    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(&[]), "root");
        assert_eq!(display_path(&[0, 2, 1]), "root/0/2/1");
    }

    #[test]
    fn test_content_error_message_names_type() {
        let err = ContentError::unknown_type("carousel", &[1, 0]);
        assert_eq!(err.to_string(), "Unknown node type 'carousel' at root/1/0");
    }
}
