use std::path::Path;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::position::{Position, Span};

#[derive(Debug, Error, Diagnostic)]
pub enum TuckError {
    #[error("Failed to access file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize response JSON: {source}")]
    ResponseSerialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("File '{path}' is busy: another in-place wrap is in progress")]
    ResourceBusy { path: String },

    #[error(
        "File '{path}' changed while it was being wrapped (expected {expected_hash}, found {actual_hash}); nothing was written"
    )]
    SourceChanged {
        path: String,
        expected_hash: String,
        actual_hash: String,
    },

    #[error("Tree-sitter language initialization failed: {message}")]
    LanguageSetup { message: String },

    #[error("Failed to parse '{source_name}': {message}")]
    ParseFailure {
        source_name: String,
        message: String,
    },

    #[error("No syntax node found at {position}")]
    NoNodeFound { position: Position },

    #[error("No wrappable node found at {position} (stack: {})", .path.join(" > "))]
    NoSupportedNodeFound {
        position: Position,
        path: Vec<String>,
    },

    #[error("Requested wraps overlap: {first} conflicts with {second}")]
    EditsOverlap { first: Span, second: Span },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TuckError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let (r#type, suggestion) = match self {
            Self::Io { .. } => ("io_error", None),
            Self::ResponseSerialization { .. } => ("serialization_error", None),
            Self::InvalidRequest { .. } => (
                "invalid_request",
                Some("Pass positions as LINE:COLUMN, both 1-based".to_string()),
            ),
            Self::ResourceBusy { .. } => (
                "resource_busy",
                Some("Retry after the current in-place wrap completes".to_string()),
            ),
            Self::SourceChanged { .. } => (
                "source_changed",
                Some("Re-run the wrap against the current file contents".to_string()),
            ),
            Self::LanguageSetup { .. } | Self::ParseFailure { .. } => ("parse_failure", None),
            Self::NoNodeFound { .. } => (
                "no_node_found",
                Some("Place the cursor on code rather than on a blank line or comment".to_string()),
            ),
            Self::NoSupportedNodeFound { .. } => (
                "no_supported_node_found",
                Some(
                    "Place the cursor inside a literal, comprehension, call, signature, boolean chain or conditional"
                        .to_string(),
                ),
            ),
            Self::EditsOverlap { .. } => (
                "edits_overlap",
                Some("Request positions that resolve to disjoint constructs, or wrap them one at a time".to_string()),
            ),
            Self::Internal { .. } => ("internal_error", None),
        };

        ErrorResponse {
            error: ErrorBody {
                r#type: r#type.to_string(),
                message: self.to_string(),
                suggestion,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub r#type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}
