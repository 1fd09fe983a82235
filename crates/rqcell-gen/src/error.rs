//! Error types for parsing and emitting JavaScript

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while parsing, splicing or emitting JavaScript
#[derive(Error, Debug, Diagnostic)]
pub enum GenError {
    /// Invalid identifier name
    #[error("Invalid identifier: '{identifier}'{}", suggestion.as_ref().map(|s| format!(" - {}", s)).unwrap_or_default())]
    #[diagnostic(code(rqcell::gen::invalid_identifier))]
    InvalidIdentifier {
        identifier: String,
        suggestion: Option<String>,
    },

    /// Source text could not be parsed
    #[error("Parse failed: {}", diagnostics.join(", "))]
    #[diagnostic(code(rqcell::gen::parse_failed))]
    ParseFailed { diagnostics: Vec<String> },

    /// Code generation failed
    #[error("Code generation failed: {context}{}", reason.as_ref().map(|r| format!(" - {}", r)).unwrap_or_default())]
    #[diagnostic(code(rqcell::gen::codegen_failed))]
    CodegenFailed {
        context: String,
        reason: Option<String>,
    },

    /// A source edit pointed outside the source text or inside a character
    #[error("Invalid edit offset {offset} for source of length {len}")]
    #[diagnostic(code(rqcell::gen::invalid_edit))]
    InvalidEdit { offset: usize, len: usize },
}

impl GenError {
    /// Create an InvalidIdentifier error
    pub fn invalid_identifier(identifier: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            suggestion: None,
        }
    }

    /// Create an InvalidIdentifier error with a suggestion
    pub fn invalid_identifier_with_suggestion(
        identifier: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a CodegenFailed error with reason
    pub fn codegen_failed_with_reason(
        context: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::CodegenFailed {
            context: context.into(),
            reason: Some(reason.into()),
        }
    }
}

/// Result type for parse/emit operations
pub type Result<T> = std::result::Result<T, GenError>;
