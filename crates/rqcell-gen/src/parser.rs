//! Parser façade for reading existing JavaScript/TypeScript modules
//!
//! Wraps `oxc_parser` so transform passes receive a program together with the
//! source text it was parsed from.

use crate::error::{GenError, Result};
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Parse options for reading source code
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Source type (JavaScript, TypeScript, JSX, TSX)
    pub source_type: SourceType,
    /// Allow parsing errors (returns partial AST)
    pub allow_errors: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::mjs(),
            allow_errors: false,
        }
    }
}

impl ParseOptions {
    /// Create parse options from file path (auto-detects source type)
    ///
    /// Plain JavaScript files (`.js`, `.mjs`, `.cjs`) are parsed with JSX
    /// enabled, since components commonly live in `.js` files.
    pub fn from_path(path: &str) -> Self {
        let source_type = SourceType::from_path(path).unwrap_or(SourceType::mjs());
        let source_type = if source_type.is_javascript() {
            source_type.with_jsx(true)
        } else {
            source_type
        };
        Self {
            source_type,
            allow_errors: false,
        }
    }

    /// Create parse options for JSX
    pub fn jsx() -> Self {
        Self {
            source_type: SourceType::jsx(),
            allow_errors: false,
        }
    }
}

/// Parsed program with AST and metadata
pub struct ParsedProgram<'a> {
    /// The parsed AST program
    pub program: Program<'a>,
    /// Parse diagnostics (only populated when errors are allowed)
    pub diagnostics: Vec<String>,
    /// Original source text
    pub source_text: &'a str,
}

impl<'a> ParsedProgram<'a> {
    /// Get the program AST
    pub fn ast(&self) -> &Program<'a> {
        &self.program
    }

    /// Check if parsing had errors
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Byte offset where new top-level statements may be prepended.
    ///
    /// Statements must follow the hashbang and the directive prologue
    /// (`"use client"` and friends), otherwise the directives stop applying.
    pub fn prologue_end(&self) -> usize {
        let hashbang_end = self
            .program
            .hashbang
            .as_ref()
            .map(|h| h.span.end)
            .unwrap_or(0);
        let directives_end = self
            .program
            .directives
            .iter()
            .map(|d| d.span.end)
            .max()
            .unwrap_or(0);
        hashbang_end.max(directives_end) as usize
    }
}

/// Parse source code into an AST
///
/// # Arguments
///
/// * `allocator` - Allocator for AST nodes (must outlive the returned program)
/// * `source` - Source code to parse
/// * `options` - Parse options
pub fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    options: ParseOptions,
) -> Result<ParsedProgram<'a>> {
    let result = Parser::new(allocator, source, options.source_type).parse();

    let mut diagnostics: Vec<String> = result.errors.iter().map(|err| err.to_string()).collect();
    if result.panicked && diagnostics.is_empty() {
        diagnostics.push("parser aborted".to_string());
    }

    if !options.allow_errors && !diagnostics.is_empty() {
        return Err(GenError::ParseFailed { diagnostics });
    }

    Ok(ParsedProgram {
        program: result.program,
        diagnostics,
        source_text: source,
    })
}
