//! Transformation engine for source-level rewrites
//!
//! Parses a module once, lets every registered pass inspect the program and
//! record [`SourceEdits`], then splices the edits into the original text.
//! Passes may carry per-file state; the engine resets every pass after each
//! file whatever the outcome, so a batch run never leaks state between files.

use crate::edit::SourceEdits;
use crate::error::Result;
use crate::parser::{ParseOptions, ParsedProgram, parse};
use oxc_allocator::Allocator;
use tracing::debug;

/// Result of a transformation pass
#[derive(Debug, Default)]
pub struct TransformResult {
    /// Whether the pass recorded edits
    pub modified: bool,
    /// Diagnostics from the pass
    pub diagnostics: Vec<String>,
}

impl TransformResult {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn modified() -> Self {
        Self {
            modified: true,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostic(mut self, diag: impl Into<String>) -> Self {
        self.diagnostics.push(diag.into());
        self
    }
}

/// Trait for transformation passes
pub trait TransformPass {
    /// Name of the transformation pass
    fn name(&self) -> &'static str;

    /// Inspect a parsed program and record edits against its source text
    fn run(&mut self, program: &ParsedProgram<'_>, edits: &mut SourceEdits)
    -> Result<TransformResult>;

    /// Drop any per-file state. Called after every file.
    fn reset(&mut self) {}
}

/// Transformation engine that applies multiple passes
#[derive(Default)]
pub struct TransformEngine {
    passes: Vec<Box<dyn TransformPass + Send>>,
}

impl TransformEngine {
    /// Create a new transformation engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transformation pass
    pub fn add_pass<P: TransformPass + Send + 'static>(mut self, pass: P) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Transform one module. `path` selects the source type (js/jsx/ts/tsx).
    pub fn transform(&mut self, path: &str, source: &str) -> Result<TransformOutput> {
        let outcome = self.run_passes(path, source);
        for pass in &mut self.passes {
            pass.reset();
        }
        outcome
    }

    fn run_passes(&mut self, path: &str, source: &str) -> Result<TransformOutput> {
        let allocator = Allocator::default();
        let parsed = parse(&allocator, source, ParseOptions::from_path(path))?;

        let mut edits = SourceEdits::new();
        let mut diagnostics = Vec::new();
        let mut any_modified = false;

        for pass in &mut self.passes {
            let result = pass.run(&parsed, &mut edits)?;
            debug!(pass = pass.name(), path, modified = result.modified, "pass finished");
            any_modified |= result.modified;
            diagnostics.extend(result.diagnostics);
        }

        let code = if edits.is_empty() {
            source.to_string()
        } else {
            edits.apply(source)?
        };

        Ok(TransformOutput {
            code,
            modified: any_modified && !edits.is_empty(),
            diagnostics,
        })
    }
}

/// Output from transformation engine
#[derive(Debug)]
pub struct TransformOutput {
    /// Transformed code (the original text when nothing changed)
    pub code: String,
    /// Whether the code was modified
    pub modified: bool,
    /// Diagnostics from transformations
    pub diagnostics: Vec<String>,
}
