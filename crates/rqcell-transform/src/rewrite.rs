//! The Cell wrapping pass
//!
//! For a module classified as a Cell:
//!
//! ```js
//! import { withRQCell } from '@rwjsexperiments/react'
//! <YOUR CODE>
//! export default withRQCell({ QUERY: RQUERY, Loading, Success, ... })
//! ```
//!
//! Keys follow the order the exports were first declared in.

use crate::exports::ExportCollector;
use rqcell_gen::{
    FormatOptions, ModuleBuilder, ObjectProp, ParsedProgram, SourceEdits, TransformPass,
    TransformResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Module the wrapper is imported from unless configured otherwise
pub const DEFAULT_IMPORT_SOURCE: &str = "@rwjsexperiments/react";

/// Name of the higher-order wrapper
pub const DEFAULT_WRAPPER: &str = "withRQCell";

/// Options for [`CellWrapPass`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellWrapOptions {
    pub import_source: String,
    pub wrapper: String,
    pub single_quote: bool,
}

impl Default for CellWrapOptions {
    fn default() -> Self {
        Self {
            import_source: DEFAULT_IMPORT_SOURCE.to_string(),
            wrapper: DEFAULT_WRAPPER.to_string(),
            single_quote: true,
        }
    }
}

impl CellWrapOptions {
    fn format(&self) -> FormatOptions {
        let quote_style = if self.single_quote {
            rqcell_gen::QuoteStyle::Single
        } else {
            rqcell_gen::QuoteStyle::Double
        };
        FormatOptions::default().with_quote_style(quote_style)
    }
}

/// Transform pass wrapping Cell modules in the higher-order wrapper
#[derive(Debug)]
pub struct CellWrapPass {
    options: CellWrapOptions,
    builder: ModuleBuilder,
    collector: ExportCollector,
}

impl CellWrapPass {
    pub fn new(options: CellWrapOptions) -> Self {
        let builder = ModuleBuilder::new(options.format());
        Self {
            options,
            builder,
            collector: ExportCollector::new(),
        }
    }

    pub fn options(&self) -> &CellWrapOptions {
        &self.options
    }
}

impl Default for CellWrapPass {
    fn default() -> Self {
        Self::new(CellWrapOptions::default())
    }
}

impl TransformPass for CellWrapPass {
    fn name(&self) -> &'static str {
        "rqcell:wrap-cell"
    }

    fn run(
        &mut self,
        program: &ParsedProgram<'_>,
        edits: &mut SourceEdits,
    ) -> rqcell_gen::Result<TransformResult> {
        self.collector.collect(program.ast());
        let exports = self.collector.take();

        if !exports.is_cell() {
            debug!(
                exports = ?exports.bindings(),
                has_default_export = exports.has_default_export,
                "not a cell, skipping"
            );
            return Ok(TransformResult::unchanged());
        }

        let import = self
            .builder
            .named_import(&[self.options.wrapper.as_str()], &self.options.import_source)?;

        let props: Vec<ObjectProp> = exports
            .names
            .iter()
            .map(|export| ObjectProp::renamed(export.key(), export.binding()))
            .collect();
        let export = self
            .builder
            .default_export_call(&self.options.wrapper, &props)?;

        let source = program.source_text;
        let at = program.prologue_end();
        if at == 0 {
            edits.insert(0, import);
        } else {
            edits.insert(at, format!("\n{}", import.trim_end()));
        }

        let separator = if source.is_empty() || source.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        edits.append(source.len(), format!("{separator}{export}"));

        let keys: Vec<&str> = exports.names.iter().map(|e| e.key()).collect();
        info!(wrapper = %self.options.wrapper, keys = ?keys, "wrapped cell");

        Ok(TransformResult::modified().with_diagnostic(format!(
            "{} wraps: {}",
            self.options.wrapper,
            keys.join(", ")
        )))
    }

    fn reset(&mut self) {
        self.collector.reset();
    }
}
