//! Parse, splice and emit JavaScript modules using the OXC toolchain
//!
//! This crate is the source-transformation foundation for rqcell:
//!
//! - **Parsing** - a thin façade over `oxc_parser` that keeps the source text
//!   next to the AST ([`parse`], [`ParsedProgram`])
//! - **Emission** - import/export statements validated by the parser and
//!   printed by `oxc_codegen` ([`ModuleBuilder`])
//! - **Splicing** - offset-based insertions into the original text
//!   ([`SourceEdits`]), so untouched modules stay byte-identical
//! - **Passes** - a small engine running [`TransformPass`]es per file
//!
//! # Example
//!
//! ```rust
//! use rqcell_gen::{ModuleBuilder, ObjectProp};
//!
//! let builder = ModuleBuilder::default();
//! let import = builder.named_import(&["withRQCell"], "@rwjsexperiments/react")?;
//! assert!(import.starts_with("import { withRQCell }"));
//!
//! let export = builder.default_export_call("withRQCell", &[ObjectProp::shorthand("Success")])?;
//! assert!(export.starts_with("export default withRQCell("));
//! # Ok::<(), rqcell_gen::GenError>(())
//! ```

mod builder;
mod edit;
mod error;
mod format;
mod parser;
mod transform;

pub use builder::{ModuleBuilder, ObjectProp, is_identifier};
pub use edit::{Insertion, SourceEdits};
pub use error::{GenError, Result};
pub use format::{FormatOptions, QuoteStyle};
pub use parser::{ParseOptions, ParsedProgram, parse};
pub use transform::{TransformEngine, TransformOutput, TransformPass, TransformResult};

// Re-export commonly used OXC types for convenience
pub use oxc_allocator::Allocator;
