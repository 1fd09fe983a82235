//! Cell detection and wrapping for JavaScript/TypeScript modules
//!
//! A Cell is a module that exports a GraphQL document as `RQUERY` together
//! with any of the rendering slots (`Loading`, `Fetching`, `Empty`, `Failure`,
//! `Success`) and query hooks (`beforeQuery`, `afterQuery`). This crate finds
//! such modules and appends a default export handing those bindings to
//! `withRQCell`, importing the wrapper at the top of the file.
//!
//! ```rust
//! use rqcell_transform::CellTransformer;
//!
//! let mut transformer = CellTransformer::default();
//! let out = transformer.transform(
//!     "PostsCell.jsx",
//!     "export const RQUERY = gql`{ posts { id } }`;\nexport const Success = () => null;\n",
//! )?;
//! assert!(out.modified);
//! assert!(out.code.starts_with("import { withRQCell } from '@rwjsexperiments/react';"));
//! # Ok::<(), rqcell_transform::TransformError>(())
//! ```

mod error;
mod exports;
mod rewrite;
mod transformer;

pub use error::{Result, TransformError};
pub use exports::{
    CellExport, CellExports, ExportCollector, ExportSet, QUERY_KEY, SENTINEL_EXPORT, classify,
};
pub use rewrite::{CellWrapOptions, CellWrapPass, DEFAULT_IMPORT_SOURCE, DEFAULT_WRAPPER};
pub use transformer::{BatchReport, CellTransformer, FileOutcome, transform_source};

pub use rqcell_gen::TransformOutput;
