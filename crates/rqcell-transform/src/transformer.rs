//! Batch entry point for wrapping Cells
//!
//! One [`CellTransformer`] can process any number of files; classification
//! state is dropped after every file, whether it was a Cell, a plain module
//! or failed to parse.

use std::path::{Path, PathBuf};

use rqcell_gen::{TransformEngine, TransformOutput};
use tracing::{debug, warn};

use crate::error::{Result, TransformError};
use crate::rewrite::{CellWrapOptions, CellWrapPass};

/// Wraps Cell modules, one file at a time
pub struct CellTransformer {
    engine: TransformEngine,
    options: CellWrapOptions,
}

impl CellTransformer {
    pub fn new(options: CellWrapOptions) -> Self {
        let engine = TransformEngine::new().add_pass(CellWrapPass::new(options.clone()));
        Self { engine, options }
    }

    pub fn options(&self) -> &CellWrapOptions {
        &self.options
    }

    /// Transform one module. Non-Cells come back byte-identical with
    /// `modified == false`.
    pub fn transform(&mut self, path: impl AsRef<Path>, source: &str) -> Result<TransformOutput> {
        let path = path.as_ref();
        let id = path.to_string_lossy();
        debug!(path = %id, "transforming");
        self.engine
            .transform(&id, source)
            .map_err(|err| TransformError::from_gen(path.to_path_buf(), err))
    }

    /// Read and transform a file from disk
    pub fn transform_file(&mut self, path: impl AsRef<Path>) -> Result<TransformOutput> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TransformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.transform(path, &source)
    }

    /// Transform many in-memory modules; a failing file does not stop the batch
    pub fn transform_batch<I>(&mut self, files: I) -> BatchReport
    where
        I: IntoIterator<Item = (PathBuf, String)>,
    {
        let mut report = BatchReport::default();
        for (path, source) in files {
            let result = self.transform(&path, &source);
            if let Err(err) = &result {
                warn!(path = %path.display(), error = %err, "skipping file");
            }
            report.outcomes.push(FileOutcome { path, result });
        }
        report
    }
}

impl Default for CellTransformer {
    fn default() -> Self {
        Self::new(CellWrapOptions::default())
    }
}

/// Result for one file of a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<TransformOutput>,
}

impl FileOutcome {
    pub fn is_rewritten(&self) -> bool {
        matches!(&self.result, Ok(out) if out.modified)
    }
}

/// Outcome of [`CellTransformer::transform_batch`]
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn rewritten(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_rewritten())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn rewritten_count(&self) -> usize {
        self.rewritten().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    pub fn unchanged_count(&self) -> usize {
        self.outcomes.len() - self.rewritten_count() - self.failed_count()
    }
}

/// Transform a single module with the default options
pub fn transform_source(path: impl AsRef<Path>, source: &str) -> Result<TransformOutput> {
    CellTransformer::default().transform(path, source)
}
