//! Export classification for Cell modules
//!
//! A module is a Cell when it declares the sentinel export `RQUERY` and does
//! not already have a default export. Only `export const|let|var` and
//! `export function` declarations are inspected; re-export lists, classes and
//! destructuring patterns never contribute a name.

use indexmap::IndexSet;
use oxc_ast::ast::{BindingPatternKind, Declaration, Program, Statement};

/// Source name of the sentinel export
pub const SENTINEL_EXPORT: &str = "RQUERY";

/// Key the sentinel is passed under to the wrapper
pub const QUERY_KEY: &str = "QUERY";

/// One of the recognized Cell exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellExport {
    BeforeQuery,
    Query,
    AfterQuery,
    Loading,
    Fetching,
    Success,
    Failure,
    Empty,
}

impl CellExport {
    pub const ALL: [CellExport; 8] = [
        CellExport::BeforeQuery,
        CellExport::Query,
        CellExport::AfterQuery,
        CellExport::Loading,
        CellExport::Fetching,
        CellExport::Success,
        CellExport::Failure,
        CellExport::Empty,
    ];

    /// Exact, case-sensitive lookup of an exported binding name
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "beforeQuery" => CellExport::BeforeQuery,
            SENTINEL_EXPORT => CellExport::Query,
            "afterQuery" => CellExport::AfterQuery,
            "Loading" => CellExport::Loading,
            "Fetching" => CellExport::Fetching,
            "Success" => CellExport::Success,
            "Failure" => CellExport::Failure,
            "Empty" => CellExport::Empty,
            _ => return None,
        })
    }

    /// Name of the binding in the Cell module
    pub fn binding(self) -> &'static str {
        match self {
            CellExport::BeforeQuery => "beforeQuery",
            CellExport::Query => SENTINEL_EXPORT,
            CellExport::AfterQuery => "afterQuery",
            CellExport::Loading => "Loading",
            CellExport::Fetching => "Fetching",
            CellExport::Success => "Success",
            CellExport::Failure => "Failure",
            CellExport::Empty => "Empty",
        }
    }

    /// Key under which the binding is handed to the wrapper
    pub fn key(self) -> &'static str {
        match self {
            CellExport::Query => QUERY_KEY,
            other => other.binding(),
        }
    }

    pub fn is_sentinel(self) -> bool {
        self == CellExport::Query
    }
}

/// Recognized exports in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSet {
    names: IndexSet<CellExport>,
}

impl ExportSet {
    /// Returns false when the export was already recorded
    pub fn insert(&mut self, export: CellExport) -> bool {
        self.names.insert(export)
    }

    pub fn contains(&self, export: CellExport) -> bool {
        self.names.contains(&export)
    }

    pub fn iter(&self) -> impl Iterator<Item = CellExport> + '_ {
        self.names.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

/// What one scan of a module found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellExports {
    pub names: ExportSet,
    pub has_default_export: bool,
}

impl CellExports {
    /// Sentinel present and no default export already declared
    pub fn is_cell(&self) -> bool {
        self.names.contains(CellExport::Query) && !self.has_default_export
    }

    /// Binding names in first-seen order
    pub fn bindings(&self) -> Vec<&'static str> {
        self.names.iter().map(CellExport::binding).collect()
    }
}

/// Collects Cell exports from top-level statements.
///
/// Holds the state of the module currently being scanned; [`take`](Self::take)
/// hands it out and leaves the collector empty for the next module.
#[derive(Debug, Default)]
pub struct ExportCollector {
    current: CellExports,
}

impl ExportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, program: &Program<'_>) {
        for statement in program.body.iter() {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::ExportDefaultDeclaration(_) => {
                self.current.has_default_export = true;
            }
            Statement::ExportNamedDeclaration(export) => {
                let Some(declaration) = &export.declaration else {
                    return;
                };
                match declaration {
                    Declaration::VariableDeclaration(variable) => {
                        for declarator in variable.declarations.iter() {
                            if let BindingPatternKind::BindingIdentifier(ident) = &declarator.id.kind {
                                self.record(ident.name.as_str());
                            }
                        }
                    }
                    Declaration::FunctionDeclaration(function) => {
                        if let Some(id) = &function.id {
                            self.record(id.name.as_str());
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn record(&mut self, name: &str) {
        if let Some(export) = CellExport::from_name(name) {
            self.current.names.insert(export);
        }
    }

    /// Current scan state, without resetting
    pub fn peek(&self) -> &CellExports {
        &self.current
    }

    /// Hand out the scan result and reset for the next module
    pub fn take(&mut self) -> CellExports {
        std::mem::take(&mut self.current)
    }

    pub fn reset(&mut self) {
        self.current = CellExports::default();
    }
}

/// Classify a single program
pub fn classify(program: &Program<'_>) -> CellExports {
    let mut collector = ExportCollector::new();
    collector.collect(program);
    collector.take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use rqcell_gen::{ParseOptions, parse};

    fn classify_source(source: &str) -> CellExports {
        let allocator = Allocator::default();
        let parsed = parse(&allocator, source, ParseOptions::jsx()).unwrap();
        classify(parsed.ast())
    }

    #[test]
    fn collects_variable_and_function_exports_in_order() {
        let exports = classify_source(
            "export const RQUERY = gql``;\nexport function Success() {}\nexport const Loading = () => null;\n",
        );
        assert_eq!(exports.bindings(), vec!["RQUERY", "Success", "Loading"]);
        assert!(exports.is_cell());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let exports = classify_source("export const rquery = 1;\nexport const loading = 2;\n");
        assert!(exports.names.is_empty());
        assert!(!exports.is_cell());
    }

    #[test]
    fn default_export_blocks_classification() {
        let exports = classify_source("export const RQUERY = 1;\nexport default function X() {}\n");
        assert!(exports.has_default_export);
        assert!(exports.names.contains(CellExport::Query));
        assert!(!exports.is_cell());
    }

    #[test]
    fn missing_sentinel_is_not_a_cell() {
        let exports = classify_source("export const Loading = 1;\nexport function Success() {}\n");
        assert_eq!(exports.names.len(), 2);
        assert!(!exports.is_cell());
    }

    #[test]
    fn aliased_and_pattern_exports_are_ignored() {
        let exports = classify_source(
            "const q = 1;\nexport { q as RQUERY };\nexport const { Loading } = obj;\nexport class Success {}\n",
        );
        assert!(exports.names.is_empty());
    }

    #[test]
    fn every_declarator_is_inspected() {
        let exports = classify_source("export const RQUERY = 1, Empty = 2;\n");
        assert_eq!(exports.bindings(), vec!["RQUERY", "Empty"]);
    }

    #[test]
    fn sentinel_key_is_canonical() {
        assert_eq!(CellExport::Query.binding(), "RQUERY");
        assert_eq!(CellExport::Query.key(), "QUERY");
        assert_eq!(CellExport::Success.key(), "Success");
        for export in CellExport::ALL {
            assert_eq!(CellExport::from_name(export.binding()), Some(export));
        }
        assert_eq!(CellExport::from_name("QUERY"), None);
    }

    #[test]
    fn take_resets_collector() {
        let allocator = Allocator::default();
        let parsed = parse(&allocator, "export const RQUERY = 1;", ParseOptions::default()).unwrap();
        let mut collector = ExportCollector::new();
        collector.collect(parsed.ast());
        assert!(collector.take().is_cell());
        assert_eq!(collector.peek(), &CellExports::default());
    }
}
