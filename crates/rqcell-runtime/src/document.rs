//! GraphQL operation documents
//!
//! Only the header of the first operation is inspected: its kind and its
//! optional name. Fragments before it are skipped, selection sets are never
//! validated.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CellError, Result};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#[^\n]*|"""(?s:.*?)"""|"(?:[^"\\\n]|\\.)*"|[_A-Za-z][_0-9A-Za-z]*|[{}()]"#)
        .expect("token pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "query" => Some(OperationKind::Query),
            "mutation" => Some(OperationKind::Mutation),
            "subscription" => Some(OperationKind::Subscription),
            _ => None,
        }
    }
}

/// A GraphQL document plus the header of its first operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDocument {
    source: Arc<str>,
    operation: OperationKind,
    operation_name: Option<String>,
}

enum Pending {
    Nothing,
    Operation(OperationKind),
    Fragment,
}

impl QueryDocument {
    /// Parse a document. A source without any operation is rejected.
    ///
    /// ```
    /// use rqcell_runtime::QueryDocument;
    ///
    /// let doc = QueryDocument::parse("query FindPosts { posts { id } }").unwrap();
    /// assert_eq!(doc.operation_name(), Some("FindPosts"));
    ///
    /// let anonymous = QueryDocument::parse("{ posts { id } }").unwrap();
    /// assert_eq!(anonymous.operation_name(), None);
    /// ```
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source: String = source.into();
        let (operation, operation_name) = scan_header(&source)?;
        Ok(Self {
            source: Arc::from(source),
            operation,
            operation_name,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Name of the first operation; `None` for anonymous operations
    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }
}

impl FromStr for QueryDocument {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for QueryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn scan_header(source: &str) -> Result<(OperationKind, Option<String>)> {
    let mut depth = 0usize;
    let mut pending = Pending::Nothing;

    for token in TOKEN.find_iter(source).map(|m| m.as_str()) {
        if token.starts_with('#') || token.starts_with('"') {
            continue;
        }
        match token {
            "{" | "(" => {
                if depth == 0 {
                    match pending {
                        Pending::Nothing if token == "{" => {
                            return Ok((OperationKind::Query, None));
                        }
                        Pending::Operation(kind) => return Ok((kind, None)),
                        _ => {}
                    }
                }
                depth += 1;
            }
            "}" | ")" => {
                depth = depth.saturating_sub(1);
                if depth == 0 && token == "}" {
                    pending = Pending::Nothing;
                }
            }
            word if depth == 0 => match pending {
                Pending::Nothing => {
                    if let Some(kind) = OperationKind::from_keyword(word) {
                        pending = Pending::Operation(kind);
                    } else if word == "fragment" {
                        pending = Pending::Fragment;
                    } else {
                        return Err(CellError::InvalidDocument(format!(
                            "unexpected `{word}` at top level"
                        )));
                    }
                }
                Pending::Operation(kind) => return Ok((kind, Some(word.to_string()))),
                Pending::Fragment => {}
            },
            _ => {}
        }
    }

    Err(CellError::InvalidDocument(
        "document contains no operation".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_query() {
        let doc = QueryDocument::parse("query PostsQuery { posts { id } }").unwrap();
        assert_eq!(doc.operation(), OperationKind::Query);
        assert_eq!(doc.operation_name(), Some("PostsQuery"));
    }

    #[test]
    fn anonymous_forms() {
        assert_eq!(QueryDocument::parse("{ a }").unwrap().operation_name(), None);
        let with_vars = QueryDocument::parse("query ($id: Int!) { post(id: $id) { id } }").unwrap();
        assert_eq!(with_vars.operation_name(), None);
    }

    #[test]
    fn mutation_with_variables() {
        let doc = QueryDocument::parse(
            "mutation CreatePost($input: CreatePostInput!) { createPost(input: $input) { id } }",
        )
        .unwrap();
        assert_eq!(doc.operation(), OperationKind::Mutation);
        assert_eq!(doc.operation_name(), Some("CreatePost"));
    }

    #[test]
    fn skips_comments_strings_and_fragments() {
        let doc = QueryDocument::parse(
            r#"
            # query Commented { x }
            fragment PostFields on Post { id title(format: "query Fake {") }
            query FindPost { post { ...PostFields } }
            "#,
        )
        .unwrap();
        assert_eq!(doc.operation_name(), Some("FindPost"));
    }

    #[test]
    fn rejects_documents_without_operation() {
        assert!(matches!(
            QueryDocument::parse(""),
            Err(CellError::InvalidDocument(_))
        ));
        assert!(QueryDocument::parse("fragment F on Post { id }").is_err());
        assert!(QueryDocument::parse("type Post { id: ID }").is_err());
    }

    #[test]
    fn display_is_the_source() {
        let source = "query A { a }";
        assert_eq!(QueryDocument::parse(source).unwrap().to_string(), source);
    }
}
