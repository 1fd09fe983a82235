//! Offset-based source splicing
//!
//! Passes record insertions against the original source text instead of
//! regenerating the whole module, so untouched code keeps its exact bytes,
//! comments and formatting.

use crate::error::{GenError, Result};

/// A single text insertion at a byte offset of the original source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub offset: usize,
    pub text: String,
}

/// Ordered set of insertions applied to one source text
#[derive(Debug, Clone, Default)]
pub struct SourceEdits {
    insertions: Vec<Insertion>,
}

impl SourceEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `text` before the byte at `offset`.
    ///
    /// Insertions at the same offset are applied in the order they were recorded.
    pub fn insert(&mut self, offset: usize, text: impl Into<String>) {
        self.insertions.push(Insertion {
            offset,
            text: text.into(),
        });
    }

    /// Append `text` after the end of the source
    pub fn append(&mut self, source_len: usize, text: impl Into<String>) {
        self.insert(source_len, text);
    }

    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.insertions.len()
    }

    pub fn clear(&mut self) {
        self.insertions.clear();
    }

    /// Apply all insertions to `source`, returning the spliced text
    pub fn apply(&self, source: &str) -> Result<String> {
        let mut ordered: Vec<&Insertion> = self.insertions.iter().collect();
        // stable sort keeps recording order for equal offsets
        ordered.sort_by_key(|ins| ins.offset);

        let extra: usize = ordered.iter().map(|ins| ins.text.len()).sum();
        let mut out = String::with_capacity(source.len() + extra);
        let mut cursor = 0;

        for ins in ordered {
            if ins.offset > source.len() || !source.is_char_boundary(ins.offset) {
                return Err(GenError::InvalidEdit {
                    offset: ins.offset,
                    len: source.len(),
                });
            }
            out.push_str(&source[cursor..ins.offset]);
            out.push_str(&ins.text);
            cursor = ins.offset;
        }
        out.push_str(&source[cursor..]);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_edits_return_source_unchanged() {
        let edits = SourceEdits::new();
        assert_eq!(edits.apply("const a = 1;\n").unwrap(), "const a = 1;\n");
    }

    #[test]
    fn applies_prepend_and_append() {
        let source = "const a = 1;\n";
        let mut edits = SourceEdits::new();
        edits.insert(0, "import x from 'x';\n");
        edits.append(source.len(), "export default a;\n");
        assert_eq!(
            edits.apply(source).unwrap(),
            "import x from 'x';\nconst a = 1;\nexport default a;\n"
        );
    }

    #[test]
    fn same_offset_keeps_recording_order() {
        let mut edits = SourceEdits::new();
        edits.insert(0, "b");
        edits.insert(0, "c");
        assert_eq!(edits.apply("a").unwrap(), "bca");
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let mut edits = SourceEdits::new();
        edits.insert(10, "x");
        assert!(matches!(
            edits.apply("abc"),
            Err(GenError::InvalidEdit { offset: 10, len: 3 })
        ));
    }

    #[test]
    fn offset_inside_char_is_rejected() {
        let mut edits = SourceEdits::new();
        edits.insert(1, "x");
        assert!(edits.apply("é").is_err());
    }
}
