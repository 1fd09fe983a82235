//! Builders for the module-level statements a transform pass injects
//!
//! Statements are assembled as text, parsed back with OXC to validate them and
//! then printed by `oxc_codegen`, so the emitted code always follows the
//! configured [`FormatOptions`].

use crate::error::{GenError, Result};
use crate::format::FormatOptions;
use crate::parser::{ParseOptions, parse};
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;

/// One property of an emitted object literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectProp {
    pub key: String,
    pub value: String,
}

impl ObjectProp {
    /// `{ name }`
    pub fn shorthand(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            value: name,
        }
    }

    /// `{ key: value }` where `value` is an identifier reference
    pub fn renamed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn render(&self) -> String {
        if self.key == self.value {
            self.key.clone()
        } else {
            format!("{}: {}", self.key, self.value)
        }
    }
}

/// Builds import/export statements for injection into an existing module
#[derive(Debug, Clone, Default)]
pub struct ModuleBuilder {
    format: FormatOptions,
}

impl ModuleBuilder {
    pub fn new(format: FormatOptions) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &FormatOptions {
        &self.format
    }

    /// Build: `import { a, b } from 'source';`
    pub fn named_import(&self, names: &[&str], source: &str) -> Result<String> {
        for name in names {
            ensure_identifier(name)?;
        }
        let snippet = format!(
            "import {{ {} }} from \"{}\";",
            names.join(", "),
            escape_string(source)
        );
        self.emit(&snippet)
    }

    /// Build: `export default callee({ key: value, ... });`
    pub fn default_export_call(&self, callee: &str, props: &[ObjectProp]) -> Result<String> {
        ensure_identifier(callee)?;
        for prop in props {
            ensure_identifier(&prop.key)?;
            ensure_identifier(&prop.value)?;
        }
        let body = props
            .iter()
            .map(ObjectProp::render)
            .collect::<Vec<_>>()
            .join(", ");
        let snippet = format!("export default {callee}({{ {body} }});");
        self.emit(&snippet)
    }

    fn emit(&self, snippet: &str) -> Result<String> {
        let allocator = Allocator::default();
        let parsed = parse(&allocator, snippet, ParseOptions::default()).map_err(|e| {
            GenError::codegen_failed_with_reason("generated statement did not parse", e.to_string())
        })?;

        let code = Codegen::new()
            .with_options(self.format.codegen_options())
            .build(&parsed.program)
            .code;

        tracing::trace!(%code, "emitted statement");
        Ok(code)
    }
}

/// Returns true when `name` is a plain JavaScript identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn ensure_identifier(name: &str) -> Result<()> {
    if is_identifier(name) {
        return Ok(());
    }
    let suggestion: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    if suggestion.is_empty() || !is_identifier(&suggestion) {
        Err(GenError::invalid_identifier(name))
    } else {
        Err(GenError::invalid_identifier_with_suggestion(
            name,
            format!("did you mean '{suggestion}'?"),
        ))
    }
}

fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
