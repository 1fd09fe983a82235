//! Formatting options for emitted JavaScript

use oxc_codegen::CodegenOptions;

/// Quote style for string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Single quotes: `'hello'`
    #[default]
    Single,
    /// Double quotes: `"hello"`
    Double,
}

/// Formatting options for emitted statements
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Quote style for string literals
    pub quote_style: QuoteStyle,
}

impl FormatOptions {
    /// Set the quote style
    pub fn with_quote_style(mut self, quote_style: QuoteStyle) -> Self {
        self.quote_style = quote_style;
        self
    }

    pub(crate) fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            single_quote: self.quote_style == QuoteStyle::Single,
            ..CodegenOptions::default()
        }
    }
}
