use crate::ast::BinOp;
use crate::path::Path;

/// A typed element extracted from formula text by the tokenizer.
///
/// Elements carry no source positions; only their order matters.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Registered function name, exactly as written
    ///
    /// # Examples
    /// ```text
    /// SUM
    /// concatenate
    /// ```
    Function(String),

    /// Dotted path into the data document
    ///
    /// # Examples
    /// ```text
    /// amount
    /// input.lines.taxAmount
    /// ```
    Variable(Path),

    /// Single-quoted constant, normalized to double quotes
    ///
    /// `' '` in the formula becomes `" "` here.
    QuotedConstant(String),

    /// Unsigned decimal numeral, as written
    Constant(String),

    /// Arithmetic operator
    Operator(BinOp),
}

impl Element {
    /// Content of a quoted constant without its surrounding quotes
    pub fn unquoted(text: &str) -> &str {
        text.strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text)
    }
}
