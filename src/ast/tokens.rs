use std::fmt;

use crate::value::format_number;

/// Token of the restricted arithmetic/function grammar.
///
/// Produced either by lexing expression text or directly by the formula
/// evaluator when it assembles a call from resolved data.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Decimal numeral
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// ```
    Number(f64),

    /// String literal enclosed in double quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// " "
    /// ```
    String(String),

    /// Function name
    ///
    /// Only names present in the function registry survive parsing.
    ///
    /// # Examples
    /// ```text
    /// sum
    /// CONCATENATE
    /// ```
    Identifier(String),

    // Arithmetic
    /// Addition or string concatenation
    Plus,

    /// Subtraction or unary negation
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    // Delimiters
    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma separating call arguments
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// True for tokens that end an operand (a literal or a closing paren)
    pub fn ends_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::String(_) | Token::RParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", format_number(*n)),
            Token::String(s) => {
                write!(f, "\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ", "),
            Token::Eof => Ok(()),
        }
    }
}

/// Render a token sequence back into expression text (for diagnostics).
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}
