use std::fmt;

/// Binary arithmetic operators.
///
/// This is the complete operator vocabulary of the formula language; there
/// are no comparison or logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition, or concatenation of two strings (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// True division (`/`)
    Divide,
}

impl BinOp {
    /// Operator for a single-character symbol
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(BinOp::Add),
            '-' => Some(BinOp::Subtract),
            '*' => Some(BinOp::Multiply),
            '/' => Some(BinOp::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Subtract => '-',
            BinOp::Multiply => '*',
            BinOp::Divide => '/',
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
