use crate::ast::BinOp;
use crate::functions::Function;

/// Expression tree of the restricted engine.
///
/// There are no variables, attribute accesses, or arbitrary identifiers:
/// everything the engine can evaluate is one of these shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal number
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Number(f64),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// "hello"
    /// ```
    String(String),

    /// Run of same-precedence operators, applied left to right
    ///
    /// # Example
    /// ```text
    /// 100 - 19 + 9    // first: 100, rest: [(-, 19), (+, 9)]
    /// ```
    Chain {
        first: Box<Expr>,
        rest: Vec<(BinOp, Expr)>,
    },

    /// Arithmetic negation, evaluated as `0 - operand`
    Negate(Box<Expr>),

    /// Call to a registered function
    ///
    /// # Examples
    /// ```text
    /// sum(100, 90)
    /// concatenate("123", " ", "Test")
    /// ```
    Call {
        function: &'static Function,
        args: Vec<Expr>,
    },
}
