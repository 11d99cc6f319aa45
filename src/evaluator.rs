use crate::{
    ast::{BinOp, Expr},
    parser::{ParseError, Parser},
    value::Value,
};

/// Errors that can occur while evaluating a formula.
///
/// Evaluation either succeeds with one value or fails with exactly one of
/// these; nothing is logged or recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A variable path names a key that does not exist
    PathNotFound { path: String, segment: String },

    /// A value cannot be coerced to the type an operator or function needs
    TypeError(String),

    /// Division by exactly zero
    DivisionByZero,

    /// A function call has no closing parenthesis
    MalformedCall(String),

    /// The formula contains no function call and no operator
    EmptyFormula,

    /// A construct outside the restricted grammar
    UnsupportedExpression(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::PathNotFound { path, segment } => {
                write!(f, "Path not found: '{}' (no key '{}')", path, segment)
            }
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::MalformedCall(call) => {
                write!(f, "Malformed call: '{}' has no closing parenthesis", call)
            }
            EvalError::EmptyFormula => write!(f, "Empty formula: nothing to evaluate"),
            EvalError::UnsupportedExpression(msg) => write!(f, "Unsupported expression: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<ParseError> for EvalError {
    fn from(e: ParseError) -> Self {
        EvalError::UnsupportedExpression(e.to_string())
    }
}

/// Tree-walking evaluator of the restricted engine.
///
/// Only literals, the four arithmetic operators, and registered function
/// calls can be evaluated; there is no environment and no way to reach
/// anything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Evaluator
    }

    /// Lex, parse and evaluate an engine expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonformula::{Evaluator, Value};
    ///
    /// let evaluator = Evaluator::new();
    /// let result = evaluator.eval_source("sum(100, 90) - 19 / 190").unwrap();
    /// assert_eq!(result, Value::Number(189.9));
    ///
    /// assert!(evaluator.eval_source("open(\"/etc/passwd\")").is_err());
    /// ```
    pub fn eval_source(&self, source: &str) -> Result<Value, EvalError> {
        let expr = Parser::from_source(source)?.parse()?;
        self.eval_expr(&expr)
    }

    pub fn eval_expr(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Chain { first, rest } => {
                let mut acc = self.eval_expr(first)?;
                for (op, operand) in rest {
                    let right_val = self.eval_expr(operand)?;
                    acc = self.apply_binop(*op, &acc, &right_val)?;
                }
                Ok(acc)
            }
            Expr::Negate(operand) => {
                let value = self.eval_expr(operand)?;
                self.apply_binop(BinOp::Subtract, &Value::Number(0.0), &value)
            }
            Expr::Call { function, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }
                function.call(&values)
            }
        }
    }

    fn apply_binop(&self, op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
        if let (BinOp::Add, Value::String(a), Value::String(b)) = (op, left, right) {
            return Ok(Value::String(format!("{}{}", a, b)));
        }

        let a = left.to_number()?;
        let b = right.to_number()?;

        let result = match op {
            BinOp::Add => a + b,
            BinOp::Subtract => a - b,
            BinOp::Multiply => a * b,
            BinOp::Divide => {
                if b == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                a / b
            }
        };
        Ok(Value::Number(result))
    }
}
