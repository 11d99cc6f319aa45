use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::evaluator::EvalError;

static NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?[0-9]+(?:\.[0-9]+)?$").expect("numeral pattern is valid")
});

/// A JSON-like value flowing through formula evaluation.
///
/// Input documents are converted into this type before evaluation and every
/// formula produces one of these as its result (in practice a `Number` or a
/// `String`). Values are never mutated by evaluation.
///
/// # Examples
///
/// ```
/// use jsonformula::Value;
/// use std::collections::HashMap;
///
/// let amount = Value::Number(100.0);
/// let label = Value::String("total".to_string());
///
/// let mut line = HashMap::new();
/// line.insert("amount".to_string(), amount);
/// let lines = Value::Array(vec![Value::Object(line)]);
///
/// assert_eq!(label.to_text(), "total");
/// assert_eq!(lines.type_name(), "array");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Double-precision number
    Number(f64),

    /// UTF-8 string
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// Record with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    /// Human-readable type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Coerce to a number for arithmetic and numeric reductions.
    ///
    /// Numbers pass through unchanged. Strings must hold a plain decimal
    /// numeral such as `-12.5` (surrounding whitespace is ignored); digit
    /// separators and exponents are rejected. Every other type is rejected.
    pub fn to_number(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::String(s) => parse_decimal(s).ok_or_else(|| {
                EvalError::TypeError(format!("Cannot use string '{}' as a number", s))
            }),
            other => Err(EvalError::TypeError(format!(
                "Cannot use {} as a number",
                other.type_name()
            ))),
        }
    }

    /// Canonical text form, as used by `concat`.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => crate::convert::value_to_json(self.clone()).to_string(),
        }
    }
}

/// Format a number the shortest way that reads back to the same double.
///
/// Integral values carry no fractional part (`190`, not `190.0`).
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoids printing "-0"
        return "0".to_string();
    }
    n.to_string()
}

fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if !NUMERAL.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok()
}
