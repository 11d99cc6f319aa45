//! The fixed function registry.
//!
//! Formulas may call exactly these functions, matched case-insensitively.
//! All of them are variadic. The registry is built once per process and is
//! read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::{evaluator::EvalError, value::Value};

/// What kind of value a function produces.
///
/// Text functions receive their data arguments as strings when a formula
/// call is assembled; numeric functions receive numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Numeric,
    Text,
}

/// A registered function.
pub struct Function {
    /// Canonical lowercase name
    pub name: &'static str,
    pub kind: ResultKind,
    /// One-line description shown by the CLI
    pub summary: &'static str,
    apply: fn(&[Value]) -> Result<Value, EvalError>,
}

impl Function {
    /// Apply the function to already-evaluated arguments.
    ///
    /// Array arguments are spread into the argument list.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.apply)(args)
    }

    pub fn is_text(&self) -> bool {
        self.kind == ResultKind::Text
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("name", &self.name).finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

static FUNCTIONS: [Function; 5] = [
    Function {
        name: "sum",
        kind: ResultKind::Numeric,
        summary: "Adds all arguments; arrays are added element by element",
        apply: fn_sum,
    },
    Function {
        name: "max",
        kind: ResultKind::Numeric,
        summary: "Largest of all arguments; needs at least one value",
        apply: fn_max,
    },
    Function {
        name: "min",
        kind: ResultKind::Numeric,
        summary: "Smallest of all arguments; needs at least one value",
        apply: fn_min,
    },
    Function {
        name: "concatenate",
        kind: ResultKind::Text,
        summary: "Joins the text of all arguments with no separator",
        apply: fn_concat,
    },
    Function {
        name: "concat",
        kind: ResultKind::Text,
        summary: "Alias of concatenate",
        apply: fn_concat,
    },
];

static REGISTRY: LazyLock<HashMap<&'static str, &'static Function>> =
    LazyLock::new(|| FUNCTIONS.iter().map(|f| (f.name, f)).collect());

/// Look a function up by name, ignoring case.
pub fn lookup(name: &str) -> Option<&'static Function> {
    REGISTRY.get(name.to_ascii_lowercase().as_str()).copied()
}

/// All registered functions in registration order.
///
/// The order matters to pattern matching: `concatenate` must be tried
/// before `concat`.
pub fn all() -> &'static [Function] {
    &FUNCTIONS
}

fn spread<'a>(args: &'a [Value], out: &mut Vec<&'a Value>) {
    for arg in args {
        match arg {
            Value::Array(items) => spread(items, out),
            other => out.push(other),
        }
    }
}

fn numbers(name: &str, args: &[Value]) -> Result<Vec<f64>, EvalError> {
    let mut flat = Vec::new();
    spread(args, &mut flat);
    flat.into_iter()
        .map(|v| {
            v.to_number().map_err(|_| {
                EvalError::TypeError(format!(
                    "{}() requires numeric values, got {}",
                    name,
                    v.type_name()
                ))
            })
        })
        .collect()
}

fn fn_sum(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Number(numbers("sum", args)?.into_iter().sum()))
}

fn fn_max(args: &[Value]) -> Result<Value, EvalError> {
    numbers("max", args)?
        .into_iter()
        .reduce(f64::max)
        .map(Value::Number)
        .ok_or_else(|| EvalError::TypeError("max() requires at least one value".to_string()))
}

fn fn_min(args: &[Value]) -> Result<Value, EvalError> {
    numbers("min", args)?
        .into_iter()
        .reduce(f64::min)
        .map(Value::Number)
        .ok_or_else(|| EvalError::TypeError("min() requires at least one value".to_string()))
}

fn fn_concat(args: &[Value]) -> Result<Value, EvalError> {
    let mut flat = Vec::new();
    spread(args, &mut flat);
    Ok(Value::String(flat.into_iter().map(Value::to_text).collect()))
}
