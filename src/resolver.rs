//! Path resolution with array broadcasting.
//!
//! Resolving `lines.amount` against `{"lines": [{"amount": 100}, {"amount": 90}]}`
//! yields `[100, 90]`: when an array is met, the rest of the path is resolved
//! against every element and the results are collected in order.

use crate::{evaluator::EvalError, path::Path, value::Value};

/// Resolve `path` against `root`.
///
/// # Errors
///
/// `PathNotFound` when an object lacks a segment's key, or when a segment
/// remains but the current value is a scalar.
///
/// # Examples
///
/// ```
/// use jsonformula::{Path, Value, resolve};
/// use std::collections::HashMap;
///
/// let line = |amount: f64| {
///     let mut obj = HashMap::new();
///     obj.insert("amount".to_string(), Value::Number(amount));
///     Value::Object(obj)
/// };
/// let mut doc = HashMap::new();
/// doc.insert("lines".to_string(), Value::Array(vec![line(100.0), line(90.0)]));
///
/// let path: Path = "lines.amount".parse().unwrap();
/// let amounts = resolve(&Value::Object(doc), &path).unwrap();
/// assert_eq!(amounts, Value::Array(vec![Value::Number(100.0), Value::Number(90.0)]));
/// ```
pub fn resolve(root: &Value, path: &Path) -> Result<Value, EvalError> {
    resolve_segments(root, path.segments(), path)
}

fn resolve_segments(current: &Value, segments: &[String], path: &Path) -> Result<Value, EvalError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(current.clone());
    };

    match current {
        Value::Array(items) => {
            log::trace!("broadcasting '{}' over {} elements", segment, items.len());
            let mut results = Vec::with_capacity(items.len());
            for item in items {
                results.push(resolve_segments(item, segments, path)?);
            }
            Ok(Value::Array(results))
        }
        Value::Object(map) => match map.get(segment) {
            Some(value) => resolve_segments(value, rest, path),
            None => Err(EvalError::PathNotFound {
                path: path.to_string(),
                segment: segment.clone(),
            }),
        },
        _ => Err(EvalError::PathNotFound {
            path: path.to_string(),
            segment: segment.clone(),
        }),
    }
}
