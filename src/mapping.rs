//! Field mappings: build a new object from named formulas.
//!
//! A mapping pairs output field names with formulas evaluated against the
//! same input document:
//!
//! ```text
//! total       := SUM(input.lines.amount)
//! netAmount   := SUM(input.lines.amount) - SUM(input.lines.taxAmount)
//! title       := CONCATENATE(input.no, ' ', input.description)
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::{evaluator::EvalError, formula::evaluate, value::Value};

/// What to do with a field whose formula fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Stop at the first failing field
    #[default]
    Fail,
    /// Store `null` for the failing field and continue
    Null,
}

/// A formula failure attributed to the output field it was computing.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingError {
    pub field: String,
    pub source: EvalError,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field '{}': {}", self.field, self.source)
    }
}

impl std::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Evaluate every `(field, formula)` pair against `data`.
///
/// # Examples
///
/// ```
/// use jsonformula::mapping::{OnError, apply_mapping};
/// use jsonformula::json_to_value;
/// use jsonformula::Value;
/// use serde_json::json;
///
/// let data = json_to_value(json!({"lines": [{"amount": 100}, {"amount": 90}]}));
/// let mapping = vec![
///     ("total".to_string(), "SUM(lines.amount)".to_string()),
///     ("broken".to_string(), "SUM(missing)".to_string()),
/// ];
///
/// assert!(apply_mapping(&mapping, &data, OnError::Fail).is_err());
///
/// let Value::Object(out) = apply_mapping(&mapping, &data, OnError::Null).unwrap() else {
///     unreachable!()
/// };
/// assert_eq!(out["total"], Value::Number(190.0));
/// assert_eq!(out["broken"], Value::Null);
/// ```
pub fn apply_mapping(
    mapping: &[(String, String)],
    data: &Value,
    policy: OnError,
) -> Result<Value, MappingError> {
    let mut output = HashMap::with_capacity(mapping.len());

    for (field, formula) in mapping {
        let value = match evaluate(formula, data) {
            Ok(value) => value,
            Err(source) if policy == OnError::Null => {
                log::debug!("field '{}' defaulted to null: {}", field, source);
                Value::Null
            }
            Err(source) => {
                return Err(MappingError {
                    field: field.clone(),
                    source,
                });
            }
        };
        output.insert(field.clone(), value);
    }

    Ok(Value::Object(output))
}
