//! Apply a field mapping to JSON input

use super::{CliError, parse_input, value_to_json};
use crate::mapping::{OnError, apply_mapping};

/// Options for the map command
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    /// JSON object of output field name to formula
    pub mapping: String,
    /// JSON input string
    pub input: Option<String>,
    /// Store null for failing fields instead of aborting
    pub lenient: bool,
}

/// Execute a map operation, returning the computed object
pub fn execute_map(options: &MapOptions) -> Result<serde_json::Value, CliError> {
    let mapping = parse_mapping(&options.mapping)?;
    let data = parse_input(options.input.as_ref())?;

    let policy = if options.lenient {
        OnError::Null
    } else {
        OnError::Fail
    };

    let output = apply_mapping(&mapping, &data, policy)?;
    Ok(value_to_json(output))
}

fn parse_mapping(text: &str) -> Result<Vec<(String, String)>, CliError> {
    let serde_json::Value::Object(fields) = serde_json::from_str::<serde_json::Value>(text)? else {
        return Err(CliError::InvalidMapping(
            "expected a JSON object of field names to formulas".to_string(),
        ));
    };

    fields
        .into_iter()
        .map(|(field, formula)| match formula {
            serde_json::Value::String(formula) => Ok((field, formula)),
            other => Err(CliError::InvalidMapping(format!(
                "formula for '{}' must be a string, got {}",
                field, other
            ))),
        })
        .collect()
}
