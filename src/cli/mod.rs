//! CLI support for jsonformula
//!
//! Provides programmatic access to the command-line operations so they can
//! be embedded in other tools.

mod docs;
mod eval;
mod map;

pub use crate::convert::{json_to_value, value_to_json};
pub use docs::functions_overview;
pub use eval::{EvalOptions, EvalOutcome, execute_eval};
pub use map::{MapOptions, execute_map};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Formula evaluation error
    Eval(crate::EvalError),
    /// Field mapping error
    Mapping(crate::mapping::MappingError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// Mapping document is not an object of strings
    InvalidMapping(String),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Eval(e) => write!(f, "Evaluation error: {}", e),
            CliError::Mapping(e) => write!(f, "Mapping error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::InvalidMapping(msg) => write!(f, "Invalid mapping: {}", msg),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Use --input or pipe JSON to stdin."),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Eval(e) => Some(e),
            CliError::Mapping(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::EvalError> for CliError {
    fn from(e: crate::EvalError) -> Self {
        CliError::Eval(e)
    }
}

impl From<crate::mapping::MappingError> for CliError {
    fn from(e: crate::mapping::MappingError) -> Self {
        CliError::Mapping(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Parse the JSON document a formula runs against.
fn parse_input(input: Option<&String>) -> Result<crate::Value, CliError> {
    let json_str = input.ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    Ok(json_to_value(json_value))
}
