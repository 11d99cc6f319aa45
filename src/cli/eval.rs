//! Evaluate a formula against JSON input

use super::{CliError, parse_input, value_to_json};
use crate::formula::{check, evaluate};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The formula to evaluate
    pub formula: String,
    /// JSON input string
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of an eval operation
#[derive(Debug)]
pub enum EvalOutcome {
    /// Syntax validation passed
    SyntaxValid,
    /// Formula evaluated successfully
    Success(serde_json::Value),
}

/// Execute an eval operation
pub fn execute_eval(options: &EvalOptions) -> Result<EvalOutcome, CliError> {
    if options.syntax_only {
        check(&options.formula)?;
        return Ok(EvalOutcome::SyntaxValid);
    }

    let data = parse_input(options.input.as_ref())?;
    let result = evaluate(&options.formula, &data)?;
    Ok(EvalOutcome::Success(value_to_json(result)))
}
