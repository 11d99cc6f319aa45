//! Function reference for the jsonformula CLI

use crate::functions;

/// Render the function registry as a reference listing
pub fn functions_overview() -> String {
    let mut out = String::from("FUNCTIONS\n\n");
    for function in functions::all() {
        out.push_str(&format!("  {:<14}{}\n", function.name.to_uppercase(), function.summary));
    }
    out.push_str(
        r#"
OPERATORS

  + - * /       Arithmetic between call results and constants ('/' is true division)

EXAMPLES

  SUM(input.lines.amount)
  MAX(input.lines.taxAmount) + SUM(input.lines.amount)
  CONCATENATE(input.no, ' ', input.description)

Function names are case-insensitive. Calls cannot be nested, and paths are
only read inside a call.
"#,
    );
    out
}
