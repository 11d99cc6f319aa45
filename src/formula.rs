//! Two-level formula evaluation.
//!
//! A formula such as
//!
//! ```text
//! MAX(lines.taxAmount) + SUM(lines.amount)
//! ```
//!
//! is evaluated in two steps. Every function call is located in the text
//! (from the function name to the first `)` after it), its variables are
//! resolved against the document, and the call is reduced to a literal by the
//! restricted engine. The literals, constants and operators outside the calls
//! then form the outer expression, which is reduced by the same engine.
//!
//! Calls cannot be nested: the first `)` always closes the call.
//! Variables outside a call are ignored.

use std::ops::Range;

use crate::{
    ast::{BinOp, Element, Token, tokens::render},
    evaluator::{EvalError, Evaluator},
    functions,
    parser::Parser,
    path::Path,
    resolver::resolve,
    tokenizer::tokenize,
    value::{Value, format_number},
};

/// How variables are supplied while walking a formula.
#[derive(Clone, Copy)]
enum Mode<'a> {
    /// Resolve against a document and evaluate
    Evaluate(&'a Value),
    /// Substitute placeholders and only parse
    Check,
}

/// Evaluate `formula` against `data`.
///
/// # Errors
///
/// - `PathNotFound` when a variable inside a call does not resolve
/// - `TypeError` when a value cannot be used where it appears
/// - `DivisionByZero`
/// - `MalformedCall` when a function name has no closing `)` after it
/// - `EmptyFormula` when there is neither a call nor an operator
/// - `UnsupportedExpression` for nested calls and anything else outside the
///   grammar
///
/// # Examples
///
/// ```
/// use jsonformula::{Value, evaluate};
/// use jsonformula::json_to_value;
/// use serde_json::json;
///
/// let data = json_to_value(json!({
///     "lines": [{"amount": 100, "taxAmount": 10}, {"amount": 90, "taxAmount": 9}]
/// }));
///
/// let total = evaluate("MAX(lines.taxAmount) + SUM(lines.amount)", &data).unwrap();
/// assert_eq!(total, Value::Number(200.0));
/// ```
pub fn evaluate(formula: &str, data: &Value) -> Result<Value, EvalError> {
    walk(formula, Mode::Evaluate(data)).map(|outcome| outcome.unwrap_or(Value::Null))
}

/// Validate a formula without data.
///
/// Detects everything `evaluate` would reject before looking at the
/// document: unclosed and nested calls, empty formulas, and expressions
/// the engine cannot parse. Variables are replaced by placeholders, so
/// missing paths, type mismatches and division by zero are not reported.
pub fn check(formula: &str) -> Result<(), EvalError> {
    walk(formula, Mode::Check).map(|_| ())
}

/// Evaluate a single call span such as `SUM(lines.amount)`.
///
/// The span must start with a registered function name. Everything up to
/// the end of the span is treated as its arguments.
pub fn evaluate_call(span: &str, data: &Value) -> Result<Value, EvalError> {
    reduce_call(tokenize(span), data)
}

fn reduce_call(elements: Vec<Element>, data: &Value) -> Result<Value, EvalError> {
    let tokens = assemble_call(elements, &mut |path: &Path| resolve(data, path))?;
    log::debug!("evaluating call {}", render(&tokens));
    let expr = Parser::new(tokens).parse()?;
    Evaluator::new().eval_expr(&expr)
}

fn walk(formula: &str, mode: Mode<'_>) -> Result<Option<Value>, EvalError> {
    let mut elements = tokenize(formula).into_iter();
    let mut buffer = Vec::new();
    let mut composite = false;
    let mut last_call = None;
    let mut cursor = 0;

    while let Some(element) = elements.next() {
        match element {
            Element::Function(name) => {
                let span = locate_call(formula, &name, cursor)?;
                cursor = span.end;
                let text = &formula[span];

                let call_elements = tokenize(text);
                // The call's arguments were also extracted by the outer scan
                for _ in 1..call_elements.len() {
                    elements.next();
                }

                let result = match mode {
                    Mode::Evaluate(data) => reduce_call(call_elements, data)?,
                    Mode::Check => {
                        let tokens =
                            assemble_call(call_elements, &mut |_: &Path| Ok(Value::Number(0.0)))?;
                        Parser::new(tokens).parse()?;
                        Value::Number(0.0)
                    }
                };

                buffer.push(literal(&result)?);
                last_call = Some(result);
            }
            Element::Variable(path) => {
                log::debug!("ignoring variable '{}' outside a function call", path);
            }
            Element::QuotedConstant(text) => {
                buffer.push(Token::String(Element::unquoted(&text).to_string()));
            }
            Element::Constant(text) => buffer.push(Token::Number(numeral(&text)?)),
            Element::Operator(op) => {
                composite = true;
                buffer.push(operator(op));
            }
        }
    }

    if !composite {
        return match last_call {
            Some(result) => Ok(Some(result)),
            None => Err(EvalError::EmptyFormula),
        };
    }

    log::debug!("evaluating outer expression {}", render(&buffer));
    let expr = Parser::new(buffer).parse()?;
    match mode {
        Mode::Evaluate(_) => Evaluator::new().eval_expr(&expr).map(Some),
        Mode::Check => Ok(None),
    }
}

/// Find the call starting at the first occurrence of `name` at or after
/// `cursor` and ending at the first `)` after it.
fn locate_call(formula: &str, name: &str, cursor: usize) -> Result<Range<usize>, EvalError> {
    let start = find_word(formula, name, cursor)
        .ok_or_else(|| EvalError::MalformedCall(formula[cursor..].trim().to_string()))?;

    match formula[start..].find(')') {
        Some(offset) => Ok(start..start + offset + 1),
        None => Err(EvalError::MalformedCall(formula[start..].trim().to_string())),
    }
}

/// First occurrence of `word` at or after `from` that is not part of a
/// longer identifier or path.
fn find_word(text: &str, word: &str, from: usize) -> Option<usize> {
    let joined = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.';

    text[from..]
        .match_indices(word)
        .map(|(offset, _)| from + offset)
        .find(|&start| {
            let before = text[..start].chars().next_back();
            let after = text[start + word.len()..].chars().next();
            !before.is_some_and(joined) && !after.is_some_and(joined)
        })
}

/// Turn the elements of one call span into engine tokens.
///
/// Adjacent operands become separate arguments (the commas between them are
/// not elements), and arrays are spread into one argument per element.
fn assemble_call(
    elements: Vec<Element>,
    lookup_path: &mut dyn FnMut(&Path) -> Result<Value, EvalError>,
) -> Result<Vec<Token>, EvalError> {
    let mut elements = elements.into_iter();

    let name = match elements.next() {
        Some(Element::Function(name)) => name,
        _ => {
            return Err(EvalError::UnsupportedExpression(
                "a call must start with a function name".to_string(),
            ));
        }
    };
    let function = functions::lookup(&name)
        .ok_or_else(|| EvalError::UnsupportedExpression(format!("Unknown function '{}'", name)))?;
    let text_mode = function.is_text();

    let mut tokens = vec![Token::Identifier(function.name.to_string()), Token::LParen];

    for element in elements {
        match element {
            Element::Function(inner) => {
                return Err(EvalError::UnsupportedExpression(format!(
                    "nested call to '{}' inside '{}' is not supported",
                    inner, name
                )));
            }
            Element::Variable(path) => {
                let value = lookup_path(&path)?;
                push_value(&mut tokens, &value, text_mode)?;
            }
            Element::QuotedConstant(text) => {
                push_operand(&mut tokens, Token::String(Element::unquoted(&text).to_string()));
            }
            Element::Constant(text) => {
                let token = if text_mode {
                    Token::String(text)
                } else {
                    Token::Number(numeral(&text)?)
                };
                push_operand(&mut tokens, token);
            }
            Element::Operator(op) => tokens.push(operator(op)),
        }
    }

    tokens.push(Token::RParen);
    tokens.push(Token::Eof);
    Ok(tokens)
}

fn push_operand(tokens: &mut Vec<Token>, token: Token) {
    if tokens.last().is_some_and(Token::ends_operand) {
        tokens.push(Token::Comma);
    }
    tokens.push(token);
}

fn push_value(tokens: &mut Vec<Token>, value: &Value, text_mode: bool) -> Result<(), EvalError> {
    match value {
        Value::Array(items) => {
            for item in items {
                push_value(tokens, item, text_mode)?;
            }
        }
        Value::Number(n) if !text_mode => push_operand(tokens, Token::Number(*n)),
        Value::Number(n) => push_operand(tokens, Token::String(format_number(*n))),
        other if text_mode => push_operand(tokens, Token::String(other.to_text())),
        other => push_operand(tokens, Token::Number(other.to_number()?)),
    }
    Ok(())
}

fn literal(value: &Value) -> Result<Token, EvalError> {
    match value {
        Value::Number(n) => Ok(Token::Number(*n)),
        Value::String(s) => Ok(Token::String(s.clone())),
        other => Err(EvalError::TypeError(format!(
            "a call produced {}, expected a number or string",
            other.type_name()
        ))),
    }
}

fn numeral(text: &str) -> Result<f64, EvalError> {
    text.parse::<f64>()
        .map_err(|_| EvalError::UnsupportedExpression(format!("Invalid numeral '{}'", text)))
}

fn operator(op: BinOp) -> Token {
    match op {
        BinOp::Add => Token::Plus,
        BinOp::Subtract => Token::Minus,
        BinOp::Multiply => Token::Star,
        BinOp::Divide => Token::Slash,
    }
}
