// tests/formula_tests.rs

use jsonformula::json_to_value;
use jsonformula::{EvalError, Value, check, evaluate, evaluate_call};
use pretty_assertions::assert_eq;
use serde_json::json;

fn lines_doc() -> Value {
    json_to_value(json!({
        "lines": [
            {"amount": 100, "taxAmount": 10},
            {"amount": 90, "taxAmount": 9}
        ]
    }))
}

fn invoice_doc() -> Value {
    json_to_value(json!({
        "input": {
            "no": "123",
            "description": "Test Description",
            "lines": [
                {"amount": 100, "taxAmount": 10},
                {"amount": 90, "taxAmount": 9}
            ]
        }
    }))
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn text(s: &str) -> Value {
    Value::String(s.to_string())
}

// ============================================================================
// Single Calls
// ============================================================================

#[test]
fn test_sum_over_broadcast_path() {
    assert_eq!(evaluate("SUM(lines.amount)", &lines_doc()).unwrap(), num(190.0));
}

#[test]
fn test_max_and_min() {
    let doc = invoice_doc();
    assert_eq!(evaluate("MAX(input.lines.amount)", &doc).unwrap(), num(100.0));
    assert_eq!(evaluate("MIN(input.lines.amount)", &doc).unwrap(), num(90.0));
}

#[test]
fn test_concatenate_with_quoted_separator() {
    let doc = json_to_value(json!({"a": "123", "b": "Test"}));
    assert_eq!(
        evaluate("CONCATENATE(a, ' ', b)", &doc).unwrap(),
        text("123 Test")
    );
}

#[test]
fn test_concat_alias_and_numbers_as_text() {
    let doc = invoice_doc();
    assert_eq!(
        evaluate("concat(input.no, '-', input.lines.amount, 7)", &doc).unwrap(),
        text("123-100907")
    );
}

#[test]
fn test_concat_renders_records_as_json() {
    let doc = json_to_value(json!({"meta": {"id": 7}, "flag": true, "none": null}));
    assert_eq!(
        evaluate("CONCAT(meta, ' ', flag, ' ', none)", &doc).unwrap(),
        text(r#"{"id":7} true null"#)
    );
}

#[test]
fn test_lowercase_function_names() {
    assert_eq!(evaluate("sum(lines.taxAmount)", &lines_doc()).unwrap(), num(19.0));
}

#[test]
fn test_multiple_arguments_in_numeric_call() {
    let doc = json_to_value(json!({"a": 1, "b": 2, "c": [3, 4]}));
    assert_eq!(evaluate("SUM(a, b, c)", &doc).unwrap(), num(10.0));
    assert_eq!(evaluate("MAX(a, c, 2.5)", &doc).unwrap(), num(4.0));
}

#[test]
fn test_operators_inside_call() {
    let doc = json_to_value(json!({"a": 10, "b": 4}));
    assert_eq!(evaluate("SUM(a * 2, b)", &doc).unwrap(), num(24.0));
    assert_eq!(evaluate("MIN(a - b, 100)", &doc).unwrap(), num(6.0));
}

#[test]
fn test_numeric_strings_in_numeric_call() {
    let doc = json_to_value(json!({"prices": ["1.50", "2.25"]}));
    assert_eq!(evaluate("SUM(prices)", &doc).unwrap(), num(3.75));
}

#[test]
fn test_numeric_strings_must_be_plain_numerals() {
    let doc = json_to_value(json!({
        "grouped": "1_000",
        "exponent": "1e3",
        "signed": " -2.5 ",
        "wide": "123456789012345678901234567890"
    }));
    for formula in ["SUM(grouped)", "SUM(exponent)"] {
        assert!(
            matches!(evaluate(formula, &doc), Err(EvalError::TypeError(_))),
            "Accepted: {}",
            formula
        );
    }
    assert_eq!(evaluate("SUM(signed)", &doc).unwrap(), num(-2.5));
    assert_eq!(
        evaluate("SUM(wide)", &doc).unwrap(),
        num(123456789012345678901234567890.0)
    );
}

#[test]
fn test_nested_arrays_are_flattened() {
    let doc = json_to_value(json!({
        "orders": [
            {"lines": [{"amount": 1}, {"amount": 2}]},
            {"lines": [{"amount": 3}]}
        ]
    }));
    assert_eq!(evaluate("SUM(orders.lines.amount)", &doc).unwrap(), num(6.0));
}

#[test]
fn test_evaluate_call_directly() {
    assert_eq!(
        evaluate_call("MAX(lines.taxAmount)", &lines_doc()).unwrap(),
        num(10.0)
    );
}

// ============================================================================
// Outer Expressions
// ============================================================================

#[test]
fn test_sum_of_two_calls() {
    assert_eq!(
        evaluate("MAX(lines.taxAmount)+SUM(lines.amount)", &lines_doc()).unwrap(),
        num(200.0)
    );
}

#[test]
fn test_precedence_and_true_division() {
    assert_eq!(
        evaluate(
            "SUM(lines.amount)-SUM(lines.taxAmount)/SUM(lines.amount)",
            &lines_doc()
        )
        .unwrap(),
        num(190.0 - 19.0 / 190.0)
    );
    assert_eq!(
        evaluate(
            "SUM(input.lines.amount)-SUM(input.lines.taxAmount)/SUM(input.lines.amount)",
            &invoice_doc()
        )
        .unwrap(),
        num(189.9)
    );
}

#[test]
fn test_constants_in_outer_expression() {
    let doc = lines_doc();
    assert_eq!(evaluate("SUM(lines.amount) * 2", &doc).unwrap(), num(380.0));
    assert_eq!(evaluate("10 + MAX(lines.amount) / 4", &doc).unwrap(), num(35.0));
    assert_eq!(evaluate("1 + 2", &doc).unwrap(), num(3.0));
}

#[test]
fn test_string_results_concatenate_with_plus() {
    let doc = invoice_doc();
    assert_eq!(
        evaluate("CONCAT(input.no) + ':' + CONCAT(input.description)", &doc).unwrap(),
        text("123:Test Description")
    );
}

#[test]
fn test_outer_variables_are_ignored() {
    let doc = lines_doc();
    assert_eq!(evaluate("SUM(lines.amount) undefined.path", &doc).unwrap(), num(190.0));
    assert_eq!(evaluate("SUM(lines.amount) * 2 missing", &doc).unwrap(), num(380.0));
}

#[test]
fn test_without_operator_last_call_wins() {
    let doc = lines_doc();
    assert_eq!(
        evaluate("SUM(lines.amount) MAX(lines.amount)", &doc).unwrap(),
        num(100.0)
    );
}

#[test]
fn test_repeated_function_names_find_their_own_spans() {
    let doc = json_to_value(json!({"a": 1, "b": 2, "summary": {"sum": 5}}));
    assert_eq!(evaluate("SUM(a) + SUM(b)", &doc).unwrap(), num(3.0));
    assert_eq!(evaluate("SUM(summary.sum) * SUM(b)", &doc).unwrap(), num(10.0));
    assert_eq!(evaluate("sum(a) + SUM(b) + sum(b)", &doc).unwrap(), num(5.0));
}

#[test]
fn test_path_named_like_a_function_is_not_a_call() {
    let doc = json_to_value(json!({"a": 3, "SUM": {"total": 50}}));
    assert_eq!(evaluate("SUM.total SUM(a) * 2", &doc).unwrap(), num(6.0));
}

// ============================================================================
// Data Safety
// ============================================================================

#[test]
fn test_data_cannot_inject_expression_structure() {
    let doc = json_to_value(json!({"a": "\") + sum(1000", "b": "x\"y"}));
    assert_eq!(
        evaluate("CONCAT(a, b)", &doc).unwrap(),
        text("\") + sum(1000x\"y")
    );
}

#[test]
fn test_input_is_not_mutated() {
    let doc = lines_doc();
    let before = doc.clone();
    evaluate("SUM(lines.amount) * 2", &doc).unwrap();
    assert_eq!(doc, before);
}

#[test]
fn test_concurrent_evaluation() {
    let doc = lines_doc();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let doc = &doc;
                scope.spawn(move || evaluate(&format!("SUM(lines.amount) + {}", i), doc))
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap().unwrap(), num(190.0 + i as f64));
        }
    });
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_path() {
    let doc = json_to_value(json!({}));
    assert_eq!(
        evaluate("SUM(missing.amount)", &doc),
        Err(EvalError::PathNotFound {
            path: "missing.amount".into(),
            segment: "missing".into(),
        })
    );
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        evaluate("SUM(lines.amount)/0", &lines_doc()),
        Err(EvalError::DivisionByZero)
    );
}

#[test]
fn test_malformed_call() {
    assert!(matches!(
        evaluate("SUM(lines.amount", &lines_doc()),
        Err(EvalError::MalformedCall(_))
    ));
    assert!(matches!(
        evaluate("SUM(lines.amount) + MAX(lines.amount", &lines_doc()),
        Err(EvalError::MalformedCall(_))
    ));
}

#[test]
fn test_empty_formula() {
    let doc = lines_doc();
    for formula in ["", "   ", "lines.amount", "42", "'text'", "(,)"] {
        assert_eq!(
            evaluate(formula, &doc),
            Err(EvalError::EmptyFormula),
            "Failed for: {:?}",
            formula
        );
    }
}

#[test]
fn test_nested_calls_are_rejected() {
    assert!(matches!(
        evaluate("SUM(MAX(lines.amount))", &lines_doc()),
        Err(EvalError::UnsupportedExpression(_))
    ));
}

#[test]
fn test_type_errors() {
    let doc = json_to_value(json!({"flag": true, "name": "abc", "obj": {"x": 1}, "n": null}));
    for formula in ["SUM(flag)", "SUM(name)", "MAX(obj)", "MIN(n)"] {
        assert!(
            matches!(evaluate(formula, &doc), Err(EvalError::TypeError(_))),
            "Failed for: {}",
            formula
        );
    }
}

#[test]
fn test_dangling_operator() {
    assert!(matches!(
        evaluate("SUM(lines.amount) +", &lines_doc()),
        Err(EvalError::UnsupportedExpression(_))
    ));
}

// ============================================================================
// Syntax Check
// ============================================================================

#[test]
fn test_check_accepts_valid_formulas() {
    for formula in [
        "SUM(input.lines.amount)",
        "CONCATENATE(input.no, ' ', input.description)",
        "MAX(input.lines.taxAmount)+SUM(input.lines.amount)",
        "SUM(a)/0",
    ] {
        assert_eq!(check(formula), Ok(()), "Failed for: {}", formula);
    }
}

#[test]
fn test_check_rejects_invalid_formulas() {
    assert!(matches!(check("SUM(a"), Err(EvalError::MalformedCall(_))));
    assert_eq!(check("a.b"), Err(EvalError::EmptyFormula));
    assert!(matches!(
        check("SUM(MIN(a))"),
        Err(EvalError::UnsupportedExpression(_))
    ));
    assert!(matches!(
        check("SUM(a) * * 2"),
        Err(EvalError::UnsupportedExpression(_))
    ));
}

// ============================================================================
// Long Formulas
// ============================================================================

#[test]
fn test_long_outer_chain() {
    let doc = json_to_value(json!({"a": 1}));
    let formula = format!("SUM(a){}", "+1".repeat(10_000));
    assert_eq!(evaluate(&formula, &doc).unwrap(), num(10_001.0));
}

#[test]
fn test_long_minus_prefix_inside_call() {
    let doc = json_to_value(json!({}));
    let formula = format!("SUM({}1)", "-".repeat(10_000));
    assert_eq!(evaluate(&formula, &doc).unwrap(), num(1.0));

    let formula = format!("SUM({}1)", "-".repeat(10_001));
    assert_eq!(evaluate(&formula, &doc).unwrap(), num(-1.0));
    assert_eq!(check(&formula), Ok(()));
}
