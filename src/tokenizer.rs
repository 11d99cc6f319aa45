//! Formula tokenizer (element extractor).
//!
//! Scans a formula left to right and extracts typed [`Element`]s. At every
//! position each matcher is tried anchored at that position and the longest
//! match wins; equal lengths go to the earlier matcher in this order:
//!
//! 1. function keyword (case-insensitive, registered names only)
//! 2. variable path (`a.b.c`)
//! 3. single-quoted constant (`'...'`)
//! 4. unsigned decimal numeral (`12`, `12.5`)
//! 5. operator (`+ - * /`)
//!
//! Anything else (parentheses, commas, whitespace, stray characters) is
//! skipped and produces no element.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{BinOp, Element},
    functions,
    path::Path,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Function,
    Variable,
    QuotedConstant,
    Constant,
    Operator,
}

struct Matcher {
    kind: Kind,
    pattern: Regex,
}

static MATCHERS: LazyLock<Vec<Matcher>> = LazyLock::new(|| {
    let names = functions::all()
        .iter()
        .map(|f| regex::escape(f.name))
        .collect::<Vec<_>>()
        .join("|");

    let patterns = [
        (Kind::Function, format!(r"^(?i:{})\b", names)),
        (
            Kind::Variable,
            r"^[a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*".to_string(),
        ),
        (Kind::QuotedConstant, r"^'[^']*'".to_string()),
        (Kind::Constant, r"^[0-9]+(?:\.[0-9]+)?".to_string()),
        (Kind::Operator, r"^[+\-*/]".to_string()),
    ];

    patterns
        .into_iter()
        .map(|(kind, pattern)| Matcher {
            kind,
            pattern: Regex::new(&pattern).expect("tokenizer patterns are valid"),
        })
        .collect()
});

/// Extract the elements of `text`.
///
/// Pure and deterministic: the same text always yields the same elements.
///
/// # Examples
///
/// ```
/// use jsonformula::{Element, tokenize};
/// use jsonformula::ast::BinOp;
///
/// let elements = tokenize("SUM(lines.amount) * 2");
/// assert_eq!(elements[0], Element::Function("SUM".to_string()));
/// assert_eq!(elements[2], Element::Operator(BinOp::Multiply));
/// assert_eq!(elements[3], Element::Constant("2".to_string()));
/// ```
pub fn tokenize(text: &str) -> Vec<Element> {
    let mut elements = Vec::new();
    let mut position = 0;

    while position < text.len() {
        let rest = &text[position..];

        match longest_match(rest) {
            Some((kind, len)) => {
                let matched = &rest[..len];
                log::trace!("{:?} '{}' at {}", kind, matched, position);
                elements.push(to_element(kind, matched));
                position += len;
            }
            None => {
                // Skip one character (punctuation, whitespace, anything unknown)
                let skip = rest.chars().next().map_or(1, char::len_utf8);
                position += skip;
            }
        }
    }

    elements
}

fn longest_match(rest: &str) -> Option<(Kind, usize)> {
    let mut best: Option<(Kind, usize)> = None;
    for matcher in MATCHERS.iter() {
        if let Some(m) = matcher.pattern.find(rest)
            && m.end() > best.map_or(0, |(_, len)| len)
        {
            best = Some((matcher.kind, m.end()));
        }
    }
    best
}

fn to_element(kind: Kind, matched: &str) -> Element {
    match kind {
        Kind::Function => Element::Function(matched.to_string()),
        Kind::Variable => match Path::parse(matched) {
            Ok(path) => Element::Variable(path),
            // The variable pattern only matches well-formed paths
            Err(_) => unreachable!("variable pattern matched invalid path '{}'", matched),
        },
        Kind::QuotedConstant => Element::QuotedConstant(matched.replace('\'', "\"")),
        Kind::Constant => Element::Constant(matched.to_string()),
        Kind::Operator => match matched.chars().next().and_then(BinOp::from_symbol) {
            Some(op) => Element::Operator(op),
            None => unreachable!("operator pattern matched '{}'", matched),
        },
    }
}
