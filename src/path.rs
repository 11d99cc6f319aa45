use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::evaluator::EvalError;

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("segment pattern is valid")
});

/// A dotted key path into a document.
///
/// Each segment names an object field. There are no index segments: arrays
/// met along the way are broadcast over by the resolver instead.
///
/// # Examples
///
/// ```
/// use jsonformula::Path;
///
/// let path: Path = "input.lines.amount".parse().unwrap();
/// assert_eq!(path.segments(), ["input", "lines", "amount"]);
/// assert_eq!(path.to_string(), "input.lines.amount");
///
/// assert!("lines..amount".parse::<Path>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The empty path, which resolves to the document itself
    pub fn root() -> Self {
        Path::default()
    }

    /// Parse `a.b.c`, rejecting empty or non-identifier segments
    pub fn parse(text: &str) -> Result<Self, EvalError> {
        let mut segments = Vec::new();
        for segment in text.split('.') {
            if !SEGMENT.is_match(segment) {
                return Err(EvalError::UnsupportedExpression(format!(
                    "Invalid path '{}': segment '{}' is not an identifier",
                    text, segment
                )));
            }
            segments.push(segment.to_string());
        }
        Ok(Path { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for Path {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
