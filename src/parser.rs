use std::fmt;

use crate::{
    ast::{BinOp, Expr, Token},
    functions,
    lexer::Lexer,
};

/// Errors raised while lexing or parsing an engine expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Character outside the grammar (e.g. `.`, `%`, `=`)
    UnexpectedChar { ch: char, position: usize },

    /// String literal without a closing quote
    UnterminatedString { position: usize },

    /// Backslash followed by an unsupported character
    InvalidEscape { ch: char, position: usize },

    /// Numeral that does not fit a double
    InvalidNumber { text: String, position: usize },

    /// Token that cannot appear where it was found
    UnexpectedToken { expected: String, found: Token },

    /// Identifier that is not a registered function
    UnknownFunction(String),

    /// Parentheses or calls nested deeper than [`MAX_NESTING`]
    TooDeeplyNested { limit: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedChar { ch, position } => {
                write!(f, "Unexpected character '{}' at position {}", ch, position)
            }
            ParseError::UnterminatedString { position } => {
                write!(f, "Unterminated string starting at position {}", position)
            }
            ParseError::InvalidEscape { ch, position } => {
                write!(f, "Invalid escape sequence \\{} at position {}", ch, position)
            }
            ParseError::InvalidNumber { text, position } => {
                write!(f, "Invalid number '{}' at position {}", text, position)
            }
            ParseError::UnexpectedToken { expected, found } => match found {
                Token::Eof => write!(f, "Expected {}, got end of input", expected),
                token => write!(f, "Expected {}, got '{}'", expected, token),
            },
            ParseError::UnknownFunction(name) => write!(f, "Unknown function '{}'", name),
            ParseError::TooDeeplyNested { limit } => {
                write!(f, "Expression nested deeper than {} levels", limit)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// How many parentheses and calls may enclose one another.
pub const MAX_NESTING: usize = 64;

/// Recursive-descent parser for the restricted engine grammar:
///
/// ```text
/// expression     := multiplicative (("+" | "-") multiplicative)*
/// multiplicative := unary (("*" | "/") unary)*
/// unary          := "-"* primary
/// primary        := NUMBER | STRING | "(" expression ")" | call
/// call           := FUNCTION "(" (expression ("," expression)*)? ")"
/// ```
///
/// Runs of `+`/`-` and of `*`/`/` become one flat [`Expr::Chain`] and
/// repeated minus signs collapse into at most two [`Expr::Negate`]s, so only
/// nesting (bounded by [`MAX_NESTING`]) deepens the tree.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    /// Parser over an already-assembled token sequence.
    ///
    /// A trailing `Token::Eof` is optional.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Lex `source` and create a parser over its tokens.
    pub fn from_source(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Parser::new(tokens))
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.check(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: format!("'{}'", expected).trim().to_string(),
                found: self.current().clone(),
            })
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeeplyNested { limit: MAX_NESTING });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::String(s) => Ok(Expr::String(s)),
            Token::LParen => {
                self.enter()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                self.depth -= 1;
                Ok(expr)
            }
            Token::Identifier(name) => {
                let function =
                    functions::lookup(&name).ok_or(ParseError::UnknownFunction(name))?;
                self.expect(Token::LParen)?;
                self.enter()?;
                let args = self.parse_arguments()?;
                self.depth -= 1;
                Ok(Expr::Call { function, args })
            }
            found => Err(ParseError::UnexpectedToken {
                expected: "a number, string, '(' or function call".to_string(),
                found,
            }),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![];

        while !self.check(&Token::RParen) {
            args.push(self.parse_expression()?);

            if !self.check(&Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RParen)?;
        Ok(args)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let mut negations = 0usize;
        while self.check(&Token::Minus) {
            self.advance();
            negations += 1;
        }

        // Two negations still coerce the operand to a number
        let mut expr = self.parse_primary()?;
        if negations > 0 {
            if negations % 2 == 0 {
                expr = Expr::Negate(Box::new(expr));
            }
            expr = Expr::Negate(Box::new(expr));
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_unary()?;
        let mut rest = vec![];

        loop {
            let op = match self.current() {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                _ => break,
            };

            self.advance();
            rest.push((op, self.parse_unary()?));
        }
        Ok(chain(first, rest))
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_multiplicative()?;
        let mut rest = vec![];

        loop {
            let op = match self.current() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance();
            rest.push((op, self.parse_multiplicative()?));
        }
        Ok(chain(first, rest))
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_additive()
    }

    /// Parse one complete expression; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        match self.current() {
            Token::Eof => Ok(expr),
            found => Err(ParseError::UnexpectedToken {
                expected: "end of input".to_string(),
                found: found.clone(),
            }),
        }
    }
}

fn chain(first: Expr, rest: Vec<(BinOp, Expr)>) -> Expr {
    if rest.is_empty() {
        first
    } else {
        Expr::Chain {
            first: Box::new(first),
            rest,
        }
    }
}
