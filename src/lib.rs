pub mod ast;
pub mod cli;
pub mod convert;
pub mod evaluator;
pub mod formula;
pub mod functions;
pub mod lexer;
pub mod mapping;
pub mod parser;
pub mod path;
pub mod resolver;
pub mod tokenizer;
pub mod value;

pub use ast::{BinOp, Element, Expr, Token};
pub use convert::{json_to_value, value_to_json};
pub use evaluator::{EvalError, Evaluator};
pub use formula::{check, evaluate, evaluate_call};
pub use lexer::Lexer;
pub use mapping::{MappingError, OnError, apply_mapping};
pub use parser::{ParseError, Parser};
pub use path::Path;
pub use resolver::resolve;
pub use tokenizer::tokenize;
pub use value::Value;
