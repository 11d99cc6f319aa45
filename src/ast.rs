//! # Formula Syntax Trees
//!
//! The syntax of both evaluation levels: the formula element stream and
//! the restricted engine's tokens and expression tree.
//!
//! - **[elements]** - the flat element sequence the formula tokenizer
//!   extracts from formula text (functions, paths, constants, operators)
//! - **[tokens]** - tokens of the restricted arithmetic/function engine
//! - **[expressions]** - the expression tree the engine parses tokens into
//! - **[operators]** - the four arithmetic operators shared by both
//!
//! ## Formulas
//!
//! ```text
//! SUM(lines.amount) - SUM(lines.taxAmount) / SUM(lines.amount)
//! CONCATENATE(no, ' ', description)
//! ```
//!
//! Each function call is reduced to a literal first; the literals and the
//! operators between them then form an engine expression such as
//!
//! ```text
//! 190 - 19 / 190
//! ```
pub mod elements;
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use elements::Element;
pub use expressions::Expr;
pub use operators::BinOp;
pub use tokens::Token;
