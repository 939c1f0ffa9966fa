//! # tabula-formula
//!
//! Formula parser and evaluator for tabula.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Formula printing (AST → canonical text)
//! - Formula execution against a cell resolver (AST → number or [`CellError`])
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{CellError, Position};
//! use tabula_formula::parse_formula;
//!
//! let formula = parse_formula("(A1 + 2) * 3").unwrap();
//! assert_eq!(formula.expression(), "(A1+2)*3");
//! assert_eq!(formula.referenced_positions(), vec![Position::new(0, 0)]);
//!
//! let result = formula.execute(|_pos| Ok::<f64, CellError>(4.0));
//! assert_eq!(result, Ok(18.0));
//! ```
//!
//! [`CellError`]: tabula_core::CellError

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::execute;
pub use formula::{parse_formula, Formula};
pub use parser::parse_expression;
