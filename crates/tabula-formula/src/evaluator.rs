//! Formula evaluator
//!
//! Executes formula ASTs against a cell resolver. Any [`CellError`] produced by the resolver
//! or by an operator aborts the whole evaluation and is returned as the `Err` value.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use tabula_core::{CellError, Position};

/// Execute an expression
///
/// `resolver` maps a referenced position to the number it stands for, or to the error that
/// should abort the evaluation.
///
/// # Example
/// ```rust
/// use tabula_core::CellError;
/// use tabula_formula::{execute, parse_expression};
///
/// let ast = parse_expression("A1/2").unwrap();
/// assert_eq!(execute(&ast, &|_| Ok(5.0)), Ok(2.5));
/// assert_eq!(execute(&ast, &|_| Err(CellError::Value)), Err(CellError::Value));
/// ```
pub fn execute<F>(expr: &FormulaExpr, resolver: &F) -> Result<f64, CellError>
where
    F: Fn(Position) -> Result<f64, CellError>,
{
    match expr {
        FormulaExpr::Number(n) => Ok(*n),
        FormulaExpr::Error(e) => Err(*e),
        FormulaExpr::CellRef(pos) => {
            if !pos.is_valid() {
                return Err(CellError::Ref);
            }
            resolver(*pos)
        }
        FormulaExpr::BinaryOp { op, left, right } => {
            let l = execute(left, resolver)?;
            let r = execute(right, resolver)?;
            evaluate_binary_op(*op, l, r)
        }
        FormulaExpr::UnaryOp { op, operand } => {
            let value = execute(operand, resolver)?;
            Ok(match op {
                UnaryOperator::Plus => value,
                UnaryOperator::Negate => -value,
            })
        }
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, l: f64, r: f64) -> Result<f64, CellError> {
    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return Err(CellError::Div0);
            }
            l / r
        }
    };

    // Overflow to infinity is reported the same way as a division by zero
    if result.is_finite() {
        Ok(result)
    } else {
        Err(CellError::Div0)
    }
}
