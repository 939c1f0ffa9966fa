//! Formula Abstract Syntax Tree types
//!
//! The [`Display`](fmt::Display) implementation of [`FormulaExpr`] is the canonical printer:
//! it drops whitespace, upper-cases references and only keeps the parentheses needed to
//! reproduce the same tree when the output is parsed again.

use std::fmt;

use tabula_core::{CellError, Position};

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// Error literal
    Error(CellError),

    // === References ===
    /// Single cell reference (possibly outside the sheet)
    CellRef(Position),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl BinaryOperator {
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }
}

impl UnaryOperator {
    pub fn symbol(self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

impl FormulaExpr {
    fn precedence(&self) -> u8 {
        match self {
            FormulaExpr::BinaryOp { op, .. } => op.precedence(),
            FormulaExpr::UnaryOp { .. } => UNARY_PRECEDENCE,
            _ => ATOM_PRECEDENCE,
        }
    }

    /// Cell references in the order they appear in the expression, duplicates included
    pub fn cell_refs(&self) -> Vec<Position> {
        let mut refs = Vec::new();
        let mut stack = vec![self];

        while let Some(expr) = stack.pop() {
            match expr {
                FormulaExpr::CellRef(pos) => refs.push(*pos),
                FormulaExpr::BinaryOp { left, right, .. } => {
                    // Right first so the left subtree is visited first
                    stack.push(right);
                    stack.push(left);
                }
                FormulaExpr::UnaryOp { operand, .. } => stack.push(operand),
                FormulaExpr::Number(_) | FormulaExpr::Error(_) => {}
            }
        }

        refs
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Number(n) => write!(f, "{}", n),
            FormulaExpr::Error(e) => write!(f, "{}", e),
            FormulaExpr::CellRef(pos) => write!(f, "{}", pos),
            FormulaExpr::BinaryOp { op, left, right } => {
                let prec = op.precedence();
                // Operators are left-associative: a right operand of equal precedence
                // must keep its parentheses.
                left.fmt_operand(f, left.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                right.fmt_operand(f, right.precedence() <= prec)
            }
            FormulaExpr::UnaryOp { op, operand } => {
                write!(f, "{}", op.symbol())?;
                operand.fmt_operand(f, operand.precedence() < UNARY_PRECEDENCE)
            }
        }
    }
}
