//! Parsed formula object

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::execute;
use crate::parser::parse_expression;
use tabula_core::{CellError, Position};

/// Parse formula text (without the leading `=`) into a [`Formula`]
pub fn parse_formula(expression: &str) -> FormulaResult<Formula> {
    parse_expression(expression).map(Formula::new)
}

/// A parsed formula expression
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    ast: FormulaExpr,
}

impl Formula {
    /// Wrap an already-built expression
    pub fn new(ast: FormulaExpr) -> Self {
        Self { ast }
    }

    /// The underlying expression tree
    pub fn ast(&self) -> &FormulaExpr {
        &self.ast
    }

    /// Execute the formula, resolving references through `resolver`
    pub fn execute<F>(&self, resolver: F) -> Result<f64, CellError>
    where
        F: Fn(Position) -> Result<f64, CellError>,
    {
        execute(&self.ast, &resolver)
    }

    /// Canonical text of the expression, without the leading `=`
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    /// Positions referenced by the expression
    ///
    /// The list is in source order and may contain duplicates as well as positions that lie
    /// outside the sheet.
    pub fn referenced_positions(&self) -> Vec<Position> {
        self.ast.cell_refs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_expression_is_normalized() {
        let formula = parse_formula(" ( a1 + 2 ) * ( 3 ) ").unwrap();
        assert_eq!(formula.expression(), "(A1+2)*3");

        let formula = parse_formula("((1))+(2*3)").unwrap();
        assert_eq!(formula.expression(), "1+2*3");
    }

    #[test]
    fn test_referenced_positions_are_raw() {
        let formula = parse_formula("B1+A1+B1+A0").unwrap();
        assert_eq!(
            formula.referenced_positions(),
            vec![
                Position::new(0, 1),
                Position::new(0, 0),
                Position::new(0, 1),
                Position::NONE,
            ]
        );
    }

    #[test]
    fn test_execute_with_closure() {
        let formula = parse_formula("A1*A2").unwrap();
        let result = formula.execute(|pos| Ok(pos.row as f64 + 2.0));
        assert_eq!(result, Ok(6.0));
    }

    fn arb_expr() -> impl Strategy<Value = FormulaExpr> {
        use crate::ast::{BinaryOperator, UnaryOperator};

        let leaf = prop_oneof![
            (0u32..1000).prop_map(|n| FormulaExpr::Number(n as f64)),
            (0i32..50, 0i32..30).prop_map(|(r, c)| FormulaExpr::CellRef(Position::new(r, c))),
        ];
        leaf.prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                (
                    prop_oneof![
                        Just(BinaryOperator::Add),
                        Just(BinaryOperator::Subtract),
                        Just(BinaryOperator::Multiply),
                        Just(BinaryOperator::Divide),
                    ],
                    inner.clone(),
                    inner.clone()
                )
                    .prop_map(|(op, l, r)| FormulaExpr::BinaryOp {
                        op,
                        left: Box::new(l),
                        right: Box::new(r),
                    }),
                (
                    prop_oneof![Just(UnaryOperator::Plus), Just(UnaryOperator::Negate)],
                    inner
                )
                    .prop_map(|(op, e)| FormulaExpr::UnaryOp {
                        op,
                        operand: Box::new(e),
                    }),
            ]
        })
    }

    proptest! {
        #[test]
        fn printed_expression_parses_back_to_the_same_tree(ast in arb_expr()) {
            let printed = Formula::new(ast.clone()).expression();
            let reparsed = parse_formula(&printed).unwrap();
            prop_assert_eq!(reparsed.ast(), &ast);
        }
    }
}
