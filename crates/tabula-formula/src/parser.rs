//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with proper operator precedence.
//! The input is the formula text *after* the leading `=`.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use tabula_core::{CellError, Position};

/// Maximum nesting of parentheses and unary operators
pub const MAX_NESTING: usize = 256;

/// Maximum depth of a parsed expression tree
pub const MAX_DEPTH: usize = 1024;

/// Parse expression text into an AST
///
/// # Example
/// ```rust
/// use tabula_formula::{parse_expression, FormulaExpr};
///
/// let ast = parse_expression("42").unwrap();
/// assert_eq!(ast, FormulaExpr::Number(42.0));
///
/// assert!(parse_expression("1+").is_err());
/// ```
pub fn parse_expression(expression: &str) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(expression)?;
    let (expr, _) = parser.parse_expression()?;

    // Make sure we consumed all input
    if parser.current_token() != &Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals
    Number(f64),
    Error(CellError),

    // References
    CellRef(Position),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    nesting: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            nesting: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Error literal (#REF!, #VALUE!, #DIV/0!)
        if c == '#' {
            return self.scan_error();
        }

        // Cell reference
        if c.is_ascii_alphabetic() {
            return self.scan_reference();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at offset {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(num) if num.is_finite() => Ok(Token::Number(num)),
            _ => Err(FormulaError::Parse(format!("Invalid number '{}'", num_str))),
        }
    }

    fn scan_error(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        self.advance();
        while self.peek_char().map_or(false, |c| {
            c.is_ascii_alphanumeric() || c == '!' || c == '/'
        }) {
            self.advance();
        }

        let error_str = &self.input[start..self.pos];
        CellError::from_str(error_str)
            .map(Token::Error)
            .ok_or_else(|| FormulaError::Parse(format!("Unknown error literal '{}'", error_str)))
    }

    fn scan_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric()) {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        Position::parse(text)
            .map(Token::CellRef)
            .map_err(|e| FormulaError::Parse(format!("Invalid cell reference '{}': {}", text, e)))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: literals, references, parentheses

    fn parse_expression(&mut self) -> FormulaResult<Parsed> {
        self.parse_additive()
    }

    fn enter(&mut self) -> FormulaResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(too_deep());
        }
        Ok(())
    }

    fn parse_additive(&mut self) -> FormulaResult<Parsed> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Parsed> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_unary()?;
            left = binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Parsed> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        self.enter()?;
        let (operand, depth) = self.parse_unary()?;
        self.nesting -= 1;

        let depth = checked_depth(depth)?;
        Ok((
            FormulaExpr::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            depth,
        ))
    }

    fn parse_primary(&mut self) -> FormulaResult<Parsed> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok((FormulaExpr::Number(n), 1))
            }

            Token::Error(e) => {
                self.consume()?;
                Ok((FormulaExpr::Error(e), 1))
            }

            Token::CellRef(pos) => {
                self.consume()?;
                Ok((FormulaExpr::CellRef(pos), 1))
            }

            Token::LeftParen => {
                self.consume()?;
                self.enter()?;
                let parsed = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                self.nesting -= 1;
                Ok(parsed)
            }

            token => Err(FormulaError::Parse(format!("Unexpected token: {:?}", token))),
        }
    }
}

/// An expression together with the depth of its tree
type Parsed = (FormulaExpr, usize);

fn too_deep() -> FormulaError {
    FormulaError::Parse("formula nested too deeply".into())
}

/// Depth of a node whose deepest child has depth `child`
fn checked_depth(child: usize) -> FormulaResult<usize> {
    let depth = child + 1;
    if depth > MAX_DEPTH {
        return Err(too_deep());
    }
    Ok(depth)
}

fn binary(op: BinaryOperator, (left, l): Parsed, (right, r): Parsed) -> FormulaResult<Parsed> {
    let depth = checked_depth(l.max(r))?;
    Ok((
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        depth,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expression("42").unwrap(), FormulaExpr::Number(42.0));
        assert_eq!(parse_expression("3.25").unwrap(), FormulaExpr::Number(3.25));
        assert_eq!(parse_expression(".5").unwrap(), FormulaExpr::Number(0.5));
        assert_eq!(parse_expression("1e10").unwrap(), FormulaExpr::Number(1e10));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        let ast = parse_expression("1+2*3").unwrap();
        // Should parse as 1+(2*3) due to precedence
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Add);
            assert_eq!(*left, FormulaExpr::Number(1.0));
            assert!(matches!(
                *right,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_left_associative() {
        let ast = parse_expression("8-4-2").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Subtract);
            assert!(matches!(*left, FormulaExpr::BinaryOp { .. }));
            assert_eq!(*right, FormulaExpr::Number(2.0));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_unary() {
        let ast = parse_expression("-5").unwrap();
        assert!(matches!(
            ast,
            FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                ..
            }
        ));

        let ast = parse_expression("+-A1").unwrap();
        if let FormulaExpr::UnaryOp { op, operand } = ast {
            assert_eq!(op, UnaryOperator::Plus);
            assert!(matches!(
                *operand,
                FormulaExpr::UnaryOp {
                    op: UnaryOperator::Negate,
                    ..
                }
            ));
        } else {
            panic!("Expected UnaryOp");
        }
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(
            parse_expression("B2").unwrap(),
            FormulaExpr::CellRef(Position::new(1, 1))
        );
        assert_eq!(
            parse_expression("  zz10 ").unwrap(),
            FormulaExpr::CellRef(Position::new(9, 701))
        );
        // Out-of-sheet references parse, they fail at evaluation time
        assert_eq!(
            parse_expression("A0").unwrap(),
            FormulaExpr::CellRef(Position::NONE)
        );
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = parse_expression("(1+2)*3").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Multiply);
            assert!(matches!(
                *left,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Add,
                    ..
                }
            ));
            assert_eq!(*right, FormulaExpr::Number(3.0));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_error_literal() {
        assert_eq!(
            parse_expression("#VALUE!").unwrap(),
            FormulaExpr::Error(CellError::Value)
        );
        assert_eq!(
            parse_expression("#DIV/0!").unwrap(),
            FormulaExpr::Error(CellError::Div0)
        );
        assert!(parse_expression("#NAME?").is_err());
    }

    #[test]
    fn test_parse_failures() {
        for input in ["", "   ", "1+", "(1", "1)", "1 2", "A1B", "SUM(A1)", "1e", "2^3", "\"x\""] {
            assert!(
                parse_expression(input).is_err(),
                "expected parse failure for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("{}1", "-".repeat(MAX_NESTING));
        assert!(parse_expression(&ok).is_ok());

        let unary = format!("{}1", "-".repeat(50_000));
        assert_eq!(
            parse_expression(&unary),
            Err(FormulaError::Parse("formula nested too deeply".into()))
        );

        let parens = format!("{}1{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert_eq!(
            parse_expression(&parens),
            Err(FormulaError::Parse("formula nested too deeply".into()))
        );
    }

    #[test]
    fn test_depth_limit_on_long_chains() {
        let terms = vec!["A1"; 500];
        assert!(parse_expression(&terms.join("+")).is_ok());

        let terms = vec!["1"; 200_000];
        assert_eq!(
            parse_expression(&terms.join("*")),
            Err(FormulaError::Parse("formula nested too deeply".into()))
        );
    }

    #[test]
    fn test_parse_rejects_overflowing_literal() {
        assert!(parse_expression("1e400").is_err());
    }
}
