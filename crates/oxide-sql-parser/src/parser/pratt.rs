//! Pratt expression parser for operator precedence.
//!
//! Binding powers, from loosest to tightest:
//!
//! | Operators                                   | Associativity |
//! |---------------------------------------------|---------------|
//! | `OR`                                        | left          |
//! | `AND`                                       | left          |
//! | `NOT` (prefix)                              | right         |
//! | `IS [NOT] NULL/TRUE/FALSE/DISTINCT FROM`    | none          |
//! | `= <> != < <= > >=`                         | none          |
//! | `[NOT] BETWEEN/IN/LIKE/ILIKE`               | none          |
//! | `\|`                                        | left          |
//! | `&`                                         | left          |
//! | `<< >>`                                     | left          |
//! | `+ - \|\|`                                  | left          |
//! | `* / %`                                     | left          |
//! | `^`                                         | left          |
//! | unary `- + ~`                               | prefix        |
//! | `::type`                                    | postfix       |
//!
//! Non-associative operators cannot be chained: `a < b < c` is an error.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Right binding power of prefix `NOT`.
pub const NOT_BP: u8 = 5;

/// Left binding power of `IS`.
pub const IS_BP: u8 = 7;

/// Left binding power of the comparison operators.
pub const COMPARISON_BP: u8 = 9;

/// Left binding power of `BETWEEN`, `IN`, `LIKE` and `ILIKE`.
pub const PREDICATE_BP: u8 = 11;

/// Right binding power of unary `-`, `+` and `~`.
pub const UNARY_BP: u8 = 25;

/// Binding power of the bounds of `BETWEEN low AND high`, tight enough that
/// the `AND` is not taken as a logical operator.
pub const BETWEEN_BOUND_BP: u8 = 13;

/// Returns the prefix binding power for a unary operator token.
///
/// Returns `None` if the token is not a prefix operator.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus | TokenKind::Plus | TokenKind::BitNot => Some(UNARY_BP),
        TokenKind::Keyword(Keyword::Not) => Some(NOT_BP),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// `NOT` itself is not listed: the parser looks past it and uses the power of
/// the `BETWEEN`, `IN`, `LIKE` or `ILIKE` that follows.
///
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        // Logical OR (lowest precedence)
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),

        // Logical AND
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),

        // IS [NOT] ...
        TokenKind::Keyword(Keyword::Is) => Some((IS_BP, IS_BP + 1)),

        // Comparison operators
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some((COMPARISON_BP, COMPARISON_BP + 1)),

        // BETWEEN, IN, LIKE, ILIKE
        TokenKind::Keyword(Keyword::Between | Keyword::In | Keyword::Like | Keyword::Ilike) => {
            Some((PREDICATE_BP, PREDICATE_BP + 1))
        }

        // Bitwise OR
        TokenKind::BitOr => Some((13, 14)),

        // Bitwise AND
        TokenKind::BitAnd => Some((15, 16)),

        // Bit shifts
        TokenKind::LeftShift | TokenKind::RightShift => Some((17, 18)),

        // Additive (string concat has same precedence as addition)
        TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Some((19, 20)),

        // Multiplicative
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((21, 22)),

        // Exponent
        TokenKind::Caret => Some((23, 24)),

        _ => None,
    }
}

/// Returns the postfix binding power for a token.
///
/// Returns `None` if the token is not a postfix operator.
#[must_use]
pub const fn postfix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        // expr::type
        TokenKind::DoubleColon => Some(27),
        _ => None,
    }
}

/// Returns true if operators with this left binding power cannot chain.
#[must_use]
pub const fn is_non_associative(left_bp: u8) -> bool {
    matches!(left_bp, IS_BP | COMPARISON_BP | PREDICATE_BP)
}

/// Converts a token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Caret => Some(BinaryOp::Pow),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Concat => Some(BinaryOp::Concat),
        TokenKind::BitAnd => Some(BinaryOp::BitAnd),
        TokenKind::BitOr => Some(BinaryOp::BitOr),
        TokenKind::LeftShift => Some(BinaryOp::LeftShift),
        TokenKind::RightShift => Some(BinaryOp::RightShift),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        TokenKind::BitNot => Some(UnaryOp::BitNot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        // Multiplication should bind tighter than addition
        let add_bp = infix_binding_power(&TokenKind::Plus).unwrap();
        let mul_bp = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(mul_bp.0 > add_bp.0);

        // AND should bind tighter than OR
        let and_bp = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        let or_bp = infix_binding_power(&TokenKind::Keyword(Keyword::Or)).unwrap();
        assert!(and_bp.0 > or_bp.0);

        // Comparison should bind tighter than NOT, and NOT tighter than AND
        let eq_bp = infix_binding_power(&TokenKind::Eq).unwrap();
        assert!(eq_bp.0 > NOT_BP);
        assert!(NOT_BP > and_bp.0);

        // Exponent binds tighter than multiplication, unary minus tighter still
        let pow_bp = infix_binding_power(&TokenKind::Caret).unwrap();
        assert!(pow_bp.0 > mul_bp.0);
        assert!(UNARY_BP > pow_bp.0);
        assert!(postfix_binding_power(&TokenKind::DoubleColon).unwrap() > UNARY_BP);
    }

    #[test]
    fn test_left_associativity() {
        // Binary operators should be left-associative
        let (left, right) = infix_binding_power(&TokenKind::Plus).unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_non_associative_levels() {
        let (eq, _) = infix_binding_power(&TokenKind::Lt).unwrap();
        let (is, _) = infix_binding_power(&TokenKind::Keyword(Keyword::Is)).unwrap();
        let (like, _) = infix_binding_power(&TokenKind::Keyword(Keyword::Like)).unwrap();
        let (add, _) = infix_binding_power(&TokenKind::Plus).unwrap();
        assert!(is_non_associative(eq));
        assert!(is_non_associative(is));
        assert!(is_non_associative(like));
        assert!(!is_non_associative(add));
    }

    #[test]
    fn test_between_bounds_exclude_and() {
        let (and, _) = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        let (concat, _) = infix_binding_power(&TokenKind::Concat).unwrap();
        assert!(BETWEEN_BOUND_BP > and);
        assert!(BETWEEN_BOUND_BP <= concat);
    }

    #[test]
    fn test_token_to_binary_op() {
        assert_eq!(token_to_binary_op(&TokenKind::Plus), Some(BinaryOp::Add));
        assert_eq!(token_to_binary_op(&TokenKind::Minus), Some(BinaryOp::Sub));
        assert_eq!(token_to_binary_op(&TokenKind::Eq), Some(BinaryOp::Eq));
        assert_eq!(token_to_binary_op(&TokenKind::Caret), Some(BinaryOp::Pow));
        assert_eq!(token_to_binary_op(&TokenKind::LeftParen), None);
    }

    #[test]
    fn test_token_to_unary_op() {
        assert_eq!(token_to_unary_op(&TokenKind::Minus), Some(UnaryOp::Neg));
        assert_eq!(
            token_to_unary_op(&TokenKind::Keyword(Keyword::Not)),
            Some(UnaryOp::Not)
        );
        assert_eq!(token_to_unary_op(&TokenKind::Plus), Some(UnaryOp::Plus));
        assert_eq!(token_to_unary_op(&TokenKind::Star), None);
    }
}
