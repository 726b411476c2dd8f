//! Operator precedence of expression nodes.
//!
//! Used when a synthesized expression is placed into a slot: the printer and
//! `replace_node` add parentheses when a child binds looser than its position
//! requires.

use crate::parser::{NodeArena, NodeIndex, syntax_kind_ext};
use extsuper_scanner::SyntaxKind;

/// Binding strength, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorPrecedence {
    Comma,
    Spread,
    Yield,
    Assignment,
    Conditional,
    Coalesce,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Exponentiation,
    Unary,
    Update,
    LeftHandSide,
    Member,
    Primary,
}

/// Precedence of a binary operator token.
#[must_use]
pub fn binary_operator_precedence(operator: SyntaxKind) -> OperatorPrecedence {
    match operator {
        SyntaxKind::CommaToken => OperatorPrecedence::Comma,
        op if extsuper_scanner::token_is_assignment_operator(op) => OperatorPrecedence::Assignment,
        SyntaxKind::QuestionQuestionToken => OperatorPrecedence::Coalesce,
        SyntaxKind::BarBarToken => OperatorPrecedence::LogicalOr,
        SyntaxKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
        SyntaxKind::BarToken => OperatorPrecedence::BitwiseOr,
        SyntaxKind::CaretToken => OperatorPrecedence::BitwiseXor,
        SyntaxKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => OperatorPrecedence::Equality,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InstanceOfKeyword
        | SyntaxKind::InKeyword => OperatorPrecedence::Relational,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => OperatorPrecedence::Shift,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            OperatorPrecedence::Multiplicative
        }
        SyntaxKind::AsteriskAsteriskToken => OperatorPrecedence::Exponentiation,
        _ => OperatorPrecedence::Primary,
    }
}

/// Precedence of the expression at `index`. Non-expressions report
/// `Primary`.
#[must_use]
pub fn expression_precedence(arena: &NodeArena, index: NodeIndex) -> OperatorPrecedence {
    let Some(node) = arena.get(index) else {
        return OperatorPrecedence::Primary;
    };
    match node.kind {
        syntax_kind_ext::BINARY_EXPRESSION => arena
            .get_binary_expr(node)
            .and_then(|bin| SyntaxKind::try_from_u16(bin.operator_token))
            .map_or(OperatorPrecedence::Primary, binary_operator_precedence),
        syntax_kind_ext::SPREAD_ELEMENT => OperatorPrecedence::Spread,
        syntax_kind_ext::YIELD_EXPRESSION => OperatorPrecedence::Yield,
        syntax_kind_ext::ARROW_FUNCTION => OperatorPrecedence::Assignment,
        syntax_kind_ext::CONDITIONAL_EXPRESSION => OperatorPrecedence::Conditional,
        syntax_kind_ext::PREFIX_UNARY_EXPRESSION | syntax_kind_ext::AWAIT_EXPRESSION => {
            OperatorPrecedence::Unary
        }
        syntax_kind_ext::POSTFIX_UNARY_EXPRESSION => OperatorPrecedence::Update,
        syntax_kind_ext::CALL_EXPRESSION => OperatorPrecedence::LeftHandSide,
        syntax_kind_ext::NEW_EXPRESSION => {
            let has_arguments = arena
                .get_call_expr(node)
                .is_some_and(|call| call.arguments.is_some());
            if has_arguments {
                OperatorPrecedence::Member
            } else {
                OperatorPrecedence::LeftHandSide
            }
        }
        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
        | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION
        | syntax_kind_ext::TAGGED_TEMPLATE_EXPRESSION => OperatorPrecedence::Member,
        _ => OperatorPrecedence::Primary,
    }
}

/// Right-associative operators (`**` and assignments).
#[must_use]
pub fn is_right_associative(operator: SyntaxKind) -> bool {
    operator == SyntaxKind::AsteriskAsteriskToken
        || extsuper_scanner::token_is_assignment_operator(operator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_operators_are_ordered() {
        let or = binary_operator_precedence(SyntaxKind::BarBarToken);
        let and = binary_operator_precedence(SyntaxKind::AmpersandAmpersandToken);
        let coalesce = binary_operator_precedence(SyntaxKind::QuestionQuestionToken);
        assert!(and > or);
        assert!(or > coalesce);
        assert!(binary_operator_precedence(SyntaxKind::EqualsToken) < coalesce);
    }

    #[test]
    fn member_access_binds_tighter_than_calls() {
        assert!(OperatorPrecedence::Member > OperatorPrecedence::LeftHandSide);
        assert!(OperatorPrecedence::LeftHandSide > OperatorPrecedence::Update);
    }
}
