use super::Printer;
use extsuper_parser::parser::node::Node;
use extsuper_parser::parser::{NodeIndex, node_flags, syntax_kind_ext};
use extsuper_parser::syntax::precedence::{
    OperatorPrecedence, binary_operator_precedence, expression_precedence, is_right_associative,
};
use extsuper_scanner::{SyntaxKind, token_to_text};

fn operator_text(kind: u16) -> &'static str {
    SyntaxKind::try_from_u16(kind)
        .and_then(token_to_text)
        .unwrap_or("")
}

impl<'a> Printer<'a> {
    // =========================================================================
    // Expressions
    // =========================================================================

    pub(super) fn emit_property_access(&mut self, node: &Node) {
        let Some(access) = self.arena.get_access_expr(node) else {
            return;
        };

        let parenthesize = self.needs_parens_as_member_target(access.expression);
        self.emit_parenthesized_if(access.expression, parenthesize);
        self.write(if access.question_dot_token { "?." } else { "." });
        self.emit(access.name_or_argument);
    }

    pub(super) fn emit_element_access(&mut self, node: &Node) {
        let Some(access) = self.arena.get_access_expr(node) else {
            return;
        };

        let parenthesize = self.needs_parens_as_member_target(access.expression);
        self.emit_parenthesized_if(access.expression, parenthesize);
        self.write(if access.question_dot_token { "?.[" } else { "[" });
        self.emit(access.name_or_argument);
        self.write("]");
    }

    pub(super) fn emit_call_expression(&mut self, node: &Node) {
        let Some(call) = self.arena.get_call_expr(node) else {
            return;
        };

        let parenthesize = self.needs_parens_as_member_target(call.expression);
        self.emit_parenthesized_if(call.expression, parenthesize);
        if node.has_flag(node_flags::OPTIONAL_CHAIN) {
            self.write("?.");
        }
        self.write("(");
        if let Some(ref args) = call.arguments {
            self.emit_comma_separated(&args.nodes);
        }
        self.write(")");
    }

    pub(super) fn emit_new_expression(&mut self, node: &Node) {
        let Some(call) = self.arena.get_call_expr(node) else {
            return;
        };

        self.write("new ");
        // A call inside the constructor position would bind the arguments.
        let parenthesize = self.needs_parens_as_member_target(call.expression)
            || self.arena.kind(call.expression) == Some(syntax_kind_ext::CALL_EXPRESSION);
        self.emit_parenthesized_if(call.expression, parenthesize);
        if let Some(ref args) = call.arguments {
            self.write("(");
            self.emit_comma_separated(&args.nodes);
            self.write(")");
        }
    }

    pub(super) fn emit_binary_expression(&mut self, node: &Node) {
        let Some(binary) = self.arena.get_binary_expr(node) else {
            return;
        };
        let Some(operator) = SyntaxKind::try_from_u16(binary.operator_token) else {
            return;
        };

        let left_parens = self.needs_parens_as_binary_operand(binary.left, operator, true);
        self.emit_parenthesized_if(binary.left, left_parens);
        if operator == SyntaxKind::CommaToken {
            self.write(", ");
        } else {
            self.writer.write_space();
            self.write(operator_text(binary.operator_token));
            self.writer.write_space();
        }
        let right_parens = self.needs_parens_as_binary_operand(binary.right, operator, false);
        self.emit_parenthesized_if(binary.right, right_parens);
    }

    fn needs_parens_as_binary_operand(
        &self,
        operand: NodeIndex,
        operator: SyntaxKind,
        is_left: bool,
    ) -> bool {
        let operator_precedence = binary_operator_precedence(operator);
        let operand_precedence = expression_precedence(self.arena, operand);

        if operand_precedence < operator_precedence {
            return true;
        }
        if operand_precedence == operator_precedence
            && operator_precedence != OperatorPrecedence::Comma
        {
            // Left-associative operators keep a same-precedence left operand
            // bare, right-associative ones a right operand.
            let same_side = is_left == is_right_associative(operator);
            if same_side {
                return true;
            }
        }

        // `??` may not be mixed with `||` / `&&` without parentheses.
        let operand_operator = self
            .arena
            .get(operand)
            .filter(|n| n.kind == syntax_kind_ext::BINARY_EXPRESSION)
            .and_then(|n| self.arena.get_binary_expr(n))
            .and_then(|bin| SyntaxKind::try_from_u16(bin.operator_token));
        if let Some(inner) = operand_operator {
            let is_logical = |k: SyntaxKind| {
                matches!(k, SyntaxKind::BarBarToken | SyntaxKind::AmpersandAmpersandToken)
            };
            if (operator == SyntaxKind::QuestionQuestionToken && is_logical(inner))
                || (is_logical(operator) && inner == SyntaxKind::QuestionQuestionToken)
            {
                return true;
            }
        }

        // `-a ** b` is a syntax error.
        is_left
            && operator == SyntaxKind::AsteriskAsteriskToken
            && operand_precedence == OperatorPrecedence::Unary
    }

    pub(super) fn emit_conditional_expression(&mut self, node: &Node) {
        let Some(cond) = self.arena.get_conditional_expr(node) else {
            return;
        };

        self.emit_with_min_precedence(cond.condition, OperatorPrecedence::Coalesce);
        self.write(" ? ");
        self.emit_with_min_precedence(cond.when_true, OperatorPrecedence::Assignment);
        self.write(" : ");
        self.emit_with_min_precedence(cond.when_false, OperatorPrecedence::Assignment);
    }

    pub(super) fn emit_prefix_unary(&mut self, node: &Node) {
        let Some(unary) = self.arena.get_unary_expr(node) else {
            return;
        };

        let text = operator_text(unary.operator);
        self.write(text);
        let is_keyword = text.bytes().all(|b| b.is_ascii_alphabetic());
        let operand_text_starts_with_same_sign = matches!(text, "+" | "-")
            && self
                .arena
                .get(unary.operand)
                .filter(|n| n.kind == syntax_kind_ext::PREFIX_UNARY_EXPRESSION)
                .and_then(|n| self.arena.get_unary_expr(n))
                .is_some_and(|inner| operator_text(inner.operator).starts_with(text));
        if is_keyword || operand_text_starts_with_same_sign {
            self.writer.write_space();
        }
        self.emit_with_min_precedence(unary.operand, OperatorPrecedence::Unary);
    }

    pub(super) fn emit_postfix_unary(&mut self, node: &Node) {
        let Some(unary) = self.arena.get_unary_expr(node) else {
            return;
        };

        self.emit_with_min_precedence(unary.operand, OperatorPrecedence::LeftHandSide);
        self.write(operator_text(unary.operator));
    }

    pub(super) fn emit_await_expression(&mut self, node: &Node) {
        let Some(unary) = self.arena.get_unary_expr(node) else {
            return;
        };

        self.write("await ");
        self.emit_with_min_precedence(unary.operand, OperatorPrecedence::Unary);
    }

    pub(super) fn emit_parenthesized(&mut self, node: &Node) {
        let Some(paren) = self.arena.get_parenthesized(node) else {
            return;
        };

        self.write("(");
        self.emit(paren.expression);
        self.write(")");
    }

    pub(super) fn emit_spread_element(&mut self, node: &Node) {
        let Some(spread) = self.arena.get_parenthesized(node) else {
            return;
        };

        self.write("...");
        self.emit_with_min_precedence(spread.expression, OperatorPrecedence::Assignment);
    }

    pub(super) fn emit_array_literal(&mut self, node: &Node) {
        let Some(literal) = self.arena.get_literal_expr(node) else {
            return;
        };

        self.write("[");
        self.emit_comma_separated(&literal.elements.nodes);
        self.write("]");
    }
}
