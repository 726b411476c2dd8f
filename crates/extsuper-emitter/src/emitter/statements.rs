use super::Printer;
use extsuper_common::limits::MAX_TREE_WALK_DEPTH;
use extsuper_parser::parser::node::Node;
use extsuper_parser::parser::{NodeIndex, VariableKind, syntax_kind_ext};
use extsuper_parser::syntax::precedence::OperatorPrecedence;

impl<'a> Printer<'a> {
    // =========================================================================
    // Statements
    // =========================================================================

    pub(super) fn emit_expression_statement(&mut self, node: &Node) {
        let Some(stmt) = self.arena.get_parenthesized(node) else {
            return;
        };

        let parenthesize = self.starts_with_statement_ambiguity(stmt.expression);
        self.emit_parenthesized_if(stmt.expression, parenthesize);
        self.write(";");
    }

    /// An expression statement may not begin with `{`, `function` or `class`.
    fn starts_with_statement_ambiguity(&self, expression: NodeIndex) -> bool {
        let mut current = expression;
        for _ in 0..MAX_TREE_WALK_DEPTH {
            let Some(node) = self.arena.get(current) else {
                return false;
            };
            let leftmost = match node.kind {
                syntax_kind_ext::OBJECT_LITERAL_EXPRESSION
                | syntax_kind_ext::FUNCTION_EXPRESSION
                | syntax_kind_ext::CLASS_EXPRESSION => return true,
                syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
                | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => {
                    self.arena.get_access_expr(node).map(|a| a.expression)
                }
                syntax_kind_ext::CALL_EXPRESSION => {
                    self.arena.get_call_expr(node).map(|c| c.expression)
                }
                syntax_kind_ext::BINARY_EXPRESSION => {
                    self.arena.get_binary_expr(node).map(|b| b.left)
                }
                syntax_kind_ext::CONDITIONAL_EXPRESSION => {
                    self.arena.get_conditional_expr(node).map(|c| c.condition)
                }
                syntax_kind_ext::POSTFIX_UNARY_EXPRESSION => {
                    self.arena.get_unary_expr(node).map(|u| u.operand)
                }
                syntax_kind_ext::TAGGED_TEMPLATE_EXPRESSION => {
                    self.arena.get_tagged_template(node).map(|t| t.tag)
                }
                _ => None,
            };
            match leftmost {
                Some(next) if !self.needs_parens_at(current, next) => current = next,
                _ => return false,
            }
        }
        false
    }

    /// Whether the structural printer will put parentheses around `child`
    /// when printing `parent`. Only synthesized parents add them.
    fn needs_parens_at(&self, parent: NodeIndex, child: NodeIndex) -> bool {
        let synthesized = self.arena.get(parent).is_some_and(|n| n.is_synthesized());
        synthesized
            && matches!(
                self.arena.kind(parent),
                Some(
                    syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
                        | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION
                        | syntax_kind_ext::CALL_EXPRESSION
                )
            )
            && self.needs_parens_as_member_target(child)
    }

    pub(super) fn emit_variable_statement(&mut self, node: &Node) {
        let Some(var) = self.arena.get_variable(node) else {
            return;
        };

        for &list in &var.declarations.nodes {
            self.emit(list);
        }
        self.write(";");
    }

    pub(super) fn emit_variable_declaration_list(&mut self, node: &Node) {
        let Some(list) = self.arena.get_variable(node) else {
            return;
        };

        self.write(VariableKind::from_list_flags(node.flags).keyword());
        self.writer.write_space();
        let mut first = true;
        for &decl in &list.declarations.nodes {
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit(decl);
        }
    }

    pub(super) fn emit_variable_declaration(&mut self, node: &Node) {
        let Some(decl) = self.arena.get_variable_declaration(node) else {
            return;
        };

        self.emit(decl.name);
        if decl.initializer.is_some() {
            self.write(" = ");
            self.emit_with_min_precedence(decl.initializer, OperatorPrecedence::Spread);
        }
    }

    pub(super) fn emit_return_or_throw(&mut self, node: &Node) {
        let Some(ret) = self.arena.get_return_statement(node) else {
            return;
        };

        let keyword = if node.kind == syntax_kind_ext::THROW_STATEMENT {
            "throw"
        } else {
            "return"
        };
        self.write(keyword);
        if ret.expression.is_some() {
            self.writer.write_space();
            self.emit(ret.expression);
        }
        self.write(";");
    }
}
