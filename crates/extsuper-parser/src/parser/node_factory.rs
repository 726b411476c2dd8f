//! Construction of synthesized nodes.
//!
//! Synthesized nodes have no source text: they are created with a zero span
//! and the `SYNTHESIZED` flag, and the printer emits them structurally. When
//! one replaces an original node, `replace_node` moves the old span onto it.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::node_mutation::VariableKind;
use extsuper_scanner::SyntaxKind;

impl NodeArena {
    fn mark_synthesized(&mut self, index: NodeIndex) -> NodeIndex {
        if let Some(node) = self.get_mut(index) {
            node.flags |= node_flags::SYNTHESIZED;
        }
        index
    }

    pub fn create_identifier(&mut self, name: &str) -> NodeIndex {
        let index = self.add_identifier(SyntaxKind::Identifier as u16, 0, 0, name);
        self.mark_synthesized(index)
    }

    /// String literal holding `value` (unquoted, unescaped).
    pub fn create_string_literal(&mut self, value: &str) -> NodeIndex {
        let index = self.add_literal(SyntaxKind::StringLiteral as u16, 0, 0, value);
        self.mark_synthesized(index)
    }

    pub fn create_numeric_literal(&mut self, text: &str) -> NodeIndex {
        let index = self.add_literal(SyntaxKind::NumericLiteral as u16, 0, 0, text);
        self.mark_synthesized(index)
    }

    pub fn create_this(&mut self) -> NodeIndex {
        let index = self.add_token(SyntaxKind::ThisKeyword as u16, 0, 0);
        self.mark_synthesized(index)
    }

    /// `expression.name`
    pub fn create_property_access(&mut self, expression: NodeIndex, name: &str) -> NodeIndex {
        let name = self.create_identifier(name);
        let index = self.add_access_expr(
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
            0,
            0,
            AccessExprData {
                expression,
                name_or_argument: name,
                question_dot_token: false,
            },
        );
        self.mark_synthesized(index)
    }

    /// `expression[argument]`
    pub fn create_element_access(&mut self, expression: NodeIndex, argument: NodeIndex) -> NodeIndex {
        let index = self.add_access_expr(
            syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
            0,
            0,
            AccessExprData {
                expression,
                name_or_argument: argument,
                question_dot_token: false,
            },
        );
        self.mark_synthesized(index)
    }

    /// `callee(arguments...)`
    pub fn create_call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        let index = self.add_call_expr(
            syntax_kind_ext::CALL_EXPRESSION,
            0,
            0,
            CallExprData {
                expression: callee,
                arguments: Some(NodeList::from_vec(arguments)),
            },
        );
        self.mark_synthesized(index)
    }

    pub fn create_binary(&mut self, left: NodeIndex, operator: SyntaxKind, right: NodeIndex) -> NodeIndex {
        let index = self.add_binary_expr(
            syntax_kind_ext::BINARY_EXPRESSION,
            0,
            0,
            BinaryExprData {
                left,
                operator_token: operator as u16,
                right,
            },
        );
        self.mark_synthesized(index)
    }

    /// `left || right`
    pub fn create_logical_or(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.create_binary(left, SyntaxKind::BarBarToken, right)
    }

    /// `left && right`
    pub fn create_logical_and(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.create_binary(left, SyntaxKind::AmpersandAmpersandToken, right)
    }

    pub fn create_parenthesized(&mut self, expression: NodeIndex) -> NodeIndex {
        let index = self.add_parenthesized(
            syntax_kind_ext::PARENTHESIZED_EXPRESSION,
            0,
            0,
            ParenthesizedData { expression },
        );
        self.mark_synthesized(index)
    }

    pub fn create_expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        let index = self.add_parenthesized(
            syntax_kind_ext::EXPRESSION_STATEMENT,
            0,
            0,
            ParenthesizedData { expression },
        );
        self.mark_synthesized(index)
    }

    /// `var|let|const name = initializer;` (initializer may be NONE).
    pub fn create_variable_statement(
        &mut self,
        kind: VariableKind,
        name: &str,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let name = self.create_identifier(name);
        let declaration = self.add_variable_declaration(
            syntax_kind_ext::VARIABLE_DECLARATION,
            0,
            0,
            VariableDeclarationData { name, initializer },
        );
        self.mark_synthesized(declaration);

        let list = self.add_variable(
            syntax_kind_ext::VARIABLE_DECLARATION_LIST,
            0,
            0,
            VariableData {
                declarations: NodeList::from_vec(vec![declaration]),
            },
        );
        if let Some(node) = self.get_mut(list) {
            node.flags |= node_flags::SYNTHESIZED | kind.list_flags();
        }

        let statement = self.add_variable(
            syntax_kind_ext::VARIABLE_STATEMENT,
            0,
            0,
            VariableData {
                declarations: NodeList::from_vec(vec![list]),
            },
        );
        self.mark_synthesized(statement)
    }
}
