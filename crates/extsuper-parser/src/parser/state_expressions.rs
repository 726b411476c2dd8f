//! Parser state - expression parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParserState,
};
use extsuper_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use extsuper_scanner::SyntaxKind;
use smallvec::SmallVec;

impl ParserState {
    // =========================================================================
    // Parse Methods - Expressions
    // =========================================================================

    /// Parse an expression (including comma operator)
    pub fn parse_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut left = self.parse_assignment_expression();

        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression();
            if right.is_none() {
                self.error_expression_expected();
                break;
            }
            left = self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                start_pos,
                self.last_token_end(),
                BinaryExprData {
                    left,
                    operator_token: SyntaxKind::CommaToken as u16,
                    right,
                },
            );
        }

        left
    }

    /// Parse assignment expression
    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::YieldKeyword) && self.in_generator_context() {
            return self.parse_yield_expression();
        }
        if self.is_start_of_arrow_function() {
            return self.parse_arrow_function_expression();
        }
        // Precedence 2 skips the comma operator (1).
        self.parse_binary_expression(2)
    }

    fn get_operator_precedence(&self, op: SyntaxKind) -> u8 {
        match op {
            SyntaxKind::CommaToken => 1,
            op if extsuper_scanner::token_is_assignment_operator(op) => 2,
            SyntaxKind::QuestionToken => 3,
            SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => 4,
            SyntaxKind::AmpersandAmpersandToken => 5,
            SyntaxKind::BarToken => 6,
            SyntaxKind::CaretToken => 7,
            SyntaxKind::AmpersandToken => 8,
            SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken => 9,
            SyntaxKind::InKeyword if self.in_disallow_in_context() => 0,
            SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::InstanceOfKeyword
            | SyntaxKind::InKeyword => 10,
            SyntaxKind::LessThanLessThanToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 11,
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => 12,
            SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 13,
            SyntaxKind::AsteriskAsteriskToken => 14,
            _ => 0,
        }
    }

    /// Parse binary expression with precedence climbing. Conditional and
    /// assignment operators are folded into the same loop.
    pub(crate) fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }

        let start_pos = self.token_pos();
        let mut left = self.parse_unary_expression();

        loop {
            let op = self.token();
            let precedence = self.get_operator_precedence(op);
            if precedence == 0 || precedence == 1 || precedence < min_precedence {
                break;
            }
            if left.is_none() {
                break;
            }
            self.next_token();

            if op == SyntaxKind::QuestionToken {
                let when_true = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
                    p.parse_assignment_expression()
                });
                if when_true.is_none() {
                    self.error_expression_expected();
                }
                self.parse_expected(SyntaxKind::ColonToken);
                let when_false = self.parse_assignment_expression();
                if when_false.is_none() {
                    self.error_expression_expected();
                }
                left = self.arena.add_conditional_expr(
                    syntax_kind_ext::CONDITIONAL_EXPRESSION,
                    start_pos,
                    self.last_token_end(),
                    ConditionalExprData {
                        condition: left,
                        when_true,
                        when_false,
                    },
                );
                continue;
            }

            let right = if precedence == 2 {
                self.parse_assignment_expression()
            } else {
                let next_min = if op == SyntaxKind::AsteriskAsteriskToken {
                    precedence
                } else {
                    precedence + 1
                };
                self.parse_binary_expression(next_min)
            };
            if right.is_none() {
                self.error_expression_expected();
                break;
            }

            left = self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                start_pos,
                self.last_token_end(),
                BinaryExprData {
                    left,
                    operator_token: op as u16,
                    right,
                },
            );
        }

        self.exit_recursion();
        left
    }

    pub(crate) fn parse_unary_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token() as u16;
                self.next_token();
                let operand = self.parse_nested_unary();
                if operand.is_none() {
                    self.error_expression_expected();
                }
                self.arena.add_unary_expr(
                    syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
                    start_pos,
                    self.last_token_end(),
                    UnaryExprData { operator, operand },
                )
            }
            SyntaxKind::AwaitKeyword if self.in_async_context() => {
                self.next_token();
                let operand = self.parse_nested_unary();
                if operand.is_none() {
                    self.error_expression_expected();
                }
                self.arena.add_unary_expr(
                    syntax_kind_ext::AWAIT_EXPRESSION,
                    start_pos,
                    self.last_token_end(),
                    UnaryExprData {
                        operator: SyntaxKind::AwaitKeyword as u16,
                        operand,
                    },
                )
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_nested_unary(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let operand = self.parse_unary_expression();
        self.exit_recursion();
        operand
    }

    pub(crate) fn parse_postfix_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = self.parse_left_hand_side_expression();
        if expression.is_some()
            && (self.is_token(SyntaxKind::PlusPlusToken) || self.is_token(SyntaxKind::MinusMinusToken))
            && !self.has_preceding_line_break()
        {
            let operator = self.token() as u16;
            self.next_token();
            return self.arena.add_unary_expr(
                syntax_kind_ext::POSTFIX_UNARY_EXPRESSION,
                start_pos,
                self.last_token_end(),
                UnaryExprData {
                    operator,
                    operand: expression,
                },
            );
        }
        expression
    }

    fn parse_yield_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();

        let mut asterisk = false;
        let mut operand = NodeIndex::NONE;
        if !self.has_preceding_line_break()
            && (self.is_token(SyntaxKind::AsteriskToken) || self.is_start_of_expression())
        {
            asterisk = self.parse_optional(SyntaxKind::AsteriskToken);
            operand = self.parse_assignment_expression();
        }

        let node = self.arena.add_unary_expr(
            syntax_kind_ext::YIELD_EXPRESSION,
            start_pos,
            self.last_token_end(),
            UnaryExprData {
                operator: SyntaxKind::YieldKeyword as u16,
                operand,
            },
        );
        if asterisk {
            if let Some(n) = self.arena.get_mut(node) {
                n.flags |= node_flags::ASTERISK;
            }
        }
        node
    }

    pub(crate) fn is_start_of_expression(&self) -> bool {
        match self.token() {
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::SlashToken
            | SyntaxKind::SlashEqualsToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::PrivateIdentifier => true,
            _ => self.is_identifier() || self.is_token(SyntaxKind::AwaitKeyword),
        }
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// Check if we're at the start of an arrow function
    pub(crate) fn is_start_of_arrow_function(&mut self) -> bool {
        match self.token() {
            SyntaxKind::OpenParenToken => self.look_ahead(|p| p.skip_parenthesized_then_arrow()),
            SyntaxKind::AsyncKeyword => self.look_ahead(|p| {
                p.next_token();
                if p.has_preceding_line_break() {
                    return false;
                }
                // `async => x` names a parameter `async`.
                if p.is_token(SyntaxKind::EqualsGreaterThanToken) {
                    return true;
                }
                if p.is_token(SyntaxKind::OpenParenToken) {
                    return p.skip_parenthesized_then_arrow();
                }
                if p.is_identifier() {
                    p.next_token();
                    return p.is_token(SyntaxKind::EqualsGreaterThanToken)
                        && !p.has_preceding_line_break();
                }
                false
            }),
            _ => {
                self.is_identifier()
                    && self.look_ahead(|p| {
                        p.next_token();
                        p.is_token(SyntaxKind::EqualsGreaterThanToken)
                            && !p.has_preceding_line_break()
                    })
            }
        }
    }

    /// At `(`: skip the balanced group and report whether `=>` follows on the
    /// same line.
    fn skip_parenthesized_then_arrow(&mut self) -> bool {
        let mut stack: SmallVec<[SyntaxKind; 8]> = SmallVec::new();
        let mut previous = SyntaxKind::Unknown;
        loop {
            let token = self.token();
            match token {
                SyntaxKind::EndOfFileToken => return false,
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::TemplateHead => stack.push(token),
                SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken => {
                    stack.pop();
                    if stack.is_empty() {
                        self.next_token();
                        return self.is_token(SyntaxKind::EqualsGreaterThanToken)
                            && !self.has_preceding_line_break();
                    }
                }
                SyntaxKind::CloseBraceToken => {
                    if stack.pop() == Some(SyntaxKind::TemplateHead) {
                        self.current_token = self.scanner.rescan_template_token();
                        if self.is_token(SyntaxKind::TemplateMiddle) {
                            stack.push(SyntaxKind::TemplateHead);
                        }
                    }
                }
                SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken
                    if !ends_operand(previous) =>
                {
                    self.current_token = self.scanner.rescan_slash_token();
                }
                _ => {}
            }
            previous = self.token();
            self.next_token();
        }
    }

    pub(crate) fn parse_arrow_function_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let is_async = self.is_token(SyntaxKind::AsyncKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                !p.is_token(SyntaxKind::EqualsGreaterThanToken)
            });
        if is_async {
            self.next_token();
        }

        let param_flags = if is_async { CONTEXT_FLAG_ASYNC } else { 0 };
        let parameters = if self.is_token(SyntaxKind::OpenParenToken) {
            self.with_context(param_flags, CONTEXT_FLAG_GENERATOR, |p| p.parse_parameter_list())
        } else {
            let param_start = self.token_pos();
            let name = self.parse_identifier();
            let param = self.arena.add_parameter(
                syntax_kind_ext::PARAMETER,
                param_start,
                self.last_token_end(),
                ParameterData {
                    dot_dot_dot_token: false,
                    name,
                    initializer: NodeIndex::NONE,
                },
            );
            NodeList::from_vec(vec![param])
        };

        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);

        let body_clear = (CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR) & !param_flags;
        let body = self.with_context(param_flags, body_clear, |p| {
            if p.is_token(SyntaxKind::OpenBraceToken) {
                p.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_block())
            } else {
                p.parse_assignment_expression()
            }
        });

        self.arena.add_function(
            syntax_kind_ext::ARROW_FUNCTION,
            start_pos,
            self.last_token_end(),
            FunctionData {
                is_async,
                asterisk_token: false,
                name: NodeIndex::NONE,
                parameters,
                body,
            },
        )
    }

    // =========================================================================
    // Left-hand-side expressions
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        if expression.is_none() {
            return expression;
        }
        self.parse_member_and_call_rest(start_pos, expression, true)
    }

    fn parse_member_and_call_rest(
        &mut self,
        start_pos: u32,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> NodeIndex {
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = if self.is_token(SyntaxKind::PrivateIdentifier) {
                        self.parse_private_identifier()
                    } else {
                        self.parse_identifier_name()
                    };
                    expression = self.arena.add_access_expr(
                        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                        start_pos,
                        self.last_token_end(),
                        AccessExprData {
                            expression,
                            name_or_argument: name,
                            question_dot_token: false,
                        },
                    );
                }
                SyntaxKind::QuestionDotToken if allow_calls => {
                    self.next_token();
                    expression = if self.is_token(SyntaxKind::OpenParenToken) {
                        let arguments = self.parse_argument_list();
                        self.arena.add_call_expr(
                            syntax_kind_ext::CALL_EXPRESSION,
                            start_pos,
                            self.last_token_end(),
                            CallExprData {
                                expression,
                                arguments: Some(arguments),
                            },
                        )
                    } else if self.is_token(SyntaxKind::OpenBracketToken) {
                        self.parse_element_access_rest(start_pos, expression, true)
                    } else {
                        let name = self.parse_identifier_name();
                        self.arena.add_access_expr(
                            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                            start_pos,
                            self.last_token_end(),
                            AccessExprData {
                                expression,
                                name_or_argument: name,
                                question_dot_token: true,
                            },
                        )
                    };
                    if let Some(node) = self.arena.get_mut(expression) {
                        node.flags |= node_flags::OPTIONAL_CHAIN;
                    }
                }
                SyntaxKind::OpenBracketToken => {
                    expression = self.parse_element_access_rest(start_pos, expression, false);
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let arguments = self.parse_argument_list();
                    expression = self.arena.add_call_expr(
                        syntax_kind_ext::CALL_EXPRESSION,
                        start_pos,
                        self.last_token_end(),
                        CallExprData {
                            expression,
                            arguments: Some(arguments),
                        },
                    );
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    let template = self.parse_template_literal();
                    expression = self.arena.add_tagged_template(
                        syntax_kind_ext::TAGGED_TEMPLATE_EXPRESSION,
                        start_pos,
                        self.last_token_end(),
                        TaggedTemplateData {
                            tag: expression,
                            template,
                        },
                    );
                }
                _ => return expression,
            }
        }
    }

    fn parse_element_access_rest(
        &mut self,
        start_pos: u32,
        expression: NodeIndex,
        question_dot_token: bool,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let argument = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
        if argument.is_none() {
            self.error_expression_expected();
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_access_expr(
            syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
            start_pos,
            self.last_token_end(),
            AccessExprData {
                expression,
                name_or_argument: argument,
                question_dot_token,
            },
        )
    }

    /// Parse `( args )`, including spread arguments.
    pub(crate) fn parse_argument_list(&mut self) -> NodeList {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut arguments = Vec::new();
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
            while !p.is_token(SyntaxKind::CloseParenToken)
                && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                let argument = p.parse_spread_or_assignment(syntax_kind_ext::SPREAD_ELEMENT);
                if argument.is_none() {
                    p.error_expression_expected();
                    break;
                }
                arguments.push(argument);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::from_vec(arguments)
    }

    fn parse_spread_or_assignment(&mut self, spread_kind: u16) -> NodeIndex {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            let start_pos = self.token_pos();
            self.next_token();
            let expression = self.parse_assignment_expression();
            return self.arena.add_parenthesized(
                spread_kind,
                start_pos,
                self.last_token_end(),
                ParenthesizedData { expression },
            );
        }
        self.parse_assignment_expression()
    }

    pub(crate) fn parse_new_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::NewKeyword);

        if self.is_token(SyntaxKind::DotToken) {
            // new.target
            let keyword = self.arena.add_identifier(
                SyntaxKind::Identifier as u16,
                start_pos,
                self.last_token_end(),
                "new",
            );
            self.next_token();
            let name = self.parse_identifier_name();
            return self.arena.add_access_expr(
                syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                start_pos,
                self.last_token_end(),
                AccessExprData {
                    expression: keyword,
                    name_or_argument: name,
                    question_dot_token: false,
                },
            );
        }

        let callee_start = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let callee = if callee.is_some() {
            self.parse_member_and_call_rest(callee_start, callee, false)
        } else {
            callee
        };

        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_argument_list())
        } else {
            None
        };

        self.arena.add_call_expr(
            syntax_kind_ext::NEW_EXPRESSION,
            start_pos,
            self.last_token_end(),
            CallExprData {
                expression: callee,
                arguments,
            },
        )
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    pub(crate) fn parse_primary_expression(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::ImportKeyword => self.parse_token_node(),
            SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral | SyntaxKind::StringLiteral => {
                self.parse_literal_node()
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_literal()
            }
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.current_token = self.scanner.rescan_slash_token();
                if self.is_token(SyntaxKind::RegularExpressionLiteral) {
                    self.parse_literal_node()
                } else {
                    self.error_expression_expected();
                    NodeIndex::NONE
                }
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(),
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                self.parse_function_expression()
            }
            SyntaxKind::ClassKeyword => self.parse_class(syntax_kind_ext::CLASS_EXPRESSION),
            SyntaxKind::PrivateIdentifier => self.parse_private_identifier(),
            _ if self.is_identifier() => self.parse_identifier(),
            _ => {
                self.error_expression_expected();
                NodeIndex::NONE
            }
        }
    }

    fn parse_token_node(&mut self) -> NodeIndex {
        let (kind, pos, end) = (self.token() as u16, self.token_pos(), self.token_end());
        self.next_token();
        self.arena.add_token(kind, pos, end)
    }

    fn parse_literal_node(&mut self) -> NodeIndex {
        let (kind, pos, end) = (self.token() as u16, self.token_pos(), self.token_end());
        let text = self.token_value().to_string();
        self.next_token();
        self.arena.add_literal(kind, pos, end, &text)
    }

    /// `async` immediately followed by `function` on the same line.
    pub(crate) fn look_ahead_is_async_function(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_token(SyntaxKind::FunctionKeyword) && !p.has_preceding_line_break()
        })
    }

    pub(crate) fn parse_template_literal(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::NoSubstitutionTemplateLiteral) {
            return self.parse_literal_node();
        }

        let start_pos = self.token_pos();
        let head = self.parse_literal_node();
        let mut spans = Vec::new();
        loop {
            let span_start = self.token_pos();
            let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
            if expression.is_none() {
                self.error_expression_expected();
            }
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_expected(SyntaxKind::CloseBraceToken);
                break;
            }
            self.current_token = self.scanner.rescan_template_token();
            let is_tail = self.is_token(SyntaxKind::TemplateTail);
            let literal = self.parse_literal_node();
            spans.push(self.arena.add_template_span(
                syntax_kind_ext::TEMPLATE_SPAN,
                span_start,
                self.last_token_end(),
                TemplateSpanData {
                    expression,
                    literal,
                },
            ));
            if is_tail {
                break;
            }
        }

        self.arena.add_template_expr(
            syntax_kind_ext::TEMPLATE_EXPRESSION,
            start_pos,
            self.last_token_end(),
            TemplateExprData {
                head,
                template_spans: NodeList::from_vec(spans),
            },
        )
    }

    pub(crate) fn parse_parenthesized_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
        if expression.is_none() {
            self.error_expression_expected();
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.arena.add_parenthesized(
            syntax_kind_ext::PARENTHESIZED_EXPRESSION,
            start_pos,
            self.last_token_end(),
            ParenthesizedData { expression },
        )
    }

    pub(crate) fn parse_array_literal(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
            while !p.is_token(SyntaxKind::CloseBracketToken)
                && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                if p.is_token(SyntaxKind::CommaToken) {
                    let pos = p.token_pos();
                    elements.push(
                        p.arena
                            .add_token(syntax_kind_ext::OMITTED_EXPRESSION, pos, pos),
                    );
                    p.next_token();
                    continue;
                }
                let element = p.parse_spread_or_assignment(syntax_kind_ext::SPREAD_ELEMENT);
                if element.is_none() {
                    p.error_expression_expected();
                    break;
                }
                elements.push(element);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::ARRAY_LITERAL_EXPRESSION,
            start_pos,
            self.last_token_end(),
            LiteralExprData {
                elements: NodeList::from_vec(elements),
            },
        )
    }

    // =========================================================================
    // Object literals
    // =========================================================================

    pub(crate) fn parse_object_literal(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut properties = Vec::new();
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| {
            while !p.is_token(SyntaxKind::CloseBraceToken)
                && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                let property = p.parse_object_literal_element();
                if property.is_none() {
                    break;
                }
                properties.push(property);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::OBJECT_LITERAL_EXPRESSION,
            start_pos,
            self.last_token_end(),
            LiteralExprData {
                elements: NodeList::from_vec(properties),
            },
        )
    }

    pub(crate) fn is_property_name_start(&self) -> bool {
        self.is_identifier_or_keyword()
            || matches!(
                self.token(),
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::BigIntLiteral
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::PrivateIdentifier
            )
    }

    /// `async`, `get`, `set` and `static` act as modifiers only when another
    /// property name (or `*`) follows them on the same line.
    pub(crate) fn look_ahead_is_modifier(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break()
                && (p.is_property_name_start() || p.is_token(SyntaxKind::AsteriskToken))
        })
    }

    fn parse_object_literal_element(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();

        if self.is_token(SyntaxKind::DotDotDotToken) {
            self.next_token();
            let expression = self.parse_assignment_expression();
            return self.arena.add_parenthesized(
                syntax_kind_ext::SPREAD_ASSIGNMENT,
                start_pos,
                self.last_token_end(),
                ParenthesizedData { expression },
            );
        }

        let is_async = self.is_token(SyntaxKind::AsyncKeyword) && self.look_ahead_is_modifier();
        if is_async {
            self.next_token();
        }
        let asterisk = self.parse_optional(SyntaxKind::AsteriskToken);

        if !is_async
            && !asterisk
            && (self.is_token(SyntaxKind::GetKeyword) || self.is_token(SyntaxKind::SetKeyword))
            && self.look_ahead(|p| {
                p.next_token();
                p.is_property_name_start()
            })
        {
            return self.parse_accessor(start_pos, false);
        }

        let name = self.parse_property_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }

        if self.is_token(SyntaxKind::OpenParenToken) || is_async || asterisk {
            return self.parse_method_rest(start_pos, false, is_async, asterisk, name);
        }

        if self.parse_optional(SyntaxKind::ColonToken) {
            let initializer = self.parse_assignment_expression();
            if initializer.is_none() {
                self.error_expression_expected();
            }
            return self.arena.add_property_assignment(
                syntax_kind_ext::PROPERTY_ASSIGNMENT,
                start_pos,
                self.last_token_end(),
                PropertyAssignmentData { name, initializer },
            );
        }

        // Shorthand `{ a }` or cover-grammar `{ a = 1 }`.
        let is_plain_identifier = self
            .arena
            .get(name)
            .is_some_and(|node| node.is_identifier());
        if !is_plain_identifier {
            self.parse_expected(SyntaxKind::ColonToken);
        }
        let object_assignment_initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_shorthand_property(
            syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
            start_pos,
            self.last_token_end(),
            ShorthandPropertyData {
                name,
                object_assignment_initializer,
            },
        )
    }

    /// Identifier-or-keyword, string, number, computed `[expr]` or `#private`.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                self.parse_literal_node()
            }
            SyntaxKind::PrivateIdentifier => self.parse_private_identifier(),
            SyntaxKind::OpenBracketToken => {
                let start_pos = self.token_pos();
                self.next_token();
                let expression =
                    self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_assignment_expression());
                if expression.is_none() {
                    self.error_expression_expected();
                }
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.arena.add_parenthesized(
                    syntax_kind_ext::COMPUTED_PROPERTY_NAME,
                    start_pos,
                    self.last_token_end(),
                    ParenthesizedData { expression },
                )
            }
            _ if self.is_identifier_or_keyword() => self.parse_identifier_name(),
            _ => {
                self.error_at_current_token(
                    diagnostic_messages::PROPERTY_ASSIGNMENT_EXPECTED,
                    diagnostic_codes::PROPERTY_ASSIGNMENT_EXPECTED,
                );
                NodeIndex::NONE
            }
        }
    }

    /// Parameters and body of an object or class method whose name has been
    /// parsed.
    pub(crate) fn parse_method_rest(
        &mut self,
        start_pos: u32,
        is_static: bool,
        is_async: bool,
        asterisk_token: bool,
        name: NodeIndex,
    ) -> NodeIndex {
        let (parameters, body) = self.parse_function_signature_and_body(is_async, asterisk_token);
        self.arena.add_method_decl(
            syntax_kind_ext::METHOD_DECLARATION,
            start_pos,
            self.last_token_end(),
            MethodDeclData {
                is_static,
                is_async,
                asterisk_token,
                name,
                parameters,
                body,
            },
        )
    }

    /// At `get` / `set`: parse the accessor.
    pub(crate) fn parse_accessor(&mut self, start_pos: u32, is_static: bool) -> NodeIndex {
        let kind = if self.is_token(SyntaxKind::GetKeyword) {
            syntax_kind_ext::GET_ACCESSOR
        } else {
            syntax_kind_ext::SET_ACCESSOR
        };
        self.next_token();
        let name = self.parse_property_name();
        let (parameters, body) = self.parse_function_signature_and_body(false, false);
        self.arena.add_accessor(
            kind,
            start_pos,
            self.last_token_end(),
            AccessorData {
                is_static,
                name,
                parameters,
                body,
            },
        )
    }

    /// `( params ) { body }` with the async/generator context of the
    /// function being parsed.
    pub(crate) fn parse_function_signature_and_body(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> (NodeList, NodeIndex) {
        let mut set = 0;
        if is_async {
            set |= CONTEXT_FLAG_ASYNC;
        }
        if is_generator {
            set |= CONTEXT_FLAG_GENERATOR;
        }
        let clear = (CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR | CONTEXT_FLAG_DISALLOW_IN) & !set;
        self.with_context(set, clear, |p| {
            let parameters = p.parse_parameter_list();
            let body = p.parse_block();
            (parameters, body)
        })
    }

    pub(crate) fn parse_function_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_identifier() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let (parameters, body) = self.parse_function_signature_and_body(is_async, asterisk_token);
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_EXPRESSION,
            start_pos,
            self.last_token_end(),
            FunctionData {
                is_async,
                asterisk_token,
                name,
                parameters,
                body,
            },
        )
    }

    // =========================================================================
    // Parameters and binding patterns
    // =========================================================================

    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut parameters = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let start_pos = self.token_pos();
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            if name.is_none() {
                break;
            }
            let initializer = self.parse_initializer();
            parameters.push(self.arena.add_parameter(
                syntax_kind_ext::PARAMETER,
                start_pos,
                self.last_token_end(),
                ParameterData {
                    dot_dot_dot_token,
                    name,
                    initializer,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::from_vec(parameters)
    }

    /// Optional `= expression`.
    pub(crate) fn parse_initializer(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::EqualsToken) {
            let initializer = self.parse_assignment_expression();
            if initializer.is_none() {
                self.error_expression_expected();
            }
            initializer
        } else {
            NodeIndex::NONE
        }
    }

    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_identifier(),
        }
    }

    pub(crate) fn parse_object_binding_pattern(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let element_start = self.token_pos();
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let (property_name, name) = if dot_dot_dot_token {
                (NodeIndex::NONE, self.parse_identifier())
            } else {
                let property = self.parse_property_name();
                if property.is_none() {
                    break;
                }
                if self.parse_optional(SyntaxKind::ColonToken) {
                    (property, self.parse_binding_name())
                } else {
                    (NodeIndex::NONE, property)
                }
            };
            let initializer = self.parse_initializer();
            elements.push(self.arena.add_binding_element(
                syntax_kind_ext::BINDING_ELEMENT,
                element_start,
                self.last_token_end(),
                BindingElementData {
                    dot_dot_dot_token,
                    property_name,
                    name,
                    initializer,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_binding_pattern(
            syntax_kind_ext::OBJECT_BINDING_PATTERN,
            start_pos,
            self.last_token_end(),
            BindingPatternData {
                elements: NodeList::from_vec(elements),
            },
        )
    }

    pub(crate) fn parse_array_binding_pattern(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::CommaToken) {
                let pos = self.token_pos();
                elements.push(
                    self.arena
                        .add_token(syntax_kind_ext::OMITTED_EXPRESSION, pos, pos),
                );
                self.next_token();
                continue;
            }
            let element_start = self.token_pos();
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            if name.is_none() {
                break;
            }
            let initializer = self.parse_initializer();
            elements.push(self.arena.add_binding_element(
                syntax_kind_ext::BINDING_ELEMENT,
                element_start,
                self.last_token_end(),
                BindingElementData {
                    dot_dot_dot_token,
                    property_name: NodeIndex::NONE,
                    name,
                    initializer,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_binding_pattern(
            syntax_kind_ext::ARRAY_BINDING_PATTERN,
            start_pos,
            self.last_token_end(),
            BindingPatternData {
                elements: NodeList::from_vec(elements),
            },
        )
    }
}

/// Tokens after which a `/` is a division operator rather than the start of
/// a regular expression.
fn ends_operand(token: SyntaxKind) -> bool {
    matches!(
        token,
        SyntaxKind::Identifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::RegularExpressionLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateTail
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
    )
}
