//! Parser state - statement, declaration and class parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{CONTEXT_FLAG_DISALLOW_IN, ParserState};
use extsuper_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use extsuper_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Parse Methods - Statements
    // =========================================================================

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            self.next_token();
            return NodeIndex::NONE;
        }
        let statement = self.parse_statement_worker();
        self.exit_recursion();
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                let (pos, end) = (self.token_pos(), self.token_end());
                self.next_token();
                self.arena
                    .add_token(syntax_kind_ext::EMPTY_STATEMENT, pos, end)
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => self.parse_variable_statement(),
            SyntaxKind::LetKeyword if self.look_ahead_is_let_declaration() => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(),
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                self.parse_function_declaration()
            }
            SyntaxKind::ClassKeyword => self.parse_class(syntax_kind_ext::CLASS_DECLARATION),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ContinueKeyword => self.parse_jump_statement(syntax_kind_ext::CONTINUE_STATEMENT),
            SyntaxKind::BreakKeyword => self.parse_jump_statement(syntax_kind_ext::BREAK_STATEMENT),
            SyntaxKind::ReturnKeyword => self.parse_return_or_throw(syntax_kind_ext::RETURN_STATEMENT),
            SyntaxKind::ThrowKeyword => self.parse_return_or_throw(syntax_kind_ext::THROW_STATEMENT),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::DebuggerKeyword => {
                let pos = self.token_pos();
                self.next_token();
                self.parse_semicolon();
                self.arena
                    .add_token(syntax_kind_ext::DEBUGGER_STATEMENT, pos, self.last_token_end())
            }
            SyntaxKind::ImportKeyword
                if !self.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::OpenParenToken) || p.is_token(SyntaxKind::DotToken)
                }) =>
            {
                self.error_declaration_or_statement_expected()
            }
            SyntaxKind::ExportKeyword
            | SyntaxKind::WithKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::CaseKeyword
            | SyntaxKind::DefaultKeyword
            | SyntaxKind::CatchKeyword
            | SyntaxKind::FinallyKeyword
            | SyntaxKind::ElseKeyword => self.error_declaration_or_statement_expected(),
            _ if self.is_identifier()
                && self.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::ColonToken)
                }) =>
            {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn error_declaration_or_statement_expected(&mut self) -> NodeIndex {
        self.error_at_current_token(
            diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
            diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
        );
        self.next_token();
        NodeIndex::NONE
    }

    /// `{ statements }`
    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeIndex::NONE;
        }
        let statements = self.parse_statement_list(|p| p.is_token(SyntaxKind::CloseBraceToken));
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_block(
            syntax_kind_ext::BLOCK,
            start_pos,
            self.last_token_end(),
            BlockData { statements },
        )
    }

    fn parse_statement_list(&mut self, is_terminator: impl Fn(&ParserState) -> bool) -> NodeList {
        let mut statements = Vec::new();
        while !is_terminator(self) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_pos() == before && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.next_token();
            }
        }
        NodeList::from_vec(statements)
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = self.parse_expression();
        if expression.is_none() {
            return NodeIndex::NONE;
        }
        self.parse_semicolon();
        self.arena.add_parenthesized(
            syntax_kind_ext::EXPRESSION_STATEMENT,
            start_pos,
            self.last_token_end(),
            ParenthesizedData { expression },
        )
    }

    fn parse_labeled_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let label = self.parse_identifier();
        self.parse_expected(SyntaxKind::ColonToken);
        let statement = self.parse_statement();
        self.arena.add_labeled(
            syntax_kind_ext::LABELED_STATEMENT,
            start_pos,
            self.last_token_end(),
            LabeledData { label, statement },
        )
    }

    // =========================================================================
    // Variable declarations
    // =========================================================================

    /// `let` starts a declaration only when a binding follows it.
    fn look_ahead_is_let_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_identifier()
                || p.is_token(SyntaxKind::OpenBraceToken)
                || p.is_token(SyntaxKind::OpenBracketToken)
        })
    }

    fn parse_variable_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let list = self.parse_variable_declaration_list();
        self.parse_semicolon();
        self.arena.add_variable(
            syntax_kind_ext::VARIABLE_STATEMENT,
            start_pos,
            self.last_token_end(),
            VariableData {
                declarations: NodeList::from_vec(vec![list]),
            },
        )
    }

    /// At `var` / `let` / `const`: the keyword plus its declarators.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let flags = match self.token() {
            SyntaxKind::LetKeyword => node_flags::LET,
            SyntaxKind::ConstKeyword => node_flags::CONST,
            _ => 0,
        };
        self.next_token();

        let mut declarations = Vec::new();
        loop {
            let decl_start = self.token_pos();
            let name = self.parse_binding_name();
            if name.is_none() {
                break;
            }
            let initializer = self.parse_initializer();
            declarations.push(self.arena.add_variable_declaration(
                syntax_kind_ext::VARIABLE_DECLARATION,
                decl_start,
                self.last_token_end(),
                VariableDeclarationData { name, initializer },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }

        let list = self.arena.add_variable(
            syntax_kind_ext::VARIABLE_DECLARATION_LIST,
            start_pos,
            self.last_token_end(),
            VariableData {
                declarations: NodeList::from_vec(declarations),
            },
        );
        if let Some(node) = self.arena.get_mut(list) {
            node.flags |= flags;
        }
        list
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn parse_function_declaration(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = self.parse_identifier();
        let (parameters, body) = self.parse_function_signature_and_body(is_async, asterisk_token);
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_DECLARATION,
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

    /// Class declaration or expression (`kind` decides which).
    pub(crate) fn parse_class(&mut self, kind: u16) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::ClassKeyword);

        let name = if self.is_identifier() && !self.is_token(SyntaxKind::ExtendsKeyword) {
            self.parse_identifier()
        } else {
            if kind == syntax_kind_ext::CLASS_DECLARATION {
                self.error_at_current_token(
                    diagnostic_messages::IDENTIFIER_EXPECTED,
                    diagnostic_codes::IDENTIFIER_EXPECTED,
                );
            }
            NodeIndex::NONE
        };

        let heritage = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_left_hand_side_expression()
        } else {
            NodeIndex::NONE
        };

        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let before = self.token_pos();
            let member = self.parse_class_member();
            if member.is_some() {
                members.push(member);
            } else if self.token_pos() == before {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);

        self.arena.add_class(
            kind,
            start_pos,
            self.last_token_end(),
            ClassData {
                name,
                heritage,
                members: NodeList::from_vec(members),
            },
        )
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();

        if self.is_token(SyntaxKind::StaticKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::OpenBraceToken)
            })
        {
            return self.parse_class_static_block(start_pos);
        }

        let is_static = self.is_token(SyntaxKind::StaticKeyword) && self.look_ahead_is_modifier();
        if is_static {
            self.next_token();
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
            return self.parse_accessor(start_pos, is_static);
        }

        if !self.is_property_name_start() {
            self.error_unexpected_token();
            return NodeIndex::NONE;
        }
        let name = self.parse_property_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }

        if self.is_token(SyntaxKind::OpenParenToken) || is_async || asterisk {
            return self.parse_method_rest(start_pos, is_static, is_async, asterisk, name);
        }

        let initializer = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_initializer());
        self.parse_semicolon();
        self.arena.add_property_decl(
            syntax_kind_ext::PROPERTY_DECLARATION,
            start_pos,
            self.last_token_end(),
            PropertyDeclData {
                is_static,
                name,
                initializer,
            },
        )
    }

    /// `static { statements }`
    fn parse_class_static_block(&mut self, start_pos: u32) -> NodeIndex {
        self.next_token();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list(|p| p.is_token(SyntaxKind::CloseBraceToken));
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_block(
            syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION,
            start_pos,
            self.last_token_end(),
            BlockData { statements },
        )
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_if_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_if_statement(
            syntax_kind_ext::IF_STATEMENT,
            start_pos,
            self.last_token_end(),
            IfStatementData {
                expression,
                then_statement,
                else_statement,
            },
        )
    }

    /// `( expression )` of `if`, `while`, `switch` and `do ... while`.
    fn parse_parenthesized_condition(&mut self) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
        if expression.is_none() {
            self.error_expression_expected();
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        expression
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let statement = self.parse_statement();
        self.arena.add_loop(
            syntax_kind_ext::WHILE_STATEMENT,
            start_pos,
            self.last_token_end(),
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        let condition = self.parse_parenthesized_condition();
        // `do ... while (x)` is followed by an optional semicolon even on the
        // same line.
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.arena.add_do_loop(
            syntax_kind_ext::DO_STATEMENT,
            start_pos,
            self.last_token_end(),
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let await_modifier =
            self.in_async_context() && self.parse_optional(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);

        let initializer = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.with_context(CONTEXT_FLAG_DISALLOW_IN, 0, |p| {
                let is_declaration = p.is_token(SyntaxKind::VarKeyword)
                    || p.is_token(SyntaxKind::ConstKeyword)
                    || (p.is_token(SyntaxKind::LetKeyword) && p.look_ahead_is_let_declaration());
                if is_declaration {
                    p.parse_variable_declaration_list()
                } else {
                    p.parse_expression()
                }
            })
        };

        let for_in_of_kind = if self.is_token(SyntaxKind::InKeyword) {
            Some(syntax_kind_ext::FOR_IN_STATEMENT)
        } else if self.is_token(SyntaxKind::OfKeyword) {
            Some(syntax_kind_ext::FOR_OF_STATEMENT)
        } else {
            None
        };

        if let Some(kind) = for_in_of_kind {
            self.next_token();
            let expression = if kind == syntax_kind_ext::FOR_OF_STATEMENT {
                self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_assignment_expression())
            } else {
                self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression())
            };
            self.parse_expected(SyntaxKind::CloseParenToken);
            let statement = self.parse_statement();
            let node = self.arena.add_for_in_of(
                kind,
                start_pos,
                self.last_token_end(),
                ForInOfData {
                    await_modifier,
                    initializer,
                    expression,
                    statement,
                },
            );
            if await_modifier {
                if let Some(n) = self.arena.get_mut(node) {
                    n.flags |= node_flags::ASTERISK;
                }
            }
            return node;
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression())
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression())
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();

        self.arena.add_loop(
            syntax_kind_ext::FOR_STATEMENT,
            start_pos,
            self.last_token_end(),
            LoopData {
                initializer,
                condition,
                incrementor,
                statement,
            },
        )
    }

    fn parse_jump_statement(&mut self, kind: u16) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let label = if !self.can_insert_semicolon() && self.is_identifier() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.arena.add_jump(
            kind,
            start_pos,
            self.last_token_end(),
            JumpData { label },
        )
    }

    fn parse_return_or_throw(&mut self, kind: u16) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let expression = if self.can_insert_semicolon() || self.is_token(SyntaxKind::SemicolonToken)
        {
            NodeIndex::NONE
        } else {
            self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression())
        };
        if kind == syntax_kind_ext::THROW_STATEMENT && expression.is_none() {
            self.error_expression_expected();
        }
        self.parse_semicolon();
        self.arena.add_return(
            kind,
            start_pos,
            self.last_token_end(),
            ReturnData { expression },
        )
    }

    fn parse_switch_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();

        let block_start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut clauses = Vec::new();
        while self.is_token(SyntaxKind::CaseKeyword) || self.is_token(SyntaxKind::DefaultKeyword) {
            let clause_start = self.token_pos();
            let (kind, expression) = if self.parse_optional(SyntaxKind::CaseKeyword) {
                let expression =
                    self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |p| p.parse_expression());
                (syntax_kind_ext::CASE_CLAUSE, expression)
            } else {
                self.next_token();
                (syntax_kind_ext::DEFAULT_CLAUSE, NodeIndex::NONE)
            };
            self.parse_expected(SyntaxKind::ColonToken);
            let statements = self.parse_statement_list(|p| {
                p.is_token(SyntaxKind::CaseKeyword)
                    || p.is_token(SyntaxKind::DefaultKeyword)
                    || p.is_token(SyntaxKind::CloseBraceToken)
            });
            clauses.push(self.arena.add_case_clause(
                kind,
                clause_start,
                self.last_token_end(),
                CaseClauseData {
                    expression,
                    statements,
                },
            ));
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let case_block = self.arena.add_block(
            syntax_kind_ext::CASE_BLOCK,
            block_start,
            self.last_token_end(),
            BlockData {
                statements: NodeList::from_vec(clauses),
            },
        );

        self.arena.add_switch(
            syntax_kind_ext::SWITCH_STATEMENT,
            start_pos,
            self.last_token_end(),
            SwitchData {
                expression,
                case_block,
            },
        )
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block();

        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let clause_start = self.token_pos();
            self.next_token();
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let decl_start = self.token_pos();
                let name = self.parse_binding_name();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_variable_declaration(
                    syntax_kind_ext::VARIABLE_DECLARATION,
                    decl_start,
                    self.arena.get(name).map_or(decl_start, |n| n.end),
                    VariableDeclarationData {
                        name,
                        initializer: NodeIndex::NONE,
                    },
                )
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block();
            self.arena.add_catch_clause(
                syntax_kind_ext::CATCH_CLAUSE,
                clause_start,
                self.last_token_end(),
                CatchClauseData {
                    variable_declaration,
                    block,
                },
            )
        } else {
            NodeIndex::NONE
        };

        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };

        if catch_clause.is_none() && finally_block.is_none() {
            self.parse_expected(SyntaxKind::CatchKeyword);
        }

        self.arena.add_try(
            syntax_kind_ext::TRY_STATEMENT,
            start_pos,
            self.last_token_end(),
            TryData {
                try_block,
                catch_clause,
                finally_block,
            },
        )
    }
}
