//! NodeArena access methods.
//!
//! Typed getters return `None` when the node carries a different kind of side
//! data, so callers can chain them with `?` while matching on shape.

use super::base::NodeIndex;
use super::node::*;
use extsuper_scanner::SyntaxKind;

macro_rules! typed_get_methods {
    ($($(#[$meta:meta])* $fn_name:ident => $variant:ident($ty:ty)),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $fn_name(&self, node: &Node) -> Option<&$ty> {
                match self.get_data(node)? {
                    NodeData::$variant(data) => Some(data),
                    _ => None,
                }
            }
        )+
    };
}

impl NodeArena {
    /// Get a thin node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable thin node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    /// Get extended info for a node
    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get(index.0 as usize)
        }
    }

    /// Parent of a node, or `NodeIndex::NONE` for the root and detached nodes.
    #[inline]
    pub fn get_parent(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    #[inline]
    pub fn get_data(&self, node: &Node) -> Option<&NodeData> {
        if node.has_data() {
            self.data.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn get_data_mut_at(&mut self, index: NodeIndex) -> Option<&mut NodeData> {
        let data_index = self.get(index)?.data_index;
        if data_index == Node::NO_DATA {
            return None;
        }
        self.data.get_mut(data_index as usize)
    }

    /// Kind of the node at `index`.
    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<u16> {
        self.get(index).map(|n| n.kind)
    }

    typed_get_methods! {
        /// Identifier and private identifier data.
        get_identifier => Identifier(IdentifierData),
        /// String, numeric, bigint, regex and template piece data.
        get_literal => Literal(LiteralData),
        get_binary_expr => Binary(BinaryExprData),
        get_unary_expr => Unary(UnaryExprData),
        get_call_expr => Call(CallExprData),
        get_access_expr => Access(AccessExprData),
        get_conditional_expr => Conditional(ConditionalExprData),
        /// Parenthesized expressions, spreads, computed property names and
        /// expression statements.
        get_parenthesized => Parenthesized(ParenthesizedData),
        get_literal_expr => LiteralExpr(LiteralExprData),
        get_template_expr => Template(TemplateExprData),
        get_template_span => TemplateSpan(TemplateSpanData),
        get_tagged_template => TaggedTemplate(TaggedTemplateData),
        get_function => Function(FunctionData),
        get_class => Class(ClassData),
        get_method_decl => Method(MethodDeclData),
        get_accessor => Accessor(AccessorData),
        get_property_decl => PropertyDecl(PropertyDeclData),
        get_property_assignment => PropertyAssignment(PropertyAssignmentData),
        get_shorthand_property => Shorthand(ShorthandPropertyData),
        get_parameter => Parameter(ParameterData),
        get_binding_pattern => BindingPattern(BindingPatternData),
        get_binding_element => BindingElement(BindingElementData),
        get_variable => Variable(VariableData),
        get_variable_declaration => VariableDeclaration(VariableDeclarationData),
        get_block => Block(BlockData),
        get_if_statement => If(IfStatementData),
        get_loop => Loop(LoopData),
        get_do_loop => DoLoop(LoopData),
        get_for_in_of => ForInOf(ForInOfData),
        get_jump_data => Jump(JumpData),
        get_labeled_statement => Labeled(LabeledData),
        /// `return` and `throw`.
        get_return_statement => Return(ReturnData),
        get_switch => Switch(SwitchData),
        get_case_clause => CaseClause(CaseClauseData),
        get_try => Try(TryData),
        get_catch_clause => CatchClause(CatchClauseData),
        get_source_file => SourceFile(SourceFileData),
    }

    /// Identifier text, if `index` is an identifier.
    pub fn get_identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_identifier(node).map(|data| data.escaped_text.as_str())
    }

    /// Cooked literal value, if `index` is a literal.
    pub fn get_literal_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_literal(node).map(|data| data.text.as_str())
    }

    /// Direct children in source order.
    pub fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut children = Vec::new();
        if let Some(data) = self.get(index).and_then(|node| self.get_data(node)) {
            data.for_each_child(&mut |child| children.push(child));
        }
        children
    }

    /// Walk up to the root of the tree containing `index`.
    pub fn get_root(&self, index: NodeIndex) -> NodeIndex {
        let mut current = index;
        let mut steps = 0usize;
        loop {
            let parent = self.get_parent(current);
            if parent.is_none() || steps > self.nodes.len() {
                return current;
            }
            current = parent;
            steps += 1;
        }
    }

    /// Source text of the file that owns `index`, via its root `SourceFile`.
    pub fn source_text(&self, index: NodeIndex) -> Option<&str> {
        let root = self.get(self.get_root(index))?;
        self.get_source_file(root).map(|sf| &*sf.text)
    }

    /// Original source slice for a non-synthesized node.
    pub fn get_node_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        if node.is_synthesized() {
            return None;
        }
        self.source_text(index)?
            .get(node.pos as usize..node.end as usize)
    }

    /// Whether `index` is `NONE`, missing, or detached from the tree.
    pub fn is_detached(&self, index: NodeIndex) -> bool {
        self.get(index)
            .is_none_or(|node| node.has_flag(node_flags::DETACHED))
    }
}

impl Node {
    #[inline]
    pub fn is_identifier(&self) -> bool {
        self.kind == SyntaxKind::Identifier as u16
    }

    #[inline]
    pub fn is_string_literal(&self) -> bool {
        self.kind == SyntaxKind::StringLiteral as u16
    }

    /// Function declarations, function expressions and arrow functions.
    #[inline]
    pub fn is_function_like(&self) -> bool {
        matches!(
            self.kind,
            syntax_kind_ext::FUNCTION_DECLARATION
                | syntax_kind_ext::FUNCTION_EXPRESSION
                | syntax_kind_ext::ARROW_FUNCTION
        )
    }

    /// Anything with its own `this`/`arguments` binding or var scope:
    /// functions, methods, accessors and class static blocks.
    #[inline]
    pub fn is_function_boundary(&self) -> bool {
        self.is_function_like()
            || matches!(
                self.kind,
                syntax_kind_ext::METHOD_DECLARATION
                    | syntax_kind_ext::GET_ACCESSOR
                    | syntax_kind_ext::SET_ACCESSOR
                    | syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION
            )
    }

    #[inline]
    pub fn is_statement(&self) -> bool {
        (syntax_kind_ext::BLOCK..=syntax_kind_ext::CLASS_DECLARATION).contains(&self.kind)
            && self.kind != syntax_kind_ext::VARIABLE_DECLARATION
            && self.kind != syntax_kind_ext::VARIABLE_DECLARATION_LIST
    }

    /// Statement-list containers: source files, blocks, class static blocks
    /// and case clauses.
    #[inline]
    pub fn is_statement_container(&self) -> bool {
        matches!(
            self.kind,
            syntax_kind_ext::SOURCE_FILE
                | syntax_kind_ext::BLOCK
                | syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION
                | syntax_kind_ext::CASE_CLAUSE
                | syntax_kind_ext::DEFAULT_CLAUSE
        )
    }
}
