//! NodeArena creation methods (add_* methods).
//!
//! Every `add_*` method pushes a node header, its side data and a parent slot,
//! then points the parent slot of each child at the new node. Nodes are always
//! created bottom-up so children exist before their parent.

use super::base::NodeIndex;
use super::node::*;

/// Generates a typed `add_*` wrapper around `add_with_data` per data struct.
macro_rules! typed_add_methods {
    ($($(#[$meta:meta])* $fn_name:ident => $variant:ident($ty:ty)),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $fn_name(&mut self, kind: u16, pos: u32, end: u32, data: $ty) -> NodeIndex {
                self.add_with_data(kind, pos, end, NodeData::$variant(data))
            }
        )+
    };
}

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena sized for a source text of `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        let safe_capacity = capacity.min(Self::MAX_NODE_PREALLOC);
        NodeArena {
            nodes: Vec::with_capacity(safe_capacity),
            extended_info: Vec::with_capacity(safe_capacity),
            data: Vec::with_capacity(safe_capacity / 2),
            ..NodeArena::default()
        }
    }

    pub fn clear(&mut self) {
        macro_rules! clear_vecs {
            ($($field:ident),+ $(,)?) => {
                $(self.$field.clear();)+
            };
        }
        clear_vecs!(nodes, extended_info, data);
        self.generated_uids.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node with no side data (`this`, `null`, `true`, `;`, ...).
    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, pos, end));
        self.extended_info.push(ExtendedNodeInfo::default());
        index
    }

    /// Add a node with side data and link its children back to it.
    pub fn add_with_data(&mut self, kind: u16, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let data_index = self.data.len() as u32;

        let mut children = Vec::new();
        data.for_each_child(&mut |child| children.push(child));

        self.nodes.push(Node::with_data(kind, pos, end, data_index));
        self.extended_info.push(ExtendedNodeInfo::default());
        self.data.push(data);

        for child in children {
            self.set_parent(child, index);
        }
        index
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_none() {
            return;
        }
        if let Some(info) = self.extended_info.get_mut(child.0 as usize) {
            info.parent = parent;
        }
    }

    pub fn add_identifier(&mut self, kind: u16, pos: u32, end: u32, text: &str) -> NodeIndex {
        self.add_with_data(
            kind,
            pos,
            end,
            NodeData::Identifier(IdentifierData {
                escaped_text: text.to_string(),
            }),
        )
    }

    pub fn add_literal(&mut self, kind: u16, pos: u32, end: u32, text: &str) -> NodeIndex {
        self.add_with_data(
            kind,
            pos,
            end,
            NodeData::Literal(LiteralData {
                text: text.to_string(),
            }),
        )
    }

    typed_add_methods! {
        add_binary_expr => Binary(BinaryExprData),
        add_unary_expr => Unary(UnaryExprData),
        add_call_expr => Call(CallExprData),
        add_access_expr => Access(AccessExprData),
        add_conditional_expr => Conditional(ConditionalExprData),
        /// Parenthesized expressions, spreads, computed names and expression
        /// statements.
        add_parenthesized => Parenthesized(ParenthesizedData),
        add_literal_expr => LiteralExpr(LiteralExprData),
        add_template_expr => Template(TemplateExprData),
        add_template_span => TemplateSpan(TemplateSpanData),
        add_tagged_template => TaggedTemplate(TaggedTemplateData),
        add_function => Function(FunctionData),
        add_class => Class(ClassData),
        add_method_decl => Method(MethodDeclData),
        add_accessor => Accessor(AccessorData),
        add_property_decl => PropertyDecl(PropertyDeclData),
        add_property_assignment => PropertyAssignment(PropertyAssignmentData),
        add_shorthand_property => Shorthand(ShorthandPropertyData),
        add_parameter => Parameter(ParameterData),
        add_binding_pattern => BindingPattern(BindingPatternData),
        add_binding_element => BindingElement(BindingElementData),
        add_variable => Variable(VariableData),
        add_variable_declaration => VariableDeclaration(VariableDeclarationData),
        add_block => Block(BlockData),
        add_if_statement => If(IfStatementData),
        add_loop => Loop(LoopData),
        add_do_loop => DoLoop(LoopData),
        add_for_in_of => ForInOf(ForInOfData),
        add_jump => Jump(JumpData),
        add_labeled => Labeled(LabeledData),
        /// `return` and `throw`.
        add_return => Return(ReturnData),
        add_switch => Switch(SwitchData),
        add_case_clause => CaseClause(CaseClauseData),
        add_try => Try(TryData),
        add_catch_clause => CatchClause(CatchClauseData),
    }

    pub fn add_source_file(&mut self, pos: u32, end: u32, data: SourceFileData) -> NodeIndex {
        self.add_with_data(syntax_kind_ext::SOURCE_FILE, pos, end, NodeData::SourceFile(data))
    }
}
