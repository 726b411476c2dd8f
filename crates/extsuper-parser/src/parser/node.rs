//! Thin node headers, side-data structs and the `NodeArena` that owns them.
//!
//! Every node is a small fixed-size `Node` header (kind, flags, span, data
//! index). Anything beyond the header lives in `NodeArena::data`, a single
//! pool of `NodeData` values addressed by `Node::data_index`. Parent links are
//! kept in a parallel `extended_info` vector so that transforms can walk
//! upwards without the parser threading parents through every call.
//!
//! Spans are byte offsets into the source text. `pos` is the start of the
//! node's first token (leading trivia is never included) and `end` is the end
//! of its last token, so `&text[pos..end]` is exactly the node's source.

use super::base::{NodeIndex, NodeList};
use extsuper_common::SourceSpan;
use serde::Serialize;
use std::sync::Arc;

/// A thin node header.
#[repr(C)]
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Node {
    /// `SyntaxKind` value for tokens, `syntax_kind_ext` value for composites.
    pub kind: u16,
    /// Packed `node_flags`.
    pub flags: u16,
    /// Start offset of the first token.
    pub pos: u32,
    /// End offset of the last token.
    pub end: u32,
    /// Index into `NodeArena::data` (`u32::MAX` = no data).
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub fn new(kind: u16, pos: u32, end: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index: Self::NO_DATA,
        }
    }

    #[inline]
    pub fn with_data(kind: u16, pos: u32, end: u32, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub const fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }

    #[inline]
    pub const fn is_synthesized(&self) -> bool {
        self.flags & node_flags::SYNTHESIZED != 0
    }

    #[inline]
    pub const fn is_modified(&self) -> bool {
        self.flags & node_flags::MODIFIED != 0
    }

    #[inline]
    pub const fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }
}

/// Per-node bookkeeping that is not needed by the parser itself.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
    /// Source range of the node this one replaced, if any. The printer splices
    /// the replacement into exactly this range of the parent's text.
    pub replaced_span: Option<SourceSpan>,
}

/// Node flags packed into `Node::flags`.
pub mod node_flags {
    /// Created by a transform; has no source text of its own.
    pub const SYNTHESIZED: u16 = 1 << 0;
    /// An original node with at least one replaced or inserted descendant.
    pub const MODIFIED: u16 = 1 << 1;
    /// Statement inserted into a statement list (zero-width span).
    pub const INSERTED: u16 = 1 << 2;
    /// Removed from the tree by `replace_node`.
    pub const DETACHED: u16 = 1 << 3;
    /// `let` declaration list.
    pub const LET: u16 = 1 << 4;
    /// `const` declaration list.
    pub const CONST: u16 = 1 << 5;
    /// `yield*`, `function*`, `for await`.
    pub const ASTERISK: u16 = 1 << 6;
    /// Access or call that is part of an optional chain (`a?.b`).
    pub const OPTIONAL_CHAIN: u16 = 1 << 7;
}

/// Composite node kinds. Numbered above `SyntaxKind::LAST_TOKEN` so that
/// token kinds and node kinds share one `u16` space.
pub mod syntax_kind_ext {
    pub const FIRST_NODE: u16 = 200;

    // Names
    pub const COMPUTED_PROPERTY_NAME: u16 = 200;

    // Declarations that live inside other constructs
    pub const PARAMETER: u16 = 201;
    pub const PROPERTY_DECLARATION: u16 = 202;
    pub const METHOD_DECLARATION: u16 = 203;
    pub const GET_ACCESSOR: u16 = 204;
    pub const SET_ACCESSOR: u16 = 205;

    // Binding patterns
    pub const OBJECT_BINDING_PATTERN: u16 = 206;
    pub const ARRAY_BINDING_PATTERN: u16 = 207;
    pub const BINDING_ELEMENT: u16 = 208;

    // Expressions
    pub const ARRAY_LITERAL_EXPRESSION: u16 = 209;
    pub const OBJECT_LITERAL_EXPRESSION: u16 = 210;
    pub const PROPERTY_ACCESS_EXPRESSION: u16 = 211;
    pub const ELEMENT_ACCESS_EXPRESSION: u16 = 212;
    pub const CALL_EXPRESSION: u16 = 213;
    pub const NEW_EXPRESSION: u16 = 214;
    pub const TAGGED_TEMPLATE_EXPRESSION: u16 = 215;
    pub const PARENTHESIZED_EXPRESSION: u16 = 216;
    pub const FUNCTION_EXPRESSION: u16 = 217;
    pub const ARROW_FUNCTION: u16 = 218;
    pub const AWAIT_EXPRESSION: u16 = 219;
    pub const PREFIX_UNARY_EXPRESSION: u16 = 220;
    pub const POSTFIX_UNARY_EXPRESSION: u16 = 221;
    pub const BINARY_EXPRESSION: u16 = 222;
    pub const CONDITIONAL_EXPRESSION: u16 = 223;
    pub const TEMPLATE_EXPRESSION: u16 = 224;
    pub const YIELD_EXPRESSION: u16 = 225;
    pub const SPREAD_ELEMENT: u16 = 226;
    pub const CLASS_EXPRESSION: u16 = 227;
    pub const OMITTED_EXPRESSION: u16 = 228;
    pub const TEMPLATE_SPAN: u16 = 229;

    // Statements
    pub const BLOCK: u16 = 240;
    pub const EMPTY_STATEMENT: u16 = 241;
    pub const VARIABLE_STATEMENT: u16 = 242;
    pub const EXPRESSION_STATEMENT: u16 = 243;
    pub const IF_STATEMENT: u16 = 244;
    pub const DO_STATEMENT: u16 = 245;
    pub const WHILE_STATEMENT: u16 = 246;
    pub const FOR_STATEMENT: u16 = 247;
    pub const FOR_IN_STATEMENT: u16 = 248;
    pub const FOR_OF_STATEMENT: u16 = 249;
    pub const CONTINUE_STATEMENT: u16 = 250;
    pub const BREAK_STATEMENT: u16 = 251;
    pub const RETURN_STATEMENT: u16 = 252;
    pub const SWITCH_STATEMENT: u16 = 253;
    pub const LABELED_STATEMENT: u16 = 254;
    pub const THROW_STATEMENT: u16 = 255;
    pub const TRY_STATEMENT: u16 = 256;
    pub const DEBUGGER_STATEMENT: u16 = 257;
    pub const VARIABLE_DECLARATION: u16 = 258;
    pub const VARIABLE_DECLARATION_LIST: u16 = 259;
    pub const FUNCTION_DECLARATION: u16 = 260;
    pub const CLASS_DECLARATION: u16 = 261;

    // Clauses and object members
    pub const CASE_BLOCK: u16 = 270;
    pub const CASE_CLAUSE: u16 = 271;
    pub const DEFAULT_CLAUSE: u16 = 272;
    pub const CATCH_CLAUSE: u16 = 273;
    pub const PROPERTY_ASSIGNMENT: u16 = 274;
    pub const SHORTHAND_PROPERTY_ASSIGNMENT: u16 = 275;
    pub const SPREAD_ASSIGNMENT: u16 = 276;
    pub const CLASS_STATIC_BLOCK_DECLARATION: u16 = 277;

    pub const SOURCE_FILE: u16 = 280;
}

// =============================================================================
// Side data
// =============================================================================

/// `Identifier` / `PrivateIdentifier`.
#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// String, numeric, bigint, regex and template literal pieces.
/// `text` is the cooked value (string contents without quotes, template
/// piece without delimiters, numeric and regex source as written).
#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    pub text: String,
}

/// Binary and assignment expressions. `operator_token` is a `SyntaxKind`.
#[derive(Clone, Debug, Serialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: u16,
    pub right: NodeIndex,
}

/// Prefix/postfix unary, `await` and `yield` (operand may be NONE for a bare
/// `yield`).
#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprData {
    pub operator: u16,
    pub operand: NodeIndex,
}

/// Call and `new` expressions. `new X` without parentheses has
/// `arguments == None`.
#[derive(Clone, Debug, Serialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: Option<NodeList>,
}

/// Property access (`a.b`) and element access (`a[b]`).
#[derive(Clone, Debug, Serialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    pub question_dot_token: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

/// A node that wraps exactly one expression: parenthesized expressions,
/// spreads, computed property names and expression statements.
#[derive(Clone, Debug, Serialize)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

/// Array and object literals.
#[derive(Clone, Debug, Serialize)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateExprData {
    pub head: NodeIndex,
    pub template_spans: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateSpanData {
    pub expression: NodeIndex,
    pub literal: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    pub template: NodeIndex,
}

/// Function declarations, function expressions and arrow functions.
/// For a concise arrow function `body` is the expression itself.
#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub is_async: bool,
    pub asterisk_token: bool,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

/// Class declarations and class expressions.
#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub name: NodeIndex,
    pub heritage: NodeIndex,
    pub members: NodeList,
}

/// Methods in object literals and class bodies.
#[derive(Clone, Debug, Serialize)]
pub struct MethodDeclData {
    pub is_static: bool,
    pub is_async: bool,
    pub asterisk_token: bool,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

/// `get` / `set` accessors.
#[derive(Clone, Debug, Serialize)]
pub struct AccessorData {
    pub is_static: bool,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

/// Class fields.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyDeclData {
    pub is_static: bool,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// `name: initializer` in an object literal.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// `{ name }` or `{ name = default }` (the latter only in destructuring
/// assignment targets).
#[derive(Clone, Debug, Serialize)]
pub struct ShorthandPropertyData {
    pub name: NodeIndex,
    pub object_assignment_initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingPatternData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingElementData {
    pub dot_dot_dot_token: bool,
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// `VARIABLE_STATEMENT` holds one `VARIABLE_DECLARATION_LIST`; the list holds
/// the `VARIABLE_DECLARATION`s.
#[derive(Clone, Debug, Serialize)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Blocks, case blocks and any other plain statement list.
#[derive(Clone, Debug, Serialize)]
pub struct BlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// `for (;;)`, `while` and `do ... while`.
#[derive(Clone, Debug, Serialize)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForInOfData {
    pub await_modifier: bool,
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
}

/// `break` / `continue` with an optional label.
#[derive(Clone, Debug, Serialize)]
pub struct JumpData {
    pub label: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct LabeledData {
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

/// `return` / `throw` (expression may be NONE for a bare `return`).
#[derive(Clone, Debug, Serialize)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub case_block: NodeIndex,
}

/// `case expr:` / `default:` (expression is NONE for default).
#[derive(Clone, Debug, Serialize)]
pub struct CaseClauseData {
    pub expression: NodeIndex,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct CatchClauseData {
    pub variable_declaration: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub statements: NodeList,
    pub file_name: String,
    pub text: Arc<str>,
}

/// Side data for a node, addressed by `Node::data_index`.
#[derive(Clone, Debug, Serialize)]
pub enum NodeData {
    Identifier(IdentifierData),
    Literal(LiteralData),
    Binary(BinaryExprData),
    Unary(UnaryExprData),
    Call(CallExprData),
    Access(AccessExprData),
    Conditional(ConditionalExprData),
    Parenthesized(ParenthesizedData),
    LiteralExpr(LiteralExprData),
    Template(TemplateExprData),
    TemplateSpan(TemplateSpanData),
    TaggedTemplate(TaggedTemplateData),
    Function(FunctionData),
    Class(ClassData),
    Method(MethodDeclData),
    Accessor(AccessorData),
    PropertyDecl(PropertyDeclData),
    PropertyAssignment(PropertyAssignmentData),
    Shorthand(ShorthandPropertyData),
    Parameter(ParameterData),
    BindingPattern(BindingPatternData),
    BindingElement(BindingElementData),
    Variable(VariableData),
    VariableDeclaration(VariableDeclarationData),
    Block(BlockData),
    If(IfStatementData),
    Loop(LoopData),
    DoLoop(LoopData),
    ForInOf(ForInOfData),
    Jump(JumpData),
    Labeled(LabeledData),
    Return(ReturnData),
    Switch(SwitchData),
    CaseClause(CaseClauseData),
    Try(TryData),
    CatchClause(CatchClauseData),
    SourceFile(SourceFileData),
}

impl NodeData {
    /// Visit every child slot in source order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(NodeIndex)) {
        let mut one = |idx: NodeIndex| {
            if idx.is_some() {
                f(idx)
            }
        };
        match self {
            NodeData::Identifier(_) | NodeData::Literal(_) => {}
            NodeData::Binary(d) => {
                one(d.left);
                one(d.right);
            }
            NodeData::Unary(d) => one(d.operand),
            NodeData::Call(d) => {
                one(d.expression);
                if let Some(args) = &d.arguments {
                    args.nodes.iter().copied().for_each(&mut one);
                }
            }
            NodeData::Access(d) => {
                one(d.expression);
                one(d.name_or_argument);
            }
            NodeData::Conditional(d) => {
                one(d.condition);
                one(d.when_true);
                one(d.when_false);
            }
            NodeData::Parenthesized(d) => one(d.expression),
            NodeData::LiteralExpr(d) => d.elements.nodes.iter().copied().for_each(&mut one),
            NodeData::Template(d) => {
                one(d.head);
                d.template_spans.nodes.iter().copied().for_each(&mut one);
            }
            NodeData::TemplateSpan(d) => {
                one(d.expression);
                one(d.literal);
            }
            NodeData::TaggedTemplate(d) => {
                one(d.tag);
                one(d.template);
            }
            NodeData::Function(d) => {
                one(d.name);
                d.parameters.nodes.iter().copied().for_each(&mut one);
                one(d.body);
            }
            NodeData::Class(d) => {
                one(d.name);
                one(d.heritage);
                d.members.nodes.iter().copied().for_each(&mut one);
            }
            NodeData::Method(d) => {
                one(d.name);
                d.parameters.nodes.iter().copied().for_each(&mut one);
                one(d.body);
            }
            NodeData::Accessor(d) => {
                one(d.name);
                d.parameters.nodes.iter().copied().for_each(&mut one);
                one(d.body);
            }
            NodeData::PropertyDecl(d) => {
                one(d.name);
                one(d.initializer);
            }
            NodeData::PropertyAssignment(d) => {
                one(d.name);
                one(d.initializer);
            }
            NodeData::Shorthand(d) => {
                one(d.name);
                one(d.object_assignment_initializer);
            }
            NodeData::Parameter(d) => {
                one(d.name);
                one(d.initializer);
            }
            NodeData::BindingPattern(d) => d.elements.nodes.iter().copied().for_each(&mut one),
            NodeData::BindingElement(d) => {
                one(d.property_name);
                one(d.name);
                one(d.initializer);
            }
            NodeData::Variable(d) => d.declarations.nodes.iter().copied().for_each(&mut one),
            NodeData::VariableDeclaration(d) => {
                one(d.name);
                one(d.initializer);
            }
            NodeData::Block(d) => d.statements.nodes.iter().copied().for_each(&mut one),
            NodeData::If(d) => {
                one(d.expression);
                one(d.then_statement);
                one(d.else_statement);
            }
            NodeData::Loop(d) => {
                one(d.initializer);
                one(d.condition);
                one(d.incrementor);
                one(d.statement);
            }
            NodeData::DoLoop(d) => {
                one(d.statement);
                one(d.condition);
            }
            NodeData::ForInOf(d) => {
                one(d.initializer);
                one(d.expression);
                one(d.statement);
            }
            NodeData::Jump(d) => one(d.label),
            NodeData::Labeled(d) => {
                one(d.label);
                one(d.statement);
            }
            NodeData::Return(d) => one(d.expression),
            NodeData::Switch(d) => {
                one(d.expression);
                one(d.case_block);
            }
            NodeData::CaseClause(d) => {
                one(d.expression);
                d.statements.nodes.iter().copied().for_each(&mut one);
            }
            NodeData::Try(d) => {
                one(d.try_block);
                one(d.catch_clause);
                one(d.finally_block);
            }
            NodeData::CatchClause(d) => {
                one(d.variable_declaration);
                one(d.block);
            }
            NodeData::SourceFile(d) => d.statements.nodes.iter().copied().for_each(&mut one),
        }
    }

    /// Visit every child slot mutably. Empty (`NONE`) slots are skipped.
    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut NodeIndex)) {
        let mut one = |slot: &mut NodeIndex| {
            if slot.is_some() {
                f(slot)
            }
        };
        match self {
            NodeData::Identifier(_) | NodeData::Literal(_) => {}
            NodeData::Binary(d) => {
                one(&mut d.left);
                one(&mut d.right);
            }
            NodeData::Unary(d) => one(&mut d.operand),
            NodeData::Call(d) => {
                one(&mut d.expression);
                if let Some(args) = &mut d.arguments {
                    args.nodes.iter_mut().for_each(&mut one);
                }
            }
            NodeData::Access(d) => {
                one(&mut d.expression);
                one(&mut d.name_or_argument);
            }
            NodeData::Conditional(d) => {
                one(&mut d.condition);
                one(&mut d.when_true);
                one(&mut d.when_false);
            }
            NodeData::Parenthesized(d) => one(&mut d.expression),
            NodeData::LiteralExpr(d) => d.elements.nodes.iter_mut().for_each(&mut one),
            NodeData::Template(d) => {
                one(&mut d.head);
                d.template_spans.nodes.iter_mut().for_each(&mut one);
            }
            NodeData::TemplateSpan(d) => {
                one(&mut d.expression);
                one(&mut d.literal);
            }
            NodeData::TaggedTemplate(d) => {
                one(&mut d.tag);
                one(&mut d.template);
            }
            NodeData::Function(d) => {
                one(&mut d.name);
                d.parameters.nodes.iter_mut().for_each(&mut one);
                one(&mut d.body);
            }
            NodeData::Class(d) => {
                one(&mut d.name);
                one(&mut d.heritage);
                d.members.nodes.iter_mut().for_each(&mut one);
            }
            NodeData::Method(d) => {
                one(&mut d.name);
                d.parameters.nodes.iter_mut().for_each(&mut one);
                one(&mut d.body);
            }
            NodeData::Accessor(d) => {
                one(&mut d.name);
                d.parameters.nodes.iter_mut().for_each(&mut one);
                one(&mut d.body);
            }
            NodeData::PropertyDecl(d) => {
                one(&mut d.name);
                one(&mut d.initializer);
            }
            NodeData::PropertyAssignment(d) => {
                one(&mut d.name);
                one(&mut d.initializer);
            }
            NodeData::Shorthand(d) => {
                one(&mut d.name);
                one(&mut d.object_assignment_initializer);
            }
            NodeData::Parameter(d) => {
                one(&mut d.name);
                one(&mut d.initializer);
            }
            NodeData::BindingPattern(d) => d.elements.nodes.iter_mut().for_each(&mut one),
            NodeData::BindingElement(d) => {
                one(&mut d.property_name);
                one(&mut d.name);
                one(&mut d.initializer);
            }
            NodeData::Variable(d) => d.declarations.nodes.iter_mut().for_each(&mut one),
            NodeData::VariableDeclaration(d) => {
                one(&mut d.name);
                one(&mut d.initializer);
            }
            NodeData::Block(d) => d.statements.nodes.iter_mut().for_each(&mut one),
            NodeData::If(d) => {
                one(&mut d.expression);
                one(&mut d.then_statement);
                one(&mut d.else_statement);
            }
            NodeData::Loop(d) => {
                one(&mut d.initializer);
                one(&mut d.condition);
                one(&mut d.incrementor);
                one(&mut d.statement);
            }
            NodeData::DoLoop(d) => {
                one(&mut d.statement);
                one(&mut d.condition);
            }
            NodeData::ForInOf(d) => {
                one(&mut d.initializer);
                one(&mut d.expression);
                one(&mut d.statement);
            }
            NodeData::Jump(d) => one(&mut d.label),
            NodeData::Labeled(d) => {
                one(&mut d.label);
                one(&mut d.statement);
            }
            NodeData::Return(d) => one(&mut d.expression),
            NodeData::Switch(d) => {
                one(&mut d.expression);
                one(&mut d.case_block);
            }
            NodeData::CaseClause(d) => {
                one(&mut d.expression);
                d.statements.nodes.iter_mut().for_each(&mut one);
            }
            NodeData::Try(d) => {
                one(&mut d.try_block);
                one(&mut d.catch_clause);
                one(&mut d.finally_block);
            }
            NodeData::CatchClause(d) => {
                one(&mut d.variable_declaration);
                one(&mut d.block);
            }
            NodeData::SourceFile(d) => d.statements.nodes.iter_mut().for_each(&mut one),
        }
    }

    /// The statement list this node owns, if it is a statement container.
    pub fn statements_mut(&mut self) -> Option<&mut NodeList> {
        match self {
            NodeData::Block(d) => Some(&mut d.statements),
            NodeData::CaseClause(d) => Some(&mut d.statements),
            NodeData::SourceFile(d) => Some(&mut d.statements),
            _ => None,
        }
    }
}

/// Arena that owns every node of one parsed file plus any nodes synthesized
/// by transforms afterwards.
#[derive(Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub extended_info: Vec<ExtendedNodeInfo>,
    pub data: Vec<NodeData>,
    /// Names handed out by `generate_uid_identifier`.
    pub generated_uids: rustc_hash::FxHashSet<String>,
}
