//! callParent rewrite for async methods of class-definition calls.
//!
//! The runtime locates the overridden implementation for `callParent` by
//! walking the caller chain, which does not survive an `await`. Inside
//! `async` methods of an `Ext.define` body the call is therefore replaced by
//! a direct reference:
//!
//! ```javascript
//! Ext.define('App.Child', {
//!     extend: 'App.Parent',
//!     load: async function (opts) {
//!         await this.callParent(arguments);
//!     }
//! });
//! ```
//! Becomes:
//! ```javascript
//! Ext.define('App.Child', {
//!     extend: 'App.Parent',
//!     load: async function (opts) {
//!         await (arguments.callee.$previous || arguments.callee.$owner && arguments.callee.$owner.superclass[arguments.callee.$name] || (App.Parent.prototype || App.Parent).load).apply(this, arguments);
//!     }
//! });
//! ```
//!
//! With an `override` property the reference is the previous implementation
//! of the overridden class instead:
//! `(App.Parent.prototype || App.Parent).load.$previous`.
//!
//! Synchronous methods are left untouched.

use extsuper_common::diagnostics::{
    Diagnostic, SourceSpan, diagnostic_codes, diagnostic_messages, format_message,
};
use extsuper_parser::parser::{NodeArena, NodeIndex, node_flags, syntax_kind_ext};
use extsuper_parser::syntax::predicates::{
    is_call_expression, is_identifier_named, is_property_access, is_string_literal,
    is_this_expression,
};
use extsuper_parser::syntax::transform_utils::{
    returned_object_literal, skip_parentheses, static_property_name,
};
use extsuper_scanner::char_codes::{is_identifier_part, is_identifier_start};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

const CALL_PARENT: &str = "callParent";
const DEFINE: &str = "define";
const DEFAULT_ANCESTOR: &str = "Ext.Base";

/// Method-name prefixes whose async methods may not use `callParent`.
pub const UNSUPPORTED_ASYNC_METHOD_PREFIXES: [&str; 5] =
    ["apply", "get", "set", "update", "constructor"];

// =============================================================================
// Options and results
// =============================================================================

/// Options for one rewrite pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewriteOptions {
    /// Identifiers accepted as the root of `<root>.define(...)`.
    pub ext_names: Vec<String>,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            ext_names: vec!["Ext".to_string()],
        }
    }
}

/// Result of a successful pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Number of `callParent` calls replaced.
    pub rewritten: usize,
    /// Non-fatal diagnostics (warnings).
    pub diagnostics: Vec<Diagnostic>,
}

/// A fatal rewrite error. The file must be left unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteError {
    /// `callParent` inside a define call but not inside any method.
    MissingMethod { span: SourceSpan },
    /// `callParent` in an async method whose name starts with a reserved
    /// prefix.
    UnsupportedAsyncMethod { method: String, span: SourceSpan },
    /// `callParent` in an async method with a computed or private key.
    UnnamedMethod { span: SourceSpan },
}

impl RewriteError {
    /// Source range of the offending `callParent` call.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            RewriteError::MissingMethod { span }
            | RewriteError::UnsupportedAsyncMethod { span, .. }
            | RewriteError::UnnamedMethod { span } => *span,
        }
    }

    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            RewriteError::MissingMethod { .. } => diagnostic_codes::METHOD_DECLARATION_NOT_FOUND,
            RewriteError::UnsupportedAsyncMethod { .. } => {
                diagnostic_codes::CALL_PARENT_UNSUPPORTED_IN_ASYNC
            }
            RewriteError::UnnamedMethod { .. } => diagnostic_codes::METHOD_NAME_NOT_STATIC,
        }
    }

    #[must_use]
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        Diagnostic::error(file, self.span(), self.to_string(), self.code())
    }
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::MissingMethod { .. } => {
                f.write_str(diagnostic_messages::METHOD_DECLARATION_NOT_FOUND)
            }
            RewriteError::UnsupportedAsyncMethod { .. } => f.write_str(&format_message(
                diagnostic_messages::CALL_PARENT_UNSUPPORTED_IN_ASYNC,
                &[&UNSUPPORTED_ASYNC_METHOD_PREFIXES.join(", ")],
            )),
            RewriteError::UnnamedMethod { .. } => {
                f.write_str(diagnostic_messages::METHOD_NAME_NOT_STATIC)
            }
        }
    }
}

impl std::error::Error for RewriteError {}

// =============================================================================
// Matched entities
// =============================================================================

/// Whether the class body names its ancestor with `extend` or `override`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InheritanceKind {
    Extend,
    Override,
}

/// The `extend` / `override` property of a class body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InheritanceProperty {
    pub kind: InheritanceKind,
    pub property: NodeIndex,
    /// Property value: a string literal naming a dotted path, or any
    /// expression.
    pub value: NodeIndex,
}

/// An object-literal member whose value is a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub property: NodeIndex,
    pub key: NodeIndex,
    pub is_async: bool,
}

impl MethodDeclaration {
    /// Statically known method name.
    #[must_use]
    pub fn name<'b>(&self, arena: &'b NodeArena) -> Option<&'b str> {
        static_property_name(arena, self.key)
    }
}

// =============================================================================
// Matching
// =============================================================================

/// `this.callParent(...)` or `me.callParent(...)`.
#[must_use]
pub fn is_call_parent_invocation(arena: &NodeArena, call: NodeIndex) -> bool {
    let Some(node) = arena.get(call) else {
        return false;
    };
    if !is_call_expression(arena, call) || node.has_flag(node_flags::OPTIONAL_CHAIN) {
        return false;
    }
    let Some(callee) = arena.get_call_expr(node).map(|c| c.expression) else {
        return false;
    };
    if !is_property_access(arena, callee) {
        return false;
    }
    let Some(access) = arena.get(callee).and_then(|n| arena.get_access_expr(n)) else {
        return false;
    };
    !access.question_dot_token
        && (is_this_expression(arena, access.expression)
            || is_identifier_named(arena, access.expression, "me"))
        && is_identifier_named(arena, access.name_or_argument, CALL_PARENT)
}

/// `<root>.define(...)` with `<root>` one of `ext_names`.
#[must_use]
pub fn is_define_call(arena: &NodeArena, call: NodeIndex, ext_names: &FxHashSet<&str>) -> bool {
    let Some(node) = arena.get(call) else {
        return false;
    };
    if !is_call_expression(arena, call) || node.has_flag(node_flags::OPTIONAL_CHAIN) {
        return false;
    }
    let Some(callee) = arena.get_call_expr(node).map(|c| c.expression) else {
        return false;
    };
    if !is_property_access(arena, callee) {
        return false;
    }
    let Some(access) = arena.get(callee).and_then(|n| arena.get_access_expr(n)) else {
        return false;
    };
    !access.question_dot_token
        && is_identifier_named(arena, access.name_or_argument, DEFINE)
        && arena
            .get_identifier_text(access.expression)
            .is_some_and(|root| ext_names.contains(root))
        && arena
            .get(access.expression)
            .is_some_and(|n| n.is_identifier())
}

/// Nearest enclosing define call of `call`.
#[must_use]
pub fn find_enclosing_define(
    arena: &NodeArena,
    call: NodeIndex,
    ext_names: &FxHashSet<&str>,
) -> Option<NodeIndex> {
    arena.find_ancestor(call, |arena, candidate| {
        is_define_call(arena, candidate, ext_names)
    })
}

/// Nearest enclosing object-literal member whose value is a function:
/// `name: function () {}`, `name: () => {}` or `name() {}`.
#[must_use]
pub fn find_enclosing_method(arena: &NodeArena, call: NodeIndex) -> Option<MethodDeclaration> {
    let property = arena.find_ancestor(call, |arena, candidate| {
        as_method_declaration(arena, candidate).is_some()
    })?;
    as_method_declaration(arena, property)
}

fn as_method_declaration(arena: &NodeArena, idx: NodeIndex) -> Option<MethodDeclaration> {
    let node = arena.get(idx)?;
    match node.kind {
        syntax_kind_ext::PROPERTY_ASSIGNMENT => {
            let prop = arena.get_property_assignment(node)?;
            let value = arena.get(skip_parentheses(arena, prop.initializer))?;
            if !matches!(
                value.kind,
                syntax_kind_ext::FUNCTION_EXPRESSION | syntax_kind_ext::ARROW_FUNCTION
            ) {
                return None;
            }
            let function = arena.get_function(value)?;
            Some(MethodDeclaration {
                property: idx,
                key: prop.name,
                is_async: function.is_async,
            })
        }
        syntax_kind_ext::METHOD_DECLARATION => {
            let parent = arena.get_parent(idx);
            if arena.kind(parent) != Some(syntax_kind_ext::OBJECT_LITERAL_EXPRESSION) {
                return None;
            }
            let method = arena.get_method_decl(node)?;
            Some(MethodDeclaration {
                property: idx,
                key: method.name,
                is_async: method.is_async,
            })
        }
        _ => None,
    }
}

/// Whether `name` starts with one of the reserved prefixes.
#[must_use]
pub fn is_reserved_method_name(name: &str) -> bool {
    UNSUPPORTED_ASYNC_METHOD_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// The first `extend` or `override` property of the class body passed to
/// `define`.
///
/// The body is the second argument: an object literal, or a function whose
/// first own `return` yields an object literal. Anything else has no
/// inheritance property.
#[must_use]
pub fn get_inheritance_property(arena: &NodeArena, define: NodeIndex) -> Option<InheritanceProperty> {
    let call = arena.get_call_expr(arena.get(define)?)?;
    let body = skip_parentheses(arena, call.arguments.as_ref()?.get(1)?);
    let object = match arena.kind(body)? {
        syntax_kind_ext::OBJECT_LITERAL_EXPRESSION => body,
        syntax_kind_ext::FUNCTION_EXPRESSION | syntax_kind_ext::ARROW_FUNCTION => {
            returned_object_literal(arena, body)?
        }
        _ => return None,
    };

    let elements = &arena.get_literal_expr(arena.get(object)?)?.elements;
    elements
        .nodes
        .iter()
        .find_map(|&element| as_inheritance_property(arena, element))
}

fn as_inheritance_property(arena: &NodeArena, element: NodeIndex) -> Option<InheritanceProperty> {
    let node = arena.get(element)?;
    let (key, value) = match node.kind {
        syntax_kind_ext::PROPERTY_ASSIGNMENT => {
            let prop = arena.get_property_assignment(node)?;
            (prop.name, prop.initializer)
        }
        syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT => {
            let prop = arena.get_shorthand_property(node)?;
            (prop.name, prop.name)
        }
        _ => return None,
    };
    let kind = match static_property_name(arena, key)? {
        "extend" => InheritanceKind::Extend,
        "override" => InheritanceKind::Override,
        _ => return None,
    };
    Some(InheritanceProperty {
        kind,
        property: element,
        value,
    })
}

// =============================================================================
// Reference construction
// =============================================================================

/// Expression for the ancestor class `A`.
///
/// No property means `Ext.Base`. A string value is a dotted path folded into
/// member accesses. Any other value is copied, leaving the class body as it
/// was.
pub fn build_ancestor_reference(
    arena: &mut NodeArena,
    property: Option<&InheritanceProperty>,
) -> NodeIndex {
    let Some(property) = property else {
        return build_member_chain(arena, DEFAULT_ANCESTOR);
    };
    if is_string_literal(arena, property.value) {
        let path = arena
            .get_literal_text(property.value)
            .unwrap_or_default()
            .to_string();
        build_member_chain(arena, &path)
    } else {
        arena.clone_subtree(property.value)
    }
}

/// `a.b.c` from `"a.b.c"`. Empty segments are skipped; a path without any
/// segment names `Ext.Base`.
fn build_member_chain(arena: &mut NodeArena, path: &str) -> NodeIndex {
    let mut segments = path.split('.').filter(|segment| !segment.is_empty());
    let Some(first) = segments.next() else {
        return build_member_chain(arena, DEFAULT_ANCESTOR);
    };
    let mut chain = arena.create_identifier(first);
    for segment in segments {
        chain = arena.create_property_access(chain, segment);
    }
    chain
}

/// `object.name`, or `object["name"]` when `name` is not an identifier.
fn create_member(arena: &mut NodeArena, object: NodeIndex, name: &str) -> NodeIndex {
    if is_identifier_name(name) {
        arena.create_property_access(object, name)
    } else {
        let key = arena.create_string_literal(name);
        arena.create_element_access(object, key)
    }
}

fn is_identifier_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_part)
}

/// `arguments.callee`
fn arguments_callee(arena: &mut NodeArena) -> NodeIndex {
    let arguments = arena.create_identifier("arguments");
    arena.create_property_access(arguments, "callee")
}

/// Reference to the implementation `callParent` would have invoked.
///
/// `ancestor` is consumed; a second copy is made where the expression needs
/// it twice.
///
/// - extend: `arguments.callee.$previous || arguments.callee.$owner &&
///   arguments.callee.$owner.superclass[arguments.callee.$name] ||
///   (A.prototype || A).m`
/// - override: `(A.prototype || A).m.$previous`
pub fn build_method_reference(
    arena: &mut NodeArena,
    ancestor: NodeIndex,
    method_name: &str,
    kind: InheritanceKind,
) -> NodeIndex {
    let ancestor_copy = arena.clone_subtree(ancestor);
    let prototype = arena.create_property_access(ancestor, "prototype");
    let prototype_or_class = arena.create_logical_or(prototype, ancestor_copy);
    let ancestor_method = create_member(arena, prototype_or_class, method_name);

    match kind {
        InheritanceKind::Override => arena.create_property_access(ancestor_method, "$previous"),
        InheritanceKind::Extend => {
            let callee = arguments_callee(arena);
            let previous = arena.create_property_access(callee, "$previous");

            let callee = arguments_callee(arena);
            let owner = arena.create_property_access(callee, "$owner");

            let callee = arguments_callee(arena);
            let owner_again = arena.create_property_access(callee, "$owner");
            let superclass = arena.create_property_access(owner_again, "superclass");
            let callee = arguments_callee(arena);
            let own_name = arena.create_property_access(callee, "$name");
            let superclass_method = arena.create_element_access(superclass, own_name);

            let owner_method = arena.create_logical_and(owner, superclass_method);
            let previous_or_owner = arena.create_logical_or(previous, owner_method);
            arena.create_logical_or(previous_or_owner, ancestor_method)
        }
    }
}

/// `method_ref.apply(this, argument)` or `method_ref.call(this)`.
pub fn build_replacement(
    arena: &mut NodeArena,
    method_ref: NodeIndex,
    argument: Option<NodeIndex>,
) -> NodeIndex {
    let this = arena.create_this();
    match argument {
        Some(argument) => {
            let apply = arena.create_property_access(method_ref, "apply");
            arena.create_call(apply, vec![this, argument])
        }
        None => {
            let call = arena.create_property_access(method_ref, "call");
            arena.create_call(call, vec![this])
        }
    }
}

// =============================================================================
// Pass
// =============================================================================

/// Rewrite every `callParent` call in async methods of define calls under
/// `root`.
///
/// The tree is walked in pre-order. A replacement is not matched again, but
/// its children (the forwarded argument) are still visited. On error the
/// arena may be partially rewritten and must not be printed.
#[tracing::instrument(level = "debug", skip_all)]
pub fn rewrite_call_parent(
    arena: &mut NodeArena,
    root: NodeIndex,
    options: &RewriteOptions,
) -> Result<RewriteOutcome, RewriteError> {
    let mut transformer = CallParentTransformer::new(arena, options);
    transformer.run(root)?;
    Ok(transformer.outcome)
}

struct CallParentTransformer<'a> {
    arena: &'a mut NodeArena,
    ext_names: FxHashSet<&'a str>,
    primary_ext_name: &'a str,
    file_name: String,
    outcome: RewriteOutcome,
}

impl<'a> CallParentTransformer<'a> {
    fn new(arena: &'a mut NodeArena, options: &'a RewriteOptions) -> Self {
        CallParentTransformer {
            arena,
            ext_names: options.ext_names.iter().map(String::as_str).collect(),
            primary_ext_name: options.ext_names.first().map_or("Ext", String::as_str),
            file_name: String::new(),
            outcome: RewriteOutcome::default(),
        }
    }

    fn run(&mut self, root: NodeIndex) -> Result<(), RewriteError> {
        self.file_name = self
            .arena
            .get(root)
            .and_then(|node| self.arena.get_source_file(node))
            .map(|sf| sf.file_name.clone())
            .unwrap_or_default();

        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let mut next = idx;
            if is_call_parent_invocation(self.arena, idx)
                && let Some(replacement) = self.visit_call_parent(idx)?
            {
                next = replacement;
            }
            let mut children = self.arena.get_children(next);
            children.reverse();
            stack.extend(children);
        }

        debug!(
            file = %self.file_name,
            rewritten = self.outcome.rewritten,
            warnings = self.outcome.diagnostics.len(),
            "callParent pass finished"
        );
        Ok(())
    }

    /// Handle one `callParent` call. Returns the node now in its place when
    /// it was rewritten.
    fn visit_call_parent(&mut self, call: NodeIndex) -> Result<Option<NodeIndex>, RewriteError> {
        let span = self
            .arena
            .get(call)
            .map_or(SourceSpan::default(), |n| SourceSpan::new(n.pos, n.end));

        let Some(define) = find_enclosing_define(self.arena, call, &self.ext_names) else {
            let message = format_message(
                diagnostic_messages::DEFINE_CALL_NOT_FOUND,
                &[self.primary_ext_name],
            );
            warn!(file = %self.file_name, pos = span.start, "{message}");
            self.outcome.diagnostics.push(Diagnostic::warning(
                self.file_name.as_str(),
                span,
                message,
                diagnostic_codes::DEFINE_CALL_NOT_FOUND,
            ));
            return Ok(None);
        };

        let Some(method) = find_enclosing_method(self.arena, call) else {
            return Err(RewriteError::MissingMethod { span });
        };
        if !method.is_async {
            trace!(pos = span.start, "callParent in synchronous method left as is");
            return Ok(None);
        }
        let Some(method_name) = method.name(self.arena).map(str::to_string) else {
            return Err(RewriteError::UnnamedMethod { span });
        };
        if is_reserved_method_name(&method_name) {
            return Err(RewriteError::UnsupportedAsyncMethod {
                method: method_name,
                span,
            });
        }

        let inheritance = get_inheritance_property(self.arena, define);
        let kind = inheritance.map_or(InheritanceKind::Extend, |p| p.kind);
        let ancestor = build_ancestor_reference(self.arena, inheritance.as_ref());
        let method_ref = build_method_reference(self.arena, ancestor, &method_name, kind);

        let first_argument = self
            .arena
            .get(call)
            .and_then(|node| self.arena.get_call_expr(node))
            .and_then(|c| c.arguments.as_ref())
            .and_then(|args| args.first());
        let replacement = build_replacement(self.arena, method_ref, first_argument);

        let placed = self.arena.replace_node(call, replacement);
        if placed.is_some() {
            self.outcome.rewritten += 1;
            debug!(
                file = %self.file_name,
                method = %method_name,
                mode = ?kind,
                pos = span.start,
                "rewrote callParent"
            );
        }
        Ok(placed)
    }
}

#[cfg(test)]
#[path = "../../tests/call_parent.rs"]
mod tests;
