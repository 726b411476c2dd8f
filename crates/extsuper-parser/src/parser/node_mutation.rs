//! In-place tree mutation and upward navigation.
//!
//! Mutations keep the arena consistent for the printer:
//! - the parent slot of a replaced node points at the replacement, which
//!   records the replaced source range
//! - every ancestor of a mutation point carries `MODIFIED`
//! - replaced nodes are flagged `DETACHED` and lose their parent link

use super::base::NodeIndex;
use super::node::*;
use crate::syntax::precedence::{OperatorPrecedence, expression_precedence};
use extsuper_common::SourceSpan;
use extsuper_common::limits::{MAX_TREE_WALK_DEPTH, MAX_UID_ATTEMPTS};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Declaration keyword for `create_variable_statement`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub(crate) const fn list_flags(self) -> u16 {
        match self {
            VariableKind::Var => 0,
            VariableKind::Let => node_flags::LET,
            VariableKind::Const => node_flags::CONST,
        }
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }

    pub const fn from_list_flags(flags: u16) -> VariableKind {
        if flags & node_flags::CONST != 0 {
            VariableKind::Const
        } else if flags & node_flags::LET != 0 {
            VariableKind::Let
        } else {
            VariableKind::Var
        }
    }
}

impl NodeArena {
    // =========================================================================
    // Navigation
    // =========================================================================

    /// Nearest strict ancestor of `index` satisfying `predicate`.
    pub fn find_ancestor(
        &self,
        index: NodeIndex,
        mut predicate: impl FnMut(&NodeArena, NodeIndex) -> bool,
    ) -> Option<NodeIndex> {
        let mut current = self.get_parent(index);
        let mut steps = 0;
        while current.is_some() && steps < MAX_TREE_WALK_DEPTH {
            if predicate(self, current) {
                return Some(current);
            }
            current = self.get_parent(current);
            steps += 1;
        }
        None
    }

    /// The statement (possibly `index` itself) that sits directly in a
    /// statement list and contains `index`.
    pub fn enclosing_statement(&self, index: NodeIndex) -> Option<NodeIndex> {
        let mut current = index;
        let mut steps = 0;
        while steps < MAX_TREE_WALK_DEPTH {
            let parent = self.get_parent(current);
            let parent_node = self.get(parent)?;
            let is_statement = self.get(current).is_some_and(|n| n.is_statement());
            if is_statement && parent_node.is_statement_container() {
                return Some(current);
            }
            current = parent;
            steps += 1;
        }
        None
    }

    /// Nearest function-like ancestor or the source file.
    pub fn enclosing_scope(&self, index: NodeIndex) -> NodeIndex {
        self.find_ancestor(index, |arena, candidate| {
            arena.get(candidate).is_some_and(|node| {
                node.is_function_boundary() || node.kind == syntax_kind_ext::SOURCE_FILE
            })
        })
        .unwrap_or_else(|| self.get_root(index))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Put `new` into the parent slot currently holding `old`.
    ///
    /// A synthesized replacement takes over the span of `old`. When `new`
    /// binds looser than `old` did, it is wrapped in parentheses first.
    /// Returns the node now in the slot, or `None` if `old` has no parent.
    pub fn replace_node(&mut self, old: NodeIndex, new: NodeIndex) -> Option<NodeIndex> {
        let parent = self.get_parent(old);
        let old_node = *self.get(old)?;
        if parent.is_none() || self.get(new).is_none() {
            return None;
        }

        let replacement = if self.needs_parentheses_in_slot(parent, old, new) {
            let wrapped = self.create_parenthesized(new);
            trace!(old = old.0, new = new.0, "wrapping replacement in parentheses");
            wrapped
        } else {
            new
        };

        let mut found = false;
        if let Some(data) = self.get_data_mut_at(parent) {
            data.for_each_child_mut(&mut |slot| {
                if *slot == old && !found {
                    *slot = replacement;
                    found = true;
                }
            });
        }
        if !found {
            return None;
        }

        let span = self
            .get_extended(old)
            .and_then(|info| info.replaced_span)
            .unwrap_or(SourceSpan::new(old_node.pos, old_node.end));
        if let Some(info) = self.extended_info.get_mut(replacement.0 as usize) {
            info.parent = parent;
            info.replaced_span = Some(span);
        }
        if let Some(node) = self.get_mut(replacement) {
            if node.is_synthesized() {
                node.pos = span.start;
                node.end = span.end;
            }
        }

        if let Some(info) = self.extended_info.get_mut(old.0 as usize) {
            info.parent = NodeIndex::NONE;
        }
        if let Some(node) = self.get_mut(old) {
            node.flags |= node_flags::DETACHED;
        }

        self.mark_modified_from(parent);
        Some(replacement)
    }

    fn needs_parentheses_in_slot(&self, parent: NodeIndex, old: NodeIndex, new: NodeIndex) -> bool {
        let Some(new_node) = self.get(new) else {
            return false;
        };
        let parent_kind = self.kind(parent).unwrap_or(0);
        if parent_kind == syntax_kind_ext::EXPRESSION_STATEMENT {
            return matches!(
                new_node.kind,
                syntax_kind_ext::OBJECT_LITERAL_EXPRESSION
                    | syntax_kind_ext::FUNCTION_EXPRESSION
                    | syntax_kind_ext::CLASS_EXPRESSION
            );
        }
        if self.get(old).is_some_and(|n| n.is_statement()) {
            return false;
        }
        let old_precedence = expression_precedence(self, old);
        let new_precedence = expression_precedence(self, new);
        new_precedence < old_precedence
            && new_precedence < OperatorPrecedence::LeftHandSide
            && old_precedence > OperatorPrecedence::Comma
    }

    /// Insert `statement` into the statement list that contains `anchor`,
    /// immediately before the statement enclosing `anchor`. The inserted
    /// node records the anchor position as its (empty) replaced span.
    pub fn insert_statement_before(&mut self, anchor: NodeIndex, statement: NodeIndex) -> bool {
        let Some(target) = self.enclosing_statement(anchor) else {
            return false;
        };
        let container = self.get_parent(target);
        let Some(anchor_pos) = self.get(target).map(|n| n.pos) else {
            return false;
        };

        let inserted = match self.get_data_mut_at(container).and_then(|d| d.statements_mut()) {
            Some(list) => match list.nodes.iter().position(|&n| n == target) {
                Some(at) => {
                    list.nodes.insert(at, statement);
                    true
                }
                None => false,
            },
            None => false,
        };
        if !inserted {
            return false;
        }

        if let Some(node) = self.get_mut(statement) {
            if node.is_synthesized() {
                node.pos = anchor_pos;
                node.end = anchor_pos;
            }
            node.flags |= node_flags::INSERTED;
        }
        self.set_parent(statement, container);
        if let Some(info) = self.extended_info.get_mut(statement.0 as usize) {
            info.replaced_span = Some(SourceSpan::new(anchor_pos, anchor_pos));
        }
        self.mark_modified_from(container);
        true
    }

    /// Deep copy of the subtree at `index`. The copy keeps source spans and
    /// flags, so an unmodified original subtree still prints verbatim.
    pub fn clone_subtree(&mut self, index: NodeIndex) -> NodeIndex {
        self.clone_subtree_inner(index, 0)
    }

    fn clone_subtree_inner(&mut self, index: NodeIndex, depth: usize) -> NodeIndex {
        let Some(node) = self.get(index).copied() else {
            return NodeIndex::NONE;
        };
        if depth > MAX_TREE_WALK_DEPTH {
            return NodeIndex::NONE;
        }

        let clone = match self.get_data(&node).cloned() {
            None => self.add_token(node.kind, node.pos, node.end),
            Some(mut data) => {
                let mut children = Vec::new();
                data.for_each_child(&mut |child| children.push(child));
                let copies: Vec<NodeIndex> = children
                    .into_iter()
                    .map(|child| self.clone_subtree_inner(child, depth + 1))
                    .collect();
                let mut copies = copies.into_iter();
                data.for_each_child_mut(&mut |slot| {
                    if let Some(copy) = copies.next() {
                        *slot = copy;
                    }
                });
                self.add_with_data(node.kind, node.pos, node.end, data)
            }
        };

        if let Some(copy) = self.get_mut(clone) {
            copy.flags = node.flags & !(node_flags::DETACHED | node_flags::INSERTED);
        }
        clone
    }

    /// Set `MODIFIED` on `index` and all of its ancestors.
    pub fn mark_modified_from(&mut self, index: NodeIndex) {
        let mut current = index;
        let mut steps = 0;
        while current.is_some() && steps < MAX_TREE_WALK_DEPTH {
            match self.get_mut(current) {
                Some(node) => node.flags |= node_flags::MODIFIED,
                None => break,
            }
            current = self.get_parent(current);
            steps += 1;
        }
    }

    // =========================================================================
    // Unique identifiers
    // =========================================================================

    /// A fresh identifier name derived from `base`: `_base`, `_base2`,
    /// `_base3`, ... skipping every identifier that appears anywhere in the
    /// file containing `scope` and every name handed out earlier.
    pub fn generate_uid(&mut self, scope: NodeIndex, base: &str) -> String {
        let used = self.collect_identifier_names(self.get_root(scope));
        let base = sanitize_uid_base(base);

        let mut attempt = 1usize;
        let name = loop {
            let candidate = if attempt > 1 {
                format!("_{base}{attempt}")
            } else {
                format!("_{base}")
            };
            if attempt >= MAX_UID_ATTEMPTS
                || (!used.contains(candidate.as_str()) && !self.generated_uids.contains(&candidate))
            {
                break candidate;
            }
            attempt += 1;
        };
        self.generated_uids.insert(name.clone());
        name
    }

    /// Like `generate_uid`, returning a synthesized identifier node.
    pub fn generate_uid_identifier(&mut self, scope: NodeIndex, base: &str) -> NodeIndex {
        let name = self.generate_uid(scope, base);
        self.create_identifier(&name)
    }

    fn collect_identifier_names(&self, root: NodeIndex) -> FxHashSet<&str> {
        let mut names = FxHashSet::default();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let Some(node) = self.get(index) else {
                continue;
            };
            if let Some(ident) = self.get_identifier(node) {
                names.insert(ident.escaped_text.as_str());
            }
            if let Some(data) = self.get_data(node) {
                data.for_each_child(&mut |child| stack.push(child));
            }
        }
        names
    }
}

fn sanitize_uid_base(base: &str) -> String {
    let cleaned: String = base
        .chars()
        .filter(|&ch| ch == '$' || ch == '_' || ch.is_alphanumeric())
        .collect();
    let trimmed = cleaned.trim_start_matches('_');
    let trimmed = trimmed.trim_end_matches(|ch: char| ch.is_ascii_digit());
    if trimmed.is_empty() {
        "temp".to_string()
    } else {
        trimmed.to_string()
    }
}
