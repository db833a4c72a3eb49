// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The pass-facing path handle.
//!
//! A [`NodePath`] pairs a mutable borrow of the [`Session`] with a
//! [`PathId`]. It is what hooks receive, and it forwards every operation to
//! the session so that hooks never juggle ids for the common cases.
//!
//! Lookups that yield a single path return a new handle borrowing this one;
//! lookups that yield several return ids, to be opened with
//! [`NodePath::at`].

use serde_json::Value;
use tugjs_ast::types;
use tugjs_ast::{Alias, Ast, Field, LiteralValue, NodeId, NodeKind, PathKey, Slot};

use crate::arena::{PathId, TypeInfo};
use crate::error::{TraverseError, TraverseResult};
use crate::infer::GenericOptions;
use crate::pass::{Pass, Replacement};
use crate::scope::{Binding, ScopeId};
use crate::session::Session;

/// A cursor over one slot of the tree.
pub struct NodePath<'s> {
    session: &'s mut Session,
    id: PathId,
}

impl std::fmt::Debug for NodePath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodePath")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("key", &self.key())
            .finish()
    }
}

impl<'s> NodePath<'s> {
    pub fn new(session: &'s mut Session, id: PathId) -> Self {
        NodePath { session, id }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        self.session
    }

    pub fn ast(&self) -> &Ast {
        self.session.ast()
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        self.session.ast_mut()
    }

    /// Open another path of the same session.
    pub fn at(&mut self, id: PathId) -> NodePath<'_> {
        NodePath::new(self.session, id)
    }

    // ------------------------------------------------------------------
    // Position
    // ------------------------------------------------------------------

    pub fn node(&self) -> Option<NodeId> {
        self.session.node(self.id)
    }

    pub fn slot(&self) -> Slot {
        self.session.slot(self.id)
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.session.kind(self.id)
    }

    pub fn parent(&self) -> NodeId {
        self.session.parent(self.id)
    }

    pub fn parent_path(&self) -> Option<PathId> {
        self.session.parent_path(self.id)
    }

    pub fn key(&self) -> PathKey {
        self.session.key(self.id)
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.session.scope(self.id)
    }

    /// Look `name` up from this path's scope outward.
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.session.get_binding(self.scope(), name)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// The path at a dotted key, e.g. `"body.0.expression"`.
    pub fn get(&mut self, key: &str) -> TraverseResult<NodePath<'_>> {
        let id = self.session.get_path(self.id, key)?;
        Ok(NodePath::new(self.session, id))
    }

    /// The paths of every element of list field `key`.
    pub fn get_list(&mut self, key: &str) -> TraverseResult<Vec<PathId>> {
        self.session.get_list(self.id, key)
    }

    /// The path at `index` in this path's list.
    pub fn get_sibling(&mut self, index: usize) -> TraverseResult<NodePath<'_>> {
        let id = self.session.get_sibling(self.id, index)?;
        Ok(NodePath::new(self.session, id))
    }

    /// True if field or attribute `key` of the node is set and truthy.
    pub fn has(&self, key: &str) -> bool {
        let node = match self.node() {
            Some(node) => self.ast().node(node),
            None => return false,
        };
        match key {
            "computed" => node.computed,
            "prefix" => node.prefix,
            "shadow" => node.shadow,
            "name" => node.name.as_deref().is_some_and(|name| !name.is_empty()),
            "operator" => node.operator.is_some(),
            "kind" => node.declaration_kind.is_some(),
            "value" => node.value.as_ref().is_some_and(is_truthy),
            _ => match node.field(key) {
                Some(Field::Single(slot)) => !slot.is_empty(),
                Some(Field::List(_)) => true,
                None => false,
            },
        }
    }

    /// Same as [`has`](NodePath::has).
    pub fn is(&self, key: &str) -> bool {
        self.has(key)
    }

    pub fn isnt(&self, key: &str) -> bool {
        !self.has(key)
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    /// True if the node is an identifier named `name`.
    pub fn is_identifier_named(&self, name: &str) -> bool {
        self.node()
            .map(|node| self.ast().node(node))
            .is_some_and(|node| node.kind == NodeKind::Identifier && node.name_is(name))
    }

    /// True if the node is a literal with `value`.
    pub fn is_literal_value(&self, value: &LiteralValue) -> bool {
        self.node()
            .map(|node| self.ast().node(node))
            .is_some_and(|node| node.kind == NodeKind::Literal && node.value.as_ref() == Some(value))
    }

    /// True if the node is of the kind or alias called `name`.
    pub fn is_type(&self, name: &str) -> bool {
        self.kind().is_some_and(|kind| types::is_type(kind, name))
    }

    pub fn is_scope(&self) -> bool {
        self.node()
            .is_some_and(|node| types::is_scope(self.ast(), node, Some(self.parent())))
    }

    pub fn is_referenced(&self) -> bool {
        self.node()
            .is_some_and(|node| types::is_referenced(self.ast(), node, self.parent()))
    }

    pub fn is_referenced_identifier(&self) -> bool {
        self.node()
            .is_some_and(|node| types::is_referenced_identifier(self.ast(), node, self.parent()))
    }

    pub fn is_block_scoped(&self) -> bool {
        self.node()
            .is_some_and(|node| types::is_block_scoped(self.ast(), node))
    }

    pub fn is_var(&self) -> bool {
        self.node().is_some_and(|node| types::is_var(self.ast(), node))
    }

    /// Names bound by the node, with their identifiers.
    pub fn get_binding_identifiers(&self) -> Vec<(String, NodeId)> {
        self.node()
            .map(|node| types::get_binding_identifiers(self.ast(), node))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------

    pub fn matches_pattern(&self, pattern: &str, allow_partial: bool) -> bool {
        self.session.matches_pattern(self.id, pattern, allow_partial)
    }

    /// The path of the value this path statically denotes.
    pub fn resolve(&mut self) -> Option<NodePath<'_>> {
        let id = self.session.resolve(self.id)?;
        Some(NodePath::new(self.session, id))
    }

    pub fn get_type_annotation(&mut self) -> TypeInfo {
        self.session.get_type_annotation(self.id)
    }

    pub fn infer_type(&mut self) -> Option<NodeId> {
        self.session.infer_type(self.id)
    }

    pub fn is_type_generic(&mut self, name: &str, options: GenericOptions) -> bool {
        self.session.is_type_generic(self.id, name, options)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Replace the node. See [`Session::replace_with`].
    pub fn replace_with(&mut self, replacement: impl Into<Replacement>) -> TraverseResult<()> {
        self.session.replace_with(self.id, replacement.into())
    }

    pub fn insert_before(&mut self, nodes: Vec<NodeId>) -> TraverseResult<Vec<PathId>> {
        self.session.insert_before(self.id, nodes)
    }

    pub fn insert_after(&mut self, nodes: Vec<NodeId>) -> TraverseResult<Vec<PathId>> {
        self.session.insert_after(self.id, nodes)
    }

    pub fn remove(&mut self) {
        self.session.remove(self.id)
    }

    pub fn flatten(&mut self) {
        self.session.flatten(self.id)
    }

    pub fn set_statements_to_expression(&mut self, nodes: &[NodeId]) -> TraverseResult<()> {
        self.session.set_statements_to_expression(self.id, nodes)
    }

    pub fn get_last_statements(&mut self) -> TraverseResult<Vec<PathId>> {
        self.session.get_last_statements(self.id)
    }

    /// Walk this path's children with `pass`.
    pub fn traverse<S>(&mut self, pass: &Pass<S>, state: &mut S) -> TraverseResult<()> {
        self.session.traverse_path(self.id, pass, state)
    }

    pub fn refresh(&mut self) {
        self.session.refresh(self.id)
    }

    // ------------------------------------------------------------------
    // Flags, data and errors
    // ------------------------------------------------------------------

    /// Do not descend into this node's children.
    pub fn skip(&mut self) {
        self.session.skip(self.id)
    }

    /// Skip this node and end the traversal.
    pub fn stop(&mut self) {
        self.session.stop(self.id)
    }

    pub fn should_skip(&self) -> bool {
        self.session.record(self.id).should_skip
    }

    pub fn should_stop(&self) -> bool {
        self.session.record(self.id).should_stop
    }

    pub fn set_data(&mut self, key: &str, value: Value) -> Value {
        self.session.set_data(self.id, key, value)
    }

    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.session.get_data(self.id, key)
    }

    pub fn get_data_or(&mut self, key: &str, default: Value) -> Value {
        self.session.get_data_or(self.id, key, default)
    }

    /// An error at this node's source position.
    pub fn error_with_node(&self, message: impl Into<String>) -> TraverseError {
        self.session.error_with_node(self.id, message)
    }
}

fn is_truthy(value: &LiteralValue) -> bool {
    match value {
        LiteralValue::String(s) => !s.is_empty(),
        LiteralValue::Number(n) => *n != 0.0 && !n.is_nan(),
        LiteralValue::Boolean(b) => *b,
        LiteralValue::Null => false,
        LiteralValue::RegExp { .. } => true,
    }
}

macro_rules! kind_predicates {
    ($($kind:ident),* $(,)?) => {
        paste::paste! {
            impl NodePath<'_> {
                $(
                    #[doc = concat!("True if the node is a `", stringify!($kind), "`.")]
                    pub fn [<is_ $kind:snake>](&self) -> bool {
                        self.kind() == Some(NodeKind::$kind)
                    }
                )*
            }
        }
    };
}

macro_rules! alias_predicates {
    ($($alias:ident),* $(,)?) => {
        paste::paste! {
            impl NodePath<'_> {
                $(
                    #[doc = concat!("True if the node belongs to the `", stringify!($alias), "` alias.")]
                    pub fn [<is_ $alias:snake>](&self) -> bool {
                        self.kind().is_some_and(|kind| kind.has_alias(Alias::$alias))
                    }
                )*
            }
        }
    };
}

tugjs_ast::with_node_kinds!(kind_predicates);
tugjs_ast::with_aliases!(alias_predicates);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tugjs_ast::DeclarationKind;

    fn session() -> Session {
        let mut ast = Ast::new();
        let x = ast.identifier("x");
        let zero = ast.literal(0);
        let declarator = ast.variable_declarator(x, Some(zero));
        let decl = ast.variable_declaration(DeclarationKind::Let, vec![declarator]);
        let object = ast.identifier("obj");
        let property = ast.identifier("k");
        let member = ast.member_expression(object, property, true);
        let stmt = ast.expression_statement(member);
        ast.push_statements(vec![decl, stmt]);
        Session::new(ast)
    }

    mod predicates {
        use super::*;

        #[test]
        fn generated_kind_and_alias_predicates() {
            let mut session = session();
            let program = session.program_path();
            let mut path = session.path(program);
            assert!(path.is_program());
            assert!(path.is_scopable());

            let decl = path.get("body.0").unwrap();
            assert!(decl.is_variable_declaration());
            assert!(decl.is_statement());
            assert!(decl.is_declaration());
            assert!(decl.is_block_scoped());
            assert!(!decl.is_var());
            assert!(!decl.is_expression());
            assert!(decl.is_type("Statement"));
        }

        #[test]
        fn identifier_and_literal_checks() {
            let mut session = session();
            let program = session.program_path();
            let mut path = session.path(program);

            let id = path.get("body.0.declarations.0.id").unwrap();
            assert!(id.is_identifier_named("x"));
            assert!(!id.is_identifier_named("y"));
            assert!(!id.is_referenced());

            let mut path = session.path(program);
            let init = path.get("body.0.declarations.0.init").unwrap();
            assert!(init.is_literal_value(&LiteralValue::Number(0.0)));
            assert!(init.isnt("value"));
        }

        #[test]
        fn computed_property_is_referenced() {
            let mut session = session();
            let program = session.program_path();
            let mut path = session.path(program);
            let member = path.get("body.1.expression").unwrap();
            assert!(member.has("computed"));
            assert!(member.is("object"));

            let mut path = session.path(program);
            let property = path.get("body.1.expression.property").unwrap();
            assert!(property.is_referenced_identifier());
        }
    }

    mod handles {
        use super::*;

        #[test]
        fn sibling_and_parent() {
            let mut session = session();
            let program = session.program_path();
            let mut path = session.path(program);
            let mut first = path.get("body.0").unwrap();
            assert_eq!(first.parent_path(), Some(program));
            let second = first.get_sibling(1).unwrap();
            assert!(second.is_expression_statement());
            assert_eq!(second.key(), PathKey::Index(1));
        }

        #[test]
        fn data_through_handle() {
            let mut session = session();
            let program = session.program_path();
            let mut path = session.path(program);
            assert_eq!(path.get_data_or("count", json!(1)), json!(1));
            path.set_data("count", json!(2));
            assert_eq!(path.get_data("count"), Some(&json!(2)));
        }

        #[test]
        fn stop_implies_skip() {
            let mut session = session();
            let program = session.program_path();
            let mut path = session.path(program);
            path.stop();
            assert!(path.should_skip());
            assert!(path.should_stop());
        }

        #[test]
        fn binding_lookup() {
            let mut session = session();
            let program = session.program_path();
            let path = session.path(program);
            assert!(path.binding("x").is_some());
            assert!(path.binding("obj").is_none());
        }
    }
}
