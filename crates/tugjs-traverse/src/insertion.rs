// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Sibling insertion.
//!
//! Insertion happens around the nearest path, starting at the given one,
//! that lives in a list. Cached paths at or after the insertion point have
//! their keys shifted before the list is spliced, so every live path keeps
//! denoting the same node.

use tracing::debug;
use tugjs_ast::{Container, NodeId, PathKey, Slot};

use crate::arena::PathId;
use crate::error::{TraverseError, TraverseResult};
use crate::session::Session;

impl Session {
    /// Insert `nodes` after the nearest list-resident path.
    ///
    /// Around a statement the nodes are spliced in directly. Around an
    /// expression one placeholder slot is inserted and filled with the
    /// nodes coerced into a single expression. Returns the new paths.
    pub fn insert_after(&mut self, path: PathId, nodes: Vec<NodeId>) -> TraverseResult<Vec<PathId>> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }
        let (target, container, index) = self.insertion_point(path)?;
        if self.is_statement_path(target) {
            return self.splice(target, container, index + 1, nodes);
        }

        let at = index + 1;
        self.paths.shift_keys(container, at, 1);
        self.insert_slots(container, at, vec![Slot::Empty])?;
        debug!(%target, %container, at, "inserted expression placeholder");
        let placeholder = self.get_sibling(target, at)?;
        self.set_statements_to_expression(placeholder, &nodes)?;
        Ok(vec![placeholder])
    }

    /// Insert `nodes` before the nearest list-resident path.
    ///
    /// Only statements can be inserted before; an expression in a list
    /// gives [`TraverseError::Unsupported`].
    pub fn insert_before(&mut self, path: PathId, nodes: Vec<NodeId>) -> TraverseResult<Vec<PathId>> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }
        let (target, container, index) = self.insertion_point(path)?;
        if !self.is_statement_path(target) {
            return Err(TraverseError::Unsupported {
                operation: "insert_before",
                reason: format!(
                    "cannot insert before an expression in {}; restructure the parent instead",
                    container
                ),
            });
        }
        self.splice(target, container, index, nodes)
    }

    fn insertion_point(&self, path: PathId) -> TraverseResult<(PathId, Container, usize)> {
        let target = self
            .parent_list_path(path)
            .ok_or_else(|| self.error_with_node(path, "no block context to insert into"))?;
        let container = self.container(target);
        match self.key(target) {
            PathKey::Index(index) => Ok((target, container, index)),
            PathKey::Field(_) => Err(self.error_with_node(target, "list path without an index")),
        }
    }

    fn is_statement_path(&self, path: PathId) -> bool {
        self.kind(path).is_some_and(|kind| kind.is_statement())
    }

    fn splice(
        &mut self,
        target: PathId,
        container: Container,
        at: usize,
        nodes: Vec<NodeId>,
    ) -> TraverseResult<Vec<PathId>> {
        let count = nodes.len();
        let shifted = self.paths.shift_keys(container, at, count);
        self.insert_slots(container, at, nodes.into_iter().map(Slot::Node).collect())?;
        debug!(%target, %container, at, count, shifted, "inserted siblings");
        (at..at + count)
            .map(|index| self.get_sibling(target, index))
            .collect()
    }

    fn insert_slots(&mut self, container: Container, at: usize, slots: Vec<Slot>) -> TraverseResult<()> {
        let list = match container {
            Container::List(owner, field) => self.ast.list_mut(owner, field),
            Container::Node(_) => None,
        };
        match list {
            Some(list) if at <= list.len() => {
                for (offset, slot) in slots.into_iter().enumerate() {
                    list.insert(at + offset, slot);
                }
                Ok(())
            }
            _ => Err(TraverseError::structural(
                format!("cannot insert at {} in {}", at, container),
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugjs_ast::{Ast, NodeKind};

    fn session_with_statements(names: &[&str]) -> Session {
        let mut ast = Ast::new();
        let stmts: Vec<_> = names
            .iter()
            .map(|name| {
                let id = ast.identifier(name);
                ast.expression_statement(id)
            })
            .collect();
        ast.push_statements(stmts);
        Session::new(ast)
    }

    fn statement(session: &mut Session, name: &str) -> NodeId {
        let id = session.ast_mut().identifier(name);
        session.ast_mut().expression_statement(id)
    }

    fn body_names(session: &Session) -> Vec<String> {
        let ast = session.ast();
        ast.children(ast.program(), "body")
            .iter()
            .map(|stmt| {
                let expr = ast.child(*stmt, "expression").unwrap_or(*stmt);
                ast.node(expr).name.clone().unwrap_or_default()
            })
            .collect()
    }

    mod statements {
        use super::*;

        #[test]
        fn insert_before_shifts_current_and_later_paths() {
            let mut session = session_with_statements(&["a", "b"]);
            let program = session.program_path();
            let paths = session.get_list(program, "body").unwrap();
            let x = statement(&mut session, "x");

            let inserted = session.insert_before(paths[1], vec![x]).unwrap();
            assert_eq!(body_names(&session), vec!["a", "x", "b"]);
            assert_eq!(session.key(paths[0]), PathKey::Index(0));
            assert_eq!(session.key(inserted[0]), PathKey::Index(1));
            assert_eq!(session.key(paths[1]), PathKey::Index(2));
        }

        #[test]
        fn insert_after_from_nested_expression_uses_statement() {
            let mut session = session_with_statements(&["a", "b"]);
            let program = session.program_path();
            let expr = session.get_path(program, "body.0.expression").unwrap();
            let x = statement(&mut session, "x");

            session.insert_after(expr, vec![x]).unwrap();
            assert_eq!(body_names(&session), vec!["a", "x", "b"]);
        }

        #[test]
        fn nothing_to_insert() {
            let mut session = session_with_statements(&["a"]);
            let program = session.program_path();
            let first = session.get_path(program, "body.0").unwrap();
            assert!(session.insert_after(first, Vec::new()).unwrap().is_empty());
            assert_eq!(body_names(&session), vec!["a"]);
        }

        #[test]
        fn program_has_no_list_to_insert_into() {
            let mut session = session_with_statements(&["a"]);
            let program = session.program_path();
            let x = statement(&mut session, "x");
            let err = session.insert_after(program, vec![x]).unwrap_err();
            assert!(matches!(err, TraverseError::Structural { .. }));
        }
    }

    mod expressions {
        use super::*;

        fn call_session() -> (Session, NodeId) {
            let mut ast = Ast::new();
            let f = ast.identifier("f");
            let a = ast.identifier("a");
            let b = ast.identifier("b");
            let call = ast.call_expression(f, vec![a, b]);
            let stmt = ast.expression_statement(call);
            ast.push_statements(vec![stmt]);
            (Session::new(ast), call)
        }

        #[test]
        fn insert_after_expression_coerces_into_placeholder() {
            let (mut session, call) = call_session();
            let program = session.program_path();
            let args = session.get_path(program, "body.0.expression").unwrap();
            let args = session.get_list(args, "arguments").unwrap();
            let x = statement(&mut session, "x");
            let y = statement(&mut session, "y");

            let inserted = session.insert_after(args[0], vec![x, y]).unwrap();
            let arguments = session.ast().children(call, "arguments");
            assert_eq!(arguments.len(), 3);
            assert_eq!(session.ast().kind(arguments[1]), NodeKind::SequenceExpression);
            assert_eq!(session.key(inserted[0]), PathKey::Index(1));
            assert_eq!(session.key(args[1]), PathKey::Index(2));
        }

        #[test]
        fn insert_before_expression_is_unsupported() {
            let (mut session, call) = call_session();
            let program = session.program_path();
            let args = session.get_path(program, "body.0.expression").unwrap();
            let args = session.get_list(args, "arguments").unwrap();
            let x = statement(&mut session, "x");

            let err = session.insert_before(args[1], vec![x]).unwrap_err();
            assert!(
                matches!(err, TraverseError::Unsupported { operation: "insert_before", .. }),
                "{err}"
            );
            assert_eq!(session.ast().children(call, "arguments").len(), 2);
        }
    }
}
