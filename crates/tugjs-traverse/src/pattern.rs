// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Dotted member pattern matching.

use std::collections::VecDeque;

use tugjs_ast::{NodeId, NodeKind};

use crate::arena::PathId;
use crate::session::Session;

impl Session {
    /// True if the member expression at `path` spells `pattern`.
    ///
    /// `"React.createClass"` matches both `React.createClass` and
    /// `React["createClass"]`. With `allow_partial` the pattern may be a
    /// prefix of the chain. A computed non-literal property never matches.
    ///
    /// Each member is expanded in place at the front of the worklist, so
    /// the chain is read left to right and lines up with the dotted parts.
    pub fn matches_pattern(&self, path: PathId, pattern: &str, allow_partial: bool) -> bool {
        let root = match self.node(path) {
            Some(node) if self.ast.kind(node) == NodeKind::MemberExpression => node,
            _ => return false,
        };
        let parts: Vec<&str> = pattern.split('.').collect();

        let mut search: VecDeque<NodeId> = VecDeque::from([root]);
        let mut matched = 0;
        while let Some(id) = search.pop_front() {
            if allow_partial && matched == parts.len() {
                return true;
            }
            let node = self.ast.node(id);
            let part = match parts.get(matched) {
                Some(part) => *part,
                None => return false,
            };
            match node.kind {
                NodeKind::Identifier => {
                    if !node.name_is(part) {
                        return false;
                    }
                }
                NodeKind::Literal => {
                    if node.value.as_ref().and_then(|value| value.as_str()) != Some(part) {
                        return false;
                    }
                }
                NodeKind::MemberExpression => {
                    let property = node.child("property");
                    let literal_property =
                        property.is_some_and(|p| self.ast.kind(p) == NodeKind::Literal);
                    if node.computed && !literal_property {
                        return false;
                    }
                    let (object, property) = match (node.child("object"), property) {
                        (Some(object), Some(property)) => (object, property),
                        _ => return false,
                    };
                    search.push_front(property);
                    search.push_front(object);
                    continue;
                }
                _ => return false,
            }
            matched += 1;
        }
        matched == parts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugjs_ast::Ast;

    fn member(build: impl FnOnce(&mut Ast) -> NodeId) -> (Session, PathId) {
        let mut ast = Ast::new();
        let expr = build(&mut ast);
        let stmt = ast.expression_statement(expr);
        ast.push_statements(vec![stmt]);
        let mut session = Session::new(ast);
        let program = session.program_path();
        let path = session.get_path(program, "body.0.expression").unwrap();
        (session, path)
    }

    #[test]
    fn static_and_literal_properties_match() {
        let (session, path) = member(|ast| ast.member_chain("React.createClass"));
        assert!(session.matches_pattern(path, "React.createClass", false));

        let (session, path) = member(|ast| {
            let object = ast.identifier("React");
            let property = ast.literal("createClass");
            ast.member_expression(object, property, true)
        });
        assert!(session.matches_pattern(path, "React.createClass", false));
    }

    #[test]
    fn wrong_names_do_not_match() {
        let (session, path) = member(|ast| ast.member_chain("Foo.createClass"));
        assert!(!session.matches_pattern(path, "React.createClass", false));
        assert!(!session.matches_pattern(path, "Foo.other", false));
    }

    #[test]
    fn dynamic_property_never_matches() {
        let (session, path) = member(|ast| {
            let object = ast.identifier("React");
            let property = ast.identifier("createClass");
            ast.member_expression(object, property, true)
        });
        assert!(!session.matches_pattern(path, "React.createClass", false));
    }

    #[test]
    fn deep_chains_are_read_in_order() {
        let (session, path) = member(|ast| ast.member_chain("a.b.c.d"));
        assert!(session.matches_pattern(path, "a.b.c.d", false));
        assert!(!session.matches_pattern(path, "a.b.d.c", false));
    }

    #[test]
    fn length_must_agree_unless_partial() {
        let (session, path) = member(|ast| ast.member_chain("a.b.c"));
        assert!(!session.matches_pattern(path, "a.b", false));
        assert!(session.matches_pattern(path, "a.b", true));
        assert!(!session.matches_pattern(path, "a.b.c.d", false));
        assert!(!session.matches_pattern(path, "a.b.c.d", true));
    }

    #[test]
    fn non_member_never_matches() {
        let (session, path) = member(|ast| ast.identifier("React"));
        assert!(!session.matches_pattern(path, "React", false));
    }
}
