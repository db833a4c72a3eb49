// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Static value resolution.
//!
//! `resolve` follows a path to the path of the value it statically denotes:
//! through declarator initializers, constant bindings and member accesses
//! on object literals. Anything it cannot see through gives `None`.

use std::collections::HashSet;

use tracing::trace;
use tugjs_ast::types;
use tugjs_ast::{LiteralValue, NodeKind};

use crate::arena::PathId;
use crate::session::Session;

impl Session {
    /// The path of the value `path` statically denotes, if known.
    ///
    /// Non-constant bindings, dynamic keys and objects that are not
    /// literals give `None`, as do cycles and chains longer than the
    /// session's resolve depth limit.
    pub fn resolve(&mut self, path: PathId) -> Option<PathId> {
        let mut seen = HashSet::new();
        self.resolve_step(path, &mut seen, 0)
    }

    fn resolve_step(&mut self, path: PathId, seen: &mut HashSet<PathId>, depth: usize) -> Option<PathId> {
        if depth > self.options.resolve_depth_limit || !seen.insert(path) {
            trace!(%path, depth, "resolve gave up");
            return None;
        }
        let node = self.node(path)?;
        match self.ast.kind(node) {
            NodeKind::VariableDeclarator => {
                let id = self.get_child(path, "id").ok()?;
                if self.kind(id) != Some(NodeKind::Identifier) {
                    // destructuring declarators are not followed
                    return None;
                }
                let init = self.get_child(path, "init").ok()?;
                self.resolve_step(init, seen, depth + 1)
            }
            NodeKind::Identifier => {
                let name = self.ast.node(node).name.clone()?;
                let binding = self.get_binding(self.scope(path), &name)?;
                if !binding.constant {
                    return None;
                }
                let definition = binding.path;
                if definition == path {
                    return Some(path);
                }
                self.resolve_step(definition, seen, depth + 1)
            }
            NodeKind::MemberExpression => {
                let key = types::to_computed_key(&self.ast, node)?;
                let object = self.get_child(path, "object").ok()?;
                let target = self.resolve_step(object, seen, depth + 1)?;
                if self.kind(target) != Some(NodeKind::ObjectExpression) {
                    return None;
                }
                self.find_property(target, &key)
            }
            _ => Some(path),
        }
    }

    /// The value path of the property of the object literal at `object`
    /// whose static key equals `key`.
    fn find_property(&mut self, object: PathId, key: &LiteralValue) -> Option<PathId> {
        let wanted = key.as_key();
        for property in self.get_list(object, "properties").ok()? {
            let node = match self.node(property) {
                Some(node) if self.ast.kind(node) == NodeKind::Property => node,
                _ => continue,
            };
            let computed = self.ast.node(node).computed;
            let key_node = match self.ast.child(node, "key") {
                Some(key_node) => self.ast.node(key_node),
                None => continue,
            };
            // `{foo: v}` matches by name, `{"foo": v}` and `{["foo"]: v}` by value
            let matches = match key_node.kind {
                NodeKind::Identifier => !computed && key_node.name_is(&wanted),
                NodeKind::Literal => key_node.value.as_ref() == Some(key),
                _ => false,
            };
            if matches {
                return self.get_child(property, "value").ok();
            }
        }
        None
    }
}
