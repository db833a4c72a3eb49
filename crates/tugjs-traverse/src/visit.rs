// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The walker and the per-path visit protocol.
//!
//! # Visit states
//!
//! `visit` runs the enter hook, then either stops (skipped), walks the
//! children of each node an array replacement produced (no exit hook: the
//! original node is gone), or walks the node's children and runs the exit
//! hook. A stop raised anywhere below ends the walk at every level; no
//! further hooks run.
//!
//! # Mutation during iteration
//!
//! Child lists are walked by index and the index is re-derived after every
//! visit from the visited path's key, so insertions made by hooks (which
//! shift cached keys) are seen. Compaction of a list being walked is
//! deferred until its walk finishes, so keys stay stable meanwhile.

use tracing::{debug, trace};
use tugjs_ast::{Container, FieldShape, NodeId, PathKey, Slot};

use crate::arena::{PathId, TraversalContext};
use crate::error::{TraverseError, TraverseResult};
use crate::pass::{HookArgs, HookPhase, Pass};
use crate::path::NodePath;
use crate::scope::ScopeId;
use crate::session::Session;

/// Walk the children of `root` with `pass`.
///
/// `root` must be the file, the program, or a node with a cached path.
pub fn traverse<S>(
    session: &mut Session,
    root: NodeId,
    pass: &Pass<S>,
    state: &mut S,
) -> TraverseResult<()> {
    debug!(pass = %pass.name, %root, "traverse");
    if root == session.ast.file() {
        session.traverse_node(root, pass, None, state, None)?;
        return Ok(());
    }
    let path = if root == session.ast.program() {
        session.program_path()
    } else {
        session
            .path_for_node(root)
            .ok_or_else(|| TraverseError::missing_path(root.to_string()))?
    };
    session.traverse_path(path, pass, state)
}

impl Session {
    /// Visit the program itself, then everything below it.
    pub fn traverse_program<S>(&mut self, pass: &Pass<S>, state: &mut S) -> TraverseResult<()> {
        debug!(pass = %pass.name, "traverse program");
        let file = self.ast.file();
        let context = TraversalContext {
            scope: None,
            parent_path: None,
        };
        let path = self.get(
            None,
            Some(context),
            Container::Node(file),
            PathKey::Field("program"),
        );
        self.visit(path, pass, state)?;
        self.flush_flatten();
        Ok(())
    }

    /// Walk the children of the node at `path`.
    pub fn traverse_path<S>(
        &mut self,
        path: PathId,
        pass: &Pass<S>,
        state: &mut S,
    ) -> TraverseResult<()> {
        let node = match self.node(path) {
            Some(node) => node,
            None => return Ok(()),
        };
        let scope = self.scope(path);
        self.traverse_node(node, pass, scope, state, Some(path))?;
        self.flush_flatten();
        Ok(())
    }

    /// Walk every child slot of `node` in schema order.
    ///
    /// Returns true if a stop was raised.
    pub(crate) fn traverse_node<S>(
        &mut self,
        node: NodeId,
        pass: &Pass<S>,
        scope: Option<ScopeId>,
        state: &mut S,
        parent_path: Option<PathId>,
    ) -> TraverseResult<bool> {
        let context = TraversalContext { scope, parent_path };
        let kind = self.ast.kind(node);
        for spec in kind.fields() {
            let stopped = match spec.shape {
                FieldShape::Single => self.visit_single(
                    Container::Node(node),
                    PathKey::Field(spec.key),
                    context,
                    pass,
                    state,
                )?,
                FieldShape::List | FieldShape::Statements => {
                    self.visit_multiple(Container::List(node, spec.key), context, pass, state)?
                }
            };
            if stopped {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn visit_single<S>(
        &mut self,
        container: Container,
        key: PathKey,
        context: TraversalContext,
        pass: &Pass<S>,
        state: &mut S,
    ) -> TraverseResult<bool> {
        if self.ast.slot(container, key).is_empty() {
            return Ok(false);
        }
        let path = self.get(context.parent_path, Some(context), container, key);
        self.visit(path, pass, state)
    }

    fn visit_multiple<S>(
        &mut self,
        container: Container,
        context: TraversalContext,
        pass: &Pass<S>,
        state: &mut S,
    ) -> TraverseResult<bool> {
        if self.ast.container_len(container) == 0 {
            return Ok(false);
        }
        self.iterating.push(container);
        let result = self.visit_items(container, context, pass, state);
        self.iterating.pop();
        if !self.iterating.contains(&container) {
            self.flush_container(container);
        }
        result
    }

    fn visit_items<S>(
        &mut self,
        container: Container,
        context: TraversalContext,
        pass: &Pass<S>,
        state: &mut S,
    ) -> TraverseResult<bool> {
        let mut index = 0;
        while index < self.ast.container_len(container) {
            if self.ast.slot(container, PathKey::Index(index)).is_empty() {
                index += 1;
                continue;
            }
            let path = self.get(
                context.parent_path,
                Some(context),
                container,
                PathKey::Index(index),
            );
            if self.visit(path, pass, state)? {
                return Ok(true);
            }
            // the key moves when hooks insert before this path
            index = match self.key(path) {
                PathKey::Index(current) => current + 1,
                PathKey::Field(_) => index + 1,
            };
        }
        Ok(false)
    }

    /// Visit one path. Returns true if the walk must stop.
    pub fn visit<S>(&mut self, path: PathId, pass: &Pass<S>, state: &mut S) -> TraverseResult<bool> {
        let kind = match self.kind(path) {
            Some(kind) => kind,
            None => return Ok(false),
        };
        if pass.is_blacklisted(kind) {
            return Ok(false);
        }
        trace!(%path, %kind, "visit");

        self.call(path, pass, state, HookPhase::Enter)?;

        let record = self.paths.record(path);
        if record.should_skip {
            return Ok(record.should_stop);
        }

        let scope = self.scope(path);
        match self.slot(path) {
            Slot::Many(nodes) => {
                for node in nodes {
                    if self.traverse_node(node, pass, scope, state, Some(path))? {
                        return Ok(true);
                    }
                }
            }
            Slot::Node(node) => {
                if self.traverse_node(node, pass, scope, state, Some(path))? {
                    return Ok(true);
                }
                self.call(path, pass, state, HookPhase::Exit)?;
            }
            Slot::Empty => {}
        }
        Ok(self.paths.record(path).should_stop)
    }

    /// Run the hook for `phase` and apply its replacement.
    fn call<S>(
        &mut self,
        path: PathId,
        pass: &Pass<S>,
        state: &mut S,
        phase: HookPhase,
    ) -> TraverseResult<()> {
        let node = match self.node(path) {
            Some(node) => node,
            None => return Ok(()),
        };
        let hook = match pass.hook(self.ast.kind(node), phase) {
            Some(hook) => hook,
            None => return Ok(()),
        };
        let args = HookArgs {
            node,
            parent: self.parent(path),
            scope: self.scope(path),
        };
        let replacement = hook(&mut NodePath::new(self, path), args, state)?;
        if let Some(replacement) = replacement {
            self.replace_with(path, replacement)?;
        }
        Ok(())
    }
}
