// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Replacement, removal and container compaction.
//!
//! A replacement is written straight into the path's slot. Several nodes
//! written into one list slot are kept as a [`Slot::Many`] until the list
//! is flattened; several nodes written into a single statement-or-block
//! slot are wrapped in a block. Removal leaves [`Slot::Empty`] behind.
//!
//! Flattening drops empty slots, splices `Many` slots into the list and
//! renumbers the cached paths of the list. It is deferred while the walker
//! is iterating the list, because the walker addresses the list by index.

use tracing::{debug, trace};
use tugjs_ast::types::{self, STATEMENT_OR_BLOCK_KEYS};
use tugjs_ast::{Container, NodeId, PathKey, Slot};
use tugjs_core::Position;

use crate::arena::PathId;
use crate::error::{TraverseError, TraverseResult};
use crate::pass::Replacement;
use crate::session::Session;

impl Session {
    /// Write `replacement` into the slot of `path`.
    ///
    /// An empty replacement removes the node. A statement written where an
    /// expression was is coerced with
    /// [`set_statements_to_expression`](Session::set_statements_to_expression).
    pub fn replace_with(&mut self, path: PathId, replacement: Replacement) -> TraverseResult<()> {
        let nodes = replacement.into_nodes();
        if nodes.is_empty() {
            self.remove(path);
            return Ok(());
        }

        let record = self.paths.record(path);
        if record.detached {
            return Err(TraverseError::structural(
                format!("path {} was removed and cannot be replaced", path),
                None,
            ));
        }
        let container = record.container;
        let key = record.key;
        let previous_kind = record.kind;
        let old = self.node(path);

        if let ([single], Some(old)) = (nodes.as_slice(), old) {
            if *single == old {
                trace!(%path, "replacement is the current node");
                return Ok(());
            }
        }

        let first = nodes[0];
        if let Some(old) = old {
            types::inherits_comments(&mut self.ast, first, old);
        }

        let first_kind = self.ast.kind(first);
        if first_kind.is_statement() && previous_kind.is_some_and(|kind| kind.is_expression()) {
            return self.set_statements_to_expression(path, &nodes);
        }

        let multiple = nodes.len() > 1;
        if multiple {
            if let PathKey::Field(field) = key {
                if !STATEMENT_OR_BLOCK_KEYS.contains(&field) {
                    return Err(self.error_with_node(
                        path,
                        format!("cannot put {} nodes in the `{}` slot", nodes.len(), field),
                    ));
                }
            }
        }

        // a rejected replacement leaves the slot and the path untouched
        let fallback = old
            .and_then(|old| self.ast.node(old).loc)
            .map(|loc| loc.start);
        self.validate_replacement(path, &nodes, fallback)?;

        let slot = if multiple {
            Slot::Many(nodes.clone())
        } else {
            Slot::Node(first)
        };
        if !self.ast.set_slot(container, key, slot) {
            return Err(self.error_with_node(path, format!("no slot at `{}` in {}", key, container)));
        }
        debug!(%path, %container, %key, count = nodes.len(), "replaced node");

        let record = self.paths.record_mut(path);
        record.kind = if multiple { None } else { Some(first_kind) };
        record.type_info = None;
        self.set_scope(path);

        if multiple {
            if let (Container::Node(owner), PathKey::Field(field)) = (container, key) {
                types::ensure_block(&mut self.ast, owner, field);
                self.refresh(path);
                self.set_scope(path);
            }
            self.flatten_container(container);
        }
        Ok(())
    }

    fn validate_replacement(
        &self,
        path: PathId,
        nodes: &[NodeId],
        fallback: Option<Position>,
    ) -> TraverseResult<()> {
        let validator = match &self.validator {
            Some(validator) => validator,
            None => return Ok(()),
        };
        let scope = self.scope(path).map(|scope| self.scopes.get(scope));
        for &node in nodes {
            validator
                .check_node(&self.ast, node, scope)
                .map_err(|err| TraverseError::Validation {
                    message: err.to_string(),
                    location: self
                        .ast
                        .node(node)
                        .loc
                        .map(|loc| loc.start)
                        .or(fallback),
                })?;
        }
        Ok(())
    }

    /// Empty the slot of `path` and flatten its container.
    pub fn remove(&mut self, path: PathId) {
        let record = self.paths.record(path);
        if record.detached {
            return;
        }
        let container = record.container;
        let key = record.key;
        self.ast.set_slot(container, key, Slot::Empty);
        let record = self.paths.record_mut(path);
        record.kind = None;
        record.type_info = None;
        debug!(%path, %container, %key, "removed node");
        self.flatten_container(container);
    }

    /// Flatten the container holding `path`.
    pub fn flatten(&mut self, path: PathId) {
        let container = self.container(path);
        self.flatten_container(container);
    }

    /// Compact a list container now, or once the walker has left it.
    pub fn flatten_container(&mut self, container: Container) {
        if !container.is_list() {
            return;
        }
        if self.iterating.contains(&container) {
            if !self.pending_flatten.contains(&container) {
                trace!(%container, "flatten deferred");
                self.pending_flatten.push(container);
            }
            return;
        }
        self.compact(container);
    }

    /// Run a deferred flatten of `container`, if one is pending.
    pub(crate) fn flush_container(&mut self, container: Container) {
        if let Some(index) = self.pending_flatten.iter().position(|c| *c == container) {
            self.pending_flatten.remove(index);
            self.compact(container);
        }
    }

    /// Run every deferred flatten whose container is no longer iterated.
    pub(crate) fn flush_flatten(&mut self) {
        let ready: Vec<Container> = self
            .pending_flatten
            .iter()
            .copied()
            .filter(|container| !self.iterating.contains(container))
            .collect();
        for container in ready {
            self.flush_container(container);
        }
    }

    fn compact(&mut self, container: Container) {
        let (owner, field) = match container {
            Container::List(owner, field) => (owner, field),
            Container::Node(_) => return,
        };
        let slots = match self.ast.list(owner, field) {
            Some(slots) => slots.clone(),
            None => return,
        };
        if slots.iter().all(|slot| matches!(slot, Slot::Node(_))) {
            return;
        }

        // new index of each old slot; a Many slot maps to its first node
        let mut positions = Vec::with_capacity(slots.len());
        let mut flat = Vec::with_capacity(slots.len());
        for slot in &slots {
            match slot {
                Slot::Empty => positions.push(None),
                Slot::Node(id) => {
                    positions.push(Some(flat.len()));
                    flat.push(*id);
                }
                Slot::Many(ids) => {
                    positions.push((!ids.is_empty()).then_some(flat.len()));
                    flat.extend(ids.iter().copied());
                }
            }
        }

        let mut moved = 0;
        let mut detached = 0;
        for path in self.paths.table(container) {
            let old = match self.paths.record(path).key {
                PathKey::Index(index) => index,
                PathKey::Field(_) => continue,
            };
            match positions.get(old).copied().flatten() {
                Some(new) => {
                    let kind = self.ast.kind(flat[new]);
                    let record = self.paths.record_mut(path);
                    if new != old {
                        moved += 1;
                    }
                    record.key = PathKey::Index(new);
                    record.kind = Some(kind);
                }
                None => {
                    let record = self.paths.record_mut(path);
                    record.detached = true;
                    record.kind = None;
                    detached += 1;
                }
            }
        }

        debug!(
            %container,
            before = slots.len(),
            after = flat.len(),
            moved,
            detached,
            "flattened container"
        );
        self.ast.set_children(owner, field, flat);
    }
}
