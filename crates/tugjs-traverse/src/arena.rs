// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Path records and the per-container side tables.
//!
//! A path is a record in the [`PathArena`], addressed by [`PathId`]. The
//! record stores where its slot is (`container`, `key`), never the node
//! itself: the node is always read through the [`Ast`](tugjs_ast::Ast).
//!
//! Every container that has been visited owns a side table listing the
//! paths created for its slots. The identity cache in
//! [`Session::get`](crate::Session::get) scans that table, and the key
//! shifting done by insertion and flatten walks it.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tugjs_ast::{Container, NodeId, NodeKind, PathKey};

use crate::scope::ScopeId;

/// Handle to a path record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub u32);

impl PathId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// The traversal state a path was last visited under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalContext {
    /// Scope the walker was in when it reached the path's container.
    pub scope: Option<ScopeId>,
    /// Path of the node whose children are being walked.
    pub parent_path: Option<PathId>,
}

/// Cached result of type inference for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    /// True when the annotation was inferred rather than written.
    pub inferred: bool,
    /// The annotation node, unwrapped from any `TypeAnnotation` wrapper.
    pub annotation: Option<NodeId>,
}

/// State attached to one slot.
#[derive(Debug, Clone)]
pub struct PathRecord {
    pub parent_path: Option<PathId>,
    pub container: Container,
    pub key: PathKey,
    pub scope: Option<ScopeId>,
    pub context: Option<TraversalContext>,
    pub should_skip: bool,
    pub should_stop: bool,
    pub data: HashMap<String, Value>,
    pub type_info: Option<TypeInfo>,
    /// Kind of the node last seen in the slot.
    pub kind: Option<NodeKind>,
    /// The slot was removed and compacted away.
    pub detached: bool,
}

impl PathRecord {
    fn new(container: Container, key: PathKey) -> Self {
        PathRecord {
            parent_path: None,
            container,
            key,
            scope: None,
            context: None,
            should_skip: false,
            should_stop: false,
            data: HashMap::new(),
            type_info: None,
            kind: None,
            detached: false,
        }
    }
}

/// Storage for every path created during a session.
#[derive(Debug, Default)]
pub struct PathArena {
    records: Vec<PathRecord>,
    tables: HashMap<Container, Vec<PathId>>,
}

impl PathArena {
    pub fn new() -> Self {
        PathArena::default()
    }

    /// Create a record and register it in its container's table.
    pub fn alloc(&mut self, container: Container, key: PathKey) -> PathId {
        let id = PathId(self.records.len() as u32);
        self.records.push(PathRecord::new(container, key));
        self.tables.entry(container).or_default().push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: PathId) -> &PathRecord {
        &self.records[id.index()]
    }

    pub fn record_mut(&mut self, id: PathId) -> &mut PathRecord {
        &mut self.records[id.index()]
    }

    /// Live paths created for `container`, in creation order.
    pub fn table(&self, container: Container) -> Vec<PathId> {
        self.tables
            .get(&container)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| !self.record(*id).detached)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Add `delta` to the index of every live path in `container` whose
    /// index is at or after `from`.
    pub fn shift_keys(&mut self, container: Container, from: usize, delta: usize) -> usize {
        let mut shifted = 0;
        for id in self.table(container) {
            let record = self.record_mut(id);
            if let PathKey::Index(index) = record.key {
                if index >= from {
                    record.key = PathKey::Index(index + delta);
                    shifted += 1;
                }
            }
        }
        shifted
    }

    /// All live path ids.
    pub fn live(&self) -> impl Iterator<Item = PathId> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.detached)
            .map(|(index, _)| PathId(index as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Container {
        Container::List(NodeId(1), "body")
    }

    #[test]
    fn alloc_registers_in_table() {
        let mut arena = PathArena::new();
        let a = arena.alloc(body(), PathKey::Index(0));
        let b = arena.alloc(body(), PathKey::Index(1));
        let other = arena.alloc(Container::Node(NodeId(0)), PathKey::Field("program"));
        assert_eq!(arena.table(body()), vec![a, b]);
        assert_eq!(arena.table(Container::Node(NodeId(0))), vec![other]);
        assert!(arena.table(Container::Node(NodeId(9))).is_empty());
    }

    #[test]
    fn shift_keys_moves_paths_at_and_after_point() {
        let mut arena = PathArena::new();
        let ids: Vec<_> = (0..3)
            .map(|i| arena.alloc(body(), PathKey::Index(i)))
            .collect();
        assert_eq!(arena.shift_keys(body(), 1, 2), 2);
        assert_eq!(arena.record(ids[0]).key, PathKey::Index(0));
        assert_eq!(arena.record(ids[1]).key, PathKey::Index(3));
        assert_eq!(arena.record(ids[2]).key, PathKey::Index(4));
    }

    #[test]
    fn detached_paths_leave_table() {
        let mut arena = PathArena::new();
        let a = arena.alloc(body(), PathKey::Index(0));
        arena.record_mut(a).detached = true;
        assert!(arena.table(body()).is_empty());
        assert_eq!(arena.live().count(), 0);
    }
}
