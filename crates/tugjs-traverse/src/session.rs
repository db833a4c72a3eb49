// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The traversal session and the path identity cache.
//!
//! A [`Session`] owns one tree together with every piece of state the path
//! engine attaches to it: path records, scopes, the validator and the
//! bookkeeping for deferred flattening. All path operations are methods on
//! the session taking a [`PathId`]; [`NodePath`] wraps them for passes.

use serde_json::Value;
use tracing::trace;
use tugjs_ast::types;
use tugjs_ast::{Ast, Container, Field, NodeId, NodeKind, PathKey, Slot};
use tugjs_core::Position;

use crate::arena::{PathArena, PathId, PathRecord, TraversalContext};
use crate::error::{TraverseError, TraverseResult};
use crate::options::SessionOptions;
use crate::path::NodePath;
use crate::scope::{ScopeId, ScopeTree};
use crate::validator::{NodeValidator, SchemaValidator};

/// One tree plus the path engine state attached to it.
pub struct Session {
    pub(crate) ast: Ast,
    pub(crate) paths: PathArena,
    pub(crate) scopes: ScopeTree,
    pub(crate) validator: Option<Box<dyn NodeValidator>>,
    /// List containers the walker is currently iterating, innermost last.
    pub(crate) iterating: Vec<Container>,
    /// Containers whose flatten was deferred until iteration finishes.
    pub(crate) pending_flatten: Vec<Container>,
    pub(crate) options: SessionOptions,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("nodes", &self.ast.len())
            .field("paths", &self.paths.len())
            .field("scopes", &self.scopes.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Session {
    /// A session with default options and the schema validator installed.
    pub fn new(ast: Ast) -> Self {
        Session::with_options(ast, SessionOptions::default())
    }

    pub fn with_options(ast: Ast, options: SessionOptions) -> Self {
        let validator: Option<Box<dyn NodeValidator>> = if options.validate_replacements {
            Some(Box::new(SchemaValidator))
        } else {
            None
        };
        Session {
            ast,
            paths: PathArena::new(),
            scopes: ScopeTree::new(),
            validator,
            iterating: Vec::new(),
            pending_flatten: Vec::new(),
            options,
        }
    }

    /// Replace the validator. `None` disables validation.
    pub fn set_validator(&mut self, validator: Option<Box<dyn NodeValidator>>) {
        self.validator = validator;
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Give back the tree, dropping all path state.
    pub fn into_ast(self) -> Ast {
        self.ast
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn paths(&self) -> &PathArena {
        &self.paths
    }

    pub fn record(&self, path: PathId) -> &PathRecord {
        self.paths.record(path)
    }

    /// A pass-facing handle for `path`.
    pub fn path(&mut self, path: PathId) -> NodePath<'_> {
        NodePath::new(self, path)
    }

    // ------------------------------------------------------------------
    // Identity cache
    // ------------------------------------------------------------------

    /// The unique path for the slot at `key` in `container`.
    ///
    /// Reuses the cached path whose slot currently holds the same node, or
    /// for an empty slot the cached path at the same key. The path's
    /// parent, key, context and scope are refreshed either way.
    pub fn get(
        &mut self,
        parent_path: Option<PathId>,
        context: Option<TraversalContext>,
        container: Container,
        key: PathKey,
    ) -> PathId {
        let target = self.ast.slot(container, key);
        let existing = self.paths.table(container).into_iter().find(|id| {
            let record = self.paths.record(*id);
            match &target {
                Slot::Node(node) => self.ast.slot(container, record.key).node() == Some(*node),
                _ => record.key == key,
            }
        });

        let path = match existing {
            Some(path) => path,
            None => {
                let path = self.paths.alloc(container, key);
                trace!(%path, %container, %key, "new path");
                path
            }
        };
        self.set_context(path, parent_path, context, key);
        path
    }

    /// Refresh a path's position and traversal state.
    ///
    /// Skip/stop flags are reset only when a walker context is supplied, so
    /// flags set by a pass survive lookups made through `get`.
    pub(crate) fn set_context(
        &mut self,
        path: PathId,
        parent_path: Option<PathId>,
        context: Option<TraversalContext>,
        key: PathKey,
    ) {
        let record = self.paths.record_mut(path);
        if context.is_some() {
            record.should_skip = false;
            record.should_stop = false;
            record.context = context;
        }
        if parent_path.is_some() {
            record.parent_path = parent_path;
        }
        record.key = key;
        record.detached = false;
        self.set_scope(path);
        let kind = self.node(path).map(|node| self.ast.kind(node));
        self.paths.record_mut(path).kind = kind;
    }

    /// Recompute the scope of `path`, creating one if its node opens a scope.
    pub(crate) fn set_scope(&mut self, path: PathId) {
        let record = self.paths.record(path);
        let enclosing = match record.parent_path {
            Some(parent) => self.paths.record(parent).scope,
            None => record.context.and_then(|ctx| ctx.scope),
        };
        let container = record.container;
        let cached = record.scope;

        let scope = match self.node(path) {
            Some(node) if types::is_scope(&self.ast, node, Some(container.owner())) => {
                self.scope_for(path, node, enclosing, cached)
            }
            _ => enclosing,
        };
        self.paths.record_mut(path).scope = scope;
    }

    // ------------------------------------------------------------------
    // Read-through accessors
    // ------------------------------------------------------------------

    /// The current contents of the path's slot.
    pub fn slot(&self, path: PathId) -> Slot {
        let record = self.paths.record(path);
        if record.detached {
            return Slot::Empty;
        }
        self.ast.slot(record.container, record.key)
    }

    /// The node in the path's slot, if it holds exactly one.
    pub fn node(&self, path: PathId) -> Option<NodeId> {
        self.slot(path).node()
    }

    pub fn kind(&self, path: PathId) -> Option<NodeKind> {
        self.node(path).map(|node| self.ast.kind(node))
    }

    /// The node owning the path's container.
    pub fn parent(&self, path: PathId) -> NodeId {
        self.paths.record(path).container.owner()
    }

    pub fn parent_path(&self, path: PathId) -> Option<PathId> {
        self.paths.record(path).parent_path
    }

    pub fn key(&self, path: PathId) -> PathKey {
        self.paths.record(path).key
    }

    pub fn container(&self, path: PathId) -> Container {
        self.paths.record(path).container
    }

    pub fn scope(&self, path: PathId) -> Option<ScopeId> {
        self.paths.record(path).scope
    }

    pub(crate) fn position(&self, path: PathId) -> Option<Position> {
        self.node(path)
            .and_then(|node| self.ast.node(node).loc)
            .map(|loc| loc.start)
    }

    // ------------------------------------------------------------------
    // Path lookup
    // ------------------------------------------------------------------

    /// The path of the `program` slot of the root `File` node.
    pub fn program_path(&mut self) -> PathId {
        let file = self.ast.file();
        self.get(None, None, Container::Node(file), PathKey::Field("program"))
    }

    /// A live cached path whose slot holds `node`.
    pub fn path_for_node(&self, node: NodeId) -> Option<PathId> {
        self.paths
            .live()
            .find(|path| self.node(*path) == Some(node))
    }

    /// The path of single-slot field `key` of this path's node.
    pub fn get_child(&mut self, path: PathId, key: &str) -> TraverseResult<PathId> {
        let node = self
            .node(path)
            .ok_or_else(|| TraverseError::missing_path(key))?;
        match self.ast.node(node).field(key) {
            Some(Field::Single(_)) => {}
            _ => return Err(TraverseError::missing_path(key)),
        }
        let key = Ast::static_key(self.ast.kind(node), key)
            .ok_or_else(|| TraverseError::missing_path(key))?;
        Ok(self.get(Some(path), None, Container::Node(node), PathKey::Field(key)))
    }

    /// The paths of every slot of list field `key` of this path's node.
    pub fn get_list(&mut self, path: PathId, key: &str) -> TraverseResult<Vec<PathId>> {
        let node = self
            .node(path)
            .ok_or_else(|| TraverseError::missing_path(key))?;
        let key = match self.ast.node(node).field(key) {
            Some(Field::List(_)) => Ast::static_key(self.ast.kind(node), key)
                .ok_or_else(|| TraverseError::missing_path(key))?,
            _ => return Err(TraverseError::missing_path(key)),
        };
        let container = Container::List(node, key);
        let len = self.ast.container_len(container);
        Ok((0..len)
            .map(|index| self.get(Some(path), None, container, PathKey::Index(index)))
            .collect())
    }

    /// Follow a dotted key such as `"body.0.expression"`.
    ///
    /// Each segment names a single-slot field, or a list field followed by
    /// a numeric index segment.
    pub fn get_path(&mut self, path: PathId, dotted: &str) -> TraverseResult<PathId> {
        let mut current = path;
        let mut segments = dotted.split('.');
        while let Some(segment) = segments.next() {
            let node = self
                .node(current)
                .ok_or_else(|| TraverseError::missing_path(dotted))?;
            let is_list = match self.ast.node(node).field(segment) {
                Some(Field::Single(_)) => false,
                Some(Field::List(_)) => true,
                None => return Err(TraverseError::missing_path(dotted)),
            };
            if !is_list {
                current = self.get_child(current, segment)?;
                continue;
            }
            let index = segments
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or_else(|| TraverseError::missing_path(dotted))?;
            let key = Ast::static_key(self.ast.kind(node), segment)
                .ok_or_else(|| TraverseError::missing_path(dotted))?;
            let container = Container::List(node, key);
            if index >= self.ast.container_len(container) {
                return Err(TraverseError::missing_path(dotted));
            }
            current = self.get(Some(current), None, container, PathKey::Index(index));
        }
        Ok(current)
    }

    /// The path at `index` in the same list container.
    pub fn get_sibling(&mut self, path: PathId, index: usize) -> TraverseResult<PathId> {
        let record = self.paths.record(path);
        let container = record.container;
        if !container.is_list() {
            return Err(TraverseError::missing_path(index.to_string()));
        }
        let parent = record.parent_path;
        Ok(self.get(parent, None, container, PathKey::Index(index)))
    }

    /// The nearest path, starting at `path`, whose container is a list.
    pub fn parent_list_path(&self, path: PathId) -> Option<PathId> {
        let mut current = Some(path);
        while let Some(id) = current {
            if self.paths.record(id).container.is_list() {
                return Some(id);
            }
            current = self.paths.record(id).parent_path;
        }
        None
    }

    // ------------------------------------------------------------------
    // Flags, data and errors
    // ------------------------------------------------------------------

    pub fn skip(&mut self, path: PathId) {
        self.paths.record_mut(path).should_skip = true;
    }

    /// Skip this node and stop visiting anything else in the traversal.
    pub fn stop(&mut self, path: PathId) {
        let record = self.paths.record_mut(path);
        record.should_stop = true;
        record.should_skip = true;
    }

    pub fn set_data(&mut self, path: PathId, key: &str, value: Value) -> Value {
        self.paths
            .record_mut(path)
            .data
            .insert(key.to_string(), value.clone());
        value
    }

    pub fn get_data(&self, path: PathId, key: &str) -> Option<&Value> {
        self.paths.record(path).data.get(key)
    }

    /// The value stored at `key`, storing `default` first if absent or null.
    pub fn get_data_or(&mut self, path: PathId, key: &str, default: Value) -> Value {
        let data = &mut self.paths.record_mut(path).data;
        match data.get(key) {
            Some(value) if !value.is_null() => value.clone(),
            _ => {
                data.insert(key.to_string(), default.clone());
                default
            }
        }
    }

    /// Re-derive the cached kind and drop cached analysis results.
    pub fn refresh(&mut self, path: PathId) {
        let kind = self.kind(path);
        let record = self.paths.record_mut(path);
        record.kind = kind;
        record.type_info = None;
    }

    /// An error pointing at the path's node.
    pub fn error_with_node(&self, path: PathId, message: impl Into<String>) -> TraverseError {
        TraverseError::structural(message, self.position(path))
    }
}
