// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pass descriptors.
//!
//! A [`Pass`] bundles the hooks a transformation runs during a traversal.
//! Hooks are looked up per node kind first; a kind without its own hook
//! falls back to the pass-wide `enter`/`exit`.
//!
//! ```
//! use tugjs_ast::NodeKind;
//! use tugjs_traverse::{HookArgs, NodePath, Pass, Replacement, TraverseResult};
//!
//! fn count(_: &mut NodePath<'_>, _: HookArgs, n: &mut usize) -> TraverseResult<Option<Replacement>> {
//!     *n += 1;
//!     Ok(None)
//! }
//!
//! let pass = Pass::new("count-identifiers").on_enter(NodeKind::Identifier, count);
//! assert!(pass.hook(NodeKind::Identifier, tugjs_traverse::HookPhase::Enter).is_some());
//! assert!(pass.hook(NodeKind::Literal, tugjs_traverse::HookPhase::Enter).is_none());
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tugjs_ast::{NodeId, NodeKind};

use crate::error::TraverseResult;
use crate::path::NodePath;
use crate::scope::ScopeId;

/// What a hook asks the walker to write into the visited slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    Node(NodeId),
    /// Several nodes. One node is the same as [`Replacement::Node`]; none is
    /// a removal.
    Nodes(Vec<NodeId>),
    Remove,
}

impl Replacement {
    /// The replacement as a flat list of nodes.
    pub fn into_nodes(self) -> Vec<NodeId> {
        match self {
            Replacement::Node(id) => vec![id],
            Replacement::Nodes(ids) => ids,
            Replacement::Remove => Vec::new(),
        }
    }
}

impl From<NodeId> for Replacement {
    fn from(id: NodeId) -> Self {
        Replacement::Node(id)
    }
}

impl From<Vec<NodeId>> for Replacement {
    fn from(ids: Vec<NodeId>) -> Self {
        Replacement::Nodes(ids)
    }
}

/// Arguments passed to every hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookArgs {
    /// The visited node.
    pub node: NodeId,
    /// The node owning the visited slot.
    pub parent: NodeId,
    /// Scope of the visited path.
    pub scope: Option<ScopeId>,
}

/// A pass callback.
pub type Hook<S> = fn(&mut NodePath<'_>, HookArgs, &mut S) -> TraverseResult<Option<Replacement>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Enter,
    Exit,
}

/// Hooks registered for one node kind.
pub struct KindHooks<S> {
    pub enter: Option<Hook<S>>,
    pub exit: Option<Hook<S>>,
}

impl<S> Default for KindHooks<S> {
    fn default() -> Self {
        KindHooks {
            enter: None,
            exit: None,
        }
    }
}

/// Descriptive flags carried by a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassMetadata {
    /// The pass implements a language proposal.
    pub experimental: bool,
    /// The pass only runs when explicitly requested.
    pub optional: bool,
}

/// A transformation pass.
pub struct Pass<S> {
    pub name: String,
    pub enter: Option<Hook<S>>,
    pub exit: Option<Hook<S>>,
    pub kinds: HashMap<NodeKind, KindHooks<S>>,
    /// Kinds the walker does not visit at all.
    pub blacklist: Vec<NodeKind>,
    pub metadata: PassMetadata,
}

impl<S> fmt::Debug for Pass<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.kinds.keys().map(NodeKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("Pass")
            .field("name", &self.name)
            .field("enter", &self.enter.is_some())
            .field("exit", &self.exit.is_some())
            .field("kinds", &kinds)
            .field("blacklist", &self.blacklist)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl<S> Pass<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Pass {
            name: name.into(),
            enter: None,
            exit: None,
            kinds: HashMap::new(),
            blacklist: Vec::new(),
            metadata: PassMetadata::default(),
        }
    }

    /// Set the pass-wide enter hook.
    pub fn enter(mut self, hook: Hook<S>) -> Self {
        self.enter = Some(hook);
        self
    }

    /// Set the pass-wide exit hook.
    pub fn exit(mut self, hook: Hook<S>) -> Self {
        self.exit = Some(hook);
        self
    }

    pub fn on_enter(mut self, kind: NodeKind, hook: Hook<S>) -> Self {
        self.kinds.entry(kind).or_default().enter = Some(hook);
        self
    }

    pub fn on_exit(mut self, kind: NodeKind, hook: Hook<S>) -> Self {
        self.kinds.entry(kind).or_default().exit = Some(hook);
        self
    }

    pub fn blacklist(mut self, kind: NodeKind) -> Self {
        self.blacklist.push(kind);
        self
    }

    pub fn with_metadata(mut self, metadata: PassMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_blacklisted(&self, kind: NodeKind) -> bool {
        self.blacklist.contains(&kind)
    }

    /// The hook to run for `kind`: the kind's own hook, else the pass-wide one.
    pub fn hook(&self, kind: NodeKind, phase: HookPhase) -> Option<Hook<S>> {
        let own = self.kinds.get(&kind).and_then(|hooks| match phase {
            HookPhase::Enter => hooks.enter,
            HookPhase::Exit => hooks.exit,
        });
        own.or(match phase {
            HookPhase::Enter => self.enter,
            HookPhase::Exit => self.exit,
        })
    }
}
