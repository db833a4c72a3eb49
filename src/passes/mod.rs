// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The catalogue of transformation passes.
//!
//! Each entry pairs a pass constructor with a cheap `check` that tells the
//! pipeline whether the tree contains anything for the pass to do.

use std::fmt;

use tugjs_ast::{Ast, NodeId};
use tugjs_traverse::{Pass, PassMetadata};

pub mod do_expressions;

/// A registered pass.
#[derive(Clone, Copy)]
pub struct PassEntry {
    pub name: &'static str,
    pub metadata: PassMetadata,
    /// True if the tree under the given root has work for the pass.
    pub check: fn(&Ast, NodeId) -> bool,
    pub build: fn() -> Pass<()>,
}

impl fmt::Debug for PassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassEntry")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .finish()
    }
}

static CATALOGUE: &[PassEntry] = &[PassEntry {
    name: do_expressions::NAME,
    metadata: do_expressions::METADATA,
    check: do_expressions::check,
    build: do_expressions::pass,
}];

/// Every registered pass, in default run order.
pub fn catalogue() -> &'static [PassEntry] {
    CATALOGUE
}

/// Look up a pass by name.
pub fn find(name: &str) -> Option<&'static PassEntry> {
    CATALOGUE.iter().find(|entry| entry.name == name)
}
