// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Path-based traversal and mutation of tugjs syntax trees.
//!
//! A [`Session`] owns a tree and the state attached to it while passes run
//! over it. Each slot of the tree that has been reached gets exactly one
//! path ([`PathId`]); the path remembers where its slot is, the scope
//! around it, traversal flags and pass data, and keeps denoting the same
//! node while siblings are inserted and removed around it.
//!
//! Passes are [`Pass`] values whose hooks receive a [`NodePath`]:
//!
//! ```
//! use tugjs_ast::{Ast, NodeKind};
//! use tugjs_traverse::{HookArgs, NodePath, Pass, Replacement, Session, TraverseResult};
//!
//! fn rename(path: &mut NodePath<'_>, _: HookArgs, renamed: &mut usize) -> TraverseResult<Option<Replacement>> {
//!     if path.is_identifier_named("a") {
//!         *renamed += 1;
//!         let b = path.ast_mut().identifier("b");
//!         return Ok(Some(Replacement::Node(b)));
//!     }
//!     Ok(None)
//! }
//!
//! let mut ast = Ast::new();
//! let a = ast.identifier("a");
//! let stmt = ast.expression_statement(a);
//! ast.push_statements(vec![stmt]);
//!
//! let mut session = Session::new(ast);
//! let pass = Pass::new("rename").on_enter(NodeKind::Identifier, rename);
//! let mut renamed = 0;
//! session.traverse_program(&pass, &mut renamed).unwrap();
//!
//! let expr = session.ast().child(stmt, "expression").unwrap();
//! assert!(session.ast().node(expr).name_is("b"));
//! assert_eq!(renamed, 1);
//! ```

pub mod arena;
mod coercion;
pub mod error;
pub mod infer;
mod insertion;
mod mutation;
pub mod options;
pub mod pass;
pub mod path;
mod pattern;
mod resolve;
pub mod scope;
pub mod session;
pub mod validator;
pub mod visit;

pub use arena::{PathArena, PathId, PathRecord, TraversalContext, TypeInfo};
pub use error::{TraverseError, TraverseResult};
pub use infer::GenericOptions;
pub use options::SessionOptions;
pub use pass::{Hook, HookArgs, HookPhase, KindHooks, Pass, PassMetadata, Replacement};
pub use path::NodePath;
pub use scope::{Binding, BindingKind, ScopeId, ScopeKind, ScopeRecord, ScopeTree};
pub use session::Session;
pub use validator::{NodeValidator, SchemaValidator};
pub use visit::traverse;
