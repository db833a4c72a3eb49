// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! JavaScript syntax tree model for tugjs.
//!
//! The tree is an arena ([`Ast`]) of [`Node`]s addressed by [`NodeId`].
//! Every node kind is declared once in [`kinds`], which also records the
//! kind's aliases and its ordered child fields. [`types`] holds the pure
//! classification helpers the traversal engine builds on.
//!
//! ```
//! use tugjs_ast::{Ast, NodeKind};
//!
//! let mut ast = Ast::new();
//! let callee = ast.identifier("f");
//! let call = ast.call_expression(callee, vec![]);
//! let stmt = ast.expression_statement(call);
//! ast.push_statements(vec![stmt]);
//!
//! assert_eq!(ast.kind(call), NodeKind::CallExpression);
//! ```

pub mod ast;
mod builders;
pub mod dump;
pub mod kinds;
pub mod node;
pub mod types;
pub mod validate;

pub use ast::Ast;
pub use kinds::{Alias, FieldShape, FieldSpec, NodeKind};
pub use node::{
    Comment, CommentKind, Container, DeclarationKind, Field, LiteralValue, Node, NodeId, PathKey,
    Slot,
};
pub use validate::{check_structure, ValidationError};
