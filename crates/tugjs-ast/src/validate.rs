// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Shallow structural validation of a single node.
//!
//! Checks that a node fits its kind's field schema. Only the node itself and
//! the kinds of its direct children are examined; descendants are checked
//! when they are themselves inserted.

use thiserror::Error;

use crate::ast::Ast;
use crate::kinds::{FieldShape, NodeKind};
use crate::node::{Field, NodeId, Slot};

/// A schema violation found in a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required single-slot field is empty.
    #[error("{kind} is missing required field `{field}`")]
    MissingField { kind: NodeKind, field: &'static str },

    /// A statement list holds a non-statement.
    #[error("{kind}.{field} must only contain statements, found {found}")]
    NonStatementInList {
        kind: NodeKind,
        field: &'static str,
        found: NodeKind,
    },

    /// A single-slot field still holds several nodes.
    #[error("{kind}.{field} holds {count} nodes in a single slot")]
    UnflattenedSlot {
        kind: NodeKind,
        field: &'static str,
        count: usize,
    },

    /// A field the schema does not declare, or one with the wrong shape.
    #[error("{kind}.{field} does not match the {kind} schema")]
    SchemaMismatch { kind: NodeKind, field: &'static str },
}

/// Check `node` against its kind's field schema.
pub fn check_structure(ast: &Ast, node: NodeId) -> Result<(), ValidationError> {
    let n = ast.node(node);
    let kind = n.kind;

    for spec in kind.fields() {
        let field = n.field(spec.key).ok_or(ValidationError::SchemaMismatch {
            kind,
            field: spec.key,
        })?;
        match (spec.shape, field) {
            (FieldShape::Single, Field::Single(slot)) => match slot {
                Slot::Empty if spec.required => {
                    return Err(ValidationError::MissingField {
                        kind,
                        field: spec.key,
                    });
                }
                Slot::Many(ids) => {
                    return Err(ValidationError::UnflattenedSlot {
                        kind,
                        field: spec.key,
                        count: ids.len(),
                    });
                }
                _ => {}
            },
            (FieldShape::Statements, Field::List(slots)) => {
                for id in slots.iter().flat_map(Slot::nodes) {
                    let found = ast.kind(id);
                    if !found.is_statement() {
                        return Err(ValidationError::NonStatementInList {
                            kind,
                            field: spec.key,
                            found,
                        });
                    }
                }
            }
            (FieldShape::List, Field::List(_)) => {}
            _ => {
                return Err(ValidationError::SchemaMismatch {
                    kind,
                    field: spec.key,
                })
            }
        }
    }
    Ok(())
}
