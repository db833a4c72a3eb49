// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! ESTree-shaped JSON rendering of a subtree.
//!
//! Used for golden comparisons in tests and for debugging. Source locations
//! and comments are not rendered.

use serde_json::{json, Map, Value};

use crate::ast::Ast;
use crate::kinds::NodeKind;
use crate::node::{Field, LiteralValue, NodeId, Slot};

/// Render the subtree rooted at `node`.
pub fn to_json(ast: &Ast, node: NodeId) -> Value {
    let n = ast.node(node);
    let mut out = Map::new();
    out.insert("type".to_string(), json!(n.kind.as_str()));

    if let Some(name) = &n.name {
        out.insert("name".to_string(), json!(name));
    }
    if let Some(value) = &n.value {
        out.insert("value".to_string(), literal_to_json(value));
    }
    if let Some(operator) = &n.operator {
        out.insert("operator".to_string(), json!(operator));
    }
    if let Some(kind) = n.declaration_kind {
        out.insert("kind".to_string(), json!(kind.as_str()));
    }
    match n.kind {
        NodeKind::MemberExpression | NodeKind::Property => {
            out.insert("computed".to_string(), json!(n.computed));
        }
        NodeKind::UpdateExpression => {
            out.insert("prefix".to_string(), json!(n.prefix));
        }
        _ => {}
    }

    for (key, field) in &n.fields {
        let value = match field {
            Field::Single(slot) => slot_to_json(ast, slot),
            Field::List(slots) => Value::Array(slots.iter().map(|s| slot_to_json(ast, s)).collect()),
        };
        out.insert((*key).to_string(), value);
    }
    Value::Object(out)
}

/// Render the whole program.
pub fn program_to_json(ast: &Ast) -> Value {
    to_json(ast, ast.program())
}

/// Render only the program body, one entry per statement.
pub fn body_to_json(ast: &Ast) -> Value {
    let program = ast.program();
    match ast.list(program, "body") {
        Some(slots) => Value::Array(slots.iter().map(|s| slot_to_json(ast, s)).collect()),
        None => Value::Array(Vec::new()),
    }
}

fn slot_to_json(ast: &Ast, slot: &Slot) -> Value {
    match slot {
        Slot::Empty => Value::Null,
        Slot::Node(id) => to_json(ast, *id),
        Slot::Many(ids) => Value::Array(ids.iter().map(|id| to_json(ast, *id)).collect()),
    }
}

fn literal_to_json(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.0e15 => {
            json!(*n as i64)
        }
        LiteralValue::RegExp { pattern, flags } => json!({ "pattern": pattern, "flags": flags }),
        other => serde_json::to_value(other).unwrap_or(Value::Null),
    }
}
