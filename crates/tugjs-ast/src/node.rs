// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node and container shapes.
//!
//! Nodes live in the [`Ast`](crate::Ast) arena and refer to their children
//! by [`NodeId`]. A node's children are stored as named fields following the
//! kind's schema; each field is either a single slot or an ordered list of
//! slots. A slot is the unit a path points at.

use std::fmt;

use serde::{Deserialize, Serialize};
use tugjs_core::SourceLocation;

use crate::kinds::{FieldShape, NodeKind};

/// Arena index of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The arena index as `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The contents of one child slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Slot {
    /// No node. Either an absent optional child or a removed one.
    #[default]
    Empty,
    /// A single node.
    Node(NodeId),
    /// Several nodes written into one slot, awaiting a flatten.
    Many(Vec<NodeId>),
}

impl Slot {
    /// The node held by this slot, if it holds exactly one.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Slot::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// All nodes held by this slot.
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            Slot::Empty => Vec::new(),
            Slot::Node(id) => vec![*id],
            Slot::Many(ids) => ids.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Slot::Many(_))
    }
}

impl From<NodeId> for Slot {
    fn from(id: NodeId) -> Self {
        Slot::Node(id)
    }
}

impl From<Option<NodeId>> for Slot {
    fn from(id: Option<NodeId>) -> Self {
        match id {
            Some(id) => Slot::Node(id),
            None => Slot::Empty,
        }
    }
}

/// A named child field of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Single(Slot),
    List(Vec<Slot>),
}

/// Value of a `Literal` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    RegExp { pattern: String, flags: String },
}

impl LiteralValue {
    /// The value as a property key, the way `obj[value]` would see it.
    pub fn as_key(&self) -> String {
        match self {
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Number(n) => format_number(*n),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Null => "null".to_string(),
            LiteralValue::RegExp { pattern, flags } => format!("/{}/{}", pattern, flags),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Number(n)
    }
}

impl From<i32> for LiteralValue {
    fn from(n: i32) -> Self {
        LiteralValue::Number(f64::from(n))
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Boolean(b)
    }
}

/// Binding keyword of a `VariableDeclaration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentKind {
    Line,
    Block,
}

/// A source comment attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub value: String,
}

impl Comment {
    pub fn line(value: impl Into<String>) -> Self {
        Comment {
            kind: CommentKind::Line,
            value: value.into(),
        }
    }

    pub fn block(value: impl Into<String>) -> Self {
        Comment {
            kind: CommentKind::Block,
            value: value.into(),
        }
    }
}

/// One syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Child fields in schema order.
    pub fields: Vec<(&'static str, Field)>,
    /// Identifier name.
    pub name: Option<String>,
    /// Literal value.
    pub value: Option<LiteralValue>,
    /// Operator of unary, update, binary, logical and assignment expressions.
    pub operator: Option<String>,
    pub declaration_kind: Option<DeclarationKind>,
    /// Computed member access or property key (`a[b]`, `{[k]: v}`).
    pub computed: bool,
    /// Prefix update/unary operator.
    pub prefix: bool,
    /// Synthetic closure introduced by statement-to-expression coercion.
    pub shadow: bool,
    pub loc: Option<SourceLocation>,
    pub leading_comments: Vec<Comment>,
    pub trailing_comments: Vec<Comment>,
}

impl Node {
    /// A node of `kind` with every field empty.
    pub fn new(kind: NodeKind) -> Self {
        let fields = kind
            .fields()
            .iter()
            .map(|spec| {
                let field = match spec.shape {
                    FieldShape::Single => Field::Single(Slot::Empty),
                    FieldShape::List | FieldShape::Statements => Field::List(Vec::new()),
                };
                (spec.key, field)
            })
            .collect();
        Node {
            kind,
            fields,
            name: None,
            value: None,
            operator: None,
            declaration_kind: None,
            computed: false,
            prefix: false,
            shadow: false,
            loc: None,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, field)| field)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|(name, _)| *name == key)
            .map(|(_, field)| field)
    }

    /// The node in single-slot field `key`, if any.
    pub fn child(&self, key: &str) -> Option<NodeId> {
        match self.field(key) {
            Some(Field::Single(slot)) => slot.node(),
            _ => None,
        }
    }

    /// The nodes in list field `key` (empty and `Many` slots expanded).
    pub fn children(&self, key: &str) -> Vec<NodeId> {
        match self.field(key) {
            Some(Field::List(slots)) => slots.iter().flat_map(Slot::nodes).collect(),
            Some(Field::Single(slot)) => slot.nodes(),
            None => Vec::new(),
        }
    }

    /// Every direct child in schema order.
    pub fn all_children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for (_, field) in &self.fields {
            match field {
                Field::Single(slot) => out.extend(slot.nodes()),
                Field::List(slots) => out.extend(slots.iter().flat_map(Slot::nodes)),
            }
        }
        out
    }

    pub fn name_is(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// The owner of a group of sibling slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Container {
    /// The single-slot fields of a node, keyed by field name.
    Node(NodeId),
    /// One list field of a node, keyed by index.
    List(NodeId, &'static str),
}

impl Container {
    /// The node owning this container.
    pub fn owner(&self) -> NodeId {
        match self {
            Container::Node(id) | Container::List(id, _) => *id,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Container::List(..))
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Node(id) => write!(f, "{}", id),
            Container::List(id, key) => write!(f, "{}.{}", id, key),
        }
    }
}

/// Position of a slot within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKey {
    Field(&'static str),
    Index(usize),
}

impl PathKey {
    pub fn index(&self) -> Option<usize> {
        match self {
            PathKey::Index(i) => Some(*i),
            PathKey::Field(_) => None,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            PathKey::Field(name) => Some(name),
            PathKey::Index(_) => None,
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Field(name) => write!(f, "{}", name),
            PathKey::Index(i) => write!(f, "{}", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_follows_schema() {
        let node = Node::new(NodeKind::CallExpression);
        assert_eq!(node.fields.len(), 2);
        assert_eq!(node.field("callee"), Some(&Field::Single(Slot::Empty)));
        assert_eq!(node.field("arguments"), Some(&Field::List(Vec::new())));
        assert!(node.field("body").is_none());
    }

    #[test]
    fn children_expand_many_and_skip_empty() {
        let mut node = Node::new(NodeKind::BlockStatement);
        *node.field_mut("body").unwrap() = Field::List(vec![
            Slot::Node(NodeId(1)),
            Slot::Empty,
            Slot::Many(vec![NodeId(2), NodeId(3)]),
        ]);
        assert_eq!(node.children("body"), vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(node.all_children(), vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn literal_keys() {
        assert_eq!(LiteralValue::from("foo").as_key(), "foo");
        assert_eq!(LiteralValue::from(1).as_key(), "1");
        assert_eq!(LiteralValue::from(1.5).as_key(), "1.5");
        assert_eq!(LiteralValue::from(true).as_key(), "true");
    }

    #[test]
    fn container_owner() {
        assert_eq!(Container::Node(NodeId(4)).owner(), NodeId(4));
        let list = Container::List(NodeId(7), "body");
        assert_eq!(list.owner(), NodeId(7));
        assert!(list.is_list());
        assert_eq!(list.to_string(), "#7.body");
    }
}
