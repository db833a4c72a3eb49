// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The node arena.

use crate::kinds::NodeKind;
use crate::node::{Container, Field, Node, NodeId, PathKey, Slot};

/// An arena holding every node of one syntax tree.
///
/// Nodes are never freed: a removed node simply stops being reachable from
/// the root. The root is a synthetic `File` node whose `program` slot holds
/// the `Program`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    file: NodeId,
}

impl Default for Ast {
    fn default() -> Self {
        Ast::new()
    }
}

impl Ast {
    /// A tree holding an empty program.
    pub fn new() -> Self {
        let mut ast = Ast {
            nodes: Vec::new(),
            file: NodeId(0),
        };
        let file = ast.alloc(Node::new(NodeKind::File));
        let program = ast.alloc(Node::new(NodeKind::Program));
        ast.set_child(file, "program", Some(program));
        ast.file = file;
        ast
    }

    /// Add a node to the arena.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of allocated nodes (reachable or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn file(&self) -> NodeId {
        self.file
    }

    pub fn program(&self) -> NodeId {
        self.node(self.file).child("program").unwrap_or(self.file)
    }

    /// Resolve a field name to the `'static` key declared by `kind`'s schema.
    pub fn static_key(kind: NodeKind, key: &str) -> Option<&'static str> {
        kind.field(key).map(|spec| spec.key)
    }

    // ------------------------------------------------------------------
    // Slot access by (container, key)
    // ------------------------------------------------------------------

    /// The slot at `key` within `container`. Missing slots read as empty.
    pub fn slot(&self, container: Container, key: PathKey) -> Slot {
        match (container, key) {
            (Container::Node(owner), PathKey::Field(name)) => match self.node(owner).field(name) {
                Some(Field::Single(slot)) => slot.clone(),
                _ => Slot::Empty,
            },
            (Container::List(owner, name), PathKey::Index(index)) => self
                .list(owner, name)
                .and_then(|slots| slots.get(index).cloned())
                .unwrap_or(Slot::Empty),
            _ => Slot::Empty,
        }
    }

    /// Overwrite the slot at `key` within `container`.
    ///
    /// Returns false if the container has no such slot.
    pub fn set_slot(&mut self, container: Container, key: PathKey, slot: Slot) -> bool {
        match (container, key) {
            (Container::Node(owner), PathKey::Field(name)) => {
                match self.node_mut(owner).field_mut(name) {
                    Some(Field::Single(current)) => {
                        *current = slot;
                        true
                    }
                    _ => false,
                }
            }
            (Container::List(owner, name), PathKey::Index(index)) => {
                match self.list_mut(owner, name).and_then(|slots| slots.get_mut(index)) {
                    Some(current) => {
                        *current = slot;
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// Number of slots in a container: the list length, or the number of
    /// single-slot fields.
    pub fn container_len(&self, container: Container) -> usize {
        match container {
            Container::Node(owner) => self
                .node(owner)
                .fields
                .iter()
                .filter(|(_, field)| matches!(field, Field::Single(_)))
                .count(),
            Container::List(owner, name) => self.list(owner, name).map_or(0, Vec::len),
        }
    }

    pub fn list(&self, owner: NodeId, key: &str) -> Option<&Vec<Slot>> {
        match self.node(owner).field(key) {
            Some(Field::List(slots)) => Some(slots),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, owner: NodeId, key: &str) -> Option<&mut Vec<Slot>> {
        match self.node_mut(owner).field_mut(key) {
            Some(Field::List(slots)) => Some(slots),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Child access by field name
    // ------------------------------------------------------------------

    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.node(id).child(key)
    }

    pub fn children(&self, id: NodeId, key: &str) -> Vec<NodeId> {
        self.node(id).children(key)
    }

    /// Set a single-slot field. Unknown fields are ignored.
    pub fn set_child(&mut self, id: NodeId, key: &str, child: Option<NodeId>) {
        if let Some(Field::Single(slot)) = self.node_mut(id).field_mut(key) {
            *slot = Slot::from(child);
        }
    }

    /// Replace a list field. Unknown fields are ignored.
    pub fn set_children(&mut self, id: NodeId, key: &str, children: Vec<NodeId>) {
        if let Some(Field::List(slots)) = self.node_mut(id).field_mut(key) {
            *slots = children.into_iter().map(Slot::Node).collect();
        }
    }

    /// Every node reachable from `root`, in pre-order, including `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut children = self.node(id).all_children();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Deep-copy the subtree at `id`, returning the new root.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let mut node = self.node(id).clone();
        for index in 0..node.fields.len() {
            let field = match &node.fields[index].1 {
                Field::Single(slot) => Field::Single(self.clone_slot(slot)),
                Field::List(slots) => {
                    Field::List(slots.iter().map(|slot| self.clone_slot(slot)).collect())
                }
            };
            node.fields[index].1 = field;
        }
        self.alloc(node)
    }

    fn clone_slot(&mut self, slot: &Slot) -> Slot {
        match slot {
            Slot::Empty => Slot::Empty,
            Slot::Node(id) => Slot::Node(self.clone_node(*id)),
            Slot::Many(ids) => Slot::Many(ids.iter().map(|id| self.clone_node(*id)).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_has_file_and_program() {
        let ast = Ast::new();
        assert_eq!(ast.kind(ast.file()), NodeKind::File);
        assert_eq!(ast.kind(ast.program()), NodeKind::Program);
        assert_eq!(ast.len(), 2);
    }

    #[test]
    fn slots_by_container() {
        let mut ast = Ast::new();
        let a = ast.identifier("a");
        let b = ast.identifier("b");
        let program = ast.program();
        ast.set_children(program, "body", vec![a, b]);

        let body = Container::List(program, "body");
        assert_eq!(ast.slot(body, PathKey::Index(1)), Slot::Node(b));
        assert_eq!(ast.slot(body, PathKey::Index(5)), Slot::Empty);
        assert_eq!(ast.container_len(body), 2);

        assert!(ast.set_slot(body, PathKey::Index(0), Slot::Empty));
        assert!(!ast.set_slot(body, PathKey::Index(9), Slot::Empty));
        assert_eq!(ast.children(program, "body"), vec![b]);

        let file = Container::Node(ast.file());
        assert_eq!(ast.slot(file, PathKey::Field("program")), Slot::Node(program));
        assert_eq!(ast.slot(file, PathKey::Index(0)), Slot::Empty);
    }

    #[test]
    fn clone_node_is_deep() {
        let mut ast = Ast::new();
        let x = ast.identifier("x");
        let stmt = ast.expression_statement(x);
        let copy = ast.clone_node(stmt);
        assert_ne!(copy, stmt);
        let inner = ast.child(copy, "expression").unwrap();
        assert_ne!(inner, x);
        assert!(ast.node(inner).name_is("x"));
    }

    #[test]
    fn descendants_are_preorder() {
        let mut ast = Ast::new();
        let a = ast.identifier("a");
        let b = ast.identifier("b");
        let sum = ast.binary_expression("+", a, b);
        assert_eq!(ast.descendants(sum), vec![sum, a, b]);
    }
}
