// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node classification and small structural helpers.
//!
//! These are pure functions over the arena: they never allocate paths and
//! never consult scopes. The traversal engine layers path-aware versions on
//! top of them.

use crate::ast::Ast;
use crate::kinds::{Alias, NodeKind};
use crate::node::{DeclarationKind, Field, LiteralValue, NodeId, Slot};

/// Field names whose slot may hold either a statement or a block.
pub const STATEMENT_OR_BLOCK_KEYS: &[&str] = &["consequent", "body", "alternate"];

/// True if `kind` is named `name`, or belongs to an alias named `name`.
pub fn is_type(kind: NodeKind, name: &str) -> bool {
    if kind.as_str() == name {
        return true;
    }
    match Alias::from_name(name) {
        Some(alias) => kind.has_alias(alias),
        None => false,
    }
}

pub fn is_statement(kind: NodeKind) -> bool {
    kind.is_statement()
}

pub fn is_expression(kind: NodeKind) -> bool {
    kind.is_expression()
}

/// True if `node` introduces a lexical scope when it sits under `parent`.
///
/// A block that is the body of a function or of a scoping loop shares the
/// scope of its owner.
pub fn is_scope(ast: &Ast, node: NodeId, parent: Option<NodeId>) -> bool {
    let kind = ast.kind(node);
    if kind == NodeKind::BlockStatement {
        if let Some(parent) = parent {
            let parent_kind = ast.kind(parent);
            let owns_body = ast.child(parent, "body") == Some(node);
            if owns_body && (parent_kind.is_function() || parent_kind.has_alias(Alias::Scopable)) {
                return false;
            }
        }
    }
    kind.has_alias(Alias::Scopable)
}

/// True if an identifier at `node` reads a binding, given its `parent`.
pub fn is_referenced(ast: &Ast, node: NodeId, parent: NodeId) -> bool {
    let parent_node = ast.node(parent);
    let is = |key: &str| parent_node.child(key) == Some(node);
    let in_list = |key: &str| parent_node.children(key).contains(&node);

    match parent_node.kind {
        // obj.NODE is a static key, obj[NODE] is a read
        NodeKind::MemberExpression => is("object") || parent_node.computed,
        // {NODE: v} is a key, {[NODE]: v} and {k: NODE} are reads
        NodeKind::Property => !is("key") || parent_node.computed,
        NodeKind::VariableDeclarator => !is("id"),
        NodeKind::FunctionDeclaration
        | NodeKind::FunctionExpression
        | NodeKind::ArrowFunctionExpression => !is("id") && !in_list("params"),
        NodeKind::ClassDeclaration => !is("id"),
        NodeKind::CatchClause => !is("param"),
        NodeKind::BreakStatement | NodeKind::ContinueStatement => false,
        NodeKind::RestElement | NodeKind::ArrayPattern | NodeKind::ObjectPattern => false,
        NodeKind::AssignmentPattern => is("right"),
        NodeKind::GenericTypeAnnotation => false,
        _ => true,
    }
}

/// An identifier that reads a binding.
pub fn is_referenced_identifier(ast: &Ast, node: NodeId, parent: NodeId) -> bool {
    ast.kind(node) == NodeKind::Identifier && is_referenced(ast, node, parent)
}

/// Declarations scoped to their enclosing block.
pub fn is_block_scoped(ast: &Ast, node: NodeId) -> bool {
    let n = ast.node(node);
    match n.kind {
        NodeKind::FunctionDeclaration | NodeKind::ClassDeclaration => true,
        NodeKind::VariableDeclaration => matches!(
            n.declaration_kind,
            Some(DeclarationKind::Let) | Some(DeclarationKind::Const)
        ),
        _ => false,
    }
}

/// A `var` declaration.
pub fn is_var(ast: &Ast, node: NodeId) -> bool {
    let n = ast.node(node);
    n.kind == NodeKind::VariableDeclaration && n.declaration_kind == Some(DeclarationKind::Var)
}

/// Copy the comments of `from` onto `to`, skipping ones already present.
pub fn inherits_comments(ast: &mut Ast, to: NodeId, from: NodeId) {
    if to == from {
        return;
    }
    let source = ast.node(from);
    let leading = source.leading_comments.clone();
    let trailing = source.trailing_comments.clone();

    let target = ast.node_mut(to);
    for comment in leading {
        if !target.leading_comments.contains(&comment) {
            target.leading_comments.push(comment);
        }
    }
    for comment in trailing {
        if !target.trailing_comments.contains(&comment) {
            target.trailing_comments.push(comment);
        }
    }
}

/// The identifiers a declaration or pattern binds, keyed by name.
///
/// A name bound twice keeps its first position with the later node.
pub fn get_binding_identifiers(ast: &Ast, node: NodeId) -> Vec<(String, NodeId)> {
    let mut out: Vec<(String, NodeId)> = Vec::new();
    let mut queue = vec![node];
    while let Some(id) = queue.pop() {
        let n = ast.node(id);
        let keys: &[&str] = match n.kind {
            NodeKind::Identifier => {
                let name = n.name.clone().unwrap_or_default();
                match out.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(entry) => entry.1 = id,
                    None => out.push((name, id)),
                }
                continue;
            }
            NodeKind::VariableDeclaration => &["declarations"],
            NodeKind::VariableDeclarator
            | NodeKind::FunctionDeclaration
            | NodeKind::ClassDeclaration => &["id"],
            NodeKind::ArrayPattern => &["elements"],
            NodeKind::ObjectPattern => &["properties"],
            NodeKind::Property => &["value"],
            NodeKind::RestElement => &["argument"],
            NodeKind::AssignmentPattern => &["left"],
            _ => &[],
        };
        let mut children = Vec::new();
        for key in keys {
            children.extend(n.children(key));
        }
        // stack order: visit children left to right
        children.reverse();
        queue.extend(children);
    }
    out
}

/// Merge expression statements into one expression.
///
/// Returns `None` when any statement is not a bare expression statement or
/// when there is nothing to merge. A single expression is returned as is.
pub fn to_sequence_expression(ast: &mut Ast, nodes: &[NodeId]) -> Option<NodeId> {
    let mut exprs = Vec::new();
    for &id in nodes {
        let kind = ast.kind(id);
        if kind == NodeKind::ExpressionStatement {
            exprs.push(ast.child(id, "expression")?);
        } else if kind == NodeKind::EmptyStatement {
            continue;
        } else if kind.is_expression() {
            exprs.push(id);
        } else {
            return None;
        }
    }
    match exprs.len() {
        0 => None,
        1 => Some(exprs[0]),
        _ => Some(ast.sequence_expression(exprs)),
    }
}

/// Coerce the nodes in `owner.key` into a single block statement.
///
/// Expressions become expression statements, or a return statement when the
/// owner is a function. Returns the block, or `None` if `key` is not a
/// single-slot field of `owner`.
pub fn ensure_block(ast: &mut Ast, owner: NodeId, key: &str) -> Option<NodeId> {
    let slot = match ast.node(owner).field(key) {
        Some(Field::Single(slot)) => slot.clone(),
        _ => return None,
    };
    let nodes = slot.nodes();
    if let [single] = nodes.as_slice() {
        if ast.kind(*single) == NodeKind::BlockStatement {
            return Some(*single);
        }
    }

    let owner_is_function = ast.kind(owner).is_function();
    let mut body = Vec::new();
    for id in nodes {
        let kind = ast.kind(id);
        if kind == NodeKind::EmptyStatement {
            continue;
        }
        if kind.is_statement() {
            body.push(id);
        } else if owner_is_function {
            body.push(ast.return_statement(Some(id)));
        } else {
            body.push(ast.expression_statement(id));
        }
    }
    let block = ast.block_statement(body);
    if let Some(Field::Single(current)) = ast.node_mut(owner).field_mut(key) {
        *current = Slot::Node(block);
    }
    Some(block)
}

/// The static key of a member expression or property.
///
/// `a.b` and `{b: 1}` give `"b"`, `a["b"]` and `{["b"]: 1}` give the literal,
/// any other computed key gives `None`.
pub fn to_computed_key(ast: &Ast, node: NodeId) -> Option<LiteralValue> {
    let n = ast.node(node);
    let key = match n.kind {
        NodeKind::MemberExpression => n.child("property")?,
        NodeKind::Property => n.child("key")?,
        _ => return None,
    };
    let key_node = ast.node(key);
    match key_node.kind {
        NodeKind::Identifier if !n.computed => key_node.name.clone().map(LiteralValue::String),
        NodeKind::Literal => key_node.value.clone(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod classification {
        use super::*;

        #[test]
        fn is_type_accepts_kind_and_alias_names() {
            assert!(is_type(NodeKind::Identifier, "Identifier"));
            assert!(is_type(NodeKind::Identifier, "Expression"));
            assert!(is_type(NodeKind::IfStatement, "Statement"));
            assert!(!is_type(NodeKind::IfStatement, "Expression"));
            assert!(!is_type(NodeKind::IfStatement, "Bogus"));
        }

        #[test]
        fn function_body_block_is_not_a_scope() {
            let mut ast = Ast::new();
            let body = ast.block_statement(vec![]);
            let func = ast.function_expression(None, vec![], body);
            assert!(!is_scope(&ast, body, Some(func)));
            assert!(is_scope(&ast, func, None));

            let nested = ast.block_statement(vec![]);
            let _outer = ast.block_statement(vec![nested]);
            assert!(is_scope(&ast, nested, Some(_outer)));
        }

        #[test]
        fn block_scoped_and_var() {
            let mut ast = Ast::new();
            let x = ast.identifier("x");
            let d = ast.variable_declarator(x, None);
            let let_decl = ast.variable_declaration(DeclarationKind::Let, vec![d]);
            let y = ast.identifier("y");
            let d2 = ast.variable_declarator(y, None);
            let var_decl = ast.variable_declaration(DeclarationKind::Var, vec![d2]);
            assert!(is_block_scoped(&ast, let_decl));
            assert!(!is_var(&ast, let_decl));
            assert!(is_var(&ast, var_decl));
            assert!(!is_block_scoped(&ast, var_decl));
        }
    }

    mod referenced {
        use super::*;

        #[test]
        fn member_property_is_not_referenced() {
            let mut ast = Ast::new();
            let obj = ast.identifier("a");
            let prop = ast.identifier("b");
            let member = ast.member_expression(obj, prop, false);
            assert!(is_referenced(&ast, obj, member));
            assert!(!is_referenced(&ast, prop, member));
            ast.node_mut(member).computed = true;
            assert!(is_referenced(&ast, prop, member));
        }

        #[test]
        fn declarator_id_is_not_referenced() {
            let mut ast = Ast::new();
            let id = ast.identifier("x");
            let init = ast.identifier("y");
            let decl = ast.variable_declarator(id, Some(init));
            assert!(!is_referenced_identifier(&ast, id, decl));
            assert!(is_referenced_identifier(&ast, init, decl));
        }

        #[test]
        fn params_are_not_referenced() {
            let mut ast = Ast::new();
            let p = ast.identifier("p");
            let body = ast.block_statement(vec![]);
            let func = ast.function_expression(None, vec![p], body);
            assert!(!is_referenced(&ast, p, func));
        }
    }

    mod helpers {
        use super::*;
        use crate::node::Comment;

        #[test]
        fn binding_identifiers_of_patterns() {
            let mut ast = Ast::new();
            let a = ast.identifier("a");
            let b = ast.identifier("b");
            let rest = ast.rest_element(b);
            let pattern = ast.array_pattern(vec![a, rest]);
            let init = ast.identifier("arr");
            let decl = ast.variable_declarator(pattern, Some(init));
            let var = ast.variable_declaration(DeclarationKind::Var, vec![decl]);
            let names: Vec<_> = get_binding_identifiers(&ast, var)
                .into_iter()
                .map(|(name, _)| name)
                .collect();
            assert_eq!(names, vec!["a", "b"]);
        }

        #[test]
        fn duplicate_binding_keeps_later_node() {
            let mut ast = Ast::new();
            let first = ast.identifier("x");
            let second = ast.identifier("x");
            let d1 = ast.variable_declarator(first, None);
            let d2 = ast.variable_declarator(second, None);
            let var = ast.variable_declaration(DeclarationKind::Var, vec![d1, d2]);
            assert_eq!(
                get_binding_identifiers(&ast, var),
                vec![("x".to_string(), second)]
            );
        }

        #[test]
        fn sequence_of_expression_statements() {
            let mut ast = Ast::new();
            let x = ast.identifier("x");
            let y = ast.identifier("y");
            let sx = ast.expression_statement(x);
            let sy = ast.expression_statement(y);
            let seq = to_sequence_expression(&mut ast, &[sx, sy]).unwrap();
            assert_eq!(ast.kind(seq), NodeKind::SequenceExpression);
            assert_eq!(ast.children(seq, "expressions"), vec![x, y]);

            assert_eq!(to_sequence_expression(&mut ast, &[sx]), Some(x));
            assert_eq!(to_sequence_expression(&mut ast, &[]), None);
        }

        #[test]
        fn sequence_rejects_declarations() {
            let mut ast = Ast::new();
            let id = ast.identifier("a");
            let decl = ast.variable_declarator(id, None);
            let var = ast.variable_declaration(DeclarationKind::Var, vec![decl]);
            let x = ast.identifier("x");
            let sx = ast.expression_statement(x);
            assert_eq!(to_sequence_expression(&mut ast, &[sx, var]), None);
        }

        #[test]
        fn ensure_block_wraps_many() {
            let mut ast = Ast::new();
            let test = ast.identifier("t");
            let a = ast.identifier("a");
            let sa = ast.expression_statement(a);
            let stmt = ast.if_statement(test, sa, None);
            let b = ast.identifier("b");
            if let Some(Field::Single(slot)) = ast.node_mut(stmt).field_mut("consequent") {
                *slot = Slot::Many(vec![sa, b]);
            }
            let block = ensure_block(&mut ast, stmt, "consequent").unwrap();
            assert_eq!(ast.child(stmt, "consequent"), Some(block));
            let body = ast.children(block, "body");
            assert_eq!(body.len(), 2);
            assert_eq!(body[0], sa);
            assert_eq!(ast.kind(body[1]), NodeKind::ExpressionStatement);
        }

        #[test]
        fn computed_keys() {
            let mut ast = Ast::new();
            let member = ast.member_chain("a.b");
            assert_eq!(to_computed_key(&ast, member), Some(LiteralValue::from("b")));

            let obj = ast.identifier("a");
            let lit = ast.literal("b");
            let computed = ast.member_expression(obj, lit, true);
            assert_eq!(to_computed_key(&ast, computed), Some(LiteralValue::from("b")));

            let obj = ast.identifier("a");
            let dynamic = ast.identifier("k");
            let dynamic = ast.member_expression(obj, dynamic, true);
            assert_eq!(to_computed_key(&ast, dynamic), None);
        }

        #[test]
        fn comments_are_inherited_once() {
            let mut ast = Ast::new();
            let from = ast.identifier("a");
            let to = ast.identifier("b");
            ast.node_mut(from).leading_comments.push(Comment::line(" hi"));
            ast.node_mut(to).leading_comments.push(Comment::line(" hi"));
            inherits_comments(&mut ast, to, from);
            assert_eq!(ast.node(to).leading_comments.len(), 1);
        }
    }
}
