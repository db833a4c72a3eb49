// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node constructors.
//!
//! Each builder allocates a node in the arena and returns its id. Child
//! arguments must already be allocated in the same arena.

use tugjs_core::SourceLocation;

use crate::ast::Ast;
use crate::kinds::NodeKind;
use crate::node::{DeclarationKind, LiteralValue, Node, NodeId};

impl Ast {
    fn build(&mut self, kind: NodeKind, singles: &[(&str, Option<NodeId>)], lists: Vec<(&str, Vec<NodeId>)>) -> NodeId {
        let id = self.alloc(Node::new(kind));
        for (key, child) in singles {
            self.set_child(id, key, *child);
        }
        for (key, children) in lists {
            self.set_children(id, key, children);
        }
        id
    }

    /// Attach a source location to a node.
    pub fn with_loc(&mut self, id: NodeId, loc: SourceLocation) -> NodeId {
        self.node_mut(id).loc = Some(loc);
        id
    }

    // Program structure

    /// Append statements to the program body.
    pub fn push_statements(&mut self, statements: Vec<NodeId>) {
        let program = self.program();
        let mut body = self.children(program, "body");
        body.extend(statements);
        self.set_children(program, "body", body);
    }

    pub fn block_statement(&mut self, body: Vec<NodeId>) -> NodeId {
        self.build(NodeKind::BlockStatement, &[], vec![("body", body)])
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.build(NodeKind::ExpressionStatement, &[("expression", Some(expression))], vec![])
    }

    pub fn empty_statement(&mut self) -> NodeId {
        self.build(NodeKind::EmptyStatement, &[], vec![])
    }

    pub fn return_statement(&mut self, argument: Option<NodeId>) -> NodeId {
        self.build(NodeKind::ReturnStatement, &[("argument", argument)], vec![])
    }

    pub fn if_statement(&mut self, test: NodeId, consequent: NodeId, alternate: Option<NodeId>) -> NodeId {
        self.build(
            NodeKind::IfStatement,
            &[("test", Some(test)), ("consequent", Some(consequent)), ("alternate", alternate)],
            vec![],
        )
    }

    pub fn for_statement(
        &mut self,
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.build(
            NodeKind::ForStatement,
            &[("init", init), ("test", test), ("update", update), ("body", Some(body))],
            vec![],
        )
    }

    pub fn for_in_statement(&mut self, left: NodeId, right: NodeId, body: NodeId) -> NodeId {
        self.build(
            NodeKind::ForInStatement,
            &[("left", Some(left)), ("right", Some(right)), ("body", Some(body))],
            vec![],
        )
    }

    pub fn for_of_statement(&mut self, left: NodeId, right: NodeId, body: NodeId) -> NodeId {
        self.build(
            NodeKind::ForOfStatement,
            &[("left", Some(left)), ("right", Some(right)), ("body", Some(body))],
            vec![],
        )
    }

    pub fn while_statement(&mut self, test: NodeId, body: NodeId) -> NodeId {
        self.build(NodeKind::WhileStatement, &[("test", Some(test)), ("body", Some(body))], vec![])
    }

    pub fn throw_statement(&mut self, argument: NodeId) -> NodeId {
        self.build(NodeKind::ThrowStatement, &[("argument", Some(argument))], vec![])
    }

    pub fn try_statement(&mut self, block: NodeId, handler: Option<NodeId>, finalizer: Option<NodeId>) -> NodeId {
        self.build(
            NodeKind::TryStatement,
            &[("block", Some(block)), ("handler", handler), ("finalizer", finalizer)],
            vec![],
        )
    }

    pub fn catch_clause(&mut self, param: NodeId, body: NodeId) -> NodeId {
        self.build(NodeKind::CatchClause, &[("param", Some(param)), ("body", Some(body))], vec![])
    }

    // Declarations

    pub fn variable_declaration(&mut self, kind: DeclarationKind, declarations: Vec<NodeId>) -> NodeId {
        let id = self.build(NodeKind::VariableDeclaration, &[], vec![("declarations", declarations)]);
        self.node_mut(id).declaration_kind = Some(kind);
        id
    }

    pub fn variable_declarator(&mut self, id: NodeId, init: Option<NodeId>) -> NodeId {
        self.build(NodeKind::VariableDeclarator, &[("id", Some(id)), ("init", init)], vec![])
    }

    pub fn function_declaration(&mut self, id: NodeId, params: Vec<NodeId>, body: NodeId) -> NodeId {
        self.build(
            NodeKind::FunctionDeclaration,
            &[("id", Some(id)), ("body", Some(body))],
            vec![("params", params)],
        )
    }

    pub fn class_declaration(&mut self, id: NodeId, super_class: Option<NodeId>, body: Vec<NodeId>) -> NodeId {
        let class_body = self.build(NodeKind::ClassBody, &[], vec![("body", body)]);
        self.build(
            NodeKind::ClassDeclaration,
            &[("id", Some(id)), ("superClass", super_class), ("body", Some(class_body))],
            vec![],
        )
    }

    // Expressions

    pub fn identifier(&mut self, name: &str) -> NodeId {
        let id = self.alloc(Node::new(NodeKind::Identifier));
        self.node_mut(id).name = Some(name.to_string());
        id
    }

    pub fn literal(&mut self, value: impl Into<LiteralValue>) -> NodeId {
        let id = self.alloc(Node::new(NodeKind::Literal));
        self.node_mut(id).value = Some(value.into());
        id
    }

    pub fn null_literal(&mut self) -> NodeId {
        self.literal(LiteralValue::Null)
    }

    pub fn this_expression(&mut self) -> NodeId {
        self.build(NodeKind::ThisExpression, &[], vec![])
    }

    pub fn array_expression(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.build(NodeKind::ArrayExpression, &[], vec![("elements", elements)])
    }

    pub fn object_expression(&mut self, properties: Vec<NodeId>) -> NodeId {
        self.build(NodeKind::ObjectExpression, &[], vec![("properties", properties)])
    }

    pub fn property(&mut self, key: NodeId, value: NodeId, computed: bool) -> NodeId {
        let id = self.build(NodeKind::Property, &[("key", Some(key)), ("value", Some(value))], vec![]);
        self.node_mut(id).computed = computed;
        id
    }

    pub fn function_expression(&mut self, id: Option<NodeId>, params: Vec<NodeId>, body: NodeId) -> NodeId {
        self.build(
            NodeKind::FunctionExpression,
            &[("id", id), ("body", Some(body))],
            vec![("params", params)],
        )
    }

    pub fn arrow_function_expression(&mut self, params: Vec<NodeId>, body: NodeId) -> NodeId {
        self.build(NodeKind::ArrowFunctionExpression, &[("body", Some(body))], vec![("params", params)])
    }

    fn operator_node(&mut self, kind: NodeKind, operator: &str, singles: &[(&str, Option<NodeId>)]) -> NodeId {
        let id = self.build(kind, singles, vec![]);
        self.node_mut(id).operator = Some(operator.to_string());
        id
    }

    pub fn unary_expression(&mut self, operator: &str, argument: NodeId) -> NodeId {
        let id = self.operator_node(NodeKind::UnaryExpression, operator, &[("argument", Some(argument))]);
        self.node_mut(id).prefix = true;
        id
    }

    pub fn update_expression(&mut self, operator: &str, argument: NodeId, prefix: bool) -> NodeId {
        let id = self.operator_node(NodeKind::UpdateExpression, operator, &[("argument", Some(argument))]);
        self.node_mut(id).prefix = prefix;
        id
    }

    pub fn binary_expression(&mut self, operator: &str, left: NodeId, right: NodeId) -> NodeId {
        self.operator_node(NodeKind::BinaryExpression, operator, &[("left", Some(left)), ("right", Some(right))])
    }

    pub fn logical_expression(&mut self, operator: &str, left: NodeId, right: NodeId) -> NodeId {
        self.operator_node(NodeKind::LogicalExpression, operator, &[("left", Some(left)), ("right", Some(right))])
    }

    pub fn assignment_expression(&mut self, operator: &str, left: NodeId, right: NodeId) -> NodeId {
        self.operator_node(
            NodeKind::AssignmentExpression,
            operator,
            &[("left", Some(left)), ("right", Some(right))],
        )
    }

    pub fn conditional_expression(&mut self, test: NodeId, consequent: NodeId, alternate: NodeId) -> NodeId {
        self.build(
            NodeKind::ConditionalExpression,
            &[("test", Some(test)), ("consequent", Some(consequent)), ("alternate", Some(alternate))],
            vec![],
        )
    }

    pub fn call_expression(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.build(NodeKind::CallExpression, &[("callee", Some(callee))], vec![("arguments", arguments)])
    }

    pub fn new_expression(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.build(NodeKind::NewExpression, &[("callee", Some(callee))], vec![("arguments", arguments)])
    }

    pub fn member_expression(&mut self, object: NodeId, property: NodeId, computed: bool) -> NodeId {
        let id = self.build(
            NodeKind::MemberExpression,
            &[("object", Some(object)), ("property", Some(property))],
            vec![],
        );
        self.node_mut(id).computed = computed;
        id
    }

    /// Build `a.b.c` from a dotted name.
    pub fn member_chain(&mut self, dotted: &str) -> NodeId {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        let mut object = self.identifier(first);
        for part in parts {
            let property = self.identifier(part);
            object = self.member_expression(object, property, false);
        }
        object
    }

    pub fn sequence_expression(&mut self, expressions: Vec<NodeId>) -> NodeId {
        self.build(NodeKind::SequenceExpression, &[], vec![("expressions", expressions)])
    }

    pub fn do_expression(&mut self, body: NodeId) -> NodeId {
        self.build(NodeKind::DoExpression, &[("body", Some(body))], vec![])
    }

    pub fn type_cast_expression(&mut self, expression: NodeId, annotation: NodeId) -> NodeId {
        self.build(
            NodeKind::TypeCastExpression,
            &[("expression", Some(expression)), ("typeAnnotation", Some(annotation))],
            vec![],
        )
    }

    // Patterns

    pub fn rest_element(&mut self, argument: NodeId) -> NodeId {
        self.build(NodeKind::RestElement, &[("argument", Some(argument))], vec![])
    }

    pub fn array_pattern(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.build(NodeKind::ArrayPattern, &[], vec![("elements", elements)])
    }

    pub fn object_pattern(&mut self, properties: Vec<NodeId>) -> NodeId {
        self.build(NodeKind::ObjectPattern, &[], vec![("properties", properties)])
    }

    pub fn assignment_pattern(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.build(NodeKind::AssignmentPattern, &[("left", Some(left)), ("right", Some(right))], vec![])
    }

    // Flow annotations

    /// Wrap a type in the `TypeAnnotation` node used by `typeAnnotation` fields.
    pub fn type_annotation(&mut self, inner: NodeId) -> NodeId {
        self.build(NodeKind::TypeAnnotation, &[("typeAnnotation", Some(inner))], vec![])
    }

    /// `Name` or `Name<params...>`.
    pub fn generic_type_annotation(&mut self, name: &str, params: Option<Vec<NodeId>>) -> NodeId {
        let id = self.identifier(name);
        let type_parameters =
            params.map(|params| self.build(NodeKind::TypeParameterInstantiation, &[], vec![("params", params)]));
        self.build(
            NodeKind::GenericTypeAnnotation,
            &[("id", Some(id)), ("typeParameters", type_parameters)],
            vec![],
        )
    }

    pub fn string_type_annotation(&mut self) -> NodeId {
        self.build(NodeKind::StringTypeAnnotation, &[], vec![])
    }

    pub fn number_type_annotation(&mut self) -> NodeId {
        self.build(NodeKind::NumberTypeAnnotation, &[], vec![])
    }

    pub fn boolean_type_annotation(&mut self) -> NodeId {
        self.build(NodeKind::BooleanTypeAnnotation, &[], vec![])
    }

    pub fn any_type_annotation(&mut self) -> NodeId {
        self.build(NodeKind::AnyTypeAnnotation, &[], vec![])
    }

    /// Attach a type annotation to an identifier or pattern.
    pub fn annotate(&mut self, target: NodeId, inner: NodeId) -> NodeId {
        let annotation = self.type_annotation(inner);
        self.set_child(target, "typeAnnotation", Some(annotation));
        target
    }

    /// Set a function's declared return type.
    pub fn with_return_type(&mut self, function: NodeId, inner: NodeId) -> NodeId {
        let annotation = self.type_annotation(inner);
        self.set_child(function, "returnType", Some(annotation));
        function
    }
}
