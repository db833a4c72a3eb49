// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type annotations, written or inferred.

use serde::{Deserialize, Serialize};
use tugjs_ast::{LiteralValue, NodeId, NodeKind};

use crate::arena::{PathId, TypeInfo};
use crate::session::Session;

/// Options for [`Session::is_type_generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericOptions {
    /// Accept an inferred annotation, not only a written one.
    pub inference: bool,
    /// The annotation must carry type parameters.
    pub require_type_parameters: bool,
}

impl Default for GenericOptions {
    fn default() -> Self {
        GenericOptions {
            inference: true,
            require_type_parameters: false,
        }
    }
}

impl Session {
    /// The annotation of the node at `path`, cached on the path.
    ///
    /// A written `typeAnnotation` wins; otherwise the type is inferred.
    pub fn get_type_annotation(&mut self, path: PathId) -> TypeInfo {
        if let Some(info) = self.paths.record(path).type_info {
            return info;
        }
        let written = self
            .node(path)
            .and_then(|node| self.ast.child(node, "typeAnnotation"));
        let (inferred, annotation) = match written {
            Some(annotation) => (false, Some(annotation)),
            None => (true, self.infer_type(path)),
        };
        let info = TypeInfo {
            inferred,
            annotation: annotation.map(|node| self.unwrap_annotation(node)),
        };
        self.paths.record_mut(path).type_info = Some(info);
        info
    }

    fn unwrap_annotation(&self, node: NodeId) -> NodeId {
        if self.ast.kind(node) == NodeKind::TypeAnnotation {
            if let Some(inner) = self.ast.child(node, "typeAnnotation") {
                return inner;
            }
        }
        node
    }

    /// Infer a type annotation from the shape of the value `path` resolves to.
    ///
    /// New annotation nodes are allocated in the tree but not attached.
    pub fn infer_type(&mut self, path: PathId) -> Option<NodeId> {
        let path = self.resolve(path)?;
        let node = self.node(path)?;
        let kind = self.ast.kind(node);
        let parent_kind = self.parent_path(path).and_then(|parent| self.kind(parent));

        if kind == NodeKind::RestElement
            || parent_kind == Some(NodeKind::RestElement)
            || kind == NodeKind::ArrayExpression
            || kind == NodeKind::ArrayPattern
        {
            return Some(self.ast.generic_type_annotation("Array", None));
        }

        if parent_kind == Some(NodeKind::TypeCastExpression) {
            let cast = self.parent(path);
            return self.ast.child(cast, "typeAnnotation");
        }
        if kind == NodeKind::TypeCastExpression {
            return self.ast.child(node, "typeAnnotation");
        }

        if kind == NodeKind::ObjectExpression {
            return Some(self.ast.generic_type_annotation("Object", None));
        }
        if kind.is_function() {
            return Some(self.ast.generic_type_annotation("Function", None));
        }

        if kind == NodeKind::Literal {
            return match self.ast.node(node).value {
                Some(LiteralValue::String(_)) => Some(self.ast.string_type_annotation()),
                Some(LiteralValue::Number(_)) => Some(self.ast.number_type_annotation()),
                Some(LiteralValue::Boolean(_)) => Some(self.ast.boolean_type_annotation()),
                _ => None,
            };
        }

        if kind == NodeKind::CallExpression {
            let callee = self.get_child(path, "callee").ok()?;
            let callee = self.resolve(callee)?;
            let function = self.node(callee)?;
            if self.ast.kind(function).is_function() {
                return self.ast.child(function, "returnType");
            }
        }
        None
    }

    /// True if the annotation at `path` is the generic `name`.
    pub fn is_type_generic(&mut self, path: PathId, name: &str, options: GenericOptions) -> bool {
        let info = self.get_type_annotation(path);
        let annotation = match info.annotation {
            Some(annotation) => annotation,
            None => return false,
        };
        if info.inferred && !options.inference {
            return false;
        }
        let node = self.ast.node(annotation);
        if node.kind != NodeKind::GenericTypeAnnotation {
            return false;
        }
        let named = node
            .child("id")
            .is_some_and(|id| self.ast.node(id).name_is(name));
        if !named {
            return false;
        }
        !options.require_type_parameters || node.child("typeParameters").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugjs_ast::{Ast, DeclarationKind};

    /// A session whose only statement is `value;`.
    fn expression(build: impl FnOnce(&mut Ast) -> NodeId) -> (Session, PathId) {
        let mut ast = Ast::new();
        let value = build(&mut ast);
        let stmt = ast.expression_statement(value);
        ast.push_statements(vec![stmt]);
        let mut session = Session::new(ast);
        let program = session.program_path();
        let path = session.get_path(program, "body.0.expression").unwrap();
        (session, path)
    }

    fn annotation_kind(session: &mut Session, path: PathId) -> Option<NodeKind> {
        session
            .get_type_annotation(path)
            .annotation
            .map(|node| session.ast().kind(node))
    }

    mod inference {
        use super::*;

        #[test]
        fn literals() {
            let (mut session, path) = expression(|ast| ast.literal("s"));
            assert_eq!(annotation_kind(&mut session, path), Some(NodeKind::StringTypeAnnotation));
            assert!(session.get_type_annotation(path).inferred);

            let (mut session, path) = expression(|ast| ast.literal(4));
            assert_eq!(annotation_kind(&mut session, path), Some(NodeKind::NumberTypeAnnotation));

            let (mut session, path) = expression(|ast| ast.literal(true));
            assert_eq!(annotation_kind(&mut session, path), Some(NodeKind::BooleanTypeAnnotation));

            let (mut session, path) = expression(|ast| ast.null_literal());
            assert_eq!(annotation_kind(&mut session, path), None);
        }

        #[test]
        fn generics() {
            let (mut session, path) = expression(|ast| ast.object_expression(vec![]));
            assert!(session.is_type_generic(path, "Object", GenericOptions::default()));

            let (mut session, path) = expression(|ast| ast.array_expression(vec![]));
            assert!(session.is_type_generic(path, "Array", GenericOptions::default()));
            assert!(!session.is_type_generic(path, "Object", GenericOptions::default()));

            let (mut session, path) = expression(|ast| {
                let body = ast.block_statement(vec![]);
                ast.function_expression(None, vec![], body)
            });
            assert!(session.is_type_generic(path, "Function", GenericOptions::default()));
        }

        #[test]
        fn inference_can_be_refused() {
            let (mut session, path) = expression(|ast| ast.object_expression(vec![]));
            let options = GenericOptions {
                inference: false,
                ..GenericOptions::default()
            };
            assert!(!session.is_type_generic(path, "Object", options));
        }

        #[test]
        fn type_cast_wins() {
            let (mut session, path) = expression(|ast| {
                let value = ast.identifier("v");
                let inner = ast.any_type_annotation();
                let annotation = ast.type_annotation(inner);
                ast.type_cast_expression(value, annotation)
            });
            assert_eq!(annotation_kind(&mut session, path), Some(NodeKind::AnyTypeAnnotation));
        }

        #[test]
        fn call_uses_callee_return_type() {
            let mut ast = Ast::new();
            let f = ast.identifier("f");
            let body = ast.block_statement(vec![]);
            let function = ast.function_expression(None, vec![], body);
            let ret = ast.string_type_annotation();
            ast.with_return_type(function, ret);
            let declarator = ast.variable_declarator(f, Some(function));
            let decl = ast.variable_declaration(DeclarationKind::Const, vec![declarator]);
            let callee = ast.identifier("f");
            let call = ast.call_expression(callee, vec![]);
            let stmt = ast.expression_statement(call);
            ast.push_statements(vec![decl, stmt]);

            let mut session = Session::new(ast);
            let program = session.program_path();
            let path = session.get_path(program, "body.1.expression").unwrap();
            assert_eq!(annotation_kind(&mut session, path), Some(NodeKind::StringTypeAnnotation));
        }

        #[test]
        fn unknown_shape_has_no_type() {
            let (mut session, path) = expression(|ast| ast.this_expression());
            assert_eq!(session.get_type_annotation(path).annotation, None);
            assert!(!session.is_type_generic(path, "Object", GenericOptions::default()));
        }
    }

    mod written {
        use super::*;

        #[test]
        fn written_annotation_wins_and_is_unwrapped() {
            let (mut session, path) = expression(|ast| {
                let id = ast.identifier("x");
                let inner = ast.generic_type_annotation("Array", Some(vec![]));
                ast.annotate(id, inner);
                id
            });
            let info = session.get_type_annotation(path);
            assert!(!info.inferred);
            assert_eq!(
                info.annotation.map(|node| session.ast().kind(node)),
                Some(NodeKind::GenericTypeAnnotation)
            );
            let options = GenericOptions {
                inference: false,
                require_type_parameters: true,
            };
            assert!(session.is_type_generic(path, "Array", options));
        }

        #[test]
        fn annotation_is_cached_until_refresh() {
            let (mut session, path) = expression(|ast| ast.literal("s"));
            let first = session.get_type_annotation(path);
            assert_eq!(session.get_type_annotation(path), first);
            session.refresh(path);
            assert_eq!(session.record(path).type_info, None);
        }
    }
}
