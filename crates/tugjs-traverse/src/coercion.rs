// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement to expression coercion.
//!
//! Bare expression statements merge into one sequence expression. Anything
//! else is wrapped in a synthetic closure that is called on the spot:
//!
//! ```text
//! var x = f(); x        =>   (function () { x = f(); return x; })()
//!                            with `var x` declared in the enclosing function
//! ```
//!
//! Tail expression statements become returns so the call yields the value
//! of the last statement, and `var` declarations are hoisted out of the
//! closure so they stay visible to the surrounding code.

use tracing::debug;
use tugjs_ast::types;
use tugjs_ast::{DeclarationKind, NodeId, NodeKind, PathKey};

use crate::arena::PathId;
use crate::error::TraverseResult;
use crate::pass::{HookArgs, Pass, Replacement};
use crate::path::NodePath;
use crate::scope::ScopeId;
use crate::session::Session;

impl Session {
    /// Replace the node at `path` with one expression equivalent to
    /// running `nodes` in order.
    pub fn set_statements_to_expression(
        &mut self,
        path: PathId,
        nodes: &[NodeId],
    ) -> TraverseResult<()> {
        if let Some(sequence) = types::to_sequence_expression(&mut self.ast, nodes) {
            debug!(%path, count = nodes.len(), "coerced statements to a sequence");
            return self.replace_with(path, Replacement::Node(sequence));
        }

        let block = self.ast.block_statement(nodes.to_vec());
        let function = self.ast.function_expression(None, Vec::new(), block);
        self.ast.node_mut(function).shadow = true;
        let call = self.ast.call_expression(function, Vec::new());
        self.replace_with(path, Replacement::Node(call))?;
        debug!(%path, count = nodes.len(), "coerced statements to a closure call");

        let callee = self.get_child(path, "callee")?;
        let body = self.get_child(callee, "body")?;
        for tail in self.get_last_statements(body)? {
            if self.kind(tail) != Some(NodeKind::ExpressionStatement) {
                continue;
            }
            let expression = self.node(tail).and_then(|stmt| self.ast.child(stmt, "expression"));
            if let Some(expression) = expression {
                let ret = self.ast.return_statement(Some(expression));
                self.replace_with(tail, Replacement::Node(ret))?;
            }
        }

        self.traverse_path(body, &hoist_variables_pass(), &mut ())
    }

    /// The paths of the statements that can complete `path`.
    ///
    /// Both branches of an `if`, the last statement of a block or program,
    /// the body of a `do` expression, or the path itself.
    pub fn get_last_statements(&mut self, path: PathId) -> TraverseResult<Vec<PathId>> {
        let mut out = Vec::new();
        let mut pending = vec![path];
        while let Some(current) = pending.pop() {
            match self.kind(current) {
                Some(NodeKind::IfStatement) => {
                    // popped in reverse, so consequent tails come first
                    if self.record_has(current, "alternate") {
                        pending.push(self.get_child(current, "alternate")?);
                    }
                    pending.push(self.get_child(current, "consequent")?);
                }
                Some(NodeKind::DoExpression) => pending.push(self.get_child(current, "body")?),
                Some(NodeKind::Program) | Some(NodeKind::BlockStatement) => {
                    if let Some(last) = self.get_list(current, "body")?.pop() {
                        pending.push(last);
                    }
                }
                _ => out.push(current),
            }
        }
        Ok(out)
    }

    fn record_has(&self, path: PathId, key: &str) -> bool {
        self.node(path)
            .and_then(|node| self.ast.child(node, key))
            .is_some()
    }

    /// Turn a `var` declaration inside a synthetic closure into assignments,
    /// declaring its names in the enclosing function.
    fn hoist_declaration(
        &mut self,
        path: PathId,
        declaration: NodeId,
        scope: Option<ScopeId>,
    ) -> TraverseResult<Replacement> {
        for (_, identifier) in types::get_binding_identifiers(&self.ast, declaration) {
            self.push_declaration(scope, identifier)?;
        }

        let declarators = self.ast.children(declaration, "declarations");
        let mut assignments = Vec::new();
        for &declarator in &declarators {
            let id = self.ast.child(declarator, "id");
            let init = self.ast.child(declarator, "init");
            if let (Some(id), Some(init)) = (id, init) {
                assignments.push(self.ast.assignment_expression("=", id, init));
            }
        }

        let owner = self.ast.kind(self.parent(path));
        let replacement = match (owner, self.key(path)) {
            (NodeKind::ForStatement, PathKey::Field("init")) => match assignments.len() {
                0 => Replacement::Remove,
                1 => Replacement::Node(assignments[0]),
                _ => Replacement::Node(self.ast.sequence_expression(assignments)),
            },
            (NodeKind::ForInStatement | NodeKind::ForOfStatement, PathKey::Field("left")) => {
                match declarators.first().and_then(|d| self.ast.child(*d, "id")) {
                    Some(id) => Replacement::Node(id),
                    None => Replacement::Remove,
                }
            }
            _ => Replacement::Nodes(
                assignments
                    .into_iter()
                    .map(|assignment| self.ast.expression_statement(assignment))
                    .collect(),
            ),
        };
        debug!(%path, declarators = declarators.len(), "hoisted var declaration");
        Ok(replacement)
    }
}

/// The pass run over a synthetic closure body after coercion.
fn hoist_variables_pass() -> Pass<()> {
    Pass::new("hoist-variables").enter(hoist_variables)
}

fn hoist_variables(
    path: &mut NodePath<'_>,
    args: HookArgs,
    _: &mut (),
) -> TraverseResult<Option<Replacement>> {
    if path.is_function() {
        path.skip();
        return Ok(None);
    }
    let is_var = path.is_variable_declaration()
        && path.ast().node(args.node).declaration_kind == Some(DeclarationKind::Var);
    if !is_var {
        return Ok(None);
    }
    let id = path.id();
    path.session_mut()
        .hoist_declaration(id, args.node, args.scope)
        .map(Some)
}
