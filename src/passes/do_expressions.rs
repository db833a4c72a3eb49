// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lowering of `do { ... }` expressions.
//!
//! ```text
//! x = do { a; b };              =>  x = (a, b);
//! x = do { var t = f(); t };    =>  var t; x = function () { t = f(); return t; }();
//! x = do {};                    =>  x = undefined;
//! ```
//!
//! The body statements replace the expression; statement-to-expression
//! coercion in the path engine does the rest.

use tracing::debug;
use tugjs_ast::{Ast, NodeId, NodeKind};
use tugjs_traverse::{HookArgs, NodePath, Pass, PassMetadata, Replacement, TraverseResult};

pub const NAME: &str = "do-expressions";

pub const METADATA: PassMetadata = PassMetadata {
    experimental: true,
    optional: true,
};

/// The pass only has work to do when the tree holds a do expression.
pub fn check(ast: &Ast, root: NodeId) -> bool {
    ast.descendants(root)
        .into_iter()
        .any(|node| ast.kind(node) == NodeKind::DoExpression)
}

pub fn pass() -> Pass<()> {
    Pass::new(NAME)
        .on_enter(NodeKind::DoExpression, lower)
        .with_metadata(METADATA)
}

fn lower(
    path: &mut NodePath<'_>,
    args: HookArgs,
    _: &mut (),
) -> TraverseResult<Option<Replacement>> {
    let body = path
        .ast()
        .child(args.node, "body")
        .map(|block| path.ast().children(block, "body"))
        .unwrap_or_default();
    debug!(path = %path.id(), statements = body.len(), "lowering do expression");
    if body.is_empty() {
        let undefined = path.ast_mut().identifier("undefined");
        return Ok(Some(Replacement::Node(undefined)));
    }
    Ok(Some(Replacement::Nodes(body)))
}
