// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Shared helpers for the path engine integration tests.

#![allow(dead_code)]

use std::sync::Once;

use tugjs_ast::{Ast, DeclarationKind, NodeId};
use tugjs_traverse::{PathId, Session};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber honouring `RUST_LOG`, once per binary.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

/// `name;` as a statement.
pub fn name_statement(ast: &mut Ast, name: &str) -> NodeId {
    let id = ast.identifier(name);
    ast.expression_statement(id)
}

/// `var name = init;`
pub fn var(ast: &mut Ast, name: &str, init: Option<NodeId>) -> NodeId {
    let id = ast.identifier(name);
    let declarator = ast.variable_declarator(id, init);
    ast.variable_declaration(DeclarationKind::Var, vec![declarator])
}

/// A session over a program of `name;` statements.
pub fn statements(names: &[&str]) -> Session {
    init_tracing();
    let mut ast = Ast::new();
    let stmts = names.iter().map(|name| name_statement(&mut ast, name)).collect();
    ast.push_statements(stmts);
    Session::new(ast)
}

/// A session over `ast`, with the program path already created.
pub fn session(ast: Ast) -> (Session, PathId) {
    init_tracing();
    let mut session = Session::new(ast);
    let program = session.program_path();
    (session, program)
}

/// The identifier name of each `name;` statement in the program body.
pub fn body_names(session: &Session) -> Vec<String> {
    let ast = session.ast();
    ast.children(ast.program(), "body")
        .iter()
        .map(|stmt| {
            ast.child(*stmt, "expression")
                .and_then(|expr| ast.node(expr).name.clone())
                .unwrap_or_default()
        })
        .collect()
}
