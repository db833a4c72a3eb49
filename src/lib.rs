// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! tugjs: tree transformation for a JavaScript source-to-source compiler.
//!
//! The path engine lives in [`traverse`]; this crate adds the pass
//! catalogue and a pipeline that runs catalogue passes over one tree.
//!
//! ```
//! use tugjs::ast::{Ast, NodeKind};
//! use tugjs::pipeline::{transform, PipelineOptions};
//! use tugjs::traverse::SessionOptions;
//!
//! // x = do { a; b };
//! let mut ast = Ast::new();
//! let a = ast.identifier("a");
//! let b = ast.identifier("b");
//! let body = vec![ast.expression_statement(a), ast.expression_statement(b)];
//! let block = ast.block_statement(body);
//! let value = ast.do_expression(block);
//! let x = ast.identifier("x");
//! let assignment = ast.assignment_expression("=", x, value);
//! let stmt = ast.expression_statement(assignment);
//! ast.push_statements(vec![stmt]);
//!
//! let options = PipelineOptions {
//!     passes: vec!["do-expressions".to_string()],
//!     include_optional: false,
//! };
//! let (ast, report) = transform(ast, &options, SessionOptions::default()).unwrap();
//! let right = ast.child(assignment, "right").unwrap();
//! assert_eq!(ast.kind(right), NodeKind::SequenceExpression);
//! assert_eq!(report.ran, vec!["do-expressions"]);
//! ```

// Infrastructure re-exported from the workspace crates
pub use tugjs_ast as ast;
pub use tugjs_core::error;
pub use tugjs_core::types;
pub use tugjs_traverse as traverse;

pub mod passes;
pub mod pipeline;

pub use error::{ErrorCode, TugJsError};
pub use pipeline::{transform, Pipeline, PipelineOptions, PipelineReport};
