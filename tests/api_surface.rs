// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compile-only test to verify the public API surface.
//!
//! If this file fails to compile, the public API has regressed. The imports
//! go through the `tugjs` facade so that re-exports are covered too.
//!
//! Run with: cargo test -- api_surface

#![allow(unused_imports)]

// ============================================================================
// Core Infrastructure Types
// ============================================================================

use tugjs::error::{ErrorCode, TugJsError};
use tugjs::types::{Position, SourceLocation};

// ============================================================================
// Tree Model
// ============================================================================

use tugjs::ast::dump::{body_to_json, program_to_json, to_json};
use tugjs::ast::types::{
    ensure_block, get_binding_identifiers, inherits_comments, is_block_scoped, is_referenced,
    is_scope, is_var, to_computed_key, to_sequence_expression,
};
use tugjs::ast::{
    Ast, Container, DeclarationKind, Field, LiteralValue, Node, NodeId, NodeKind, PathKey, Slot,
};

// ============================================================================
// Path Engine
// ============================================================================

use tugjs::traverse::{
    traverse, Binding, BindingKind, GenericOptions, Hook, HookArgs, HookPhase, KindHooks,
    NodePath, NodeValidator, Pass, PassMetadata, PathArena, PathId, PathRecord, Replacement,
    SchemaValidator, ScopeId, ScopeKind, ScopeRecord, ScopeTree, Session, SessionOptions,
    TraversalContext, TraverseError, TraverseResult, TypeInfo,
};

// ============================================================================
// Passes and Pipeline
// ============================================================================

use tugjs::passes::{catalogue, do_expressions, find, PassEntry};
use tugjs::pipeline::{transform, Pipeline, PipelineOptions, PipelineReport};

#[test]
fn api_surface_compiles() {
    // The test passes if the imports above resolve.
}

#[test]
fn error_bridge_is_public() {
    fn bridge(err: TraverseError) -> TugJsError {
        err.into()
    }
    let err = bridge(TraverseError::missing_path("body.9"));
    assert_eq!(err.error_code(), ErrorCode::InvalidArguments);
}

#[test]
fn hooks_are_plain_functions() {
    fn noop(_: &mut NodePath<'_>, _: HookArgs, _: &mut ()) -> TraverseResult<Option<Replacement>> {
        Ok(None)
    }
    let hook: Hook<()> = noop;
    let pass = Pass::new("noop").enter(hook);
    assert!(pass.hook(NodeKind::Identifier, HookPhase::Enter).is_some());
}
