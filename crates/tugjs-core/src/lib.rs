// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Core infrastructure for tugjs.
//!
//! This crate provides language-agnostic infrastructure:
//! - 1-indexed source positions and node locations
//! - The unified error type and stable error codes

pub mod error;
pub mod types;

pub use error::{ErrorCode, TugJsError};
pub use types::{Position, SourceLocation};
