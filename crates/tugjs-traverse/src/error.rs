// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by path operations.
//!
//! Analysis misses (`resolve`, type inference) are never errors; they
//! return `None`. The variants here cover the two failure tiers:
//!
//! - [`TraverseError::Unsupported`]: a declared but unimplemented operation.
//! - [`TraverseError::Structural`] and [`TraverseError::Validation`]: the
//!   tree cannot host a mutation, or a replacement was rejected.

use thiserror::Error;
use tugjs_core::{Position, TugJsError};

/// Result type for path operations.
pub type TraverseResult<T> = Result<T, TraverseError>;

/// Error from a path operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraverseError {
    /// The operation is declared but not implemented for this position.
    #[error("unsupported operation `{operation}`: {reason}")]
    Unsupported {
        operation: &'static str,
        reason: String,
    },

    /// The tree cannot host the requested mutation.
    #[error("{}", with_line(.message, .location))]
    Structural {
        message: String,
        location: Option<Position>,
    },

    /// A replacement node was rejected by the validator.
    #[error("{}", with_line(.message, .location))]
    Validation {
        message: String,
        location: Option<Position>,
    },

    /// A path lookup named a field the node does not have.
    #[error("no path at `{key}`")]
    MissingPath { key: String },
}

fn with_line(message: &str, location: &Option<Position>) -> String {
    match location {
        Some(pos) => format!("Line {}: {}", pos.line, message),
        None => message.to_string(),
    }
}

impl TraverseError {
    pub fn structural(message: impl Into<String>, location: Option<Position>) -> Self {
        TraverseError::Structural {
            message: message.into(),
            location,
        }
    }

    pub fn missing_path(key: impl Into<String>) -> Self {
        TraverseError::MissingPath { key: key.into() }
    }

    /// Source position attached to the error, if any.
    pub fn location(&self) -> Option<Position> {
        match self {
            TraverseError::Structural { location, .. }
            | TraverseError::Validation { location, .. } => *location,
            _ => None,
        }
    }
}

impl From<TraverseError> for TugJsError {
    fn from(err: TraverseError) -> Self {
        match err {
            TraverseError::Unsupported { operation, reason } => TugJsError::Unsupported {
                operation: operation.to_string(),
                reason,
            },
            TraverseError::Structural { message, location } => TugJsError::Structural {
                message,
                position: location,
            },
            TraverseError::Validation { message, location } => TugJsError::ValidationFailed {
                message,
                position: location,
            },
            TraverseError::MissingPath { key } => {
                TugJsError::invalid_args(format!("no path at `{}`", key))
            }
        }
    }
}
