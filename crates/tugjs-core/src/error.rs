// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error types and error code constants for tugjs.
//!
//! This module provides a unified error type (`TugJsError`) that bridges
//! domain-specific errors from the subsystems (traversal, validation, passes)
//! into a common format suitable for a compilation driver to report.
//!
//! ## Error Code Mapping
//!
//! - `2`: Unsupported operation (a pass asked for an unimplemented contract)
//! - `3`: Unknown pass or invalid pipeline options
//! - `4`: Structural failure (a mutation could not be hosted in the tree)
//! - `5`: Validation failed (a replacement node was rejected)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! ## Design
//!
//! - **Unified type**: `TugJsError` is the single error type for drivers
//! - **Bridging**: `impl From<X> for TugJsError` lives next to each domain error
//! - **Code mapping**: `ErrorCode` provides stable integer codes

use std::fmt;

use thiserror::Error;

use crate::types::Position;

// ============================================================================
// Error Codes
// ============================================================================

/// Stable error codes for drivers and JSON reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// A caller asked for an operation that is declared but not implemented.
    Unsupported = 2,
    /// Unknown pass name or invalid options.
    InvalidArguments = 3,
    /// The tree could not host a requested mutation.
    Structural = 4,
    /// A replacement node failed validation.
    ValidationFailed = 5,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl ErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type reported to the compilation driver.
#[derive(Debug, Error)]
pub enum TugJsError {
    /// An explicitly unimplemented contract was invoked.
    #[error("unsupported operation: {operation}: {reason}")]
    Unsupported { operation: String, reason: String },

    /// Invalid arguments from the caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A mutation could not be hosted in the tree.
    #[error("{}", located("structural error", .message, .position))]
    Structural {
        message: String,
        position: Option<Position>,
    },

    /// A replacement node was rejected by the validator.
    #[error("{}", located("validation failed", .message, .position))]
    ValidationFailed {
        message: String,
        position: Option<Position>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

fn located(prefix: &str, message: &str, position: &Option<Position>) -> String {
    match position {
        Some(pos) => format!("{}: Line {}: {}", prefix, pos.line, message),
        None => format!("{}: {}", prefix, message),
    }
}

impl From<&TugJsError> for ErrorCode {
    fn from(err: &TugJsError) -> Self {
        match err {
            TugJsError::Unsupported { .. } => ErrorCode::Unsupported,
            TugJsError::InvalidArguments { .. } => ErrorCode::InvalidArguments,
            TugJsError::Structural { .. } => ErrorCode::Structural,
            TugJsError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            TugJsError::InternalError { .. } => ErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl TugJsError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        TugJsError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        TugJsError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        TugJsError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn unsupported_maps_to_two() {
            let err = TugJsError::Unsupported {
                operation: "insert_before".to_string(),
                reason: "expression position".to_string(),
            };
            assert_eq!(err.error_code(), ErrorCode::Unsupported);
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn structural_maps_to_four() {
            let err = TugJsError::Structural {
                message: "no block".to_string(),
                position: None,
            };
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn validation_maps_to_five() {
            let err = TugJsError::ValidationFailed {
                message: "bad node".to_string(),
                position: Some(Position::new(3, 4)),
            };
            assert_eq!(err.error_code().code(), 5);
        }

        #[test]
        fn internal_maps_to_ten() {
            assert_eq!(TugJsError::internal("oops").error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn located_errors_render_line() {
            let err = TugJsError::ValidationFailed {
                message: "return outside function".to_string(),
                position: Some(Position::new(7, 2)),
            };
            assert_eq!(
                err.to_string(),
                "validation failed: Line 7: return outside function"
            );
        }

        #[test]
        fn unlocated_errors_omit_line() {
            let err = TugJsError::Structural {
                message: "no enclosing block".to_string(),
                position: None,
            };
            assert_eq!(err.to_string(), "structural error: no enclosing block");
        }

        #[test]
        fn invalid_args_display() {
            let err = TugJsError::invalid_args("unknown pass 'foo'");
            assert_eq!(err.to_string(), "invalid arguments: unknown pass 'foo'");
        }
    }
}
