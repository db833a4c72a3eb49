// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Session configuration.

use serde::{Deserialize, Serialize};

/// Default bound on chained `resolve` steps.
pub const DEFAULT_RESOLVE_DEPTH_LIMIT: usize = 64;

/// Options for a traversal [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Run the node validator on every replacement node.
    pub validate_replacements: bool,
    /// Maximum number of chained steps `resolve` follows before giving up.
    pub resolve_depth_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            validate_replacements: true,
            resolve_depth_limit: DEFAULT_RESOLVE_DEPTH_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let opts: SessionOptions =
            serde_json::from_str(r#"{"validate_replacements": false}"#).unwrap();
        assert!(!opts.validate_replacements);
        assert_eq!(opts.resolve_depth_limit, DEFAULT_RESOLVE_DEPTH_LIMIT);
    }
}
