// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source location types shared by the AST and error modules.
//!
//! Lines are 1-indexed and columns are 0-indexed, matching the `loc` objects
//! produced by JavaScript parsers.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Position
// ============================================================================

/// A single point in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed, UTF-8 bytes).
    pub column: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.line, self.column).cmp(&(other.line, other.column))
    }
}

// ============================================================================
// SourceLocation
// ============================================================================

/// The original source extent of a node.
///
/// Nodes synthesized by transformations carry no location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl SourceLocation {
    pub fn new(start: Position, end: Position) -> Self {
        SourceLocation { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_line_then_column() {
        let mut positions = vec![
            Position::new(3, 1),
            Position::new(1, 9),
            Position::new(1, 2),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(1, 2), Position::new(1, 9), Position::new(3, 1)]
        );
    }

    #[test]
    fn location_serializes_as_loc_object() {
        let loc = SourceLocation::new(Position::new(1, 0), Position::new(1, 5));
        let json = serde_json::to_value(loc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start": {"line": 1, "column": 0},
                "end": {"line": 1, "column": 5}
            })
        );
    }
}
