// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Replacement node validation.

use tugjs_ast::{check_structure, Ast, NodeId, ValidationError};

use crate::scope::ScopeRecord;

/// Checks each node written into the tree by a replacement.
pub trait NodeValidator {
    /// Called once per replacement node, with the scope of the slot it was
    /// written into.
    fn check_node(
        &self,
        ast: &Ast,
        node: NodeId,
        scope: Option<&ScopeRecord>,
    ) -> Result<(), ValidationError>;
}

/// The default validator: the node must match its kind's field schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl NodeValidator for SchemaValidator {
    fn check_node(
        &self,
        ast: &Ast,
        node: NodeId,
        _scope: Option<&ScopeRecord>,
    ) -> Result<(), ValidationError> {
        check_structure(ast, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_validator_delegates_to_structure_check() {
        let mut ast = Ast::new();
        let x = ast.identifier("x");
        let good = ast.expression_statement(x);
        let bad = ast.block_statement(vec![x]);
        assert!(SchemaValidator.check_node(&ast, good, None).is_ok());
        assert!(SchemaValidator.check_node(&ast, bad, None).is_err());
    }
}
