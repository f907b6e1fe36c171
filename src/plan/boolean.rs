//! Operand selection for `and`/`or` chains.
//!
//! `a or b and c or d` parses as two tiers: an `or` chain with operands
//! `a`, `b and c`, `d`, and an `and` chain nested in its second operand. Only
//! the tier that directly encloses the cursor is broken; the other tier's
//! operators stay inline on the lines the break produces.

use crate::position::Span;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

/// Operands that each start a line when `node` is wrapped. A chain yields its
/// flattened same-operator operands; any other node is a single operand.
pub fn tier_operands(tree: &SyntaxTree, node: NodeId) -> Vec<NodeId> {
    match tree.kind(node) {
        NodeKind::BooleanChain(chain) => chain.operands.clone(),
        _ => vec![node],
    }
}

/// Operator tokens between the operands [`tier_operands`] returns.
pub fn tier_operators(tree: &SyntaxTree, node: NodeId) -> Vec<Span> {
    match tree.kind(node) {
        NodeKind::BooleanChain(chain) => chain.operators.clone(),
        _ => Vec::new(),
    }
}
