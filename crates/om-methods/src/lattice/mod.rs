//! Lattice methods for option pricing.
//!
//! # Overview
//!
//! * [`BinomialTree`] — recombining binomial tree (Cox-Ross-Rubinstein,
//!   Leisen-Reimer)
//! * [`TrinomialTree`] — recombining trinomial tree with `u·d = 1`
//! * [`ImpliedTrinomialTree`] — trinomial tree whose transition
//!   probabilities are calibrated node by node to a volatility skew
//!
//! Trees are stored as closed-form level formulas plus dense
//! `(depth, state)` tables; there are no node objects. Backward induction
//! reuses a single layer vector and hands back a [`Rollback`] holding the
//! root value and copies of the depth-1 and depth-2 layers, which are
//! overwritten by the time the root is reached.

pub mod binomial_tree;
pub mod implied_trinomial_tree;
pub mod trinomial_tree;

pub use binomial_tree::{BinomialScheme, BinomialTree};
pub use implied_trinomial_tree::ImpliedTrinomialTree;
pub use trinomial_tree::TrinomialTree;

use om_core::Real;

// ─── Rollback ─────────────────────────────────────────────────────────────────

/// Outcome of a backward induction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rollback {
    /// Value at the root node.
    pub value: Real,
    /// Option values at depth 1, lowest state first (empty if the tree has
    /// no such depth).
    pub depth1: Vec<Real>,
    /// Option values at depth 2, lowest state first.
    pub depth2: Vec<Real>,
}

impl Rollback {
    /// Keep a copy of `layer` if `depth` is one the Greeks are read from.
    pub(crate) fn record(&mut self, depth: usize, layer: &[Real]) {
        match depth {
            1 => self.depth1 = layer.to_vec(),
            2 => self.depth2 = layer.to_vec(),
            _ => {}
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_only_greek_layers() {
        let mut rb = Rollback::default();
        rb.record(3, &[1.0, 2.0, 3.0, 4.0]);
        rb.record(2, &[1.0, 2.0, 3.0]);
        rb.record(1, &[5.0, 6.0]);
        rb.record(0, &[7.0]);
        assert_eq!(rb.depth2, vec![1.0, 2.0, 3.0]);
        assert_eq!(rb.depth1, vec![5.0, 6.0]);
        assert_eq!(rb.value, 0.0);
    }
}
