//! Branching: choosing the next variable to decide, and which polarity to
//! try first.
//!
//! The engine is generic over this choice so a caller (the dependency
//! resolver) can prefer, say, already-installed packages, while the plain
//! DIMACS entry point just walks variables in order.

use super::lit::{Lit, Var};
use super::trail::Trail;

/// Decides which literal to assign next when propagation reaches fixpoint
/// without a conflict.
pub trait BranchingPolicy {
    /// Return the next literal to decide, or `None` if every variable is
    /// already assigned (meaning the trail is a satisfying assignment).
    fn next_decision(&mut self, trail: &Trail) -> Option<Lit>;
}

/// Picks the lowest-numbered unassigned variable and assigns it `false`.
///
/// Used by the raw DIMACS entry point, where variables carry no domain
/// meaning and any fair order suffices.
#[derive(Default)]
pub struct InOrder;

impl BranchingPolicy for InOrder {
    fn next_decision(&mut self, trail: &Trail) -> Option<Lit> {
        (1..=trail.num_vars() as u32)
            .map(Var::new)
            .find(|&v| !trail.is_assigned(v))
            .map(|v| -Lit::from(v))
    }
}
