//! Unit propagation: BFS over the trail, re-establishing the watched-literal
//! invariant for every clause watching a literal that just became false.

use super::clause::{propagate_watch, ClauseDb, ClauseId, WatchOutcome};
use super::trail::{Reason, Trail};
use super::watch::WatchLists;

pub enum PropagateResult {
    Ok,
    Conflict(ClauseId),
}

/// Propagate every literal assigned since `*cursor`, assigning new literals
/// as clauses become unit, until fixpoint or a conflict is found.
///
/// `*cursor` is advanced past every literal processed, so the next call
/// picks up where this one left off, treating the trail as a FIFO
/// propagation queue rather than rescanning it from the start.
pub fn propagate(
    trail: &mut Trail,
    clauses: &mut ClauseDb,
    watches: &mut WatchLists,
    cursor: &mut usize,
) -> PropagateResult {
    while *cursor < trail.len() {
        let lit = trail.nth(*cursor);
        *cursor += 1;
        let false_lit = -lit;

        let (own, mut rest) = watches.remaining(false_lit);
        let mut i = 0;
        while i < own.len() {
            let watch = own[i];
            let clause = clauses.get_mut(watch.clause);
            match propagate_watch(clause, trail, false_lit) {
                WatchOutcome::Ok { new_watch: Some(new_lit) } => {
                    let moved = own.swap_remove(i);
                    rest[new_lit].push(moved);
                }
                WatchOutcome::Ok { new_watch: None } => {
                    i += 1;
                }
                WatchOutcome::Unit(unit_lit) => {
                    if trail.is_false(unit_lit) {
                        return PropagateResult::Conflict(watch.clause);
                    }
                    trail.assign(unit_lit, Reason::Propagated(watch.clause));
                    i += 1;
                }
            }
        }
    }
    PropagateResult::Ok
}
