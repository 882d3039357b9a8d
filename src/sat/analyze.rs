//! First-UIP conflict analysis: turns a conflicting clause into a learned
//! clause and the decision level to backjump to.

use super::clause::ClauseDb;
use super::data::VarVec;
use super::lit::Lit;
use super::trail::{Reason, Trail};

/// Resolve `conflict` back to its first unique implication point.
///
/// Returns the learned clause (asserting literal first) and the level to
/// backjump to. The caller must not invoke this when the conflict arose at
/// decision level 0 -- that means the formula is unsatisfiable outright, no
/// resolution needed.
pub fn analyze(trail: &Trail, clauses: &ClauseDb, conflict: super::clause::ClauseId) -> (Vec<Lit>, u32) {
    let current_level = trail.decision_level();
    debug_assert!(current_level > 0, "conflict at level 0 is unsatisfiable, not analyzable");

    let mut seen: VarVec<bool> = VarVec::new();
    seen.resize(trail.num_vars(), false);

    let mut learned: Vec<Lit> = Vec::new();
    let mut counter: u32 = 0;
    let mut clause_lits: &[Lit] = clauses.get(conflict);
    let mut skip: Option<Lit> = None;
    let mut trail_idx = trail.len();

    loop {
        for &lit in clause_lits {
            if Some(lit) == skip {
                continue;
            }
            let var = lit.var();
            if seen[var] {
                continue;
            }
            let level = trail.level_of(var).unwrap_or(0);
            if level == 0 {
                // Forced unconditionally; can never be un-forced by backjumping.
                continue;
            }
            seen[var] = true;
            if level == current_level {
                counter += 1;
            } else {
                learned.push(lit);
            }
        }

        let p = loop {
            trail_idx -= 1;
            let lit = trail.nth(trail_idx);
            if seen[lit.var()] {
                seen[lit.var()] = false;
                break lit;
            }
        };
        counter -= 1;
        if counter == 0 {
            learned.insert(0, -p);
            // Position 1 should be the literal at the next-highest decision
            // level, so the clause's initial watches are both already
            // assigned and the clause asserts immediately after backjump.
            if learned.len() > 1 {
                let highest = (1..learned.len())
                    .max_by_key(|&i| trail.level_of(learned[i].var()).unwrap_or(0))
                    .expect("learned has more than one literal");
                learned.swap(1, highest);
            }
            let backjump = learned[1..]
                .iter()
                .map(|l| trail.level_of(l.var()).unwrap_or(0))
                .max()
                .unwrap_or(0);
            return (learned, backjump);
        }

        clause_lits = match trail.reason_of(p.var()) {
            Some(Reason::Propagated(cls)) => clauses.get(cls),
            other => unreachable!("non-UIP seen variable {p:?} has reason {other:?}"),
        };
        skip = Some(p);
    }
}

/// Literal-block distance: the number of distinct decision levels among
/// `lits`, used to rank learned clauses for garbage collection.
pub fn lbd(trail: &Trail, lits: &[Lit]) -> u32 {
    let mut levels: Vec<u32> = lits.iter().filter_map(|l| trail.level_of(l.var())).collect();
    levels.sort_unstable();
    levels.dedup();
    levels.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::ClauseDb;
    use crate::sat::lit::Var;

    #[test]
    fn learns_unit_clause_from_simple_conflict() {
        let mut trail = Trail::new();
        let mut clauses = ClauseDb::new();
        for i in 1..=2u32 {
            trail.expand(Var::new(i));
        }

        // Decide 1 at level 1; (−1 v 2) forces 2; (−1 v −2) then conflicts.
        let c_force = clauses.insert(vec![Lit::new(-1), Lit::new(2)], false, None);
        let c_conflict = clauses.insert(vec![Lit::new(-1), Lit::new(-2)], false, None);

        trail.assign(Lit::new(1), Reason::Decision);
        trail.assign(Lit::new(2), Reason::Propagated(c_force));

        let (learned, backjump) = analyze(&trail, &clauses, c_conflict);
        assert_eq!(learned, vec![Lit::new(-1)]);
        assert_eq!(backjump, 0);
    }
}
