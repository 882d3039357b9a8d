//! The assignment trail: chronological record of every assigned literal,
//! with enough bookkeeping to backjump to an arbitrary earlier level.

use super::clause::ClauseId;
use super::data::VarVec;
use super::lit::{Lit, Var};

/// Why a literal ended up on the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Chosen by the branching policy; starts a new decision level.
    Decision,
    /// Forced by unit propagation on `clause`.
    Propagated(ClauseId),
    /// Forced at decision level 0, independent of any decision (a learned
    /// unit clause, or a unit clause supplied at construction time).
    Axiom,
}

#[derive(Debug, Clone, Copy)]
struct VarState {
    value: bool,
    level: u32,
    reason: Reason,
}

#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    lit: Lit,
}

/// Chronological assignment trail plus the per-variable assignment table.
#[derive(Default)]
pub struct Trail {
    order: Vec<TrailEntry>,
    /// `order` index at which each decision level began; `level_starts[0]`
    /// is always 0 (axioms and level-0 propagations).
    level_starts: Vec<usize>,
    state: VarVec<Option<VarState>>,
}

impl Trail {
    pub fn new() -> Self {
        Trail {
            order: Vec::new(),
            level_starts: vec![0],
            state: VarVec::new(),
        }
    }

    pub fn expand(&mut self, v: Var) {
        self.state.expand(v, None);
    }

    pub fn num_vars(&self) -> usize {
        self.state.len()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn decision_level(&self) -> u32 {
        self.level_starts.len() as u32 - 1
    }

    pub fn is_assigned(&self, v: Var) -> bool {
        self.state[v].is_some()
    }

    pub fn value(&self, l: Lit) -> Option<bool> {
        self.state[l.var()].map(|s| s.value == l.is_pos())
    }

    pub fn is_true(&self, l: Lit) -> bool {
        self.value(l) == Some(true)
    }

    pub fn is_false(&self, l: Lit) -> bool {
        self.value(l) == Some(false)
    }

    pub fn is_unassigned(&self, l: Lit) -> bool {
        self.value(l).is_none()
    }

    pub fn level_of(&self, v: Var) -> Option<u32> {
        self.state[v].map(|s| s.level)
    }

    pub fn reason_of(&self, v: Var) -> Option<Reason> {
        self.state[v].map(|s| s.reason)
    }

    /// Push `lit` onto the trail. `reason == Decision` opens a new level.
    pub fn assign(&mut self, lit: Lit, reason: Reason) {
        debug_assert!(self.is_unassigned(lit), "variable already assigned");
        if reason == Reason::Decision {
            self.level_starts.push(self.order.len());
        }
        let level = self.decision_level();
        self.state[lit.var()] = Some(VarState {
            value: lit.is_pos(),
            level,
            reason,
        });
        self.order.push(TrailEntry { lit });
    }

    pub fn assigned_in_order(&self) -> impl Iterator<Item = Lit> + '_ {
        self.order.iter().map(|e| e.lit)
    }

    /// The literal assigned at trail position `i`.
    pub fn nth(&self, i: usize) -> Lit {
        self.order[i].lit
    }

    pub fn all_assigned(&self) -> bool {
        self.order.len() == self.state.len()
    }

    /// Undo every assignment made at a decision level strictly greater than
    /// `target_level`, invoking `on_undo` for each undone literal (most
    /// recent first) so the caller can do bookkeeping (watch list updates,
    /// clearing `IS_REASON` flags). Returns the number of literals undone.
    pub fn backtrack_to(&mut self, target_level: u32, mut on_undo: impl FnMut(Lit, Reason)) -> usize {
        debug_assert!(target_level <= self.decision_level());
        let boundary = self.level_starts[(target_level + 1) as usize];
        let mut undone = 0;
        while self.order.len() > boundary {
            let entry = self.order.pop().expect("checked non-empty above");
            let state = self.state[entry.lit.var()]
                .take()
                .expect("trail entries always have a matching state");
            on_undo(entry.lit, state.reason);
            undone += 1;
        }
        self.level_starts.truncate(target_level as usize + 1);
        undone
    }

    pub fn fmt_lit(&self, l: Lit) -> String {
        match self.value(l) {
            Some(true) => format!("{l}"),
            Some(false) => format!("\u{2010}{l}"),
            None => format!("?{l}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_backtrack() {
        let mut trail = Trail::new();
        for i in 1..=3u32 {
            trail.expand(Var::new(i));
        }

        trail.assign(Lit::new(1), Reason::Decision);
        trail.assign(Lit::new(2), Reason::Propagated(test_clause_id()));
        assert_eq!(trail.decision_level(), 1);

        trail.assign(Lit::new(-3), Reason::Decision);
        assert_eq!(trail.decision_level(), 2);
        assert_eq!(trail.len(), 3);

        let mut undone = Vec::new();
        trail.backtrack_to(1, |lit, _| undone.push(lit));
        assert_eq!(trail.decision_level(), 1);
        assert_eq!(undone, vec![Lit::new(-3)]);
        assert!(trail.is_true(Lit::new(2)));
    }

    fn test_clause_id() -> ClauseId {
        let mut db = super::super::clause::ClauseDb::new();
        db.insert(vec![Lit::new(1), Lit::new(2)], false, None)
    }
}
