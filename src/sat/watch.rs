//! Watch lists: for each literal `l`, the clauses currently watching `-l`
//! (i.e. the clauses that must be revisited when `l` becomes true).

use super::clause::ClauseId;
use super::data::LitVec;
use super::lit::Lit;

#[derive(Debug, Clone, Copy)]
pub struct Watch {
    pub clause: ClauseId,
}

#[derive(Default)]
pub struct WatchLists {
    lists: LitVec<Vec<Watch>>,
}

impl WatchLists {
    pub fn new() -> Self {
        WatchLists {
            lists: LitVec::new(),
        }
    }

    pub fn expand(&mut self, l: Lit) {
        self.lists.expand(l, Vec::new());
    }

    pub fn add(&mut self, watched: Lit, clause: ClauseId) {
        self.lists[watched].push(Watch { clause });
    }

    /// The watch list for `l`, plus a handle to every other watch list, so a
    /// propagation step can drop/rebuild `l`'s list while pushing onto
    /// others'.
    pub fn remaining(&mut self, l: Lit) -> (&mut Vec<Watch>, super::data::Remaining<'_, Vec<Watch>>) {
        self.lists.remaining(l)
    }

    /// Drop every watch entry pointing at a clause the [`super::clause::ClauseDb`]
    /// has marked garbage.
    pub fn retain_live(&mut self, clauses: &super::clause::ClauseDb) {
        for list in self.lists.iter_mut() {
            list.retain(|w| !clauses.is_garbage(w.clause));
        }
    }
}
