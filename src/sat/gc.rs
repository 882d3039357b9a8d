//! Learned-clause garbage collection.
//!
//! Mirrors the teacher's strategy: periodically drop the least useful
//! learned clauses (low glue, i.e. high LBD, is worse) to keep propagation
//! fast, while never touching input clauses or a clause currently serving
//! as someone's `reason[]`.

use super::clause::{ClauseDb, ClauseId};

/// How often, and how aggressively, to collect learned clauses.
#[derive(Debug, Clone, Copy)]
pub struct GcConfig {
    /// Run a collection after this many conflicts since the last one.
    pub conflicts_between_runs: u64,
    /// Learned clauses with LBD at or below this are never collected --
    /// they're considered too valuable to discard.
    pub lbd_floor: u32,
    /// Fraction (0.0-1.0) of eligible learned clauses removed per run.
    pub removal_fraction: f64,
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            conflicts_between_runs: 3000,
            lbd_floor: 2,
            removal_fraction: 0.75,
        }
    }
}

/// Select which learned clauses should be marked garbage this run, without
/// mutating anything. The caller still owns rebuilding watch lists once the
/// chosen clauses are actually removed.
pub fn select_for_collection(clauses: &ClauseDb, config: &GcConfig) -> Vec<ClauseId> {
    let mut eligible: Vec<(ClauseId, u32, usize)> = clauses
        .iter()
        .filter(|(id, lits)| {
            clauses.is_learnt(*id) && !clauses.is_reason(*id) && lits.len() > config.lbd_floor as usize + 1
        })
        .filter_map(|(id, lits)| clauses.lbd(id).map(|lbd| (id, lbd, lits.len())))
        .filter(|(_, lbd, _)| *lbd > config.lbd_floor)
        .collect();

    // Worse clauses first: higher LBD, then longer, are less likely to be
    // useful again.
    eligible.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));

    let cutoff = (eligible.len() as f64 * config.removal_fraction) as usize;
    eligible.into_iter().take(cutoff).map(|(id, ..)| id).collect()
}
