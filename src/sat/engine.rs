//! The top-level CDCL driver: ties propagation, conflict analysis,
//! branching and garbage collection together into `solve`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, instrument};

use super::analyze::{analyze, lbd};
use super::clause::ClauseDb;
use super::dimacs;
use super::error::{EngineError, LoadError};
use super::gc::{self, GcConfig};
use super::lit::{Lit, Var};
use super::model::Model;
use super::policy::{BranchingPolicy, InOrder};
use super::propagate::{propagate, PropagateResult};
use super::trail::{Reason, Trail};
use super::watch::WatchLists;

#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub conflicts: u64,
    pub propagations: u64,
    pub decisions: u64,
    pub learned_clauses: u64,
    conflicts_since_gc: u64,
}

/// Tunable limits governing how aggressively the solver garbage-collects
/// learned clauses. Exposed so long-running callers (the dependency
/// resolver, across many incremental solves) can tune it.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub gc: GcConfig,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { gc: GcConfig::default() }
    }
}

/// A handle a caller can use to cooperatively stop a solve in progress.
/// Checked once per decision, never mid-propagation.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub enum Outcome<'a> {
    Sat(Model<'a>),
    /// The clause that conflicted at decision level 0, i.e. with no
    /// decisions left to retract. `None` when unsatisfiability was already
    /// evident from the input clauses themselves (an empty clause, or two
    /// contradictory units) before search began.
    Unsat(Option<super::clause::ClauseId>),
    Cancelled,
}

impl Outcome<'_> {
    pub fn is_sat(&self) -> bool {
        matches!(self, Outcome::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Outcome::Unsat(_))
    }

    pub fn unwrap_unsat(self) -> Option<super::clause::ClauseId> {
        match self {
            Outcome::Unsat(cls) => cls,
            _ => panic!("called `unwrap_unsat` on a non-Unsat outcome"),
        }
    }
}

pub struct Solver<P: BranchingPolicy = InOrder> {
    clauses: ClauseDb,
    watches: WatchLists,
    trail: Trail,
    cursor: usize,
    policy: P,
    stats: Stats,
    limits: Limits,
    trivially_unsat: bool,
    cancel: CancelToken,
}

impl Solver<InOrder> {
    pub fn new(num_vars: u32) -> Self {
        Solver::with_policy(num_vars, InOrder)
    }

    pub fn from_dimacs(input: &str) -> Result<Self, LoadError> {
        let raw_clauses = dimacs::parse(input)?;
        let num_vars = raw_clauses
            .iter()
            .flatten()
            .map(|l| l.unsigned_abs())
            .max()
            .unwrap_or(0);
        let mut solver = Solver::new(num_vars);
        for clause in raw_clauses {
            solver.add_clause(&clause)?;
        }
        Ok(solver)
    }
}

impl<P: BranchingPolicy> Solver<P> {
    pub fn with_policy(num_vars: u32, policy: P) -> Self {
        let mut trail = Trail::new();
        let mut watches = WatchLists::new();
        for i in 1..=num_vars {
            let v = Var::new(i);
            trail.expand(v);
            watches.expand(Lit::from(v));
            watches.expand(-Lit::from(v));
        }
        Solver {
            clauses: ClauseDb::new(),
            watches,
            trail,
            cursor: 0,
            policy,
            stats: Stats::default(),
            limits: Limits::default(),
            trivially_unsat: false,
            cancel: CancelToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Share an externally-held token so another thread can cooperatively
    /// stop this solve while it runs. Must be called before [`Self::solve`].
    pub fn set_cancel_token(&mut self, token: CancelToken) {
        self.cancel = token;
    }

    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn clauses(&self) -> &ClauseDb {
        &self.clauses
    }

    fn lit_of(&self, raw: i32) -> Result<Lit, EngineError> {
        let lit = Lit::new(raw);
        if lit.var().get() > self.trail.num_vars() as u32 {
            return Err(EngineError::UndeclaredVariable(lit.var().get()));
        }
        Ok(lit)
    }

    /// Add an input clause. A clause that is already satisfied at level 0 is
    /// silently dropped; an empty clause, or one that conflicts with an
    /// existing unit assignment, marks the instance trivially unsatisfiable.
    pub fn add_clause(&mut self, raw: &[i32]) -> Result<(), EngineError> {
        let mut lits: Vec<Lit> = raw.iter().map(|&r| self.lit_of(r)).collect::<Result<_, _>>()?;
        lits.sort_by_key(|l| l.var().get());
        lits.dedup();
        if lits.windows(2).any(|w| w[0] == -w[1]) {
            return Ok(()); // tautological, always satisfied
        }

        match lits.as_slice() {
            [] => self.trivially_unsat = true,
            [unit] => {
                let unit = *unit;
                if self.trail.is_false(unit) {
                    self.trivially_unsat = true;
                } else if self.trail.is_unassigned(unit) {
                    self.trail.assign(unit, Reason::Axiom);
                }
            }
            _ => {
                let id = self.clauses.insert(lits.clone(), false, None);
                self.watches.add(lits[0], id);
                self.watches.add(lits[1], id);
            }
        }
        Ok(())
    }

    fn maybe_collect_garbage(&mut self) {
        if self.stats.conflicts_since_gc < self.limits.gc.conflicts_between_runs {
            return;
        }
        self.stats.conflicts_since_gc = 0;
        let garbage = gc::select_for_collection(&self.clauses, &self.limits.gc);
        if garbage.is_empty() {
            return;
        }
        debug!(count = garbage.len(), "collecting learned clauses");
        for id in garbage {
            self.clauses.mark_garbage(id);
        }
        self.watches.retain_live(&self.clauses);
    }

    /// Cooperative cancellation: unwind every decision back to level 0
    /// before handing `Cancelled` back, so a caller that retries later sees
    /// the same clean state a fresh `Solver` would.
    fn unwind_to_root(&mut self) {
        if self.trail.decision_level() == 0 {
            return;
        }
        self.trail.backtrack_to(0, |_, reason| {
            if let Reason::Propagated(cls) = reason {
                self.clauses.set_is_reason(cls, false);
            }
        });
        self.cursor = self.trail.len();
    }

    /// Defence-in-depth: every live clause must have a true literal under a
    /// reported model. A violation here means the watched-literal machinery
    /// is desynchronised from the trail -- an internal bug, not a reachable
    /// user-facing condition -- so it panics with the offending clause and a
    /// trail snapshot rather than returning a `Result` a caller could
    /// plausibly recover from.
    #[cfg(debug_assertions)]
    fn check_model(&self) {
        for (id, lits) in self.clauses.iter() {
            if self.clauses.is_garbage(id) {
                continue;
            }
            let satisfied = lits.iter().any(|&l| self.trail.is_true(l));
            if !satisfied {
                let trail_snapshot: Vec<String> = self.trail.assigned_in_order().map(|l| self.trail.fmt_lit(l)).collect();
                let diagnostic = EngineError::InvariantViolation(format!(
                    "clause {id:?} ({lits:?}) has no true literal; trail = {trail_snapshot:?}"
                ));
                panic!("{diagnostic}");
            }
        }
    }

    /// Run CDCL search to completion, or until cancelled.
    #[instrument(skip(self))]
    pub fn solve(&mut self) -> Outcome<'_> {
        if self.trivially_unsat {
            return Outcome::Unsat(None);
        }
        loop {
            match propagate(&mut self.trail, &mut self.clauses, &mut self.watches, &mut self.cursor) {
                PropagateResult::Conflict(conflict) => {
                    self.stats.conflicts += 1;
                    self.stats.conflicts_since_gc += 1;
                    if self.trail.decision_level() == 0 {
                        return Outcome::Unsat(Some(conflict));
                    }
                    let (learned, backjump_level) = analyze(&self.trail, &self.clauses, conflict);
                    self.trail.backtrack_to(backjump_level, |_, reason| {
                        if let Reason::Propagated(cls) = reason {
                            self.clauses.set_is_reason(cls, false);
                        }
                    });
                    self.cursor = self.trail.len();

                    let asserting = learned[0];
                    debug!(
                        learned = %self.trail.fmt_lit(asserting),
                        backjump_level = backjump_level,
                        "learned clause"
                    );
                    if learned.len() == 1 {
                        self.trail.assign(asserting, Reason::Axiom);
                    } else {
                        let glue = lbd(&self.trail, &learned);
                        let id = self.clauses.insert(learned.clone(), true, Some(glue));
                        self.watches.add(learned[0], id);
                        self.watches.add(learned[1], id);
                        self.clauses.set_is_reason(id, true);
                        self.stats.learned_clauses += 1;
                        self.trail.assign(asserting, Reason::Propagated(id));
                    }
                    self.maybe_collect_garbage();
                }
                PropagateResult::Ok => {
                    self.stats.propagations = self.trail.len() as u64;
                    if self.trail.all_assigned() {
                        #[cfg(debug_assertions)]
                        self.check_model();
                        return Outcome::Sat(Model::new(&self.trail));
                    }
                    if self.cancel.is_cancelled() {
                        self.unwind_to_root();
                        return Outcome::Cancelled;
                    }
                    self.maybe_collect_garbage();
                    match self.policy.next_decision(&self.trail) {
                        Some(lit) => {
                            self.stats.decisions += 1;
                            self.trail.assign(lit, Reason::Decision);
                        }
                        None => unreachable!("branching policy found nothing while trail is incomplete"),
                    }
                }
            }
        }
    }
}
