//! Installed-first branching: among unassigned variables, prefer
//! currently-installed packages, then packages named by the
//! request, then everything else -- always trying `True` first, tie-broken
//! by ascending variable id for determinism.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::sat::policy::BranchingPolicy;
use crate::sat::trail::Trail;
use crate::sat::lit::{Lit, Var};

use super::package::Request;
use super::pool::Pool;

pub struct InstalledFirstPolicy<'a> {
    pool: &'a Pool,
    requested_vars: FxHashSet<Var>,
    /// Names targeted by an `upgrade`/`upgrade_all` action: their installed
    /// variant is excluded from tier 1 so the ascending-var-id tie-break in
    /// tier 3 (which newest-first pool ordering biases towards the newer
    /// version, see `Pool::new`) gets a chance to pick a replacement instead
    /// of the solver always re-affirming the status quo.
    upgrading_names: FxHashSet<String>,
    prefer_installed: bool,
}

impl<'a> InstalledFirstPolicy<'a> {
    pub fn new(pool: &'a Pool, request: &Request, prefer_installed: bool) -> Self {
        let mut requested_vars = FxHashSet::default();
        for requirement in request.install.iter().chain(request.upgrade.iter()) {
            for id in pool.what_provides(requirement) {
                requested_vars.insert(pool.var(id));
            }
        }

        let mut upgrading_names: FxHashSet<String> = FxHashSet::default();
        if request.upgrade_all {
            for id in pool.iter_ids().filter(|&id| pool.is_installed(id)) {
                upgrading_names.insert(pool.package(id).name.clone());
            }
        }
        for requirement in &request.upgrade {
            upgrading_names.insert(requirement.name.clone());
        }

        InstalledFirstPolicy {
            pool,
            requested_vars,
            upgrading_names,
            prefer_installed,
        }
    }

    fn unassigned(&self, trail: &Trail) -> impl Iterator<Item = Var> + '_ {
        (1..=trail.num_vars() as u32).map(Var::new).filter(move |&v| !trail.is_assigned(v))
    }

    fn is_upgrading(&self, id: super::package::PackageId) -> bool {
        self.upgrading_names.contains(&self.pool.package(id).name)
    }
}

impl BranchingPolicy for InstalledFirstPolicy<'_> {
    fn next_decision(&mut self, trail: &Trail) -> Option<Lit> {
        if self.prefer_installed {
            if let Some(v) = self.unassigned(trail).find(|&v| {
                let id = self.pool.package_of(v);
                self.pool.is_installed(id) && !self.is_upgrading(id)
            }) {
                debug!(var = v.get(), "deciding installed package true");
                return Some(Lit::from(v));
            }
        }
        if let Some(v) = self.unassigned(trail).find(|v| self.requested_vars.contains(v)) {
            debug!(var = v.get(), "deciding requested package true");
            return Some(Lit::from(v));
        }
        self.unassigned(trail).min_by_key(|v| v.get()).map(Lit::from)
    }
}
