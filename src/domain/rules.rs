//! Translates packages, their declared dependencies/conflicts, and a user
//! request into SAT clauses.

use rustc_hash::FxHashSet;

use super::package::{PackageId, Request, Requirement};
use super::pool::Pool;

/// Whether two distinct versions of the same package name may be installed
/// at once. The default, `false`, generates a pairwise conflict clause for
/// every same-name pair -- "newer preferred" is then left entirely to the
/// branching policy, not encoded in any clause here.
pub struct RuleGenerator<'a> {
    pool: &'a Pool,
    allow_multiple_versions: bool,
}

impl<'a> RuleGenerator<'a> {
    pub fn new(pool: &'a Pool) -> Self {
        RuleGenerator {
            pool,
            allow_multiple_versions: false,
        }
    }

    pub fn allow_multiple_versions(mut self, allow: bool) -> Self {
        self.allow_multiple_versions = allow;
        self
    }

    pub fn generate(&self, request: &Request) -> Vec<Vec<i32>> {
        let mut clauses: Vec<Vec<i32>> = Vec::new();
        let mut seen: FxHashSet<Vec<i32>> = FxHashSet::default();

        let mut push = |clauses: &mut Vec<Vec<i32>>, seen: &mut FxHashSet<Vec<i32>>, mut clause: Vec<i32>| {
            if clause.is_empty() {
                return;
            }
            let mut canonical = clause.clone();
            canonical.sort_unstable();
            if seen.insert(canonical) {
                clause.dedup();
                clauses.push(clause);
            }
        };

        for id in self.pool.iter_ids() {
            self.dependency_clauses(id, &mut clauses, &mut seen, &mut push);
            self.conflict_clauses(id, &mut clauses, &mut seen, &mut push);
        }
        if !self.allow_multiple_versions {
            self.same_name_conflict_clauses(&mut clauses, &mut seen, &mut push);
        }
        self.installed_clauses(request, &mut clauses, &mut seen, &mut push);
        self.request_clauses(request, &mut clauses, &mut seen, &mut push);
        self.upgrade_all_clauses(request, &mut clauses, &mut seen, &mut push);

        clauses
    }

    fn dependency_clauses(
        &self,
        id: PackageId,
        clauses: &mut Vec<Vec<i32>>,
        seen: &mut FxHashSet<Vec<i32>>,
        push: &mut impl FnMut(&mut Vec<Vec<i32>>, &mut FxHashSet<Vec<i32>>, Vec<i32>),
    ) {
        let package = self.pool.package(id);
        let v = self.pool.lit(id).to_i32();
        for requirement in &package.dependencies {
            let providers = self.pool.what_provides(requirement);
            let mut clause = vec![-v];
            clause.extend(providers.iter().map(|&p| self.pool.lit(p).to_i32()));
            push(clauses, seen, clause);
        }
    }

    fn conflict_clauses(
        &self,
        id: PackageId,
        clauses: &mut Vec<Vec<i32>>,
        seen: &mut FxHashSet<Vec<i32>>,
        push: &mut impl FnMut(&mut Vec<Vec<i32>>, &mut FxHashSet<Vec<i32>>, Vec<i32>),
    ) {
        let package = self.pool.package(id);
        let v = self.pool.lit(id).to_i32();
        for requirement in &package.conflicts {
            for other in self.pool.what_provides(requirement) {
                if other == id {
                    continue;
                }
                push(clauses, seen, vec![-v, -self.pool.lit(other).to_i32()]);
            }
        }
    }

    fn same_name_conflict_clauses(
        &self,
        clauses: &mut Vec<Vec<i32>>,
        seen: &mut FxHashSet<Vec<i32>>,
        push: &mut impl FnMut(&mut Vec<Vec<i32>>, &mut FxHashSet<Vec<i32>>, Vec<i32>),
    ) {
        let mut by_name: std::collections::HashMap<&str, Vec<PackageId>> = std::collections::HashMap::new();
        for id in self.pool.iter_ids() {
            by_name.entry(self.pool.package(id).name.as_str()).or_default().push(id);
        }
        for ids in by_name.values() {
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let a = self.pool.lit(ids[i]).to_i32();
                    let b = self.pool.lit(ids[j]).to_i32();
                    push(clauses, seen, vec![-a, -b]);
                }
            }
        }
    }

    fn installed_clauses(
        &self,
        request: &Request,
        clauses: &mut Vec<Vec<i32>>,
        seen: &mut FxHashSet<Vec<i32>>,
        push: &mut impl FnMut(&mut Vec<Vec<i32>>, &mut FxHashSet<Vec<i32>>, Vec<i32>),
    ) {
        for id in self.pool.iter_ids().filter(|&id| self.pool.is_installed(id)) {
            let package = self.pool.package(id);
            let explicitly_removed = request.remove.iter().any(|r| r.matches(package));
            // An upgrade (named or blanket) must be free to swap this exact
            // variant out for a newer one, so its installed unit is not
            // forced -- the request/same-name-conflict clauses below still
            // require some provider of the name to remain true.
            let explicitly_upgraded =
                request.upgrade_all || request.upgrade.iter().any(|r| r.name == package.name);
            if !explicitly_removed && !explicitly_upgraded {
                push(clauses, seen, vec![self.pool.lit(id).to_i32()]);
            }
        }
    }

    /// Blanket upgrade: every currently-installed package name must still be
    /// satisfied by some provider, but (per `installed_clauses` above) not
    /// necessarily the exact variant that was installed before the solve.
    fn upgrade_all_clauses(
        &self,
        request: &Request,
        clauses: &mut Vec<Vec<i32>>,
        seen: &mut FxHashSet<Vec<i32>>,
        push: &mut impl FnMut(&mut Vec<Vec<i32>>, &mut FxHashSet<Vec<i32>>, Vec<i32>),
    ) {
        if !request.upgrade_all {
            return;
        }
        let mut names: Vec<&str> = self
            .pool
            .iter_ids()
            .filter(|&id| self.pool.is_installed(id))
            .map(|id| self.pool.package(id).name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        for name in names {
            let clause = self
                .pool
                .what_provides(&Requirement::any(name))
                .iter()
                .map(|&p| self.pool.lit(p).to_i32())
                .collect();
            push(clauses, seen, clause);
        }
    }

    fn request_clauses(
        &self,
        request: &Request,
        clauses: &mut Vec<Vec<i32>>,
        seen: &mut FxHashSet<Vec<i32>>,
        push: &mut impl FnMut(&mut Vec<Vec<i32>>, &mut FxHashSet<Vec<i32>>, Vec<i32>),
    ) {
        for requirement in request.install.iter().chain(request.upgrade.iter()) {
            let clause = self
                .pool
                .what_provides(requirement)
                .iter()
                .map(|&p| self.pool.lit(p).to_i32())
                .collect();
            push(clauses, seen, clause);
        }
        for requirement in &request.remove {
            for id in self.pool.what_provides(requirement) {
                push(clauses, seen, vec![-self.pool.lit(id).to_i32()]);
            }
        }
    }
}
