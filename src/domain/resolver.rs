//! The dependency solver driver: builds the pool, generates rules, runs the
//! engine, and decodes the model into a transaction.

use tracing::{info, instrument};

use crate::sat::engine::{CancelToken, Outcome, Solver};

use super::error::ResolveError;
use super::graph::compute_dependencies;
use super::package::{PackageId, Repository, Request};
#[cfg(test)]
use super::package::Requirement;
use super::policy::InstalledFirstPolicy;
use super::pool::Pool;
use super::rules::RuleGenerator;
use super::transaction::Transaction;
use super::unsat::{self, UnsatisfiabilityError};

#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Drop installs not reachable from the request's transitive closure,
    /// compensating for "don't care" model freedom.
    pub prune: bool,
    pub prefer_installed: bool,
    pub allow_multiple_versions: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            prune: true,
            prefer_installed: true,
            allow_multiple_versions: false,
        }
    }
}

pub struct DependencySolver {
    pool: Pool,
    options: SolveOptions,
}

impl DependencySolver {
    pub fn new(remote_repositories: &[Repository], installed_repository: &Repository, options: SolveOptions) -> Self {
        DependencySolver {
            pool: Pool::new(remote_repositories, installed_repository),
            options,
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    #[instrument(skip(self, request))]
    pub fn solve(&self, request: &Request) -> Result<Transaction, ResolveError<'_>> {
        self.solve_with_cancellation(request, None)
    }

    /// Like [`Self::solve`], but a caller on another thread can stop the
    /// search in progress by calling `token.cancel()`.
    pub fn solve_with_cancellation(
        &self,
        request: &Request,
        token: Option<CancelToken>,
    ) -> Result<Transaction, ResolveError<'_>> {
        self.validate(request)?;

        let clauses = RuleGenerator::new(&self.pool)
            .allow_multiple_versions(self.options.allow_multiple_versions)
            .generate(request);
        info!(clause_count = clauses.len(), "generated rule clauses");

        let policy = InstalledFirstPolicy::new(&self.pool, request, self.options.prefer_installed);
        let mut solver = Solver::with_policy(self.pool.len() as u32, policy);
        if let Some(token) = token {
            solver.set_cancel_token(token);
        }
        for clause in &clauses {
            solver
                .add_clause(clause)
                .expect("rule generator only references variables the pool declared");
        }

        match solver.solve() {
            Outcome::Sat(model) => {
                let mut transaction = self.build_transaction(model.as_vec(), request);
                if self.options.prune {
                    self.prune(&mut transaction, request);
                }
                transaction.sort(&self.pool);
                Ok(transaction)
            }
            Outcome::Unsat(conflict) => {
                let explanation = conflict.map(|cls| unsat::explain(solver.trail(), solver.clauses(), cls, &self.pool));
                Err(ResolveError::Unsatisfiable(explanation))
            }
            Outcome::Cancelled => Err(ResolveError::Cancelled),
        }
    }

    fn validate(&self, request: &Request) -> Result<(), ResolveError<'_>> {
        for requirement in request.install.iter().chain(request.upgrade.iter()) {
            if self.pool.what_provides(requirement).is_empty() {
                return Err(ResolveError::InvalidRequirement(requirement.clone()));
            }
        }
        Ok(())
    }

    fn build_transaction(&self, model: Vec<bool>, request: &Request) -> Transaction {
        let mut transaction = Transaction::new();
        let mut to_install = Vec::new();
        let mut to_remove = Vec::new();

        for id in self.pool.iter_ids() {
            let assigned_true = model[id.0 as usize];
            let was_installed = self.pool.is_installed(id);
            if assigned_true && !was_installed {
                to_install.push(id);
            } else if !assigned_true && was_installed {
                to_remove.push(id);
            }
        }

        // Pair a removed package with an installed one of the same name as
        // an Update; anything left over is a plain Install/Remove. Pairing
        // is keyed on package name alone.
        let mut paired_installs = vec![false; to_install.len()];
        for &removed in &to_remove {
            let removed_name = &self.pool.package(removed).name;
            if let Some(idx) = to_install
                .iter()
                .enumerate()
                .position(|(i, &id)| !paired_installs[i] && &self.pool.package(id).name == removed_name)
            {
                paired_installs[idx] = true;
                transaction.update(removed, to_install[idx]);
            } else {
                transaction.remove(removed);
            }
        }
        for (i, &id) in to_install.iter().enumerate() {
            if !paired_installs[i] {
                transaction.install(id);
            }
        }

        let _ = request;
        transaction
    }

    /// Drop installs the request's transitive dependency closure never
    /// reaches.
    fn prune(&self, transaction: &mut Transaction, request: &Request) {
        let mut reachable: rustc_hash::FxHashSet<PackageId> = rustc_hash::FxHashSet::default();
        for requirement in request.install.iter().chain(request.upgrade.iter()) {
            reachable.extend(compute_dependencies(&self.pool, requirement));
        }
        if reachable.is_empty() {
            return; // nothing requested explicitly; pruning would drop everything
        }

        let kept: Vec<super::transaction::Operation> = transaction
            .operations()
            .iter()
            .copied()
            .filter(|op| match op {
                super::transaction::Operation::Install(id) => reachable.contains(id),
                super::transaction::Operation::Update { to, .. } => reachable.contains(to),
                super::transaction::Operation::Remove(_) => true,
            })
            .collect();

        let mut rebuilt = Transaction::new();
        for op in kept {
            match op {
                super::transaction::Operation::Install(id) => rebuilt.install(id),
                super::transaction::Operation::Remove(id) => rebuilt.remove(id),
                super::transaction::Operation::Update { from, to } => rebuilt.update(from, to),
            }
        }
        *transaction = rebuilt;
    }
}
