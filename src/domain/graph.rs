//! Transitive (reverse-)dependency computation over the literal-level
//! dependency graph, grounded on `compute_dependencies`/
//! `compute_reverse_dependencies` from the original Python solver: build a
//! package-to-package graph from the pool's requirements, then take the
//! transitive closure with per-node memoisation so cycles terminate.

use rustc_hash::{FxHashMap, FxHashSet};

use super::package::PackageId;
use super::pool::Pool;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: FxHashMap<PackageId, Vec<PackageId>>,
}

impl DependencyGraph {
    /// `P -> Q` whenever some dependency requirement of `P` is provided by
    /// `Q`, mirroring `package_lit_dependency_graph`.
    pub fn build(pool: &Pool) -> Self {
        let mut edges: FxHashMap<PackageId, Vec<PackageId>> = FxHashMap::default();
        for id in pool.iter_ids() {
            let package = pool.package(id);
            let mut targets = Vec::new();
            for requirement in &package.dependencies {
                targets.extend(pool.what_provides(requirement));
            }
            edges.insert(id, targets);
        }
        DependencyGraph { edges }
    }

    pub fn reversed(&self) -> Self {
        let mut edges: FxHashMap<PackageId, Vec<PackageId>> = FxHashMap::default();
        for &from in self.edges.keys() {
            edges.entry(from).or_default();
        }
        for (&from, targets) in &self.edges {
            for &to in targets {
                edges.entry(to).or_default().push(from);
            }
        }
        DependencyGraph { edges }
    }

    pub(crate) fn neighbors(&self, id: PackageId) -> &[PackageId] {
        self.edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// For every node, every node reachable in one or more steps. Cycles are
    /// handled by tracking nodes currently being expanded on the call stack
    /// and treating them as already-contributed once revisited.
    pub fn transitive_neighbors(&self) -> FxHashMap<PackageId, FxHashSet<PackageId>> {
        let mut memo: FxHashMap<PackageId, FxHashSet<PackageId>> = FxHashMap::default();
        for &id in self.edges.keys() {
            if !memo.contains_key(&id) {
                let mut in_progress = FxHashSet::default();
                self.reachable(id, &mut memo, &mut in_progress);
            }
        }
        memo
    }

    fn reachable(
        &self,
        id: PackageId,
        memo: &mut FxHashMap<PackageId, FxHashSet<PackageId>>,
        in_progress: &mut FxHashSet<PackageId>,
    ) -> FxHashSet<PackageId> {
        if let Some(cached) = memo.get(&id) {
            return cached.clone();
        }
        if in_progress.contains(&id) {
            // Part of a cycle currently being expanded; contribute nothing
            // further here, the enclosing call will pick up the full set.
            return FxHashSet::default();
        }
        in_progress.insert(id);

        let mut result = FxHashSet::default();
        for &next in self.neighbors(id) {
            if result.insert(next) {
                let nested = self.reachable(next, memo, in_progress);
                result.extend(nested);
            }
        }

        in_progress.remove(&id);
        memo.insert(id, result.clone());
        result
    }
}

/// All packages reachable from any provider of `requirement`.
pub fn compute_dependencies(pool: &Pool, requirement: &super::package::Requirement) -> FxHashSet<PackageId> {
    let graph = DependencyGraph::build(pool);
    let neighbors = graph.transitive_neighbors();
    let mut result = FxHashSet::default();
    for id in pool.what_provides(requirement) {
        result.insert(id);
        if let Some(reachable) = neighbors.get(&id) {
            result.extend(reachable.iter().copied());
        }
    }
    result
}

pub fn compute_reverse_dependencies(pool: &Pool, requirement: &super::package::Requirement) -> FxHashSet<PackageId> {
    let graph = DependencyGraph::build(pool).reversed();
    let neighbors = graph.transitive_neighbors();
    let mut result = FxHashSet::default();
    for id in pool.what_provides(requirement) {
        result.insert(id);
        if let Some(reachable) = neighbors.get(&id) {
            result.extend(reachable.iter().copied());
        }
    }
    result
}
