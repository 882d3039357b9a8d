//! The concrete plan of installs/removes/updates produced from a model.

use std::collections::HashSet;

use rustc_hash::FxHashMap;

use super::graph::DependencyGraph;
use super::package::PackageId;
use super::pool::Pool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install(PackageId),
    Remove(PackageId),
    Update { from: PackageId, to: PackageId },
}

#[derive(Debug, Clone, Default)]
pub struct Transaction {
    operations: Vec<Operation>,
}

impl Transaction {
    pub fn new() -> Self {
        Transaction::default()
    }

    pub fn install(&mut self, id: PackageId) {
        self.operations.push(Operation::Install(id));
    }

    pub fn remove(&mut self, id: PackageId) {
        self.operations.push(Operation::Remove(id));
    }

    pub fn update(&mut self, from: PackageId, to: PackageId) {
        self.operations.push(Operation::Update { from, to });
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Stable ordering: removes, then updates, then installs; within the
    /// update/install tiers, a package never precedes one of its own
    /// dependencies, so applying the transaction in order never needs a
    /// not-yet-installed package.
    pub fn sort(&mut self, pool: &Pool) {
        let present: HashSet<PackageId> = self
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Install(id) => Some(*id),
                Operation::Update { to, .. } => Some(*to),
                Operation::Remove(_) => None,
            })
            .collect();
        let topo_index = topological_index(pool, &present);

        let rank = |op: &Operation| -> (u8, usize) {
            match op {
                Operation::Remove(id) => (0, id.0 as usize),
                Operation::Update { to, .. } => (1, topo_index[to]),
                Operation::Install(id) => (2, topo_index[id]),
            }
        };
        self.operations.sort_by(|a, b| rank(a).cmp(&rank(b)));
    }
}

/// Dependency-first position within `present`: a package's index is always
/// greater than any of its dependencies that are also in `present`, found by
/// a DFS postorder walk of the pool's dependency graph.
fn topological_index(pool: &Pool, present: &HashSet<PackageId>) -> FxHashMap<PackageId, usize> {
    let graph = DependencyGraph::build(pool);
    let mut order = Vec::with_capacity(present.len());
    let mut visited = HashSet::new();

    fn visit(
        id: PackageId,
        graph: &DependencyGraph,
        present: &HashSet<PackageId>,
        visited: &mut HashSet<PackageId>,
        order: &mut Vec<PackageId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        for &dep in graph.neighbors(id) {
            if present.contains(&dep) {
                visit(dep, graph, present, visited, order);
            }
        }
        order.push(id);
    }

    let mut ids: Vec<PackageId> = present.iter().copied().collect();
    ids.sort_by_key(|id| id.0);
    for id in ids {
        visit(id, &graph, present, &mut visited, &mut order);
    }

    order.into_iter().enumerate().map(|(i, id)| (id, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::{Package, Repository};
    use crate::domain::version::Version;

    #[test]
    fn sort_orders_removes_before_updates_before_installs() {
        let mut repo = Repository::new();
        repo.add(Package::new("a", Version::new(1, 0, 0)));
        repo.add(Package::new("b", Version::new(1, 0, 0)));
        repo.add(Package::new("c", Version::new(1, 0, 0)));
        let pool = Pool::new(&[repo], &Repository::new());
        let ids: Vec<PackageId> = pool.iter_ids().collect();

        let mut tx = Transaction::new();
        tx.install(ids[0]);
        tx.update(ids[1], ids[2]);
        tx.remove(ids[1]);
        tx.sort(&pool);

        assert!(matches!(tx.operations()[0], Operation::Remove(_)));
        assert!(matches!(tx.operations()[1], Operation::Update { .. }));
        assert!(matches!(tx.operations()[2], Operation::Install(_)));
    }

    #[test]
    fn install_tier_orders_a_dependency_before_its_dependent() {
        use crate::domain::package::Requirement;
        use crate::domain::version::Predicate;

        let mut repo = Repository::new();
        repo.add(Package::new("A", Version::new(1, 0, 0))
            .depends_on(Requirement::new("B", Predicate::GreaterEq(Version::new(1, 0, 0)))));
        repo.add(Package::new("B", Version::new(1, 0, 0)));
        repo.add(Package::new("B", Version::new(2, 0, 0)));
        let pool = Pool::new(&[repo], &Repository::new());

        let a_id = pool.what_provides(&Requirement::any("A"))[0];
        let b2_id = pool
            .what_provides(&Requirement::new("B", Predicate::Exact(Version::new(2, 0, 0))))[0];

        let mut tx = Transaction::new();
        tx.install(a_id);
        tx.install(b2_id);
        tx.sort(&pool);

        assert_eq!(tx.operations(), &[Operation::Install(b2_id), Operation::Install(a_id)]);
    }
}
