//! The package pool: a bijection between packages and SAT variable ids for
//! the duration of one solve.

use rustc_hash::FxHashSet;

use crate::sat::{Lit, Var};

use super::package::{Package, PackageId, Repository, Requirement};
use super::version::compare;

/// Built once per solve from the remote repositories and the installed
/// repository, then never mutated again.
pub struct Pool {
    packages: Vec<Package>,
    installed: FxHashSet<PackageId>,
}

impl Pool {
    pub fn new(remote: &[Repository], installed_repository: &Repository) -> Self {
        let mut entries: Vec<(Package, bool)> = Vec::new();
        for repo in remote {
            entries.extend(repo.packages.iter().cloned().map(|p| (p, false)));
        }
        entries.extend(installed_repository.packages.iter().cloned().map(|p| (p, true)));

        // Group by name, newest version first within a name. The branching
        // policy's ascending-variable-id tie-break then doubles as "newer
        // preferred" for same-name candidates without the policy needing to
        // know about versions at all.
        entries.sort_by(|a, b| a.0.name.cmp(&b.0.name).then_with(|| compare(b.0.version, a.0.version)));

        let mut packages = Vec::with_capacity(entries.len());
        let mut installed = FxHashSet::default();
        for (i, (package, is_installed)) in entries.into_iter().enumerate() {
            if is_installed {
                installed.insert(PackageId(i as u32));
            }
            packages.push(package);
        }

        Pool { packages, installed }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.0 as usize]
    }

    pub fn is_installed(&self, id: PackageId) -> bool {
        self.installed.contains(&id)
    }

    pub fn iter_ids(&self) -> impl Iterator<Item = PackageId> + '_ {
        (0..self.packages.len() as u32).map(PackageId)
    }

    /// Every package id whose package satisfies `req`, in pool order.
    pub fn what_provides(&self, req: &Requirement) -> Vec<PackageId> {
        self.iter_ids().filter(|&id| req.matches(self.package(id))).collect()
    }

    pub fn var(&self, id: PackageId) -> Var {
        Var::new(id.0 + 1)
    }

    pub fn lit(&self, id: PackageId) -> Lit {
        Lit::from(self.var(id))
    }

    pub fn package_of(&self, v: Var) -> PackageId {
        PackageId(v.get() - 1)
    }
}
