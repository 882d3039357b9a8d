//! Packages, requirements and repositories: the domain types the rule
//! generator and pool operate over. A stand-in for the full metadata model,
//! which the core treats as an external collaborator.

use super::version::{Predicate, Version};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub(crate) u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub name: String,
    pub predicate: Predicate,
}

impl Requirement {
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Requirement {
            name: name.into(),
            predicate,
        }
    }

    pub fn any(name: impl Into<String>) -> Self {
        Requirement::new(name, Predicate::Any)
    }

    pub fn matches(&self, package: &Package) -> bool {
        self.name == package.name && self.predicate.matches(package.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: Version,
    pub dependencies: Vec<Requirement>,
    pub conflicts: Vec<Requirement>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Package {
            name: name.into(),
            version,
            dependencies: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    pub fn depends_on(mut self, req: Requirement) -> Self {
        self.dependencies.push(req);
        self
    }

    pub fn conflicts_with(mut self, req: Requirement) -> Self {
        self.conflicts.push(req);
        self
    }
}

/// An ordered collection of packages, as the pool sees them. Order within a
/// repository is preserved into the pool's candidate ordering, which the
/// branching policy's tie-break (and the "newer preferred" default) relies
/// on indirectly through [`super::version::compare`].
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub packages: Vec<Package>,
}

impl Repository {
    pub fn new() -> Self {
        Repository::default()
    }

    pub fn add(&mut self, package: Package) -> &mut Self {
        self.packages.push(package);
        self
    }
}

impl FromIterator<Package> for Repository {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        Repository {
            packages: iter.into_iter().collect(),
        }
    }
}

/// A request for the solver: a sequence of actions against the pool.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub install: Vec<Requirement>,
    pub remove: Vec<Requirement>,
    pub upgrade: Vec<Requirement>,
    pub upgrade_all: bool,
}

impl Request {
    pub fn new() -> Self {
        Request::default()
    }

    pub fn install(mut self, req: Requirement) -> Self {
        self.install.push(req);
        self
    }

    pub fn remove(mut self, req: Requirement) -> Self {
        self.remove.push(req);
        self
    }

    pub fn upgrade(mut self, req: Requirement) -> Self {
        self.upgrade.push(req);
        self
    }

    /// Consider every currently-installed package a candidate for upgrade,
    /// not just the ones named by an explicit `upgrade(Requirement)`.
    pub fn upgrade_all(mut self) -> Self {
        self.upgrade_all = true;
        self
    }
}
