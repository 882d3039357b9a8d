//! Package dependency resolution atop [`crate::sat`]: pool construction,
//! rule generation, installed-first branching, transaction decoding, and
//! the unsatisfiability explainer.

pub mod error;
pub mod graph;
pub mod package;
pub mod policy;
pub mod pool;
pub mod resolver;
pub mod rules;
pub mod transaction;
pub mod unsat;
pub mod version;

pub use error::ResolveError;
pub use package::{Package, PackageId, Repository, Request, Requirement};
pub use pool::Pool;
pub use resolver::{DependencySolver, SolveOptions};
pub use rules::RuleGenerator;
pub use transaction::{Operation, Transaction};
pub use version::{Predicate, Version};
