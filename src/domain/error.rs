//! Errors the dependency resolver can report.
//!
//! Unsatisfiability is expected, recoverable input: it is returned with its
//! resolution tree attached rather than panicking. Only genuine programmer
//! errors (an [`crate::sat::EngineError`]) would propagate unhandled.

use thiserror::Error;

use super::package::Requirement;
use super::unsat::UnsatisfiabilityError;

#[derive(Debug, Error)]
pub enum ResolveError<'a> {
    #[error("requirement {0:?} is satisfied by no package in the pool")]
    InvalidRequirement(Requirement),

    #[error("request is unsatisfiable")]
    Unsatisfiable(Option<UnsatisfiabilityError<'a>>),

    #[error("solve was cancelled")]
    Cancelled,
}
