//! Errors the SAT engine itself can raise.
//!
//! Unsatisfiability is not one of these: it's a normal, expected outcome of
//! [`crate::sat::engine::Solver::solve`], represented in its `Outcome`, not
//! thrown as an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("clause references variable {0} which was never declared")]
    UndeclaredVariable(u32),

    #[error("internal consistency check failed: {0}")]
    InvariantViolation(String),
}

/// Errors that can occur while building a [`crate::sat::engine::Solver`]
/// from a DIMACS document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Dimacs(#[from] super::dimacs::DimacsError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
