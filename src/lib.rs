//! A CDCL SAT-backed package dependency resolver.
//!
//! [`sat`] is a self-contained watched-literals solver: variables,
//! clauses, propagation, first-UIP conflict analysis, backjumping and
//! learned-clause garbage collection, generic over a pluggable branching
//! policy. [`domain`] is the only thing built on top of it: it turns
//! packages and a user request into clauses, runs the engine, and decodes
//! the model (or the conflict, on unsatisfiability) back into domain terms.

pub mod domain;
pub mod sat;

mod util;
