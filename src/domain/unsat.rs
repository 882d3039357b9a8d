//! Explains an unsatisfiable request as a resolution tree: root is the
//! clause that conflicted at decision level 0, children are the
//! clauses resolved against it to derive the forced literals it contains.
//! Rendering this into human-readable text is a presentation-layer concern.

use std::collections::HashMap;

use crate::sat::clause::{ClauseDb, ClauseId};
use crate::sat::lit::Var;
use crate::sat::trail::{Reason, Trail};

use super::pool::Pool;

#[derive(Debug, Clone)]
pub struct ResolutionNode {
    pub clause: ClauseId,
    /// The variable whose forced assignment this clause explains, from its
    /// parent's point of view; `None` at the root.
    pub resolved_var: Option<Var>,
    pub children: Vec<ResolutionNode>,
}

/// Carries enough of the proof to render at any level of detail, plus the
/// pool needed to turn variable ids back into package names.
pub struct UnsatisfiabilityError<'a> {
    pub tree: ResolutionNode,
    pub pool: &'a Pool,
}

impl std::fmt::Debug for UnsatisfiabilityError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsatisfiabilityError")
            .field("tree", &self.tree)
            .finish()
    }
}

pub fn explain<'a>(trail: &Trail, clauses: &ClauseDb, conflict: ClauseId, pool: &'a Pool) -> UnsatisfiabilityError<'a> {
    let mut memo: HashMap<Var, ResolutionNode> = HashMap::new();
    let tree = build(trail, clauses, conflict, None, &mut memo);
    UnsatisfiabilityError { tree, pool }
}

fn build(
    trail: &Trail,
    clauses: &ClauseDb,
    clause: ClauseId,
    resolved_var: Option<Var>,
    memo: &mut HashMap<Var, ResolutionNode>,
) -> ResolutionNode {
    let mut children = Vec::new();
    for &lit in clauses.get(clause) {
        if Some(lit.var()) == resolved_var {
            continue;
        }
        if let Some(Reason::Propagated(reason_clause)) = trail.reason_of(lit.var()) {
            if let Some(cached) = memo.get(&lit.var()) {
                children.push(cached.clone());
                continue;
            }
            let child = build(trail, clauses, reason_clause, Some(lit.var()), memo);
            memo.insert(lit.var(), child.clone());
            children.push(child);
        }
        // Axioms and (at level 0, impossible) decisions are leaf facts.
    }
    ResolutionNode {
        clause,
        resolved_var,
        children,
    }
}
