//! A satisfying assignment, as handed back to callers once the trail is
//! complete.

use super::lit::Var;
use super::trail::Trail;

/// A read-only view of a complete, satisfying assignment.
pub struct Model<'a> {
    trail: &'a Trail,
}

impl<'a> Model<'a> {
    pub(super) fn new(trail: &'a Trail) -> Self {
        debug_assert!(trail.all_assigned(), "model requested before every variable was assigned");
        Model { trail }
    }

    /// Whether `v` is assigned `true` in this model.
    pub fn value(&self, v: Var) -> bool {
        self.trail
            .value(v.into())
            .expect("every variable is assigned in a complete model")
    }

    /// The model as a dense vector indexed by `Var::get() - 1`.
    pub fn as_vec(&self) -> Vec<bool> {
        (1..=self.trail.num_vars() as u32).map(|i| self.value(Var::new(i))).collect()
    }
}
