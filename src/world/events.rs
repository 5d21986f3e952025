use std::collections::BTreeSet;

use crate::collision::BodyPair;

/// Contact state changes between two consecutive steps. A pair counts as
/// touching when its manifold has at least one contact. The three lists are
/// disjoint and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionEvents {
    /// Pairs touching now but not on the previous step.
    pub entered: Vec<BodyPair>,
    /// Pairs touching on both steps.
    pub persisting: Vec<BodyPair>,
    /// Pairs that touched on the previous step and no longer do, including
    /// pairs whose body was removed.
    pub exited: Vec<BodyPair>,
}

impl CollisionEvents {
    pub fn diff(previous: &BTreeSet<BodyPair>, current: &BTreeSet<BodyPair>) -> Self {
        Self {
            entered: current.difference(previous).copied().collect(),
            persisting: current.intersection(previous).copied().collect(),
            exited: previous.difference(current).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.persisting.is_empty() && self.exited.is_empty()
    }

    pub fn clear(&mut self) {
        self.entered.clear();
        self.persisting.clear();
        self.exited.clear();
    }
}
