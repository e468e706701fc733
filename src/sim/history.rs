//! Walls history seam
//!
//! The history manager keeps undo bookkeeping for bodies the player can
//! affect. Level logic enrolls bodies it creates and drops bodies it
//! destroys.

use rustc_hash::FxHashSet;

use super::body::BodyId;

pub trait BodyHistory {
    /// Start tracking a body
    fn track(&mut self, body: BodyId);

    /// Stop tracking a body
    fn remove_body(&mut self, body: BodyId);
}

/// Tracking set with a removal log
#[derive(Debug, Clone, Default)]
pub struct WallsHistory {
    tracked: FxHashSet<BodyId>,
    removed: Vec<BodyId>,
}

impl WallsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracked(&self, body: BodyId) -> bool {
        self.tracked.contains(&body)
    }

    /// Every removal request, in order (including untracked bodies)
    pub fn removed(&self) -> &[BodyId] {
        &self.removed
    }

    /// How many times a body was removed
    pub fn removal_count(&self, body: BodyId) -> usize {
        self.removed.iter().filter(|b| **b == body).count()
    }
}

impl BodyHistory for WallsHistory {
    fn track(&mut self, body: BodyId) {
        self.tracked.insert(body);
    }

    fn remove_body(&mut self, body: BodyId) {
        if !self.tracked.remove(&body) {
            log::debug!("History asked to drop untracked body {:?}", body);
        }
        self.removed.push(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_stops_tracking() {
        let mut history = WallsHistory::new();
        history.track(BodyId(1));
        history.remove_body(BodyId(1));
        assert!(!history.is_tracked(BodyId(1)));
        assert_eq!(history.removal_count(BodyId(1)), 1);
    }
}
