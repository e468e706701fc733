//! Per-level session state shared with collaborators
//!
//! Holds what other screens need to read back from a running level: the
//! ball's last destroy/reset position (respawn effects) and the level lock
//! table.

use glam::Vec2;

use crate::unlocks::LevelLocks;

#[derive(Debug, Clone)]
pub struct LevelSession {
    /// Level number (index into the lock table)
    pub level: usize,
    pub locks: LevelLocks,
    destroyed_position: Option<Vec2>,
}

impl LevelSession {
    pub fn new(level: usize, locks: LevelLocks) -> Self {
        Self {
            level,
            locks,
            destroyed_position: None,
        }
    }

    /// Ball position at the most recent destroy or reset
    pub fn destroyed_position(&self) -> Option<Vec2> {
        self.destroyed_position
    }

    pub(crate) fn record_destroyed(&mut self, pos: Vec2) {
        self.destroyed_position = Some(pos);
    }

    /// Clear this level's lock flag (safe to repeat)
    pub fn unlock_level(&mut self) {
        if self.locks.is_locked(self.level) {
            log::info!("Level {} unlocked", self.level);
        } else {
            log::trace!("Level {} already unlocked", self.level);
        }
        self.locks.unlock(self.level);
    }
}
