//! Level lock flags
//!
//! One flag per level number; `true` means locked. Completing a level clears
//! its flag.

use serde::{Deserialize, Serialize};

/// Indexed level lock table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelLocks {
    locked: Vec<bool>,
}

impl LevelLocks {
    /// Create a table of `count` levels with only the first one open
    pub fn new(count: usize) -> Self {
        let mut locked = vec![true; count];
        if let Some(first) = locked.first_mut() {
            *first = false;
        }
        Self { locked }
    }

    /// Number of levels tracked
    pub fn len(&self) -> usize {
        self.locked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked.is_empty()
    }

    /// Levels outside the table count as locked
    pub fn is_locked(&self, level: usize) -> bool {
        self.locked.get(level).copied().unwrap_or(true)
    }

    /// Clear the lock flag for a level (idempotent, grows the table if needed)
    pub fn unlock(&mut self, level: usize) {
        if level >= self.locked.len() {
            self.locked.resize(level + 1, true);
        }
        self.locked[level] = false;
    }

    /// Number of unlocked levels
    pub fn unlocked_count(&self) -> usize {
        self.locked.iter().filter(|l| !**l).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_opens_first_level() {
        let locks = LevelLocks::new(4);
        assert!(!locks.is_locked(0));
        assert!(locks.is_locked(1));
        assert!(locks.is_locked(99));
        assert_eq!(locks.unlocked_count(), 1);
    }

    #[test]
    fn test_unlock_is_idempotent_and_grows() {
        let mut locks = LevelLocks::new(2);
        locks.unlock(5);
        locks.unlock(5);
        assert_eq!(locks.len(), 6);
        assert!(!locks.is_locked(5));
        assert!(locks.is_locked(4));
        assert_eq!(locks.unlocked_count(), 2);
    }

    #[test]
    fn test_json_survives_save() {
        let mut locks = LevelLocks::new(3);
        locks.unlock(2);
        let json = locks.to_json().unwrap();
        assert_eq!(LevelLocks::from_json(&json).unwrap(), locks);
    }
}
