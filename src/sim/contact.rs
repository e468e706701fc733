//! Contact listener seam
//!
//! Collision detection lives in the physics backend. Level logic only asks
//! which bodies of a given kind the ball is touching right now.

use super::body::BodyId;

/// Contact categories reported against the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    Arrow,
    BlackHole,
    /// Inner kill zone of a black hole (stricter than `BlackHole`)
    BlackHoleCenter,
    Fan,
    GumCloud,
    Key,
    Magnet,
    Teleporter,
    Laser,
    Portal,
}

impl ContactKind {
    pub const COUNT: usize = 10;

    fn index(self) -> usize {
        self as usize
    }
}

/// Read side of the contact listener
pub trait ContactListener {
    /// Bodies of `kind` currently touching the ball
    fn touching(&self, kind: ContactKind) -> &[BodyId];

    fn is_touching(&self, kind: ContactKind) -> bool {
        !self.touching(kind).is_empty()
    }
}

/// Contact set recorded for one frame
#[derive(Debug, Clone, Default)]
pub struct ContactReport {
    sets: [Vec<BodyId>; ContactKind::COUNT],
}

impl ContactReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ContactReport::begin`]
    pub fn with(mut self, kind: ContactKind, body: BodyId) -> Self {
        self.begin(kind, body);
        self
    }

    /// Record a contact start (duplicates ignored)
    pub fn begin(&mut self, kind: ContactKind, body: BodyId) {
        let set = &mut self.sets[kind.index()];
        if !set.contains(&body) {
            set.push(body);
        }
    }

    /// Record a contact end
    pub fn end(&mut self, kind: ContactKind, body: BodyId) {
        self.sets[kind.index()].retain(|b| *b != body);
    }

    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.clear();
        }
    }
}

impl ContactListener for ContactReport {
    fn touching(&self, kind: ContactKind) -> &[BodyId] {
        &self.sets[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_end() {
        let mut report = ContactReport::new()
            .with(ContactKind::Fan, BodyId(3))
            .with(ContactKind::Fan, BodyId(3));
        assert_eq!(report.touching(ContactKind::Fan), &[BodyId(3)]);
        assert!(!report.is_touching(ContactKind::Magnet));
        report.end(ContactKind::Fan, BodyId(3));
        assert!(!report.is_touching(ContactKind::Fan));
    }

    #[test]
    fn test_kinds_are_distinct_slots() {
        assert_eq!(ContactKind::Portal as usize, ContactKind::COUNT - 1);
    }
}
