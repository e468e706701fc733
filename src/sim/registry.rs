//! Entity registry and contact correlation
//!
//! Level loading registers every entity once. Collections keep registration
//! order, which is also update and draw order. Contact-driven kinds get an
//! [`EntityHandle`] and an entry in the body index, so correlating a reported
//! body with its entity is a map lookup.

use rustc_hash::FxHashMap;

use super::ball::Ball;
use super::body::BodyId;
use super::entities::{
    Arrow, BlackHole, Boundaries, Fan, GumCloud, Key, Laser, Magnet, Portal, Teleporter, Wall,
};

/// Kinds whose instances are matched against reported bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Arrow,
    BlackHole,
    Fan,
    Magnet,
    Teleporter,
}

/// Stable handle of a registered entity: its kind and registration index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub kind: EntityKind,
    pub index: usize,
}

/// Owner of every level entity
#[derive(Debug, Default)]
pub struct EntityRegistry {
    pub(crate) arrows: Vec<Arrow>,
    pub(crate) black_holes: Vec<BlackHole>,
    pub(crate) fans: Vec<Fan>,
    pub(crate) gum_clouds: Vec<GumCloud>,
    pub(crate) magnets: Vec<Magnet>,
    pub(crate) teleporters: Vec<Teleporter>,
    pub(crate) walls: Vec<Wall>,
    pub(crate) lasers: Vec<Laser>,
    pub(crate) ball: Option<Ball>,
    pub(crate) key: Option<Key>,
    pub(crate) portal: Option<Portal>,
    pub(crate) boundaries: Option<Boundaries>,
    index: FxHashMap<BodyId, EntityHandle>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn indexed(&mut self, body: BodyId, kind: EntityKind, index: usize) -> EntityHandle {
        let handle = EntityHandle { kind, index };
        self.index.insert(body, handle);
        handle
    }

    pub fn register_arrow(&mut self, arrow: Arrow) -> EntityHandle {
        let body = arrow.placement.body;
        self.arrows.push(arrow);
        self.indexed(body, EntityKind::Arrow, self.arrows.len() - 1)
    }

    pub fn register_black_hole(&mut self, black_hole: BlackHole) -> EntityHandle {
        let body = black_hole.placement.body;
        self.black_holes.push(black_hole);
        self.indexed(body, EntityKind::BlackHole, self.black_holes.len() - 1)
    }

    pub fn register_fan(&mut self, fan: Fan) -> EntityHandle {
        let body = fan.placement.body;
        self.fans.push(fan);
        self.indexed(body, EntityKind::Fan, self.fans.len() - 1)
    }

    pub fn register_magnet(&mut self, magnet: Magnet) -> EntityHandle {
        let body = magnet.placement.body;
        self.magnets.push(magnet);
        self.indexed(body, EntityKind::Magnet, self.magnets.len() - 1)
    }

    pub fn register_teleporter(&mut self, teleporter: Teleporter) -> EntityHandle {
        let body = teleporter.placement.body;
        self.teleporters.push(teleporter);
        self.indexed(body, EntityKind::Teleporter, self.teleporters.len() - 1)
    }

    pub fn register_gum_cloud(&mut self, gum_cloud: GumCloud) {
        self.gum_clouds.push(gum_cloud);
    }

    pub fn register_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn register_laser(&mut self, laser: Laser) {
        self.lasers.push(laser);
    }

    pub fn register_ball(&mut self, ball: Ball) {
        self.ball = Some(ball);
    }

    pub fn register_key(&mut self, key: Key) {
        self.key = Some(key);
    }

    pub fn register_portal(&mut self, portal: Portal) {
        self.portal = Some(portal);
    }

    pub fn register_boundaries(&mut self, boundaries: Boundaries) {
        self.boundaries = Some(boundaries);
    }

    /// Entity backed by a body, if it is a correlated kind
    pub fn lookup(&self, body: BodyId) -> Option<EntityHandle> {
        self.index.get(&body).copied()
    }

    /// Registration indices of `kind` entities whose bodies are in `bodies`,
    /// ascending and without duplicates
    pub fn correlate(&self, kind: EntityKind, bodies: &[BodyId]) -> Vec<usize> {
        let mut hits: Vec<usize> = bodies
            .iter()
            .filter_map(|b| self.lookup(*b))
            .filter(|h| h.kind == kind)
            .map(|h| h.index)
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    /// Teleporter with the given pad number
    pub fn teleporter_by_number(&self, number: u32) -> Option<&Teleporter> {
        self.teleporters.iter().find(|t| t.number == number)
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn portal(&self) -> Option<&Portal> {
        self.portal.as_ref()
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn black_holes(&self) -> &[BlackHole] {
        &self.black_holes
    }

    pub fn fans(&self) -> &[Fan] {
        &self.fans
    }

    pub fn magnets(&self) -> &[Magnet] {
        &self.magnets
    }

    pub fn teleporters(&self) -> &[Teleporter] {
        &self.teleporters
    }

    pub fn gum_clouds(&self) -> &[GumCloud] {
        &self.gum_clouds
    }

    pub fn lasers(&self) -> &[Laser] {
        &self.lasers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::Placement;
    use glam::Vec2;

    fn placed(body: u32) -> Placement {
        Placement::new(BodyId(body), Vec2::ZERO, Vec2::ONE, 0.0)
    }

    #[test]
    fn test_handles_follow_registration_order() {
        let mut registry = EntityRegistry::new();
        let a = registry.register_fan(Fan::new(placed(10)));
        let b = registry.register_fan(Fan::new(placed(11)));
        let m = registry.register_magnet(Magnet::new(placed(12)));
        assert_eq!(a.index, 0);
        assert_eq!(b.index, 1);
        assert_eq!(m, EntityHandle { kind: EntityKind::Magnet, index: 0 });
        assert_eq!(registry.lookup(BodyId(11)), Some(b));
        assert_eq!(registry.lookup(BodyId(99)), None);
    }

    #[test]
    fn test_correlate_filters_by_kind() {
        let mut registry = EntityRegistry::new();
        registry.register_fan(Fan::new(placed(1)));
        registry.register_fan(Fan::new(placed(2)));
        registry.register_magnet(Magnet::new(placed(3)));
        let bodies = [BodyId(3), BodyId(2), BodyId(2), BodyId(42)];
        assert_eq!(registry.correlate(EntityKind::Fan, &bodies), vec![1]);
        assert_eq!(registry.correlate(EntityKind::Magnet, &bodies), vec![0]);
        assert!(registry.correlate(EntityKind::Arrow, &bodies).is_empty());
    }

    #[test]
    fn test_singular_registration_overwrites() {
        let mut registry = EntityRegistry::new();
        registry.register_key(Key::new(BodyId(1), Vec2::ZERO));
        registry.register_key(Key::new(BodyId(2), Vec2::ONE));
        assert_eq!(registry.key().map(|k| k.body), Some(BodyId(2)));
    }

    #[test]
    fn test_teleporter_lookup_by_number() {
        let mut registry = EntityRegistry::new();
        registry.register_teleporter(Teleporter::new(placed(1), 1, 2));
        registry.register_teleporter(Teleporter::new(placed(2), 2, 1));
        assert_eq!(registry.teleporter_by_number(2).map(|t| t.target), Some(1));
        assert!(registry.teleporter_by_number(7).is_none());
    }
}
