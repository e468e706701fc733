//! Physics body seam
//!
//! The level logic never simulates shapes itself. It reads and writes rigid
//! body state through [`PhysicsWorld`], addressing bodies by stable
//! [`BodyId`] handles. [`SimpleWorld`] is a small explicit-Euler world used by
//! the headless demo and tests; a real backend implements the same trait.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable handle of a physics body for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Moved by forces and velocity
    Dynamic,
    /// Never moves
    Static,
    /// Static trigger volume (reports contacts, no response)
    Sensor,
}

/// Construction parameters for a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub angle: f32,
}

impl BodyDesc {
    pub fn dynamic(position: Vec2) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position,
            angle: 0.0,
        }
    }

    pub fn sensor(position: Vec2) -> Self {
        Self {
            body_type: BodyType::Sensor,
            position,
            angle: 0.0,
        }
    }

    pub fn fixed(position: Vec2, angle: f32) -> Self {
        Self {
            body_type: BodyType::Static,
            position,
            angle,
        }
    }
}

/// Rigid body state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub body_type: BodyType,
    pub pos: Vec2,
    pub angle: f32,
    pub vel: Vec2,
    pub angular_vel: f32,
    pub linear_damping: f32,
    pub awake: bool,
    /// Force accumulated since the last step
    pub force: Vec2,
}

impl Body {
    fn new(id: BodyId, desc: BodyDesc) -> Self {
        Self {
            id,
            body_type: desc.body_type,
            pos: desc.position,
            angle: desc.angle,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            linear_damping: 0.0,
            awake: true,
            force: Vec2::ZERO,
        }
    }

    /// Teleport to a position and angle
    pub fn set_transform(&mut self, pos: Vec2, angle: f32) {
        self.pos = pos;
        self.angle = angle;
    }

    /// Accumulate a force (applied on the next step); wakes the body
    pub fn apply_force(&mut self, force: Vec2) {
        if self.body_type == BodyType::Dynamic {
            self.force += force;
            self.awake = true;
        }
    }

    /// Advance one step (unit mass)
    fn integrate(&mut self, gravity: Vec2, dt: f32) {
        if self.body_type != BodyType::Dynamic || !self.awake {
            self.force = Vec2::ZERO;
            return;
        }
        self.vel += (gravity + self.force) * dt;
        // Same damping model as Box2D: v *= 1 / (1 + dt * c)
        self.vel *= 1.0 / (1.0 + dt * self.linear_damping);
        self.pos += self.vel * dt;
        self.angle = crate::normalize_angle(self.angle + self.angular_vel * dt);
        self.force = Vec2::ZERO;
    }
}

/// The physics collaborator, as seen by level logic
pub trait PhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId;
    /// Returns false if the body did not exist
    fn destroy_body(&mut self, id: BodyId) -> bool;
    fn body(&self, id: BodyId) -> Option<&Body>;
    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body>;
    fn step(&mut self, dt: f32);
}

/// Minimal world: unit-mass bodies, no shapes, no collision response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleWorld {
    pub gravity: Vec2,
    /// Bodies sorted by id for deterministic iteration
    bodies: Vec<Body>,
    next_id: u32,
}

impl Default for SimpleWorld {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl SimpleWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }
}

impl PhysicsWorld for SimpleWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        // Ids only grow, so pushing keeps the vec sorted
        self.bodies.push(Body::new(id, desc));
        id
    }

    fn destroy_body(&mut self, id: BodyId) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.bodies.remove(i);
                true
            }
            None => false,
        }
    }

    fn body(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    fn step(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            body.integrate(gravity, dt);
        }
    }
}
