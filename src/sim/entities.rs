//! Level entities other than the ball
//!
//! Level geometry is static: every entity keeps the placement it was built
//! with and a handle to its physics body for contact correlation. Only the
//! ball and the key bodies are touched at runtime.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyDesc, BodyId, PhysicsWorld};
use crate::consts::*;
use crate::direction;
use crate::render::{RenderBatch, Sprite, SpriteKind, colors};

/// Where an entity sits and which body backs it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub body: BodyId,
    pub position: Vec2,
    pub size: Vec2,
    pub angle: f32,
}

impl Placement {
    pub fn new(body: BodyId, position: Vec2, size: Vec2, angle: f32) -> Self {
        Self {
            body,
            position,
            size,
            angle,
        }
    }

    fn sprite(&self, kind: SpriteKind, color: [f32; 4]) -> Sprite {
        Sprite::new(kind, self.position, self.size, color).rotated(self.angle)
    }
}

/// Speed pad: redirects the ball along its heading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub placement: Placement,
}

impl Arrow {
    pub fn new(placement: Placement) -> Self {
        Self { placement }
    }

    /// Point the ball along the arrow, at least `boost` fast
    pub fn update(&self, ball: &mut Body, boost: f32) {
        let speed = ball.vel.length().max(boost);
        ball.vel = direction(self.placement.angle) * speed;
        ball.awake = true;
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.draw(self.placement.sprite(SpriteKind::Arrow, colors::ARROW));
    }
}

/// Gravity well; pulls while the ball is inside its field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackHole {
    pub placement: Placement,
    active: bool,
    swirl: f32,
}

impl BlackHole {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            active: false,
            swirl: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn update(&mut self, dt: f32) {
        self.swirl = crate::normalize_angle(self.swirl + BLACK_HOLE_SPIN * dt);
    }

    /// Inverse-square pull toward the center
    pub fn pull(&self, ball: &mut Body, strength: f32) {
        let to_center = self.placement.position - ball.pos;
        let dist = to_center.length().max(BLACK_HOLE_MIN_DIST);
        ball.apply_force(to_center.normalize_or_zero() * strength / (dist * dist));
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        let color = if self.active {
            colors::BLACK_HOLE_ACTIVE
        } else {
            colors::BLACK_HOLE
        };
        batch.draw(
            self.placement
                .sprite(SpriteKind::BlackHole, color)
                .rotated(self.swirl),
        );
    }
}

/// Blows the ball along its heading while the ball is in its stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fan {
    pub placement: Placement,
    active: bool,
    blade_angle: f32,
}

impl Fan {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            active: false,
            blade_angle: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn update(&mut self, dt: f32) {
        let spin = if self.active {
            FAN_ACTIVE_SPIN
        } else {
            FAN_IDLE_SPIN
        };
        self.blade_angle = crate::normalize_angle(self.blade_angle + spin * dt);
    }

    pub fn push(&self, ball: &mut Body, force: f32) {
        ball.apply_force(direction(self.placement.angle) * force);
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.draw(
            self.placement
                .sprite(SpriteKind::Fan, colors::FAN)
                .with_frame(self.blade_angle),
        );
    }
}

/// Attracts the ball while it is inside the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Magnet {
    pub placement: Placement,
    active: bool,
    phase: f32,
}

impl Magnet {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            active: false,
            phase: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn update(&mut self, dt: f32) {
        self.phase = (self.phase + MAGNET_PULSE_HZ * dt).fract();
    }

    pub fn attract(&self, ball: &mut Body, force: f32) {
        let to_magnet = self.placement.position - ball.pos;
        ball.apply_force(to_magnet.normalize_or_zero() * force);
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.draw(
            self.placement
                .sprite(SpriteKind::Magnet, colors::MAGNET)
                .with_frame(self.phase),
        );
    }
}

/// Sticky zone; raises the ball's damping while inside
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GumCloud {
    pub placement: Placement,
}

impl GumCloud {
    pub fn new(placement: Placement) -> Self {
        Self { placement }
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.draw(self.placement.sprite(SpriteKind::GumCloud, colors::GUM_CLOUD));
    }
}

/// Pickup that must be collected before the portal opens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    pub body: BodyId,
    pub original_position: Vec2,
    collected: bool,
}

impl Key {
    pub fn new(body: BodyId, original_position: Vec2) -> Self {
        Self {
            body,
            original_position,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark collected; returns false if it already was
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }

    /// Build a fresh key body at the original position and put the key back
    pub fn recreate(&mut self, physics: &mut dyn PhysicsWorld) -> BodyId {
        self.body = physics.create_body(BodyDesc::sensor(self.original_position));
        self.collected = false;
        self.body
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        if self.collected {
            return;
        }
        batch.draw(Sprite::new(
            SpriteKind::Key,
            self.original_position,
            Vec2::splat(KEY_RADIUS * 2.0),
            colors::KEY,
        ));
    }
}

/// Portal mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PortalMode {
    Normal,
    /// Collapsing after swallowing the ball
    Destroy { remaining: f32, total: f32 },
}

/// Level exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portal {
    pub placement: Placement,
    mode: PortalMode,
    swirl: f32,
}

impl Portal {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            mode: PortalMode::Normal,
            swirl: 0.0,
        }
    }

    pub fn mode(&self) -> PortalMode {
        self.mode
    }

    /// Start collapsing; re-entering keeps the running animation.
    /// There is no way back to `Normal`.
    pub fn destroy(&mut self, secs: f32) {
        if self.mode == PortalMode::Normal {
            self.mode = PortalMode::Destroy {
                remaining: secs,
                total: secs,
            };
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.swirl = crate::normalize_angle(self.swirl + PORTAL_SPIN * dt);
        if let PortalMode::Destroy { remaining, total } = self.mode {
            self.mode = PortalMode::Destroy {
                remaining: (remaining - dt).max(0.0),
                total,
            };
        }
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        let (scale, frame) = match self.mode {
            PortalMode::Normal => (1.0, 0.0),
            PortalMode::Destroy { remaining, total } => {
                let t = if total > 0.0 { 1.0 - remaining / total } else { 1.0 };
                (1.0 - t, t)
            }
        };
        let sprite = Sprite::new(
            SpriteKind::Portal,
            self.placement.position,
            self.placement.size * scale,
            colors::PORTAL,
        );
        batch.draw(sprite.rotated(self.swirl).with_frame(frame));
    }
}

/// Numbered pad that sends the ball to its target pad
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Teleporter {
    pub placement: Placement,
    /// This pad's number
    pub number: u32,
    /// Number of the pad the ball is sent to
    pub target: u32,
}

impl Teleporter {
    pub fn new(placement: Placement, number: u32, target: u32) -> Self {
        Self {
            placement,
            number,
            target,
        }
    }

    /// Drop the ball onto this pad, keeping its velocity and spin
    pub fn receive(&self, ball: &mut Body) {
        ball.set_transform(self.placement.position, ball.angle);
        ball.awake = true;
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.draw(
            self.placement
                .sprite(SpriteKind::Teleporter, colors::TELEPORTER)
                .with_frame(self.number as f32),
        );
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub placement: Placement,
}

impl Wall {
    pub fn new(placement: Placement) -> Self {
        Self { placement }
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.draw(self.placement.sprite(SpriteKind::Wall, colors::WALL));
    }
}

/// Beam that sends the ball back to the start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub placement: Placement,
}

impl Laser {
    pub fn new(placement: Placement) -> Self {
        Self { placement }
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.draw(self.placement.sprite(SpriteKind::Laser, colors::LASER));
    }
}

/// Outer frame of the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundaries {
    pub placement: Placement,
}

impl Boundaries {
    pub fn new(placement: Placement) -> Self {
        Self { placement }
    }

    pub fn render(&self, batch: &mut dyn RenderBatch) {
        batch.draw(self.placement.sprite(SpriteKind::Boundaries, colors::BOUNDARIES));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::SimpleWorld;

    fn ball_body(world: &mut SimpleWorld, pos: Vec2) -> BodyId {
        world.create_body(BodyDesc::dynamic(pos))
    }

    #[test]
    fn test_arrow_keeps_faster_speed() {
        let mut world = SimpleWorld::default();
        let id = ball_body(&mut world, Vec2::ZERO);
        let arrow = Arrow::new(Placement::new(BodyId(99), Vec2::ZERO, Vec2::ONE, 0.0));

        let body = world.body_mut(id).unwrap();
        body.vel = Vec2::new(0.0, -20.0);
        arrow.update(body, 12.0);
        assert!((body.vel - Vec2::new(20.0, 0.0)).length() < 1e-4);

        body.vel = Vec2::new(0.0, 1.0);
        arrow.update(body, 12.0);
        assert!((body.vel - Vec2::new(12.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_black_hole_pulls_toward_center() {
        let mut world = SimpleWorld::default();
        let id = ball_body(&mut world, Vec2::new(4.0, 0.0));
        let hole = BlackHole::new(Placement::new(BodyId(99), Vec2::ZERO, Vec2::ONE, 0.0));
        let body = world.body_mut(id).unwrap();
        hole.pull(body, 40.0);
        assert!(body.force.x < 0.0);
        assert_eq!(body.force.y, 0.0);
    }

    #[test]
    fn test_key_collect_once_and_recreate() {
        let mut world = SimpleWorld::default();
        let first = world.create_body(BodyDesc::sensor(Vec2::ONE));
        let mut key = Key::new(first, Vec2::ONE);
        assert!(key.collect());
        assert!(!key.collect());

        let second = key.recreate(&mut world);
        assert_ne!(first, second);
        assert!(!key.is_collected());
        assert_eq!(world.body(second).map(|b| b.pos), Some(Vec2::ONE));
    }

    #[test]
    fn test_portal_destroy_reentry_keeps_timer() {
        let mut portal = Portal::new(Placement::new(BodyId(1), Vec2::ZERO, Vec2::ONE, 0.0));
        portal.destroy(0.5);
        portal.update(0.2);
        portal.destroy(0.5);
        assert!(matches!(portal.mode(), PortalMode::Destroy { remaining, .. } if remaining < 0.5));
    }

    #[test]
    fn test_fan_spins_faster_when_active() {
        let placement = Placement::new(BodyId(1), Vec2::ZERO, Vec2::ONE, 0.0);
        let mut idle = Fan::new(placement);
        let mut busy = Fan::new(placement);
        busy.set_active(true);
        idle.update(0.05);
        busy.update(0.05);
        assert!(busy.blade_angle > idle.blade_angle);
    }
}
