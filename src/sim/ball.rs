//! The ball and its mode state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use super::error::LevelError;
use crate::render::{RenderBatch, Sprite, SpriteKind, colors};

/// Ball mode - what the ball is doing this frame
///
/// Legal transitions:
/// - `Normal | Spawn | Reset` -> `Spawn | Reset | Destroy`
/// - `Spawn | Reset` -> `Normal` (animation end, driven by `update`)
/// - `Destroy` -> `Destroy` (re-entry keeps the running animation)
/// - `Destroy` -> `Erased` (only once the destroy animation has finished)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallMode {
    /// Free play
    Normal,
    /// Materializing after a teleport
    Spawn { remaining: f32, total: f32 },
    /// Materializing at the spawn point after a reset
    Reset { remaining: f32, total: f32 },
    /// Being swallowed by the portal
    Destroy { remaining: f32, total: f32 },
    /// Gone for good; body detached
    Erased,
}

impl BallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallMode::Normal => "Normal",
            BallMode::Spawn { .. } => "Spawn",
            BallMode::Reset { .. } => "Reset",
            BallMode::Destroy { .. } => "Destroy",
            BallMode::Erased => "Erased",
        }
    }

    /// Animation progress 0-1 (1 for modes without an animation)
    pub fn progress(&self) -> f32 {
        match *self {
            BallMode::Spawn { remaining, total }
            | BallMode::Reset { remaining, total }
            | BallMode::Destroy { remaining, total } => {
                if total <= 0.0 {
                    1.0
                } else {
                    (1.0 - remaining / total).clamp(0.0, 1.0)
                }
            }
            BallMode::Normal | BallMode::Erased => 1.0,
        }
    }

    fn in_play(&self) -> bool {
        matches!(
            self,
            BallMode::Normal | BallMode::Spawn { .. } | BallMode::Reset { .. }
        )
    }
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: BodyId,
    /// Spawn point the ball returns to on reset
    pub original_position: Vec2,
    pub radius: f32,
    mode: BallMode,
}

impl Ball {
    pub fn new(body: BodyId, original_position: Vec2, radius: f32) -> Self {
        Self {
            body,
            original_position,
            radius,
            mode: BallMode::Normal,
        }
    }

    pub fn mode(&self) -> BallMode {
        self.mode
    }

    pub fn is_erased(&self) -> bool {
        self.mode == BallMode::Erased
    }

    pub fn is_destroying(&self) -> bool {
        matches!(self.mode, BallMode::Destroy { .. })
    }

    pub fn is_destroy_animation_finished(&self) -> bool {
        matches!(self.mode, BallMode::Destroy { remaining, .. } if remaining <= 0.0)
    }

    fn illegal(&self, to: &'static str) -> LevelError {
        LevelError::IllegalTransition {
            entity: "ball",
            from: self.mode.as_str(),
            to,
        }
    }

    /// Enter spawn mode (after a teleport)
    pub fn spawn(&mut self, secs: f32) -> Result<(), LevelError> {
        if !self.mode.in_play() {
            return Err(self.illegal("Spawn"));
        }
        self.mode = BallMode::Spawn {
            remaining: secs,
            total: secs,
        };
        Ok(())
    }

    /// Enter reset mode (after a hazard or manual retry)
    pub fn reset(&mut self, secs: f32) -> Result<(), LevelError> {
        if !self.mode.in_play() {
            return Err(self.illegal("Reset"));
        }
        self.mode = BallMode::Reset {
            remaining: secs,
            total: secs,
        };
        Ok(())
    }

    /// Enter destroy mode; re-entering keeps the running animation
    pub fn destroy(&mut self, secs: f32) -> Result<(), LevelError> {
        match self.mode {
            BallMode::Destroy { .. } => Ok(()),
            mode if mode.in_play() => {
                self.mode = BallMode::Destroy {
                    remaining: secs,
                    total: secs,
                };
                Ok(())
            }
            _ => Err(self.illegal("Destroy")),
        }
    }

    /// Terminal transition once the destroy animation is done
    pub fn erase(&mut self) -> Result<(), LevelError> {
        if !self.is_destroy_animation_finished() {
            return Err(self.illegal("Erased"));
        }
        self.mode = BallMode::Erased;
        Ok(())
    }

    /// Advance mode timers
    pub fn update(&mut self, dt: f32) {
        self.mode = match self.mode {
            BallMode::Spawn { remaining, .. } | BallMode::Reset { remaining, .. }
                if remaining - dt <= 0.0 =>
            {
                BallMode::Normal
            }
            BallMode::Spawn { remaining, total } => BallMode::Spawn {
                remaining: remaining - dt,
                total,
            },
            BallMode::Reset { remaining, total } => BallMode::Reset {
                remaining: remaining - dt,
                total,
            },
            BallMode::Destroy { remaining, total } => BallMode::Destroy {
                remaining: (remaining - dt).max(0.0),
                total,
            },
            mode => mode,
        };
    }

    pub fn render(&self, body: &Body, batch: &mut dyn RenderBatch) {
        let diameter = Vec2::splat(self.radius * 2.0);
        let progress = self.mode.progress();
        let sprite = match self.mode {
            BallMode::Erased => return,
            BallMode::Normal => Sprite::new(SpriteKind::Ball, body.pos, diameter, colors::BALL),
            // Grow in from nothing
            BallMode::Spawn { .. } | BallMode::Reset { .. } => {
                Sprite::new(SpriteKind::Ball, body.pos, diameter * progress, colors::BALL_GHOST)
            }
            // Shrink into the portal
            BallMode::Destroy { .. } => Sprite::new(
                SpriteKind::Ball,
                body.pos,
                diameter * (1.0 - progress),
                colors::BALL,
            ),
        };
        batch.draw(sprite.rotated(body.angle).with_frame(progress));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball() -> Ball {
        Ball::new(BodyId(1), Vec2::new(2.0, 3.0), 0.5)
    }

    #[test]
    fn test_spawn_returns_to_normal() {
        let mut ball = ball();
        ball.spawn(0.2).unwrap();
        ball.update(0.1);
        assert!(matches!(ball.mode(), BallMode::Spawn { .. }));
        ball.update(0.1);
        assert_eq!(ball.mode(), BallMode::Normal);
    }

    #[test]
    fn test_destroy_reentry_keeps_timer() {
        let mut ball = ball();
        ball.destroy(0.5).unwrap();
        ball.update(0.3);
        ball.destroy(0.5).unwrap();
        ball.update(0.3);
        assert!(ball.is_destroy_animation_finished());
    }

    #[test]
    fn test_erase_requires_finished_animation() {
        let mut ball = ball();
        assert!(ball.erase().is_err());
        ball.destroy(0.1).unwrap();
        assert!(ball.erase().is_err());
        ball.update(0.2);
        ball.erase().unwrap();
        assert!(ball.is_erased());
    }

    #[test]
    fn test_destroyed_ball_rejects_reset_and_spawn() {
        let mut ball = ball();
        ball.destroy(0.1).unwrap();
        assert!(matches!(
            ball.reset(0.1),
            Err(LevelError::IllegalTransition { from: "Destroy", to: "Reset", .. })
        ));
        assert!(ball.spawn(0.1).is_err());
        ball.update(0.1);
        ball.erase().unwrap();
        assert!(ball.destroy(0.1).is_err());
    }

    #[test]
    fn test_erased_ball_draws_nothing() {
        use crate::render::DrawList;
        use crate::sim::body::{BodyDesc, PhysicsWorld, SimpleWorld};

        let mut world = SimpleWorld::default();
        let id = world.create_body(BodyDesc::dynamic(Vec2::ZERO));
        let mut ball = Ball::new(id, Vec2::ZERO, 0.5);
        let mut list = DrawList::new();
        ball.render(world.body(id).unwrap(), &mut list);
        assert_eq!(list.len(), 1);

        ball.destroy(0.0).unwrap();
        ball.erase().unwrap();
        list.clear();
        ball.render(world.body(id).unwrap(), &mut list);
        assert!(list.is_empty());
    }
}
