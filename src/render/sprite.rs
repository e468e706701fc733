//! Sprite instance records for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// What a sprite depicts (selects the texture atlas region)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Ball = 0,
    Arrow,
    BlackHole,
    GumCloud,
    Key,
    Magnet,
    Portal,
    Wall,
    Teleporter,
    Fan,
    Boundaries,
    Laser,
    Overlay,
}

impl SpriteKind {
    const ALL: [SpriteKind; 13] = [
        SpriteKind::Ball,
        SpriteKind::Arrow,
        SpriteKind::BlackHole,
        SpriteKind::GumCloud,
        SpriteKind::Key,
        SpriteKind::Magnet,
        SpriteKind::Portal,
        SpriteKind::Wall,
        SpriteKind::Teleporter,
        SpriteKind::Fan,
        SpriteKind::Boundaries,
        SpriteKind::Laser,
        SpriteKind::Overlay,
    ];

    pub fn from_u32(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }
}

/// One textured quad, laid out for direct upload as an instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Sprite {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub rotation: f32,
    /// Animation frame or progress (0-1 for one-shot animations)
    pub frame: f32,
    pub kind: u32,
    pub _pad: u32,
    pub color: [f32; 4],
}

impl Sprite {
    pub fn new(kind: SpriteKind, pos: Vec2, size: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: pos.to_array(),
            size: size.to_array(),
            rotation: 0.0,
            frame: 0.0,
            kind: kind as u32,
            _pad: 0,
            color,
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_frame(mut self, frame: f32) -> Self {
        self.frame = frame;
        self
    }

    pub fn sprite_kind(&self) -> Option<SpriteKind> {
        SpriteKind::from_u32(self.kind)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }
}

/// Colors for level elements
pub mod colors {
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BALL_GHOST: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
    pub const ARROW: [f32; 4] = [0.3, 0.9, 0.5, 1.0];
    pub const BLACK_HOLE: [f32; 4] = [0.05, 0.0, 0.1, 1.0];
    pub const BLACK_HOLE_ACTIVE: [f32; 4] = [0.6, 0.2, 0.8, 1.0];
    pub const GUM_CLOUD: [f32; 4] = [1.0, 0.6, 0.8, 0.7];
    pub const KEY: [f32; 4] = [0.9, 0.85, 0.3, 1.0];
    pub const MAGNET: [f32; 4] = [0.8, 0.2, 0.2, 1.0];
    pub const PORTAL: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const TELEPORTER: [f32; 4] = [0.2, 0.9, 0.9, 1.0];
    pub const FAN: [f32; 4] = [0.7, 0.7, 0.8, 1.0];
    pub const BOUNDARIES: [f32; 4] = [0.2, 0.2, 0.25, 1.0];
    pub const LASER: [f32; 4] = [1.0, 0.1, 0.1, 0.9];
    pub const OVERLAY: [f32; 4] = [0.02, 0.02, 0.05, 0.85];
}
