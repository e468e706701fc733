//! Rendering seam
//!
//! The simulation emits sprites in painter's order into a [`RenderBatch`];
//! the GPU backend consumes them as an instance buffer.

pub mod sprite;

pub use sprite::{Sprite, SpriteKind, colors};

/// Sink for draw calls, in submission order
pub trait RenderBatch {
    fn draw(&mut self, sprite: Sprite);
}

/// Batch that records every sprite for later upload (or inspection)
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub sprites: Vec<Sprite>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Kinds in draw order
    pub fn kinds(&self) -> Vec<SpriteKind> {
        self.sprites.iter().filter_map(Sprite::sprite_kind).collect()
    }

    /// Raw instance bytes for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sprites)
    }
}

impl RenderBatch for DrawList {
    fn draw(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.draw(Sprite::new(SpriteKind::Ball, Vec2::ZERO, Vec2::ONE, colors::BALL));
        list.draw(Sprite::new(SpriteKind::Wall, Vec2::ZERO, Vec2::ONE, colors::WALL));
        assert_eq!(list.kinds(), vec![SpriteKind::Ball, SpriteKind::Wall]);
        assert_eq!(list.as_bytes().len(), 2 * std::mem::size_of::<Sprite>());
    }
}
