//! Level-complete overlay
//!
//! Built dormant with the level and activated exactly once when the ball
//! reaches an open portal. From then on it owns the player's input.

use glam::Vec2;

use crate::render::{RenderBatch, Sprite, SpriteKind, colors};

/// Player input for one frame (edge-triggered)
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Continue (click/tap/enter)
    pub confirm: bool,
    /// Replay this level
    pub retry: bool,
    /// Back to level select
    pub menu: bool,
}

/// What the player picked on the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChoice {
    NextLevel,
    Retry,
    LevelSelect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayState {
    Dormant,
    Active { elapsed: f32 },
}

#[derive(Debug, Clone)]
pub struct LevelComplete {
    state: OverlayState,
    /// Input ignored for this long after activation (seconds)
    input_delay: f32,
    panel_size: Vec2,
}

impl LevelComplete {
    pub fn new(input_delay: f32) -> Self {
        Self {
            state: OverlayState::Dormant,
            input_delay,
            panel_size: Vec2::new(12.0, 8.0),
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, OverlayState::Active { .. })
    }

    /// Dormant -> Active; returns true only on the first call
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        log::info!("Level complete overlay shown");
        self.state = OverlayState::Active { elapsed: 0.0 };
        true
    }

    /// Advance the overlay and map input to a choice
    pub fn handle_input(&mut self, dt: f32, input: &FrameInput) -> Option<CompletionChoice> {
        let OverlayState::Active { elapsed } = &mut self.state else {
            return None;
        };
        *elapsed += dt;
        if *elapsed < self.input_delay {
            return None;
        }
        if input.retry {
            Some(CompletionChoice::Retry)
        } else if input.menu {
            Some(CompletionChoice::LevelSelect)
        } else if input.confirm {
            Some(CompletionChoice::NextLevel)
        } else {
            None
        }
    }

    pub fn render(&self, center: Vec2, batch: &mut dyn RenderBatch) {
        let OverlayState::Active { elapsed } = self.state else {
            return;
        };
        // Fade in over the input delay
        let fade = if self.input_delay > 0.0 {
            (elapsed / self.input_delay).min(1.0)
        } else {
            1.0
        };
        let mut color = colors::OVERLAY;
        color[3] *= fade;
        batch.draw(Sprite::new(SpriteKind::Overlay, center, self.panel_size, color).with_frame(fade));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawList;

    #[test]
    fn test_dormant_overlay_ignores_input() {
        let mut overlay = LevelComplete::new(0.0);
        let input = FrameInput {
            confirm: true,
            ..Default::default()
        };
        assert_eq!(overlay.handle_input(0.1, &input), None);
        let mut list = DrawList::new();
        overlay.render(Vec2::ZERO, &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_activates_once() {
        let mut overlay = LevelComplete::new(0.5);
        assert!(overlay.activate());
        assert!(!overlay.activate());
        assert!(overlay.is_active());
    }

    #[test]
    fn test_input_delay_then_choice() {
        let mut overlay = LevelComplete::new(0.5);
        overlay.activate();
        let input = FrameInput {
            retry: true,
            confirm: true,
            ..Default::default()
        };
        assert_eq!(overlay.handle_input(0.25, &input), None);
        assert_eq!(overlay.handle_input(0.25, &input), Some(CompletionChoice::Retry));
        let confirm = FrameInput {
            confirm: true,
            ..Default::default()
        };
        assert_eq!(overlay.handle_input(0.1, &confirm), Some(CompletionChoice::NextLevel));
    }
}
