//! Bounded - level event coordination for a 2D physics puzzle game
//!
//! Core modules:
//! - `sim`: Per-frame level simulation (entities, contact rules, completion/reset)
//! - `render`: Draw-call seam and sprite instance records
//! - `settings`: Data-driven level tuning
//! - `unlocks`: Level lock flags

pub mod render;
pub mod settings;
pub mod sim;
pub mod unlocks;

pub use settings::LevelSettings;
pub use unlocks::LevelLocks;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ball collision radius (world units)
    pub const BALL_RADIUS: f32 = 0.5;
    /// Key pickup radius
    pub const KEY_RADIUS: f32 = 0.4;

    /// Black hole distance clamp (avoids singular pull at the center)
    pub const BLACK_HOLE_MIN_DIST: f32 = 0.25;

    /// Fan blade spin speeds (radians/sec)
    pub const FAN_IDLE_SPIN: f32 = 2.0;
    pub const FAN_ACTIVE_SPIN: f32 = 12.0;
    /// Black hole swirl speed (radians/sec)
    pub const BLACK_HOLE_SPIN: f32 = 1.5;
    /// Portal swirl speed (radians/sec)
    pub const PORTAL_SPIN: f32 = 3.0;
    /// Magnet pulse frequency (Hz)
    pub const MAGNET_PULSE_HZ: f32 = 1.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit direction for an angle in radians
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle_wraps() {
        use std::f32::consts::PI;
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        // 3π lands on the ±π seam; either end is acceptable
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_direction_is_unit() {
        let d = direction(0.7);
        assert!((d.length() - 1.0).abs() < 1e-6);
    }
}
