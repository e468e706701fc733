//! Level tuning
//!
//! Loaded from a JSON file next to the level pack; any missing field falls
//! back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::LevelError;

/// Tunable per-level constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    // === Ball ===
    /// Linear damping applied to the ball while inside a gum cloud
    pub gum_cloud_damping: f32,
    /// Spawn animation length after a teleport (seconds)
    pub ball_spawn_secs: f32,
    /// Respawn animation length after a reset (seconds)
    pub ball_reset_secs: f32,
    /// Destroy animation length on level completion (seconds)
    pub ball_destroy_secs: f32,

    // === Portal ===
    /// Portal collapse animation length (seconds)
    pub portal_destroy_secs: f32,

    // === Forces ===
    /// Black hole pull strength (scaled by 1/d²)
    pub black_hole_pull: f32,
    /// Fan push force along its facing
    pub fan_force: f32,
    /// Magnet attraction force
    pub magnet_force: f32,
    /// Minimum ball speed after crossing an arrow
    pub arrow_boost: f32,

    // === Overlay ===
    /// Input ignored on the level-complete overlay for this long (seconds)
    pub overlay_input_delay: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            gum_cloud_damping: 2.0,
            ball_spawn_secs: 0.35,
            ball_reset_secs: 0.35,
            ball_destroy_secs: 0.6,
            portal_destroy_secs: 0.8,
            black_hole_pull: 40.0,
            fan_force: 25.0,
            magnet_force: 18.0,
            arrow_boost: 12.0,
            overlay_input_delay: 0.5,
        }
    }
}

impl LevelSettings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded level settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad level settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default level settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = LevelSettings::from_json(r#"{"gum_cloud_damping": 3.5}"#).unwrap();
        assert_eq!(settings.gum_cloud_damping, 3.5);
        assert_eq!(settings.arrow_boost, LevelSettings::default().arrow_boost);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            LevelSettings::from_json("{not json"),
            Err(LevelError::Settings(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = LevelSettings::load("/nonexistent/bounded/settings.json");
        assert_eq!(settings, LevelSettings::default());
    }
}
