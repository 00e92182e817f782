//! Engine settings and preferences
//!
//! Loaded from a JSON file next to the binary; any missing field falls back
//! to its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_RADIUS;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Collision ===
    /// Resolve moves against walls (off = free-fly for editing)
    pub collision_enabled: bool,
    /// Player circle radius
    pub player_radius: f32,

    // === Movement ===
    /// Walk speed (units/s)
    pub move_speed: f32,
    /// Keyboard turn speed (radians/s)
    pub turn_speed: f32,
    /// Keyboard look up/down speed (radians/s)
    pub look_speed: f32,
    /// Radians per unit of mouse delta
    pub mouse_sensitivity: f32,

    // === Session ===
    /// Seed for generated wall textures
    pub seed: u64,
    /// Where the player starts
    pub spawn: Vec2,
    /// Initial heading
    pub spawn_yaw: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show the key binding panel on start
    pub show_help: bool,
    /// Minimap pixels per world unit
    pub minimap_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collision_enabled: true,
            player_radius: PLAYER_RADIUS,

            move_speed: 3.0,
            turn_speed: std::f32::consts::PI,
            look_speed: std::f32::consts::FRAC_PI_2,
            mouse_sensitivity: 0.002,

            seed: 0x5EC7_0125,
            spawn: Vec2::ZERO,
            spawn_yaw: 0.0,

            show_fps: true,
            show_help: false,
            minimap_scale: 20.0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from `path`, falling back to defaults if the file is
    /// missing or unreadable
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Flip collision on/off, returning the new state
    pub fn toggle_collision(&mut self) -> bool {
        self.collision_enabled = !self.collision_enabled;
        log::info!(
            "Collision {}",
            if self.collision_enabled { "on" } else { "off" }
        );
        self.collision_enabled
    }
}
