//! Sector Engine - portal/sector level core
//!
//! Core modules:
//! - `sim`: Level store, sector location, collision and live editing
//! - `input`: Key edges translated into per-frame commands
//! - `map_view`: Minimap projection and zoom
//! - `texture`: Texture catalog and selection
//! - `settings`: Data-driven engine configuration

pub mod input;
pub mod map_view;
pub mod settings;
pub mod sim;
pub mod texture;

pub use settings::Settings;

use glam::Vec2;

/// Engine constants. These are part of the behavioural contract with the
/// renderer and editor tooling, so change them with care.
pub mod consts {
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Cap on simulation steps per rendered frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player collision circle radius (world units)
    pub const PLAYER_RADIUS: f32 = 0.3;
    /// Minimum vertical opening for a wall to be walkable
    pub const PASSABLE_HEIGHT: f32 = 0.5;
    /// Step applied by the wall height editors
    pub const HEIGHT_STEP: f32 = 0.1;
    /// Gap always left between bottom and top wall bands
    pub const MIN_HEIGHT_MARGIN: f32 = 0.1;

    /// Grid for generated sector vertices
    pub const PROCEDURAL_SNAP: f32 = 0.1;
    /// Grid for vertices dragged on the minimap
    pub const DRAG_SNAP: f32 = 0.2;

    /// Length of the look ray used to pick the wall under the crosshair
    pub const LOOK_RAY_LENGTH: f32 = 1000.0;
    /// Determinant below which two lines count as parallel
    pub const PARALLEL_EPSILON: f32 = 1e-10;

    /// Canonical height pair of a fully solid wall
    pub const SOLID_HEIGHT: f32 = -1.0;
    /// Texture ids handed out to freshly generated walls (inclusive)
    pub const GENERATED_TEXTURE_MIN: u32 = 1;
    pub const GENERATED_TEXTURE_MAX: u32 = 8;

    /// How far a new sector reaches past the shared wall
    pub const EXTRUDE_DISTANCE: f32 = 2.0;
    /// Radius of the vertex ring used for 5 and 6 sided sectors
    pub const EXTRUDE_RING_RADIUS: f32 = 1.5;

    /// Camera height above the floor of the current sector
    pub const EYE_HEIGHT: f32 = 1.6;
    /// Pitch limit (radians) so the view never flips over
    pub const MAX_PITCH: f32 = 1.55;
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

/// Forward direction on the map plane for a yaw angle.
///
/// Yaw 0 faces -y (map "north"); positive yaw turns left.
#[inline]
pub fn yaw_to_direction(yaw: f32) -> Vec2 {
    Vec2::new(-yaw.sin(), -yaw.cos())
}

/// Right-hand strafe direction for a yaw angle
#[inline]
pub fn yaw_to_right(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), -yaw.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_directions() {
        let fwd = yaw_to_direction(0.0);
        assert!(fwd.x.abs() < 1e-6 && (fwd.y + 1.0).abs() < 1e-6);

        // Turning left by 90 degrees faces -x
        let left = yaw_to_direction(FRAC_PI_2);
        assert!((left.x + 1.0).abs() < 1e-6);

        let right = yaw_to_right(0.0);
        assert!((right.x - 1.0).abs() < 1e-6 && right.y.abs() < 1e-6);
        assert!(fwd.dot(right).abs() < 1e-6);
    }
}
