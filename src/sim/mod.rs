//! Sector simulation module
//!
//! The level store, player navigation, collision and live editing. This module
//! must stay deterministic and free of rendering or platform dependencies:
//! - Seeded RNG only
//! - Stable iteration order (store order)
//! - Every subsystem takes the state it works on explicitly

pub mod collision;
pub mod editor;
pub mod geometry;
pub mod locator;
pub mod sample_level;
pub mod state;
pub mod tick;

pub use collision::{MoveOutcome, MoveResult, resolve_move, resolve_move_detailed};
pub use editor::{
    add_sector, adjust_wall_bottom_height, adjust_wall_top_height, delete_sector, extrusion_ring,
    move_vertex, nearest_vertex, set_wall_texture, toggle_wall,
};
pub use locator::{WallHit, cast_look_ray, find_looking_at_wall, find_sector, update_navigation};
pub use sample_level::starter_level;
pub use state::{
    EngineState, HeightBand, Level, LevelError, Navigation, Player, RngState, Sector, SectorId,
    Wall, WallSpans,
};
pub use tick::{FrameInput, tick};
