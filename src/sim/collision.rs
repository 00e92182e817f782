//! Player movement against blocking walls
//!
//! The player is a circle of `player_radius` on the map plane. A proposed move
//! that ends too close to a blocking wall is turned into a slide along that
//! wall; if the slide would push the player into another wall the move is
//! dropped for this frame instead.

use glam::Vec2;

use super::geometry::{SegmentProjection, project_onto_segment};
use super::state::Level;
use crate::settings::Settings;

/// How a move was resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Collision disabled, move applied as-is
    PassThrough,
    /// Nothing in the way
    Free,
    /// Slid along wall `wall` of sector `sector`
    Slid { sector: usize, wall: usize },
    /// Slide hit a second wall, player kept in place
    Blocked { sector: usize, wall: usize },
}

/// Result of a move resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Final position
    pub pos: Vec2,
    pub outcome: MoveOutcome,
}

/// A wall that stops the player, with its endpoints
#[derive(Debug, Clone, Copy)]
struct BlockingWall {
    sector: usize,
    wall: usize,
    a: Vec2,
    b: Vec2,
}

/// Every non-passable wall, in sector-then-wall order
fn blocking_walls(level: &Level) -> impl Iterator<Item = BlockingWall> + '_ {
    level
        .sectors()
        .iter()
        .enumerate()
        .flat_map(|(si, sector)| {
            sector
                .edges()
                .filter(move |(_, _, _, wall)| {
                    !wall.is_passable(sector.floor_height, sector.ceiling_height)
                })
                .map(move |(wi, a, b, _)| BlockingWall {
                    sector: si,
                    wall: wi,
                    a,
                    b,
                })
        })
}

/// Circle-vs-segment test. Only contacts whose projection lands on the
/// segment count; the wall's endpoints are not rounded off.
fn wall_contact(pos: Vec2, wall: &BlockingWall, radius: f32) -> Option<SegmentProjection> {
    let proj = project_onto_segment(pos, wall.a, wall.b)?;
    (proj.within_segment() && proj.distance < radius).then_some(proj)
}

/// Resolve a move from `current` toward `proposed`
pub fn resolve_move_detailed(
    level: &Level,
    settings: &Settings,
    current: Vec2,
    proposed: Vec2,
) -> MoveResult {
    if !settings.collision_enabled {
        return MoveResult {
            pos: proposed,
            outcome: MoveOutcome::PassThrough,
        };
    }

    let radius = settings.player_radius;
    let delta = proposed - current;

    // The first blocking wall in store order decides the slide, not the nearest
    let Some((hit, proj)) = blocking_walls(level)
        .find_map(|wall| wall_contact(proposed, &wall, radius).map(|proj| (wall, proj)))
    else {
        return MoveResult {
            pos: proposed,
            outcome: MoveOutcome::Free,
        };
    };

    let slide = current + proj.tangent * delta.dot(proj.tangent);

    let corner = blocking_walls(level)
        .filter(|other| (other.sector, other.wall) != (hit.sector, hit.wall))
        .any(|other| wall_contact(slide, &other, radius).is_some());

    if corner {
        log::trace!(
            "Move blocked at corner of sector {} wall {}",
            hit.sector,
            hit.wall
        );
        return MoveResult {
            pos: current,
            outcome: MoveOutcome::Blocked {
                sector: hit.sector,
                wall: hit.wall,
            },
        };
    }

    MoveResult {
        pos: slide,
        outcome: MoveOutcome::Slid {
            sector: hit.sector,
            wall: hit.wall,
        },
    }
}

/// Final position for a move from `current` toward `proposed`
pub fn resolve_move(level: &Level, settings: &Settings, current: Vec2, proposed: Vec2) -> Vec2 {
    resolve_move_detailed(level, settings, current, proposed).pos
}
