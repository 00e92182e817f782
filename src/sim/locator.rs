//! Sector and wall lookup for the player
//!
//! Both queries scan the store linearly; levels are small enough that a
//! spatial index has not been worth it.

use glam::Vec2;

use super::geometry::{point_in_polygon, segment_intersect};
use super::state::{EngineState, Level};
use crate::consts::LOOK_RAY_LENGTH;

/// A wall hit by the look ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub wall: usize,
    pub point: Vec2,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Index of the first sector (in store order) containing `point`.
///
/// Overlapping sectors are an authoring error; the lowest index wins.
pub fn find_sector(level: &Level, point: Vec2) -> Option<usize> {
    level
        .sectors()
        .iter()
        .position(|sector| point_in_polygon(point, &sector.vertices))
}

/// Nearest wall of `sector_index` hit by a ray from `origin` along `dir`
pub fn cast_look_ray(
    level: &Level,
    sector_index: usize,
    origin: Vec2,
    dir: Vec2,
) -> Option<WallHit> {
    let sector = level.sector(sector_index)?;
    let dir = dir.try_normalize()?;
    let end = origin + dir * LOOK_RAY_LENGTH;

    let mut best: Option<(f32, WallHit)> = None;
    for (i, a, b, _) in sector.edges() {
        let Some(hit) = segment_intersect(origin, end, a, b) else {
            continue;
        };
        if best.as_ref().is_none_or(|(t, _)| hit.t < *t) {
            best = Some((
                hit.t,
                WallHit {
                    wall: i,
                    point: hit.point,
                    distance: hit.t * LOOK_RAY_LENGTH,
                },
            ));
        }
    }
    best.map(|(_, hit)| hit)
}

/// Index of the wall of `sector_index` the player is looking at
pub fn find_looking_at_wall(
    level: &Level,
    sector_index: usize,
    origin: Vec2,
    dir: Vec2,
) -> Option<usize> {
    cast_look_ray(level, sector_index, origin, dir).map(|hit| hit.wall)
}

/// Recompute the navigation state from the player's position and heading
pub fn update_navigation(state: &mut EngineState) {
    let pos = state.player.pos;
    let sector_index = find_sector(&state.level, pos);
    let wall = sector_index.and_then(|s| {
        find_looking_at_wall(&state.level, s, pos, state.player.look_direction())
    });

    let sector = sector_index
        .and_then(|s| state.level.sector(s))
        .map(|s| s.id);
    if sector != state.nav.sector {
        log::debug!(
            "Player entered sector {:?} at ({:.2}, {:.2})",
            sector_index,
            pos.x,
            pos.y
        );
    }

    state.nav.sector = sector;
    state.nav.wall = wall;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::state::{Sector, Wall};

    fn square_at(center: Vec2, half: f32) -> Sector {
        let verts = vec![
            center + Vec2::new(-half, -half),
            center + Vec2::new(half, -half),
            center + Vec2::new(half, half),
            center + Vec2::new(-half, half),
        ];
        Sector::new(verts, vec![Wall::solid(1); 4])
    }

    #[test]
    fn test_single_square_scenario() {
        let level = Level::from_sectors(vec![square_at(Vec2::ZERO, 2.0)]).unwrap();
        assert_eq!(find_sector(&level, Vec2::ZERO), Some(0));

        // Wall 0 runs (-2,-2) -> (2,-2), the -y facing one
        let wall = find_looking_at_wall(&level, 0, Vec2::ZERO, Vec2::new(0.0, -1.0));
        assert_eq!(wall, Some(0));
        assert_eq!(level.sector(0).unwrap().edge(0).unwrap().0, Vec2::new(-2.0, -2.0));
    }

    #[test]
    fn test_look_ray_picks_each_wall() {
        let level = Level::from_sectors(vec![square_at(Vec2::ZERO, 2.0)]).unwrap();
        let cases = [
            (Vec2::new(0.0, -1.0), 0),
            (Vec2::new(1.0, 0.0), 1),
            (Vec2::new(0.0, 1.0), 2),
            (Vec2::new(-1.0, 0.0), 3),
        ];
        for (dir, expected) in cases {
            assert_eq!(find_looking_at_wall(&level, 0, Vec2::ZERO, dir), Some(expected));
        }

        // Unnormalized direction works the same
        let hit = cast_look_ray(&level, 0, Vec2::new(1.0, 0.0), Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(hit.wall, 1);
        assert!((hit.distance - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_look_ray_nearest_wins_in_concave_sector() {
        // U shape: looking +x from the left arm crosses the inner notch first
        let verts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 4.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(0.0, 4.0),
        ];
        let level = Level::from_sectors(vec![Sector::new(verts, vec![Wall::solid(1); 8])]).unwrap();
        let wall = find_looking_at_wall(&level, 0, Vec2::new(1.0, 3.0), Vec2::X);
        // Edge 5 is (2,1) -> (2,4)
        assert_eq!(wall, Some(5));
    }

    #[test]
    fn test_invalid_inputs() {
        let level = Level::from_sectors(vec![square_at(Vec2::ZERO, 2.0)]).unwrap();
        assert_eq!(find_looking_at_wall(&level, 3, Vec2::ZERO, Vec2::X), None);
        assert_eq!(find_looking_at_wall(&level, 0, Vec2::ZERO, Vec2::ZERO), None);
        assert_eq!(find_sector(&level, Vec2::new(10.0, 10.0)), None);
        // From outside, looking away: nothing
        assert_eq!(
            find_looking_at_wall(&level, 0, Vec2::new(5.0, 0.0), Vec2::X),
            None
        );
    }

    #[test]
    fn test_overlap_lowest_index_wins() {
        let a = square_at(Vec2::ZERO, 2.0);
        let b = square_at(Vec2::new(1.0, 0.0), 2.0);
        let level = Level::from_sectors(vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(find_sector(&level, Vec2::new(0.5, 0.0)), Some(0));

        let swapped = Level::from_sectors(vec![b, a]).unwrap();
        assert_eq!(find_sector(&swapped, Vec2::new(0.5, 0.0)), Some(0));
    }

    #[test]
    fn test_disjoint_sectors_order_independent() {
        let a = square_at(Vec2::ZERO, 1.0);
        let b = square_at(Vec2::new(5.0, 0.0), 1.0);
        let ab = Level::from_sectors(vec![a.clone(), b.clone()]).unwrap();
        let ba = Level::from_sectors(vec![b, a]).unwrap();

        let p = Vec2::new(5.2, 0.3);
        let in_ab = find_sector(&ab, p).unwrap();
        let in_ba = find_sector(&ba, p).unwrap();
        assert_eq!(ab.sector(in_ab).unwrap().vertices, ba.sector(in_ba).unwrap().vertices);
    }

    #[test]
    fn test_update_navigation_tracks_ids() {
        let level = Level::from_sectors(vec![
            square_at(Vec2::ZERO, 2.0),
            square_at(Vec2::new(10.0, 0.0), 2.0),
        ])
        .unwrap();
        let mut state = EngineState::new(level, Settings::default());
        assert_eq!(state.current_sector_index(), Some(0));
        assert_eq!(state.nav.wall, Some(0));

        state.player.pos = Vec2::new(10.0, 0.0);
        update_navigation(&mut state);
        assert_eq!(state.current_sector_index(), Some(1));

        state.player.pos = Vec2::new(5.0, 0.0);
        update_navigation(&mut state);
        assert_eq!(state.nav, Default::default());
    }
}
