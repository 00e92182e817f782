//! Live level editing
//!
//! Every operation validates its indices first and leaves the level untouched
//! when they don't resolve, so a stale selection can never corrupt the store.
//! Operations that add or remove sectors re-run navigation before returning,
//! since store indices shift.

use std::f32::consts::TAU;

use glam::Vec2;

use super::geometry::{signed_area, snap_point};
use super::locator::update_navigation;
use super::state::{EngineState, Level, Sector, Wall};
use crate::consts::*;

/// Flip a wall between solid and open portal.
///
/// Any non-solid wall (including partial ones) becomes solid.
pub fn toggle_wall(level: &mut Level, sector: usize, wall: usize) -> bool {
    let Some(w) = level.wall_mut(sector, wall) else {
        return false;
    };
    let texture_id = w.texture_id;
    *w = if w.is_solid() {
        Wall::open(texture_id)
    } else {
        Wall::solid(texture_id)
    };
    log::debug!(
        "Sector {} wall {} now {}",
        sector,
        wall,
        if w.is_solid() { "solid" } else { "open" }
    );
    true
}

fn step(increase: bool) -> f32 {
    if increase { HEIGHT_STEP } else { -HEIGHT_STEP }
}

/// Raise or lower the bottom band of a wall by one step.
///
/// The band never goes below zero and always leaves `MIN_HEIGHT_MARGIN`
/// between itself and the top band.
pub fn adjust_wall_bottom_height(
    level: &mut Level,
    sector: usize,
    wall: usize,
    increase: bool,
) -> bool {
    let Some(s) = level.sector_mut(sector) else {
        return false;
    };
    let extent = s.height();
    let Some(w) = s.walls.get_mut(wall) else {
        return false;
    };

    let max = extent - w.top_height.max(0.0) - MIN_HEIGHT_MARGIN;
    w.bottom_height = (w.bottom_height + step(increase)).min(max).max(0.0);
    true
}

/// Raise or lower the top band of a wall by one step, clamped like the bottom
pub fn adjust_wall_top_height(
    level: &mut Level,
    sector: usize,
    wall: usize,
    increase: bool,
) -> bool {
    let Some(s) = level.sector_mut(sector) else {
        return false;
    };
    let extent = s.height();
    let Some(w) = s.walls.get_mut(wall) else {
        return false;
    };

    let max = extent - w.bottom_height.max(0.0) - MIN_HEIGHT_MARGIN;
    w.top_height = (w.top_height + step(increase)).min(max).max(0.0);
    true
}

/// Assign a texture to a wall
pub fn set_wall_texture(level: &mut Level, sector: usize, wall: usize, texture_id: u32) -> bool {
    match level.wall_mut(sector, wall) {
        Some(w) => {
            w.texture_id = texture_id;
            true
        }
        None => false,
    }
}

/// Drag a vertex to `pos`, snapped to the interactive grid.
///
/// Returns the vertex's index afterwards: if the drag flips the ring to
/// clockwise it is reversed, and the dragged vertex moves to a new slot.
pub fn move_vertex(level: &mut Level, sector: usize, vertex: usize, pos: Vec2) -> Option<usize> {
    if !pos.is_finite() {
        return None;
    }
    let s = level.sector_mut(sector)?;
    let v = s.vertices.get_mut(vertex)?;
    *v = snap_point(pos, DRAG_SNAP);

    if s.normalize_winding() {
        log::debug!("Sector {} flipped while dragging vertex {}", sector, vertex);
        return Some(s.vertices.len() - 1 - vertex);
    }
    Some(vertex)
}

/// Closest vertex to `point` within `max_distance`, as `(sector, vertex)`
pub fn nearest_vertex(level: &Level, point: Vec2, max_distance: f32) -> Option<(usize, usize)> {
    level
        .sectors()
        .iter()
        .enumerate()
        .flat_map(|(si, s)| {
            s.vertices
                .iter()
                .enumerate()
                .map(move |(vi, v)| (si, vi, v.distance(point)))
        })
        .filter(|(_, _, d)| *d <= max_distance)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(si, vi, _)| (si, vi))
}

/// Remove a sector and re-locate the player
pub fn delete_sector(state: &mut EngineState, index: usize) -> bool {
    let Some(removed) = state.level.remove_sector(index) else {
        return false;
    };
    log::info!(
        "Deleted sector {} (id {}), {} left",
        index,
        removed.id,
        state.level.len()
    );
    update_navigation(state);
    true
}

/// Corner ring for a sector grown off the wall `v1 → v2`.
///
/// The ring starts with the shared edge mirrored (`v2, v1`) so the new sector
/// winds the same way as its source. Generated corners are snapped to the
/// procedural grid; the shared corners are kept exact so the edges still
/// coincide. Returns `None` for unsupported counts or a ring that would wind
/// backwards (looking away from the wall).
pub fn extrusion_ring(v1: Vec2, v2: Vec2, dir: Vec2, vertex_count: usize) -> Option<Vec<Vec2>> {
    let dir = dir.try_normalize()?;
    let offset = dir * EXTRUDE_DISTANCE;
    let mid = (v1 + v2) * 0.5;

    let generated: Vec<Vec2> = match vertex_count {
        3 => vec![mid + offset],
        4 => vec![v1 + offset, v2 + offset],
        5 | 6 => {
            let center = mid + offset;
            let base = v1 - center;
            let base_angle = base.y.atan2(base.x);
            let spacing = TAU / vertex_count as f32;
            (1..vertex_count - 1)
                .map(|k| {
                    center + Vec2::from_angle(base_angle + k as f32 * spacing) * EXTRUDE_RING_RADIUS
                })
                .collect()
        }
        _ => return None,
    };

    let mut ring = Vec::with_capacity(vertex_count);
    ring.push(v2);
    ring.push(v1);
    ring.extend(generated.into_iter().map(|p| snap_point(p, PROCEDURAL_SNAP)));

    (signed_area(&ring) > f32::EPSILON).then_some(ring)
}

/// Grow a new sector off the wall the player is looking at.
///
/// The source wall becomes an open portal if it was solid. The new sector's
/// first wall is the matching portal; the rest are solid with random
/// textures. Its floor and ceiling continue the bands of the source wall, so
/// a raised bottom band turns into a step up. Returns the new sector's index.
pub fn add_sector(state: &mut EngineState, vertex_count: usize, look_dir: Vec2) -> Option<usize> {
    let (si, wi) = state.current_wall()?;
    let source = state.level.sector(si)?;
    let (v1, v2) = source.edge(wi)?;

    let Some(ring) = extrusion_ring(v1, v2, look_dir, vertex_count) else {
        log::debug!(
            "Can't grow a {}-sided sector off sector {} wall {}",
            vertex_count,
            si,
            wi
        );
        return None;
    };

    let mut portal = source.walls[wi];
    if portal.is_solid() {
        portal = Wall::open(portal.texture_id);
    }

    let floor = source.floor_height + portal.bottom_height.max(0.0);
    let ceiling = source.ceiling_height - portal.top_height.max(0.0);
    let (floor_tex, ceiling_tex, brightness) = (
        source.floor_texture_id,
        source.ceiling_texture_id,
        source.brightness,
    );

    let mut walls = Vec::with_capacity(ring.len());
    walls.push(Wall::open(portal.texture_id));
    for _ in 1..ring.len() {
        walls.push(Wall::solid(state.rng_state.texture_id()));
    }

    let sector = Sector::new(ring, walls)
        .with_heights(floor, ceiling)
        .with_textures(floor_tex, ceiling_tex)
        .with_brightness(brightness);

    // Push first: a rejected sector must not leave a dangling portal behind
    let index = match state.level.push_sector(sector) {
        Ok(index) => index,
        Err(e) => {
            log::warn!("Generated sector rejected: {}", e);
            return None;
        }
    };
    if let Some(w) = state.level.wall_mut(si, wi) {
        *w = portal;
    }

    log::info!(
        "Added {}-sided sector {} off sector {} wall {}",
        vertex_count,
        index,
        si,
        wi
    );
    update_navigation(state);
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use proptest::prelude::*;

    fn square_level(walls: Vec<Wall>) -> Level {
        let verts = vec![
            Vec2::new(-2.0, -2.0),
            Vec2::new(2.0, -2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(-2.0, 2.0),
        ];
        Level::from_sectors(vec![Sector::new(verts, walls)]).unwrap()
    }

    /// Player in the middle of the square, facing +x (wall 1)
    fn facing_east(walls: Vec<Wall>) -> EngineState {
        let settings = Settings {
            spawn_yaw: -std::f32::consts::FRAC_PI_2,
            ..Settings::default()
        };
        let state = EngineState::new(square_level(walls), settings);
        assert_eq!(state.current_wall(), Some((0, 1)));
        state
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_toggle_wall() {
        let mut level = square_level(vec![Wall::solid(7); 4]);
        assert!(toggle_wall(&mut level, 0, 2));
        assert_eq!(level.wall(0, 2), Some(&Wall::open(7)));
        assert!(toggle_wall(&mut level, 0, 2));
        assert_eq!(level.wall(0, 2), Some(&Wall::solid(7)));

        assert!(!toggle_wall(&mut level, 0, 4));
        assert!(!toggle_wall(&mut level, 1, 0));
    }

    #[test]
    fn test_toggle_partial_wall_restores_classification() {
        let mut level = square_level(vec![Wall::new(1.0, 0.5, 3); 4]);
        toggle_wall(&mut level, 0, 0);
        assert!(level.wall(0, 0).unwrap().is_solid());
        toggle_wall(&mut level, 0, 0);
        let w = level.wall(0, 0).unwrap();
        assert!(!w.is_solid());
        assert_eq!(w.texture_id, 3);
    }

    #[test]
    fn test_adjust_bottom_clamps() {
        let mut level = square_level(vec![Wall::new(0.0, 0.5, 1); 4]);

        adjust_wall_bottom_height(&mut level, 0, 0, false);
        assert_eq!(level.wall(0, 0).unwrap().bottom_height, 0.0);

        for _ in 0..100 {
            adjust_wall_bottom_height(&mut level, 0, 0, true);
        }
        // 3.0 - 0.5 - 0.1
        assert!((level.wall(0, 0).unwrap().bottom_height - 2.4).abs() < 1e-4);
        assert!(!adjust_wall_bottom_height(&mut level, 0, 9, true));
    }

    #[test]
    fn test_adjust_top_clamps() {
        let mut level = square_level(vec![Wall::new(1.0, 0.0, 1); 4]);
        for _ in 0..100 {
            adjust_wall_top_height(&mut level, 0, 3, true);
        }
        assert!((level.wall(0, 3).unwrap().top_height - 1.9).abs() < 1e-4);

        adjust_wall_top_height(&mut level, 0, 3, false);
        assert!((level.wall(0, 3).unwrap().top_height - 1.8).abs() < 1e-4);
    }

    #[test]
    fn test_adjust_solid_wall_starts_from_floor() {
        let mut level = square_level(vec![Wall::solid(1); 4]);
        adjust_wall_bottom_height(&mut level, 0, 0, true);
        let w = level.wall(0, 0).unwrap();
        assert_eq!(w.bottom_height, 0.0);
        assert!(!w.is_solid());
    }

    #[test]
    fn test_set_wall_texture() {
        let mut level = square_level(vec![Wall::solid(1); 4]);
        assert!(set_wall_texture(&mut level, 0, 1, 4));
        assert_eq!(level.wall(0, 1).unwrap().texture_id, 4);
        assert!(!set_wall_texture(&mut level, 2, 1, 4));
    }

    #[test]
    fn test_move_vertex_snaps() {
        let mut level = square_level(vec![Wall::solid(1); 4]);
        assert_eq!(move_vertex(&mut level, 0, 2, Vec2::new(2.53, 2.29)), Some(2));
        assert!(close(level.sector(0).unwrap().vertices[2], Vec2::new(2.6, 2.2)));
        assert_eq!(move_vertex(&mut level, 0, 7, Vec2::ZERO), None);
    }

    #[test]
    fn test_move_vertex_keeps_winding() {
        let mut level = square_level(vec![Wall::solid(1); 4]);
        // Drag two corners across the square so the ring turns over
        move_vertex(&mut level, 0, 0, Vec2::new(-2.0, 4.0));
        let moved = move_vertex(&mut level, 0, 1, Vec2::new(2.0, 4.0)).unwrap();
        let sector = level.sector(0).unwrap();
        assert!(sector.is_counter_clockwise());
        assert!(close(sector.vertices[moved], Vec2::new(2.0, 4.0)));
        assert_eq!(sector.vertices.len(), sector.walls.len());
    }

    #[test]
    fn test_nearest_vertex() {
        let level = square_level(vec![Wall::solid(1); 4]);
        assert_eq!(nearest_vertex(&level, Vec2::new(1.9, 2.1), 0.5), Some((0, 2)));
        assert_eq!(nearest_vertex(&level, Vec2::ZERO, 0.5), None);
    }

    #[test]
    fn test_add_square_sector() {
        let mut state = facing_east(vec![Wall::solid(1); 4]);
        let index = add_sector(&mut state, 4, Vec2::X).expect("sector added");
        assert_eq!(index, 1);

        let v1 = Vec2::new(2.0, -2.0);
        let v2 = Vec2::new(2.0, 2.0);
        let new = state.level.sector(1).unwrap();
        assert_eq!(new.vertices.len(), 4);
        assert_eq!(new.vertices[0], v2);
        assert_eq!(new.vertices[1], v1);
        assert!(close(new.vertices[2], v1 + Vec2::new(2.0, 0.0)));
        assert!(close(new.vertices[3], v2 + Vec2::new(2.0, 0.0)));

        assert!(new.walls[0].is_full_portal());
        for wall in &new.walls[1..] {
            assert!(wall.is_solid());
            assert!((GENERATED_TEXTURE_MIN..=GENERATED_TEXTURE_MAX).contains(&wall.texture_id));
        }

        // Source wall was opened
        assert!(state.level.wall(0, 1).unwrap().is_full_portal());
        assert!(new.is_counter_clockwise());
    }

    #[test]
    fn test_add_triangle() {
        let mut state = facing_east(vec![Wall::solid(1); 4]);
        let index = add_sector(&mut state, 3, Vec2::X).unwrap();
        let tri = state.level.sector(index).unwrap();
        assert_eq!(tri.vertices.len(), 3);
        assert!(close(tri.vertices[2], Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn test_ring_starts_at_v1_and_steps_evenly() {
        let v1 = Vec2::new(2.0, -2.0);
        let v2 = Vec2::new(2.0, 2.0);
        let cases: [(usize, &[(f32, f32)]); 2] = [
            (5, &[(2.0, 2.0), (2.0, -2.0), (4.7, -1.3), (5.5, 0.2), (4.2, 1.5)]),
            (
                6,
                &[(2.0, 2.0), (2.0, -2.0), (4.4, -1.4), (5.4, -0.4), (5.1, 1.1), (3.6, 1.4)],
            ),
        ];
        for (n, expected) in cases {
            let ring = extrusion_ring(v1, v2, Vec2::X, n).unwrap();
            assert_eq!(ring.len(), n);
            for (got, &(x, y)) in ring.iter().zip(expected) {
                assert!(close(*got, Vec2::new(x, y)), "{}-gon: {:?} != ({}, {})", n, got, x, y);
            }
        }
    }

    #[test]
    fn test_add_hexagon_sector() {
        let mut state = facing_east(vec![Wall::solid(1); 4]);
        let index = add_sector(&mut state, 6, Vec2::X).unwrap();
        let hex = state.level.sector(index).unwrap();

        assert_eq!(hex.vertices.len(), 6);
        assert_eq!(hex.walls.len(), 6);
        assert!(hex.is_counter_clockwise());
        assert!(close(hex.vertices[2], Vec2::new(4.4, -1.4)));
        assert_eq!((hex.floor_height, hex.ceiling_height), (0.0, 3.0));

        assert!(hex.walls[0].is_full_portal());
        for wall in &hex.walls[1..] {
            assert!(wall.is_solid());
            assert!((GENERATED_TEXTURE_MIN..=GENERATED_TEXTURE_MAX).contains(&wall.texture_id));
        }
        // One draw per solid wall
        assert_eq!(state.rng_state.stream, 5);
        assert!(state.level.wall(0, 1).unwrap().is_full_portal());
    }

    #[test]
    fn test_add_sector_heights_follow_portal() {
        let mut state = facing_east(vec![
            Wall::solid(1),
            Wall::new(1.0, 0.5, 2),
            Wall::solid(1),
            Wall::solid(1),
        ]);
        let index = add_sector(&mut state, 4, Vec2::X).unwrap();
        let new = state.level.sector(index).unwrap();
        assert_eq!(new.floor_height, 1.0);
        assert_eq!(new.ceiling_height, 2.5);
        // Partial wall stays as it was
        assert_eq!(state.level.wall(0, 1), Some(&Wall::new(1.0, 0.5, 2)));
    }

    #[test]
    fn test_add_sector_rejections() {
        let mut state = facing_east(vec![Wall::solid(1); 4]);
        assert_eq!(add_sector(&mut state, 7, Vec2::X), None);
        assert_eq!(add_sector(&mut state, 2, Vec2::X), None);
        assert_eq!(add_sector(&mut state, 4, Vec2::ZERO), None);
        // Looking back into the room
        assert_eq!(add_sector(&mut state, 4, -Vec2::X), None);
        assert_eq!(state.level.len(), 1);
        assert!(state.level.wall(0, 1).unwrap().is_solid());

        // Outside every sector
        state.player.pos = Vec2::new(50.0, 0.0);
        update_navigation(&mut state);
        assert_eq!(add_sector(&mut state, 4, Vec2::X), None);
    }

    #[test]
    fn test_delete_only_sector() {
        let mut state = facing_east(vec![Wall::solid(1); 4]);
        assert!(delete_sector(&mut state, 0));
        assert!(state.level.is_empty());
        assert_eq!(crate::sim::find_sector(&state.level, Vec2::ZERO), None);
        assert_eq!(state.current_wall(), None);
        assert!(!delete_sector(&mut state, 0));
    }

    #[test]
    fn test_delete_earlier_sector_keeps_navigation() {
        let mut state = facing_east(vec![Wall::solid(1); 4]);
        add_sector(&mut state, 4, Vec2::X).unwrap();
        state.player.pos = Vec2::new(3.0, 0.0);
        update_navigation(&mut state);
        let id = state.nav.sector;
        assert_eq!(state.current_sector_index(), Some(1));

        delete_sector(&mut state, 0);
        assert_eq!(state.nav.sector, id);
        assert_eq!(state.current_sector_index(), Some(0));
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Toggle(usize, usize),
        Bottom(usize, usize, bool),
        Top(usize, usize, bool),
        Add(usize),
        Delete(usize),
        Turn(f32),
    }

    fn edit_strategy() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (0..4usize, 0..7usize).prop_map(|(s, w)| Edit::Toggle(s, w)),
            (0..4usize, 0..7usize, any::<bool>()).prop_map(|(s, w, up)| Edit::Bottom(s, w, up)),
            (0..4usize, 0..7usize, any::<bool>()).prop_map(|(s, w, up)| Edit::Top(s, w, up)),
            (2..8usize).prop_map(Edit::Add),
            (0..4usize).prop_map(Edit::Delete),
            (-3.2f32..3.2).prop_map(Edit::Turn),
        ]
    }

    proptest! {
        #[test]
        fn prop_edits_keep_structure(edits in prop::collection::vec(edit_strategy(), 1..40)) {
            let mut state = facing_east(vec![Wall::new(0.0, 0.5, 1); 4]);
            for edit in edits {
                match edit {
                    Edit::Toggle(s, w) => { toggle_wall(&mut state.level, s, w); }
                    Edit::Bottom(s, w, up) => {
                        adjust_wall_bottom_height(&mut state.level, s, w, up);
                    }
                    Edit::Top(s, w, up) => { adjust_wall_top_height(&mut state.level, s, w, up); }
                    Edit::Add(n) => {
                        let dir = state.player.look_direction();
                        add_sector(&mut state, n, dir);
                    }
                    Edit::Delete(s) => { delete_sector(&mut state, s); }
                    Edit::Turn(yaw) => {
                        state.player.yaw = yaw;
                        update_navigation(&mut state);
                    }
                }
                prop_assert!(state.level.check_invariants().is_ok());
                for sector in state.level.sectors() {
                    prop_assert_eq!(sector.walls.len(), sector.vertices.len());
                }
            }
        }

        #[test]
        fn prop_height_bands_never_overlap(
            steps in prop::collection::vec((any::<bool>(), any::<bool>()), 0..80)
        ) {
            let mut level = square_level(vec![Wall::new(0.3, 0.2, 1); 4]);
            for (bottom, up) in steps {
                if bottom {
                    adjust_wall_bottom_height(&mut level, 0, 0, up);
                } else {
                    adjust_wall_top_height(&mut level, 0, 0, up);
                }
                let sector = level.sector(0).unwrap();
                let w = sector.walls[0];
                prop_assert!(w.bottom_height >= 0.0 && w.top_height >= 0.0);
                prop_assert!(
                    w.bottom_height + w.top_height <= sector.height() - MIN_HEIGHT_MARGIN + 1e-4
                );
            }
        }

        #[test]
        fn prop_toggle_twice_keeps_classification(bottom in -2.0f32..2.0, top in -2.0f32..2.0) {
            let mut level = square_level(vec![Wall::new(bottom, top, 1); 4]);
            let was_solid = level.wall(0, 0).unwrap().is_solid();
            toggle_wall(&mut level, 0, 0);
            toggle_wall(&mut level, 0, 0);
            prop_assert_eq!(level.wall(0, 0).unwrap().is_solid(), was_solid);
        }
    }
}
