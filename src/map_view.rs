//! Minimap projection
//!
//! The map is drawn centred on the player at a fixed pixel scale. Map space
//! has the same axis directions as the world plane, so projecting is a
//! translate and scale, and the inverse is exact. Drawing itself belongs to
//! the platform layer; this module only produces the shapes.

use glam::Vec2;

use crate::input::ViewInput;
use crate::settings::Settings;
use crate::sim::editor;
use crate::sim::geometry::vertex_centroid;
use crate::sim::{EngineState, Level};

/// Side of the overlay map canvas (pixels)
pub const MAP_SIZE: f32 = 200.0;
/// Scale limits (pixels per world unit)
pub const MIN_SCALE: f32 = 5.0;
pub const MAX_SCALE: f32 = 80.0;
/// Scale multiplier per zoom step
pub const ZOOM_FACTOR: f32 = 1.25;

/// Player dot radius (pixels)
pub const PLAYER_DOT_RADIUS: f32 = 3.0;
/// Look arrow length (pixels)
pub const ARROW_LENGTH: f32 = 15.0;
/// Arrow head stroke length (pixels)
pub const ARROW_HEAD_LENGTH: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    /// Small map in the corner of the 3D view
    #[default]
    Overlay,
    /// Map fills the viewport
    Fullscreen,
}

/// Closed outline of one sector in map pixels
#[derive(Debug, Clone, PartialEq)]
pub struct MapOutline {
    pub sector: usize,
    /// First point repeated at the end
    pub points: Vec<Vec2>,
    /// Where to put the sector's number
    pub label: Vec2,
    /// Sector the player is standing in
    pub current: bool,
}

/// Player dot and look arrow in map pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerMarker {
    pub center: Vec2,
    pub radius: f32,
    pub arrow_end: Vec2,
    /// End points of the two head strokes, both starting at `arrow_end`
    pub arrow_head: [Vec2; 2],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    scale: f32,
    mode: MapMode,
    /// Viewport used in fullscreen mode
    fullscreen_size: Vec2,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(Settings::default().minimap_scale)
    }
}

impl MapView {
    pub fn new(scale: f32) -> Self {
        Self {
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
            mode: MapMode::Overlay,
            fullscreen_size: Vec2::splat(MAP_SIZE),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.minimap_scale)
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    /// Canvas size for the current mode
    pub fn viewport(&self) -> Vec2 {
        match self.mode {
            MapMode::Overlay => Vec2::splat(MAP_SIZE),
            MapMode::Fullscreen => self.fullscreen_size,
        }
    }

    pub fn set_fullscreen_size(&mut self, size: Vec2) {
        if size.x > 0.0 && size.y > 0.0 {
            self.fullscreen_size = size;
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.viewport() * 0.5
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale * ZOOM_FACTOR).min(MAX_SCALE);
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale / ZOOM_FACTOR).max(MIN_SCALE);
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            MapMode::Overlay => MapMode::Fullscreen,
            MapMode::Fullscreen => MapMode::Overlay,
        };
        log::debug!("Map mode: {:?}", self.mode);
    }

    /// Apply the zoom and mode commands of one frame
    pub fn apply(&mut self, view: &ViewInput) {
        for _ in 0..view.zoom.max(0) {
            self.zoom_in();
        }
        for _ in 0..(-view.zoom).max(0) {
            self.zoom_out();
        }
        if view.toggle_map {
            self.toggle_mode();
        }
    }

    #[inline]
    pub fn world_to_map(&self, point: Vec2, player_pos: Vec2) -> Vec2 {
        self.center() + (point - player_pos) * self.scale
    }

    #[inline]
    pub fn map_to_world(&self, map_point: Vec2, player_pos: Vec2) -> Vec2 {
        player_pos + (map_point - self.center()) / self.scale
    }

    /// Outline of every sector in store order
    pub fn outlines(
        &self,
        level: &Level,
        player_pos: Vec2,
        current: Option<usize>,
    ) -> Vec<MapOutline> {
        level
            .sectors()
            .iter()
            .enumerate()
            .map(|(i, sector)| {
                let mut points: Vec<Vec2> = sector
                    .vertices
                    .iter()
                    .map(|&v| self.world_to_map(v, player_pos))
                    .collect();
                if let Some(&first) = points.first() {
                    points.push(first);
                }
                MapOutline {
                    sector: i,
                    points,
                    label: self.world_to_map(vertex_centroid(&sector.vertices), player_pos),
                    current: current == Some(i),
                }
            })
            .collect()
    }

    /// Endpoints of a wall in map pixels, for highlighting
    pub fn wall_segment(
        &self,
        level: &Level,
        player_pos: Vec2,
        sector: usize,
        wall: usize,
    ) -> Option<(Vec2, Vec2)> {
        let (a, b) = level.sector(sector)?.edge(wall)?;
        Some((
            self.world_to_map(a, player_pos),
            self.world_to_map(b, player_pos),
        ))
    }

    /// Player dot with a look arrow; the head strokes sit at ±30° off the shaft
    pub fn player_marker(&self, look_dir: Vec2) -> PlayerMarker {
        let center = self.center();
        let dir = look_dir.try_normalize().unwrap_or(Vec2::NEG_Y);
        let arrow_end = center + dir * ARROW_LENGTH;
        let angle = dir.y.atan2(dir.x);
        let head = |offset: f32| arrow_end - Vec2::from_angle(angle + offset) * ARROW_HEAD_LENGTH;

        PlayerMarker {
            center,
            radius: PLAYER_DOT_RADIUS,
            arrow_end,
            arrow_head: [
                head(-std::f32::consts::FRAC_PI_6),
                head(std::f32::consts::FRAC_PI_6),
            ],
        }
    }

    /// Vertex under a map click, as `(sector, vertex)`
    pub fn pick_vertex(
        &self,
        level: &Level,
        map_point: Vec2,
        player_pos: Vec2,
        radius_px: f32,
    ) -> Option<(usize, usize)> {
        let world = self.map_to_world(map_point, player_pos);
        editor::nearest_vertex(level, world, radius_px / self.scale)
    }

    /// Drag a vertex to a map position and re-locate the player.
    ///
    /// Returns the vertex's index afterwards (see `editor::move_vertex`).
    pub fn drag_vertex(
        &self,
        state: &mut EngineState,
        sector: usize,
        vertex: usize,
        map_point: Vec2,
    ) -> Option<usize> {
        let world = self.map_to_world(map_point, state.player.pos);
        let index = editor::move_vertex(&mut state.level, sector, vertex, world)?;
        crate::sim::update_navigation(state);
        Some(index)
    }
}
