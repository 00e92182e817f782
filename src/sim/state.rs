//! Level store and engine state
//!
//! The `Level` owns every sector exclusively. Sectors are addressed by their
//! position in the store for queries and edits; each one also carries a
//! `SectorId` that survives deletions of other sectors, which is what the
//! navigation state holds on to between frames.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::signed_area;
use crate::consts::*;
use crate::settings::Settings;
use crate::texture::TextureCatalog;
use crate::yaw_to_direction;

/// One edge of a sector, with partial wall bands at the bottom and top.
///
/// Heights are relative: `bottom_height` rises from the sector floor and
/// `top_height` hangs down from the sector ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub bottom_height: f32,
    pub top_height: f32,
    /// Opaque reference into the renderer's texture catalog
    pub texture_id: u32,
}

impl Wall {
    pub fn new(bottom_height: f32, top_height: f32, texture_id: u32) -> Self {
        Self {
            bottom_height,
            top_height,
            texture_id,
        }
    }

    /// Canonical floor-to-ceiling wall
    pub fn solid(texture_id: u32) -> Self {
        Self::new(SOLID_HEIGHT, SOLID_HEIGHT, texture_id)
    }

    /// Canonical open portal with no bands at all
    pub fn open(texture_id: u32) -> Self {
        Self::new(0.0, 0.0, texture_id)
    }

    /// Both heights negative means the edge is a full wall
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.bottom_height < 0.0 && self.top_height < 0.0
    }

    /// No wall geometry at all on this edge
    #[inline]
    pub fn is_full_portal(&self) -> bool {
        self.bottom_height == 0.0 && self.top_height == 0.0
    }

    /// Vertical gap left between the two bands in a sector of the given extent
    pub fn opening(&self, floor_height: f32, ceiling_height: f32) -> f32 {
        if self.is_solid() {
            return 0.0;
        }
        (ceiling_height - floor_height) - self.bottom_height.max(0.0) - self.top_height.max(0.0)
    }

    /// Whether the player can walk through this edge
    pub fn is_passable(&self, floor_height: f32, ceiling_height: f32) -> bool {
        !self.is_solid() && self.opening(floor_height, ceiling_height) > PASSABLE_HEIGHT
    }
}

/// Absolute vertical band of wall geometry, ready for a mesher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBand {
    pub bottom: f32,
    pub top: f32,
    pub texture_id: u32,
    /// Brightness multiplier for the band
    pub shade: f32,
}

/// Wall geometry a renderer should emit for one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallSpans {
    /// Floor to ceiling
    Solid(HeightBand),
    /// Lower and/or upper band around a walkable or partial opening
    Portal {
        lower: Option<HeightBand>,
        upper: Option<HeightBand>,
    },
}

/// Stable sector identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SectorId(pub u32);

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A polygonal map cell with its own floor and ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Assigned by the level on insertion
    #[serde(default)]
    pub id: SectorId,
    pub floor_height: f32,
    pub ceiling_height: f32,
    pub floor_texture_id: u32,
    pub ceiling_texture_id: u32,
    /// Light level (0.0 - 1.0)
    pub brightness: f32,
    pub vertices: Vec<Vec2>,
    /// `walls[i]` runs from `vertices[i]` to `vertices[(i + 1) % n]`
    pub walls: Vec<Wall>,
}

impl Sector {
    /// Sector with a 0..3 height range and default textures
    pub fn new(vertices: Vec<Vec2>, walls: Vec<Wall>) -> Self {
        Self {
            id: SectorId::default(),
            floor_height: 0.0,
            ceiling_height: 3.0,
            floor_texture_id: 1,
            ceiling_texture_id: 2,
            brightness: 1.0,
            vertices,
            walls,
        }
    }

    pub fn with_heights(mut self, floor_height: f32, ceiling_height: f32) -> Self {
        self.floor_height = floor_height;
        self.ceiling_height = ceiling_height;
        self
    }

    pub fn with_textures(mut self, floor_texture_id: u32, ceiling_texture_id: u32) -> Self {
        self.floor_texture_id = floor_texture_id;
        self.ceiling_texture_id = ceiling_texture_id;
        self
    }

    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness.clamp(0.0, 1.0);
        self
    }

    #[inline]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Floor to ceiling distance
    #[inline]
    pub fn height(&self) -> f32 {
        self.ceiling_height - self.floor_height
    }

    /// Endpoints of wall `index`
    pub fn edge(&self, index: usize) -> Option<(Vec2, Vec2)> {
        let n = self.vertices.len();
        if index >= n {
            return None;
        }
        Some((self.vertices[index], self.vertices[(index + 1) % n]))
    }

    /// Every edge paired with its wall, in wall order
    pub fn edges(&self) -> impl Iterator<Item = (usize, Vec2, Vec2, &Wall)> + '_ {
        let n = self.vertices.len();
        self.walls.iter().enumerate().map(move |(i, wall)| {
            (i, self.vertices[i], self.vertices[(i + 1) % n], wall)
        })
    }

    pub fn is_wall_passable(&self, index: usize) -> bool {
        self.walls
            .get(index)
            .is_some_and(|w| w.is_passable(self.floor_height, self.ceiling_height))
    }

    /// Absolute wall bands for `index`. Zero-height bands are omitted.
    pub fn wall_spans(&self, index: usize) -> Option<WallSpans> {
        let wall = self.walls.get(index)?;
        let band = |bottom: f32, top: f32, shade: f32| {
            (top > bottom).then_some(HeightBand {
                bottom,
                top,
                texture_id: wall.texture_id,
                shade,
            })
        };

        if wall.is_solid() {
            return band(self.floor_height, self.ceiling_height, self.brightness)
                .map(WallSpans::Solid)
                .or(Some(WallSpans::Portal {
                    lower: None,
                    upper: None,
                }));
        }

        let lower_top = self.floor_height + wall.bottom_height.max(0.0);
        let upper_bottom = self.ceiling_height - wall.top_height.max(0.0);
        Some(WallSpans::Portal {
            lower: band(self.floor_height, lower_top, self.brightness),
            upper: band(upper_bottom, self.ceiling_height, self.brightness * 0.8),
        })
    }

    /// Counter-clockwise (y up) rings have positive area
    pub fn is_counter_clockwise(&self) -> bool {
        signed_area(&self.vertices) > 0.0
    }

    /// Flip a clockwise ring to counter-clockwise, keeping every wall on its edge.
    ///
    /// Returns true if the ring was reversed.
    pub fn normalize_winding(&mut self) -> bool {
        if signed_area(&self.vertices) >= 0.0 {
            return false;
        }
        // Reversed ring [v3, v2, v1, v0] has edges v3v2, v2v1, v1v0, v0v3,
        // which are the old walls [w2, w1, w0, w3]
        self.vertices.reverse();
        self.walls.reverse();
        self.walls.rotate_left(1);
        true
    }

    fn validate(&self) -> Result<(), LevelError> {
        if self.vertices.len() < 3 {
            return Err(LevelError::TooFewVertices(self.vertices.len()));
        }
        if self.walls.len() != self.vertices.len() {
            return Err(LevelError::WallCountMismatch {
                vertices: self.vertices.len(),
                walls: self.walls.len(),
            });
        }
        if self.vertices.iter().any(|v| !v.is_finite())
            || !self.floor_height.is_finite()
            || !self.ceiling_height.is_finite()
        {
            return Err(LevelError::NonFiniteCoordinate);
        }
        Ok(())
    }
}

/// Structural problems that keep a sector out of the level
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// A polygon needs at least three corners
    TooFewVertices(usize),
    /// Walls must pair one-to-one with vertices
    WallCountMismatch { vertices: usize, walls: usize },
    /// NaN or infinite coordinate or height
    NonFiniteCoordinate,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::TooFewVertices(n) => {
                write!(f, "sector has {} vertices, need at least 3", n)
            }
            LevelError::WallCountMismatch { vertices, walls } => {
                write!(f, "sector has {} vertices but {} walls", vertices, walls)
            }
            LevelError::NonFiniteCoordinate => write!(f, "sector has a non-finite coordinate"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Ordered sector store
#[derive(Debug, Clone, Default)]
pub struct Level {
    sectors: Vec<Sector>,
    /// Next sector ID
    next_id: u32,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a level, validating and normalizing every sector in order
    pub fn from_sectors(sectors: Vec<Sector>) -> Result<Self, LevelError> {
        let mut level = Self::new();
        for sector in sectors {
            level.push_sector(sector)?;
        }
        log::info!(
            "Level loaded: {} sectors, {} walls",
            level.len(),
            level.wall_count()
        );
        Ok(level)
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn sector(&self, index: usize) -> Option<&Sector> {
        self.sectors.get(index)
    }

    pub(crate) fn sector_mut(&mut self, index: usize) -> Option<&mut Sector> {
        self.sectors.get_mut(index)
    }

    pub fn wall(&self, sector: usize, wall: usize) -> Option<&Wall> {
        self.sectors.get(sector)?.walls.get(wall)
    }

    pub(crate) fn wall_mut(&mut self, sector: usize, wall: usize) -> Option<&mut Wall> {
        self.sectors.get_mut(sector)?.walls.get_mut(wall)
    }

    /// Current store position of a sector
    pub fn index_of(&self, id: SectorId) -> Option<usize> {
        self.sectors.iter().position(|s| s.id == id)
    }

    /// Total walls across all sectors
    pub fn wall_count(&self) -> usize {
        self.sectors.iter().map(|s| s.walls.len()).sum()
    }

    /// Append a sector and return its index.
    ///
    /// The sector is rejected untouched if its arrays don't line up. Clockwise
    /// rings are flipped so every sector in the store winds the same way.
    pub fn push_sector(&mut self, mut sector: Sector) -> Result<usize, LevelError> {
        sector.validate()?;
        if sector.normalize_winding() {
            log::debug!("Sector reversed to counter-clockwise winding");
        }

        sector.id = SectorId(self.next_id);
        self.next_id += 1;
        self.sectors.push(sector);
        Ok(self.sectors.len() - 1)
    }

    /// Remove the sector at `index`. Later sectors shift down by one.
    pub fn remove_sector(&mut self, index: usize) -> Option<Sector> {
        if index >= self.sectors.len() {
            return None;
        }
        Some(self.sectors.remove(index))
    }

    /// Check the one-to-one wall/vertex pairing for every sector
    pub fn check_invariants(&self) -> Result<(), LevelError> {
        self.sectors.iter().try_for_each(Sector::validate)
    }
}

/// Which sector the player stands in and which of its walls they look at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    pub sector: Option<SectorId>,
    /// Index into the current sector's walls
    pub wall: Option<usize>,
}

impl Navigation {
    /// Store position of the current sector
    pub fn sector_index(&self, level: &Level) -> Option<usize> {
        self.sector.and_then(|id| level.index_of(id))
    }
}

/// First-person viewer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Map-plane position
    pub pos: Vec2,
    /// Heading (radians, 0 faces -y)
    pub yaw: f32,
    /// Look up/down (radians)
    pub pitch: f32,
    /// Absolute camera height
    pub eye_z: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            eye_z: EYE_HEIGHT,
        }
    }
}

impl Player {
    /// Unit look direction on the map plane
    #[inline]
    pub fn look_direction(&self) -> Vec2 {
        yaw_to_direction(self.yaw)
    }
}

/// Seeded generator for generated content.
///
/// `stream` counts the draws taken since `seed`, so a session can report how
/// far into its sequence it is and `to_rng` can restart the same sequence.
#[derive(Debug, Clone)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
    rng: Pcg32,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            stream: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Fresh generator at the start of this seed's sequence
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    /// Texture id for a freshly generated wall
    pub fn texture_id(&mut self) -> u32 {
        self.stream += 1;
        self.rng.random_range(GENERATED_TEXTURE_MIN..=GENERATED_TEXTURE_MAX)
    }
}

/// Everything a running level needs, passed explicitly to every subsystem
#[derive(Debug, Clone)]
pub struct EngineState {
    pub level: Level,
    pub player: Player,
    pub nav: Navigation,
    pub settings: Settings,
    /// Texture picked for wall assignment
    pub textures: TextureCatalog,
    /// Frames simulated so far
    pub frame: u64,
    /// Drives texture ids of generated walls
    pub rng_state: RngState,
}

impl EngineState {
    /// Start a session on `level` with the player at the configured spawn
    pub fn new(level: Level, settings: Settings) -> Self {
        let player = Player {
            pos: settings.spawn,
            yaw: settings.spawn_yaw,
            ..Player::default()
        };
        let mut state = Self {
            level,
            player,
            nav: Navigation::default(),
            rng_state: RngState::new(settings.seed),
            settings,
            textures: TextureCatalog::default(),
            frame: 0,
        };
        super::locator::update_navigation(&mut state);
        state
    }

    /// Store position of the sector the player is in
    pub fn current_sector_index(&self) -> Option<usize> {
        self.nav.sector_index(&self.level)
    }

    /// `(sector, wall)` indices under the crosshair
    pub fn current_wall(&self) -> Option<(usize, usize)> {
        Some((self.current_sector_index()?, self.nav.wall?))
    }

    pub fn current_sector(&self) -> Option<&Sector> {
        self.level.sector(self.current_sector_index()?)
    }
}
