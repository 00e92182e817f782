//! Built-in starter level
//!
//! A square hall with a corridor to the north, a five-sided side room, a
//! triangular nook past the corridor and a slanted room to the south.

use glam::Vec2;

use super::state::{Level, LevelError, Sector, Wall};

fn ring(points: &[(f32, f32)]) -> Vec<Vec2> {
    points.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
}

fn walls(bands: &[(f32, f32, u32)]) -> Vec<Wall> {
    bands
        .iter()
        .map(|&(bottom, top, texture)| Wall::new(bottom, top, texture))
        .collect()
}

/// The sectors of the starter level, in store order
pub fn starter_sectors() -> Vec<Sector> {
    vec![
        Sector::new(
            ring(&[(-2.0, -2.0), (2.0, -2.0), (2.0, 2.0), (-2.0, 2.0)]),
            walls(&[(0.0, 1.0, 3), (-1.0, -1.0, 4), (0.0, 1.0, 5), (0.0, 1.0, 6)]),
        )
        .with_heights(0.0, 3.0)
        .with_textures(1, 2)
        .with_brightness(0.8),
        Sector::new(
            ring(&[(-2.0, 2.0), (2.0, 2.0), (2.0, 6.0), (-2.0, 6.0)]),
            walls(&[(1.0, 0.5, 9), (1.0, 0.5, 10), (0.0, 0.5, 11), (1.0, 0.5, 12)]),
        )
        .with_heights(0.0, 3.0)
        .with_textures(7, 8)
        .with_brightness(0.7),
        // Authored clockwise; the level flips it on load
        Sector::new(
            ring(&[(2.0, 2.0), (2.0, 6.0), (6.0, 7.0), (7.0, 4.0), (5.0, 1.0)]),
            walls(&[
                (1.0, 0.5, 15),
                (1.0, 0.5, 16),
                (1.0, 0.5, 17),
                (1.0, 0.5, 18),
                (1.0, 0.5, 19),
            ]),
        )
        .with_heights(0.0, 3.0)
        .with_textures(13, 14)
        .with_brightness(0.6),
        Sector::new(
            ring(&[(-2.0, 6.0), (2.0, 6.0), (0.0, 9.0)]),
            walls(&[(0.0, 0.5, 22), (-1.0, -1.0, 23), (-1.0, -1.0, 24)]),
        )
        .with_heights(0.0, 3.0)
        .with_textures(20, 21)
        .with_brightness(0.5),
        Sector::new(
            ring(&[(-2.0, -2.0), (-7.0, -8.0), (-3.0, -8.0), (2.0, -2.0)]),
            walls(&[(1.0, 0.5, 27), (1.0, 0.5, 28), (1.0, 0.5, 29), (0.0, 1.0, 30)]),
        )
        .with_heights(0.0, 3.0)
        .with_textures(25, 26)
        .with_brightness(0.9),
    ]
}

/// Build the starter level
pub fn starter_level() -> Result<Level, LevelError> {
    Level::from_sectors(starter_sectors())
}
