//! Texture catalog
//!
//! The renderer owns the actual images; the core only deals in texture ids.
//! The catalog keeps the list of named texture sets the editor can assign and
//! which one is currently selected.

use serde::{Deserialize, Serialize};

/// Flat colors used when a texture id has no loaded image
pub const FALLBACK_PALETTE: [u32; 8] = [
    0x8B4513, // Brown
    0x696969, // Gray
    0x2F4F4F, // Dark Slate Gray
    0x800000, // Maroon
    0x556B2F, // Dark Olive Green
    0x483D8B, // Dark Slate Blue
    0x8B0000, // Dark Red
    0x2E8B57, // Sea Green
];

/// Fallback color for a texture id
#[inline]
pub fn palette_color(texture_id: u32) -> u32 {
    FALLBACK_PALETTE[texture_id as usize % FALLBACK_PALETTE.len()]
}

/// Fallback color scaled by a brightness factor
pub fn shaded_color(texture_id: u32, brightness: f32) -> u32 {
    let color = palette_color(texture_id);
    let k = brightness.clamp(0.0, 1.0);
    let channel = |shift: u32| ((((color >> shift) & 0xFF) as f32 * k).round() as u32) << shift;
    channel(16) | channel(8) | channel(0)
}

/// A named texture set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub id: u32,
    pub name: String,
}

/// Texture sets available to the editor, with a wrap-around selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureCatalog {
    entries: Vec<TextureEntry>,
    selected: usize,
}

impl Default for TextureCatalog {
    fn default() -> Self {
        Self::new(
            ["Bricks087", "Bricks089", "Bricks095", "Rocks001"]
                .iter()
                .enumerate()
                .map(|(i, name)| TextureEntry {
                    id: i as u32 + 1,
                    name: name.to_string(),
                })
                .collect(),
        )
    }
}

impl TextureCatalog {
    pub fn new(entries: Vec<TextureEntry>) -> Self {
        Self {
            entries,
            selected: 0,
        }
    }

    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&TextureEntry> {
        self.entries.get(self.selected)
    }

    /// Id to assign to a wall, if the catalog has anything in it
    pub fn selected_id(&self) -> Option<u32> {
        self.selected().map(|e| e.id)
    }

    /// Move the selection by `delta`, wrapping at both ends
    pub fn change_selection(&mut self, delta: i32) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as i64;
        self.selected = (self.selected as i64 + delta as i64).rem_euclid(len) as usize;
        log::debug!(
            "Texture selected: {}",
            self.entries[self.selected].name
        );
    }

    pub fn find(&self, id: u32) -> Option<&TextureEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
