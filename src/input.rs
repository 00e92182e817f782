//! Keyboard and mouse translation
//!
//! Platform layers feed raw key names and mouse deltas in; once per frame the
//! accumulated state is turned into a `FrameInput` for the simulation and a
//! `ViewInput` for the HUD. Held keys drive the movement axes, everything
//! else fires once on the press edge.

use std::collections::HashSet;

use crate::settings::Settings;
use crate::sim::FrameInput;

/// Logical keys the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Movement
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    LookUp,
    LookDown,
    ResetView,

    // Map and HUD
    ZoomIn,
    ZoomOut,
    ToggleMap,
    ToggleHelp,

    // Editing
    ToggleWall,
    RaiseBottom,
    LowerBottom,
    RaiseTop,
    LowerTop,
    /// Grow a sector with this many corners
    AddSector(u8),
    DeleteSector,
    ApplyTexture,
    NextTexture,
    PrevTexture,
    ToggleCollision,
}

impl Key {
    /// Map a DOM-style key name to a logical key.
    ///
    /// Names are `KeyboardEvent.key` values. Numpad keys also accept their
    /// `KeyboardEvent.code` names (`Numpad0`, `NumpadAdd`, `NumpadSubtract`)
    /// so platforms that report codes for the keypad work too.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "w" | "W" => Key::Forward,
            "s" | "S" => Key::Backward,
            "a" | "A" => Key::StrafeLeft,
            "d" | "D" => Key::StrafeRight,
            "ArrowLeft" => Key::TurnLeft,
            "ArrowRight" => Key::TurnRight,
            "ArrowUp" => Key::LookUp,
            "ArrowDown" => Key::LookDown,
            // "0" with NumLock on, "Insert" with it off
            "0" | "Insert" | "Numpad0" => Key::ResetView,

            "+" | "NumpadAdd" => Key::ZoomIn,
            "-" | "NumpadSubtract" => Key::ZoomOut,
            "m" | "M" => Key::ToggleMap,
            "?" => Key::ToggleHelp,

            "1" => Key::ToggleWall,
            "r" | "R" => Key::RaiseBottom,
            "f" | "F" => Key::LowerBottom,
            "t" | "T" => Key::RaiseTop,
            "g" | "G" => Key::LowerTop,
            "3" => Key::AddSector(3),
            "4" => Key::AddSector(4),
            "5" => Key::AddSector(5),
            "6" => Key::AddSector(6),
            "Delete" => Key::DeleteSector,
            "Enter" => Key::ApplyTexture,
            "]" => Key::NextTexture,
            "[" => Key::PrevTexture,
            "c" | "C" => Key::ToggleCollision,
            _ => return None,
        };
        Some(key)
    }
}

/// HUD commands for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewInput {
    /// Zoom steps, positive is in
    pub zoom: i32,
    pub toggle_map: bool,
    pub toggle_help: bool,
}

/// Accumulated device state between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    mouse_delta: (f32, f32),
    wheel_steps: i32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key press by name. Unknown names are ignored.
    ///
    /// Auto-repeat of a key that is already held does not fire a new edge.
    pub fn key_down(&mut self, name: &str) {
        let Some(key) = Key::from_name(name) else {
            return;
        };
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Relative mouse motion in pixels (pointer-lock style)
    pub fn mouse_move(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Mouse wheel: scrolling up selects the next texture
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.wheel_steps += 1;
        } else if delta_y > 0.0 {
            self.wheel_steps -= 1;
        }
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn axis(&self, positive: Key, negative: Key) -> f32 {
        match (self.is_held(positive), self.is_held(negative)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    fn take(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }

    /// Build this frame's simulation commands and consume all press edges
    pub fn frame_input(&mut self, settings: &Settings) -> FrameInput {
        let (dx, dy) = std::mem::take(&mut self.mouse_delta);
        let add_sector = [3u8, 4, 5, 6]
            .into_iter()
            .find(|&n| self.pressed.contains(&Key::AddSector(n)))
            .map(usize::from);

        let mut texture_delta = std::mem::take(&mut self.wheel_steps);
        if self.take(Key::NextTexture) {
            texture_delta += 1;
        }
        if self.take(Key::PrevTexture) {
            texture_delta -= 1;
        }

        let input = FrameInput {
            forward: self.axis(Key::Forward, Key::Backward),
            strafe: self.axis(Key::StrafeRight, Key::StrafeLeft),
            turn: self.axis(Key::TurnLeft, Key::TurnRight),
            look: self.axis(Key::LookUp, Key::LookDown),
            // Mouse right turns right (negative yaw), mouse up looks up
            yaw_delta: -dx * settings.mouse_sensitivity,
            pitch_delta: -dy * settings.mouse_sensitivity,
            reset_view: self.take(Key::ResetView),

            toggle_wall: self.take(Key::ToggleWall),
            raise_bottom: self.take(Key::RaiseBottom),
            lower_bottom: self.take(Key::LowerBottom),
            raise_top: self.take(Key::RaiseTop),
            lower_top: self.take(Key::LowerTop),
            add_sector,
            delete_sector: self.take(Key::DeleteSector),
            apply_texture: self.take(Key::ApplyTexture),
            texture_delta,
            toggle_collision: self.take(Key::ToggleCollision),
        };

        self.pressed.retain(|k| {
            matches!(k, Key::ZoomIn | Key::ZoomOut | Key::ToggleMap | Key::ToggleHelp)
        });
        input
    }

    /// HUD commands, consuming their press edges
    pub fn view_input(&mut self) -> ViewInput {
        let mut zoom = 0;
        if self.take(Key::ZoomIn) {
            zoom += 1;
        }
        if self.take(Key::ZoomOut) {
            zoom -= 1;
        }
        ViewInput {
            zoom,
            toggle_map: self.take(Key::ToggleMap),
            toggle_help: self.take(Key::ToggleHelp),
        }
    }
}

/// Key binding panel text
pub fn help_lines() -> &'static [&'static str] {
    &[
        "KEYBINDINGS",
        "",
        "2D Map:",
        "NUM +  : Zoom In",
        "NUM -  : Zoom Out",
        "M      : Toggle Map Mode",
        "",
        "Movement:",
        "W      : Move Forward",
        "S      : Move Backward",
        "A      : Strafe Left",
        "D      : Strafe Right",
        "←      : Turn Left",
        "→      : Turn Right",
        "↑      : Look Up",
        "↓      : Look Down",
        "NUM 0  : Reset View",
        "",
        "Editing:",
        "1      : Toggle Wall",
        "R / F  : Raise / Lower Bottom",
        "T / G  : Raise / Lower Top",
        "3-6    : Add Sector",
        "DEL    : Delete Sector",
        "[ / ]  : Select Texture",
        "ENTER  : Apply Texture",
        "C      : Toggle Collision",
        "",
        "?      : Toggle Help",
    ]
}
