//! Per-frame update
//!
//! One call to `tick` runs the whole frame: view, movement, sector lookup,
//! wall lookup and then any edit requested this frame. Edits that add or
//! remove sectors re-run the lookups before returning so the published
//! navigation state always matches the store.

use super::collision::{MoveOutcome, resolve_move_detailed};
use super::editor;
use super::locator::update_navigation;
use super::state::EngineState;
use crate::consts::*;
use crate::{normalize_angle, yaw_to_direction, yaw_to_right};

/// Commands for a single frame.
///
/// Axes are in -1..1 and get scaled by the configured speeds; edit flags are
/// edge-triggered and should be set for one frame only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Forward (+) / backward (-)
    pub forward: f32,
    /// Right (+) / left (-)
    pub strafe: f32,
    /// Turn left (+) / right (-)
    pub turn: f32,
    /// Look up (+) / down (-)
    pub look: f32,
    /// Raw mouse yaw change (radians)
    pub yaw_delta: f32,
    /// Raw mouse pitch change (radians)
    pub pitch_delta: f32,
    /// Level the view and face the spawn heading
    pub reset_view: bool,

    // === Editing ===
    pub toggle_wall: bool,
    pub raise_bottom: bool,
    pub lower_bottom: bool,
    pub raise_top: bool,
    pub lower_top: bool,
    /// Grow a sector with this many corners off the looked-at wall
    pub add_sector: Option<usize>,
    /// Delete the sector the player stands in
    pub delete_sector: bool,
    /// Paint the looked-at wall with the selected texture
    pub apply_texture: bool,
    /// Move the texture selection
    pub texture_delta: i32,
    pub toggle_collision: bool,
}

impl FrameInput {
    fn wants_edit(&self) -> bool {
        self.toggle_wall
            || self.raise_bottom
            || self.lower_bottom
            || self.raise_top
            || self.lower_top
            || self.add_sector.is_some()
            || self.delete_sector
            || self.apply_texture
    }
}

/// Advance the engine by one frame of `dt` seconds
pub fn tick(state: &mut EngineState, input: &FrameInput, dt: f32) {
    state.frame += 1;

    if input.toggle_collision {
        state.settings.toggle_collision();
    }
    if input.texture_delta != 0 {
        state.textures.change_selection(input.texture_delta);
    }

    // View
    let player = &mut state.player;
    if input.reset_view {
        player.yaw = state.settings.spawn_yaw;
        player.pitch = 0.0;
    }
    player.yaw = normalize_angle(
        player.yaw + input.turn * state.settings.turn_speed * dt + input.yaw_delta,
    );
    player.pitch = (player.pitch + input.look * state.settings.look_speed * dt + input.pitch_delta)
        .clamp(-MAX_PITCH, MAX_PITCH);

    // Movement
    let (mut fwd, mut strafe) = (input.forward, input.strafe);
    let len = (fwd * fwd + strafe * strafe).sqrt();
    if len > 1.0 {
        fwd /= len;
        strafe /= len;
    }
    if fwd != 0.0 || strafe != 0.0 {
        let step = (yaw_to_direction(player.yaw) * fwd + yaw_to_right(player.yaw) * strafe)
            * state.settings.move_speed
            * dt;
        let current = player.pos;
        let result =
            resolve_move_detailed(&state.level, &state.settings, current, current + step);
        if let MoveOutcome::Blocked { sector, wall } = result.outcome {
            log::trace!(
                "Frame {}: blocked by sector {} wall {}",
                state.frame,
                sector,
                wall
            );
        }
        state.player.pos = result.pos;
    }

    // Locate sector, then wall
    update_navigation(state);

    if input.wants_edit() {
        apply_edits(state, input);
    }

    if let Some(sector) = state.current_sector() {
        state.player.eye_z = sector.floor_height + EYE_HEIGHT;
    }
}

fn apply_edits(state: &mut EngineState, input: &FrameInput) {
    if let Some((s, w)) = state.current_wall() {
        let level = &mut state.level;
        if input.toggle_wall {
            editor::toggle_wall(level, s, w);
        }
        if input.raise_bottom || input.lower_bottom {
            editor::adjust_wall_bottom_height(level, s, w, input.raise_bottom);
        }
        if input.raise_top || input.lower_top {
            editor::adjust_wall_top_height(level, s, w, input.raise_top);
        }
        if input.apply_texture {
            if let Some(texture_id) = state.textures.selected_id() {
                editor::set_wall_texture(level, s, w, texture_id);
            }
        }
    }

    if let Some(count) = input.add_sector {
        let dir = state.player.look_direction();
        editor::add_sector(state, count, dir);
    }

    if input.delete_sector {
        if let Some(index) = state.current_sector_index() {
            editor::delete_sector(state, index);
        }
    }
}
