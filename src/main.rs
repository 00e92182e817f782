//! Sector Engine entry point
//!
//! The 3D view and minimap canvas live in the platform layer. Natively this
//! binary drives the core headless: it loads settings and the starter level,
//! replays a scripted key sequence through the fixed-step loop and logs where
//! the player ends up. Run with `RUST_LOG=debug` to see every sector change.

use std::path::PathBuf;

use sector_engine::consts::*;
use sector_engine::input::{InputState, help_lines};
use sector_engine::map_view::MapView;
use sector_engine::sim::{EngineState, starter_level, tick};
use sector_engine::Settings;

/// Default settings file, looked up in the working directory
const SETTINGS_FILE: &str = "sector-engine.json";

/// Rendered frame rate the script is replayed at
const FRAME_DT: f32 = 1.0 / 60.0;

/// One scripted stretch: key edges, then a number of frames
struct Step {
    down: &'static [&'static str],
    up: &'static [&'static str],
    frames: u32,
}

const SCRIPT: &[Step] = &[
    // Look up a little, then walk through the open wall into the slanted room
    Step { down: &["ArrowUp"], up: &[], frames: 10 },
    Step { down: &["w"], up: &["ArrowUp"], frames: 60 },
    Step { down: &[], up: &["w"], frames: 1 },
    // Turn right and raise the bottom band of whatever wall is ahead
    Step { down: &["ArrowRight"], up: &[], frames: 30 },
    Step { down: &["r"], up: &["ArrowRight"], frames: 1 },
    Step { down: &[], up: &["r"], frames: 1 },
    // Zoom the map in, grow a hexagon off that wall and walk toward it
    Step { down: &["NumpadAdd", "6"], up: &[], frames: 1 },
    Step { down: &["w"], up: &["NumpadAdd", "6"], frames: 60 },
    Step { down: &[], up: &["w"], frames: 1 },
    // Paint, then head back with collision off
    Step { down: &["]", "Enter"], up: &[], frames: 1 },
    Step { down: &["c", "0", "s"], up: &["]", "Enter"], frames: 90 },
    Step { down: &[], up: &["c", "0", "s"], frames: 1 },
];

struct Session {
    state: EngineState,
    input: InputState,
    map: MapView,
    accumulator: f32,
    show_help: bool,
}

impl Session {
    fn new(state: EngineState) -> Self {
        Self {
            map: MapView::from_settings(&state.settings),
            show_help: state.settings.show_help,
            state,
            input: InputState::new(),
            accumulator: 0.0,
        }
    }

    fn update(&mut self, dt: f32) {
        let view = self.input.view_input();
        self.map.apply(&view);
        if view.toggle_help {
            self.show_help = !self.show_help;
        }

        self.accumulator += dt.min(0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // Press edges are consumed by the first substep
            let frame = self.input.frame_input(&self.state.settings);
            tick(&mut self.state, &frame, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    fn report(&self) {
        let player = &self.state.player;
        let sector = self
            .state
            .current_sector()
            .map_or_else(|| "none".to_string(), |s| s.id.to_string());
        log::info!(
            "frame {}: pos ({:.2}, {:.2}) yaw {:.2} eye {:.2} sector {} wall {:?} map scale {:.1}",
            self.state.frame,
            player.pos.x,
            player.pos.y,
            player.yaw,
            player.eye_z,
            sector,
            self.state.nav.wall,
            self.map.scale()
        );
    }
}

fn main() {
    env_logger::init();
    log::info!("Sector Engine (native) starting...");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let settings = Settings::load(&path);

    let level = match starter_level() {
        Ok(level) => level,
        Err(e) => {
            log::error!("Starter level is invalid: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = Session::new(EngineState::new(level, settings));
    if session.show_help {
        for line in help_lines() {
            println!("{}", line);
        }
    }
    session.report();

    for step in SCRIPT {
        for name in step.up {
            session.input.key_up(name);
        }
        for name in step.down {
            session.input.key_down(name);
        }
        for _ in 0..step.frames {
            session.update(FRAME_DT);
        }
        session.report();
    }

    log::info!(
        "Done: {} sectors, {} walls",
        session.state.level.len(),
        session.state.level.wall_count()
    );
}
