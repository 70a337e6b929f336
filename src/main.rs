//! Core Explorer headless driver
//!
//! Runs a scripted digging session against the simulation and prints the
//! final snapshot. Pass a settings JSON path as the first argument to
//! override the defaults.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use core_explorer::Settings;
    use core_explorer::consts::FRAME_MS;
    use core_explorer::polar_to_cartesian;
    use core_explorer::sim::{DigOutcome, GameState, InputLatch, tick};

    /// Session length in ticks (ten seconds at 60 Hz)
    const SESSION_TICKS: u64 = 600;

    env_logger::init();
    log::info!("Core Explorer (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let center = settings.world.sphere_center;
    let reach = settings.world.sphere_radius + settings.dig.interaction_range;

    let mut state = GameState::new(settings);
    let mut latch = InputLatch::default();
    let mut tunnels_dug = 0;

    for i in 0..SESSION_TICKS {
        // Pointer spirals slowly outward from the core with dig held
        let t = i as f32 / SESSION_TICKS as f32;
        latch.on_pointer_move(center + polar_to_cartesian(reach * t.sqrt(), t * 3.0));
        if i == 30 {
            latch.on_dig_start();
        }
        // Release the dig button for the last second
        if i == SESSION_TICKS - 60 {
            latch.on_dig_end();
        }

        let input = latch.take();
        match tick(&mut state, &input, FRAME_MS) {
            Some(DigOutcome::Excavated { tunnels_created, pile }) => {
                tunnels_dug += tunnels_created;
                log::debug!("tick {}: dug {} tunnels, pile {:?}", i, tunnels_created, pile);
            }
            Some(DigOutcome::RelocationFailed { pile_id }) => {
                log::debug!("tick {}: pile {} stayed put", i, pile_id);
            }
            _ => {}
        }

        if state.time_ticks % 60 == 0 {
            let chunks = state.visible_chunks().len();
            log::info!(
                "tick {}: hero ({:.0}, {:.0}) tunnels={} piles={} chunks={}",
                state.time_ticks,
                state.agent.pos.x,
                state.agent.pos.y,
                state.world.tunnels().len(),
                state.world.piles().len(),
                chunks
            );
        }
    }

    log::info!("Session done: {} tunnels dug", tunnels_dug);
    match state.snapshot().to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Failed to serialize snapshot: {}", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web shell drives the simulation through the library crate
}
