//! Per-frame simulation tick
//!
//! Input events arrive between frames and are latched; each tick consumes
//! the latch, digs if asked, moves the hero, then eases the camera.

use glam::Vec2;

use super::dig::{DigOutcome, dig};
use super::state::GameState;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in world space, if it moved
    pub pointer: Option<Vec2>,
    /// Dig at the pointer this tick
    pub dig: bool,
}

/// Collects pointer and dig events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    pointer: Option<Vec2>,
    dig_held: bool,
    /// A press seen since the last tick, even if already released
    dig_pressed: bool,
}

impl InputLatch {
    pub fn on_pointer_move(&mut self, world_pos: Vec2) {
        self.pointer = Some(world_pos);
    }

    pub fn on_dig_start(&mut self) {
        self.dig_held = true;
        self.dig_pressed = true;
    }

    pub fn on_dig_end(&mut self) {
        self.dig_held = false;
    }

    pub fn is_dig_held(&self) -> bool {
        self.dig_held
    }

    /// Input for the next tick; clears one-shot state
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            pointer: self.pointer.take(),
            dig: self.dig_held || self.dig_pressed,
        };
        self.dig_pressed = false;
        input
    }
}

/// Advance the simulation by one frame of `dt_ms` milliseconds
///
/// Hero motion is integrated per tick; `dt_ms` only drives the clock used for
/// timestamps and the digging cue. Returns the dig outcome if a dig ran.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) -> Option<DigOutcome> {
    state.time_ticks += 1;
    state.clock_ms += dt_ms;

    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
    }

    let pointer = state.pointer;
    let outcome = if input.dig { Some(dig(state, pointer)) } else { None };

    state.agent.step(state.pointer, &state.world);

    let viewport = state.settings.viewport.size();
    let smoothing = state.settings.camera.smoothing;
    state.camera.follow(state.agent.pos, viewport, smoothing);

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::settings::Settings;
    use crate::sim::dig::Ineligible;

    const CENTER: Vec2 = Vec2::new(400.0, 300.0);

    fn solid_settings(seed: u64) -> Settings {
        let mut settings = Settings::with_seed(seed);
        settings.world.rock_threshold = -1.0;
        settings
    }

    #[test]
    fn test_latch_press_release_between_ticks_digs_once() {
        let mut latch = InputLatch::default();
        latch.on_pointer_move(Vec2::new(10.0, 20.0));
        latch.on_dig_start();
        latch.on_dig_end();

        let input = latch.take();
        assert_eq!(input.pointer, Some(Vec2::new(10.0, 20.0)));
        assert!(input.dig);

        let input = latch.take();
        assert_eq!(input.pointer, None);
        assert!(!input.dig);
    }

    #[test]
    fn test_latch_held_digs_every_tick() {
        let mut latch = InputLatch::default();
        latch.on_dig_start();
        for _ in 0..3 {
            assert!(latch.take().dig);
        }
        latch.on_dig_end();
        assert!(!latch.take().dig);
        assert!(!latch.is_dig_held());
    }

    #[test]
    fn test_tick_advances_clock_and_keeps_pointer() {
        let mut state = GameState::new(Settings::default());
        let input = TickInput {
            pointer: Some(CENTER + Vec2::new(100.0, 0.0)),
            dig: false,
        };
        tick(&mut state, &input, FRAME_MS);
        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.time_ticks, 2);
        assert!((state.clock_ms - 2.0 * FRAME_MS).abs() < 1e-9);
        assert_eq!(state.pointer, CENTER + Vec2::new(100.0, 0.0));
        assert!(state.agent.pos.x > CENTER.x);
        assert!(state.camera.pos.x > 0.0);
    }

    #[test]
    fn test_dig_at_sphere_center_creates_no_tunnel() {
        let mut state = GameState::new(solid_settings(4));
        let input = TickInput {
            pointer: Some(CENTER),
            dig: true,
        };
        for _ in 0..30 {
            let outcome = tick(&mut state, &input, FRAME_MS);
            assert_eq!(outcome, Some(DigOutcome::Ineligible(Ineligible::NoRock)));
        }
        assert!(state.world.tunnels().is_empty());
    }

    #[test]
    fn test_held_dig_tunnels_out_of_sphere() {
        let mut state = GameState::new(solid_settings(8));
        let target = CENTER + Vec2::new(300.0, 0.0);
        let input = TickInput {
            pointer: Some(target),
            dig: true,
        };

        let mut escaped = false;
        for _ in 0..600 {
            tick(&mut state, &input, FRAME_MS);
            assert!(state.agent.speed() <= state.agent.max_speed + 1e-4);
            assert!(state.world.is_traversable(state.agent.pos));
            if state.world.tunnels().iter().any(|t| t.pos.distance(CENTER) > 200.0) {
                escaped = true;
            }
        }

        assert!(escaped, "no tunnel carved outside the sphere");
        assert!(state.agent.pos.distance(CENTER) > 200.0, "hero followed the tunnel");
    }

    #[test]
    fn test_pointer_in_rock_hero_settles() {
        let mut state = GameState::new(solid_settings(9));
        let input = TickInput {
            pointer: Some(CENTER + Vec2::new(0.0, -450.0)),
            dig: false,
        };
        for _ in 0..600 {
            tick(&mut state, &input, FRAME_MS);
            assert!(state.world.is_traversable(state.agent.pos));
        }
        assert!(state.agent.speed() < 0.5);
        assert!(state.agent.pos.y < CENTER.y - 190.0);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut state = GameState::new(Settings::with_seed(77));
            let mut latch = InputLatch::default();
            for i in 0..240 {
                let angle = i as f32 * 0.02;
                latch.on_pointer_move(CENTER + crate::polar_to_cartesian(320.0, angle));
                if i == 10 {
                    latch.on_dig_start();
                }
                let input = latch.take();
                tick(&mut state, &input, FRAME_MS);
            }
            state
        };

        let a = run();
        let b = run();
        assert_eq!(a.agent, b.agent);
        assert_eq!(a.world.tunnels(), b.world.tunnels());
        assert_eq!(a.world.piles(), b.world.piles());
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
