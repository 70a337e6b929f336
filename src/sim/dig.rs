//! Tunnel carving and rock displacement
//!
//! A dig command either re-digs (relocates) a nearby rock pile, or carves a
//! line of tunnels from the hero toward the target and dumps the displaced
//! rock as a single new pile. Ineligible commands change nothing.

use std::f32::consts::{PI, TAU};
use std::fmt;

use glam::Vec2;
use rand::Rng;

use super::agent::Agent;
use super::state::GameState;
use super::world::GeometryWorld;
use crate::polar_to_cartesian;
use crate::settings::DigSettings;

/// Why a dig command did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    /// The hero itself is buried in rock
    AgentInRock,
    /// No rock around the target and no reachable pile
    NoRock,
    /// Rock is there but the hero is too far away
    OutOfReach,
}

/// What happened to the rock displaced by an excavation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PileOutcome {
    /// Nothing was carved, so nothing was displaced
    NoVolume,
    /// A new pile was placed
    Placed { id: u32 },
    /// No room was found; the volume is dropped
    Discarded { radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DigOutcome {
    Ineligible(Ineligible),
    /// A pile was re-dug and moved
    Relocated { pile_id: u32, to: Vec2 },
    /// A pile was targeted but no new spot was found
    RelocationFailed { pile_id: u32 },
    Excavated { tunnels_created: u32, pile: PileOutcome },
}

/// Placement search ran out of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementFailed {
    pub attempts: usize,
}

impl fmt::Display for PlacementFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no free spot for rock pile after {} attempts", self.attempts)
    }
}

impl std::error::Error for PlacementFailed {}

/// Run one dig command at `target`
pub fn dig(state: &mut GameState, target: Vec2) -> DigOutcome {
    let outcome = run_dig(state, target);

    let cue = match outcome {
        DigOutcome::Relocated { .. } => Some(state.settings.dig.relocate_cue_ms),
        DigOutcome::Excavated { .. } => Some(state.settings.dig.excavate_cue_ms),
        DigOutcome::Ineligible(_) | DigOutcome::RelocationFailed { .. } => None,
    };
    if let Some(ms) = cue {
        state.flash_digging(ms);
    }

    outcome
}

fn run_dig(state: &mut GameState, target: Vec2) -> DigOutcome {
    let GameState {
        settings,
        world,
        agent,
        rng,
        clock_ms,
        ..
    } = state;
    let cfg = &settings.dig;
    let now = *clock_ms;

    if !world.is_traversable(agent.pos) {
        return DigOutcome::Ineligible(Ineligible::AgentInRock);
    }

    if let Some(pile_id) = reachable_pile(world, agent, target, cfg) {
        return relocate_pile(world, agent, pile_id, now, cfg, rng);
    }

    if !world.ring_touches_rock(target, cfg.radius, cfg.ring_samples) {
        return DigOutcome::Ineligible(Ineligible::NoRock);
    }
    if agent.pos.distance(target) > cfg.max_dig_distance {
        return DigOutcome::Ineligible(Ineligible::OutOfReach);
    }

    excavate(world, agent, target, now, cfg, rng)
}

/// First pile under the target that the hero can reach unobstructed
fn reachable_pile(world: &GeometryWorld, agent: &Agent, target: Vec2, cfg: &DigSettings) -> Option<u32> {
    world
        .piles()
        .iter()
        .filter(|pile| target.distance(pile.pos) <= pile.radius + cfg.radius)
        .find(|pile| {
            agent.pos.distance(pile.pos) <= cfg.interaction_range
                && world.has_clear_path(agent.pos, pile.pos, pile.radius, cfg.path_samples)
        })
        .map(|pile| pile.id)
}

fn relocate_pile(
    world: &mut GeometryWorld,
    agent: &Agent,
    pile_id: u32,
    now: f64,
    cfg: &DigSettings,
    rng: &mut impl Rng,
) -> DigOutcome {
    let Some((anchor, radius)) = world.pile(pile_id).map(|p| (p.pos, p.radius)) else {
        return DigOutcome::RelocationFailed { pile_id };
    };

    match find_pile_placement(world, agent, anchor, radius, Some(pile_id), cfg, rng) {
        Ok(to) => {
            if let Some(pile) = world.pile_mut(pile_id) {
                pile.pos = to;
                pile.created_at = now;
            }
            log::debug!("Relocated pile {} to ({:.1}, {:.1})", pile_id, to.x, to.y);
            DigOutcome::Relocated { pile_id, to }
        }
        Err(err) => {
            log::debug!("Pile {} stays put: {}", pile_id, err);
            DigOutcome::RelocationFailed { pile_id }
        }
    }
}

/// Carve tunnels along hero -> target and pile up the displaced rock
fn excavate(
    world: &mut GeometryWorld,
    agent: &Agent,
    target: Vec2,
    now: f64,
    cfg: &DigSettings,
    rng: &mut impl Rng,
) -> DigOutcome {
    let start = agent.pos;
    let distance = start.distance(target);
    let segments = ((distance / (cfg.radius * cfg.tunnel_spacing)).floor() as u32).max(1);
    let duplicate_dist = cfg.radius * cfg.duplicate_tunnel_factor;

    let mut created = 0u32;
    let mut displaced_area = 0.0f32;
    for i in 0..=segments {
        let p = start.lerp(target, i as f32 / segments as f32);
        if world.tunnel_within(p, duplicate_dist) || !world.is_in_rock(p) {
            continue;
        }
        world.add_tunnel(p, cfg.radius, now, i, segments);
        created += 1;
        displaced_area += PI * cfg.radius * cfg.radius;
    }

    let pile = if displaced_area > 0.0 {
        let radius = (displaced_area / PI).sqrt() * cfg.pile_compression;
        match find_pile_placement(world, agent, target, radius, None, cfg, rng) {
            Ok(pos) => PileOutcome::Placed {
                id: world.add_pile(pos, radius, now, segments + 1),
            },
            Err(err) => {
                log::debug!("Discarding displaced rock (r={:.1}): {}", radius, err);
                PileOutcome::Discarded { radius }
            }
        }
    } else {
        PileOutcome::NoVolume
    };

    log::debug!(
        "Excavated toward ({:.1}, {:.1}): {} tunnels over {} segments, pile {:?}",
        target.x,
        target.y,
        created,
        segments,
        pile
    );

    DigOutcome::Excavated {
        tunnels_created: created,
        pile,
    }
}

/// Rejection-sample a spot near `anchor` for a pile of `radius`
///
/// The disk must sit in open space, keep `pile_margin` from every other pile
/// (except `exclude`, the pile being moved) and `agent_margin` from the hero.
pub fn find_pile_placement(
    world: &GeometryWorld,
    agent: &Agent,
    anchor: Vec2,
    radius: f32,
    exclude: Option<u32>,
    cfg: &DigSettings,
    rng: &mut impl Rng,
) -> Result<Vec2, PlacementFailed> {
    for _ in 0..cfg.placement_attempts {
        let angle = rng.random_range(0.0..TAU);
        let distance = radius * 3.0 + rng.random::<f32>() * cfg.placement_band;
        let candidate = anchor + polar_to_cartesian(distance, angle);

        if !world.disk_is_clear(candidate, radius, cfg.placement_ring_samples) {
            continue;
        }

        let crowds_pile = world
            .piles()
            .iter()
            .filter(|pile| Some(pile.id) != exclude)
            .any(|pile| candidate.distance(pile.pos) < pile.radius + radius + cfg.pile_margin);
        if crowds_pile {
            continue;
        }

        if candidate.distance(agent.pos) < agent.radius + radius + cfg.agent_margin {
            continue;
        }

        return Ok(candidate);
    }

    Err(PlacementFailed {
        attempts: cfg.placement_attempts,
    })
}
