//! Fixed timestep simulation tick
//!
//! Advances one match by one step in a fixed order: actions, movement,
//! balloons, tile effects, balloon hits, then the win check.

use glam::Vec2;

use super::collision::{evaluate_outcome, resolve_projectile_hits};
use super::interaction::{TileEvent, resolve_tile_interaction};
use super::player::Direction;
use super::projectile::Projectile;
use super::state::{GameEvent, MatchPhase, MatchState};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Intent for one player for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Movement direction, `None` to stand still
    pub direction: Option<Direction>,
    /// Launch a balloon at the opponent
    pub launch: bool,
    /// Paint the surrounding tiles
    pub paint: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Player 1 then player 2
    pub players: [PlayerInput; 2],
    /// Start the next round (honoured only once the round is over)
    pub new_round: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the match by one step of `dt` seconds
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.pause {
        match state.phase {
            MatchPhase::Playing => {
                state.phase = MatchPhase::Paused;
                return;
            }
            MatchPhase::Paused => state.phase = MatchPhase::Playing,
            MatchPhase::RoundOver { .. } => {}
        }
    }

    match state.phase {
        MatchPhase::Paused => return,
        MatchPhase::RoundOver { .. } => {
            if input.new_round {
                state.new_round();
            }
            return;
        }
        MatchPhase::Playing => {}
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time_ticks += 1;
    state.round_time += dt;

    for player in &mut state.players {
        player.tick_cooldowns(dt);
    }

    // Actions
    for (index, player_input) in input.players.iter().enumerate() {
        if !state.players[index].is_active() {
            continue;
        }
        if player_input.paint {
            try_paint(state, index);
        }
        if player_input.launch {
            try_launch(state, index);
        }
    }

    // Movement
    let speed = state.settings.player.speed;
    let world_size = state.grid.world_size();
    for (player, player_input) in state.players.iter_mut().zip(&input.players) {
        if player.is_active() {
            player.apply_movement(player_input.direction, dt, speed, world_size);
        }
    }

    update_projectiles(state, dt);

    // Tile effects, player 1 fully before player 2
    for index in 0..state.players.len() {
        let player = &mut state.players[index];
        if !player.is_active() {
            continue;
        }
        let events = resolve_tile_interaction(
            player,
            &state.grid,
            &state.settings.tiles,
            dt,
            &mut state.rng,
        );
        for event in events {
            match event {
                TileEvent::Slowed { .. } => log::trace!("Player {}: {:?}", player.id, event),
                _ => log::debug!("Player {}: {:?}", player.id, event),
            }
            state.events.push(GameEvent::Tile {
                player: player.id,
                event,
            });
        }
    }

    let hits = resolve_projectile_hits(
        &mut state.projectiles,
        &mut state.players,
        &state.settings.projectile,
    );
    for hit in hits {
        log::debug!(
            "Balloon {} hit player {}{}",
            hit.projectile,
            hit.target,
            if hit.eliminated { " (eliminated)" } else { "" }
        );
        state.events.push(GameEvent::BalloonHit(hit));
    }

    let outcome = evaluate_outcome(&state.grid, &state.players);
    if outcome.is_decided() {
        state.end_round(outcome);
    }
}

/// Claim every tile around the player, if the paint cooldown allows it
fn try_paint(state: &mut MatchState, index: usize) -> Option<usize> {
    let player = &mut state.players[index];
    if player.paint_cooldown > 0.0 {
        log::trace!("Player {} paint on cooldown", player.id);
        return None;
    }

    let radius = state.settings.player.paint_radius();
    let claimed = state
        .grid
        .paint_circle(player.pos, radius, player.id, player.color);
    player.paint_cooldown = state.settings.player.paint_cooldown;

    log::debug!("Player {} painted {} tiles", player.id, claimed);
    state.events.push(GameEvent::Painted {
        player: player.id,
        tiles: claimed,
    });
    Some(claimed)
}

/// Launch a balloon at the opponent, if the launch cooldown allows it
fn try_launch(state: &mut MatchState, index: usize) -> Option<u32> {
    if state.players[index].launch_cooldown > 0.0 {
        log::trace!("Player {} launch on cooldown", state.players[index].id);
        return None;
    }

    let id = state.next_entity_id();
    let target = state.players[MatchState::opponent_index(index)].id;
    let tuning = &state.settings.projectile;
    let player = &mut state.players[index];

    let dir = player.launch_direction();
    let spawn = player.pos + dir * tuning.spawn_offset;
    let mut projectile = Projectile::new(
        id,
        player.id,
        Some(target),
        spawn,
        tuning.radius,
        player.color,
    );
    projectile.launch(dir * tuning.launch_force);
    player.launch_cooldown = tuning.launch_cooldown;

    log::debug!("Player {} launched balloon {}", player.id, id);
    state.events.push(GameEvent::Launched {
        player: player.id,
        projectile: id,
    });
    state.projectiles.push(projectile);
    Some(id)
}

fn update_projectiles(state: &mut MatchState, dt: f32) {
    let players = &state.players;
    for projectile in &mut state.projectiles {
        let target_pos: Option<Vec2> = projectile
            .target
            .and_then(|id| players.iter().find(|p| p.id == id))
            .filter(|p| p.is_active())
            .map(|p| p.pos);
        projectile.update(dt, target_pos, &state.settings.projectile);
    }
}

/// Fixed-step accumulator for variable frame times
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    /// Seconds per simulation step
    step: f32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::with_step(SIM_DT)
    }
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator for a custom step length (a positive number of seconds)
    pub fn with_step(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add a frame's elapsed time and return how many steps to run.
    ///
    /// Frame time is clamped to `MAX_FRAME_DT` and at most `MAX_SUBSTEPS`
    /// steps are returned. When the cap is hit the backlog is dropped so a
    /// slow frame cannot snowball.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.step * 0.5);
        }
        steps
    }
}
