//! Match state
//!
//! Everything one match needs lives in [`MatchState`]: the grid, both
//! players, live balloons and the RNG. Nothing is global, so several matches
//! can run side by side.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{ProjectileHit, RoundOutcome};
use super::grid::Grid;
use super::interaction::TileEvent;
use super::player::Player;
use super::projectile::Projectile;
use crate::PlayerId;
use crate::consts::SPAWN_INSET_TILES;
use crate::scoreboard::{RoundRecord, Scoreboard};
use crate::settings::{ConfigError, Settings};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Round in progress
    Playing,
    /// Simulation frozen
    Paused,
    /// Waiting for a new-round request
    RoundOver { outcome: RoundOutcome },
}

/// Notable things that happened during the last tick (for audio/HUD)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    Painted { player: PlayerId, tiles: usize },
    Launched { player: PlayerId, projectile: u32 },
    Tile { player: PlayerId, event: TileEvent },
    BalloonHit(ProjectileHit),
    RoundEnded { outcome: RoundOutcome },
}

#[derive(Debug, Clone)]
pub struct MatchState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub grid: Grid,
    /// Player 1 then player 2; this is also the per-tick resolution order
    pub players: [Player; 2],
    /// Live balloons (in launch order)
    pub projectiles: Vec<Projectile>,
    pub phase: MatchPhase,
    /// Round number (1-based)
    pub round: u32,
    /// Seconds simulated in the current round
    pub round_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub scoreboard: Scoreboard,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl MatchState {
    /// Create a match: validate tuning, generate the arena, spawn players
    /// in opposite corners.
    pub fn new(seed: u64, settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::generate(&settings.arena, &settings.tiles, &mut rng);

        let players = spawn_points(&grid, settings.player.size).map(|(id, spawn)| {
            let color = settings.player.colors[(id - 1) as usize];
            Player::new(id, color, spawn, &settings.player)
        });

        log::info!(
            "Match created: seed {}, {}x{} grid",
            seed,
            grid.size(),
            grid.size()
        );

        Ok(Self {
            seed,
            settings,
            grid,
            players,
            projectiles: Vec::new(),
            phase: MatchPhase::Playing,
            round: 1,
            round_time: 0.0,
            time_ticks: 0,
            scoreboard: Scoreboard::new(),
            events: Vec::new(),
            rng,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Index of the other player
    #[inline]
    pub fn opponent_index(index: usize) -> usize {
        1 - index
    }

    pub fn outcome(&self) -> RoundOutcome {
        match self.phase {
            MatchPhase::RoundOver { outcome } => outcome,
            _ => RoundOutcome::InProgress,
        }
    }

    pub fn is_round_over(&self) -> bool {
        matches!(self.phase, MatchPhase::RoundOver { .. })
    }

    /// Freeze the round and record the result
    pub fn end_round(&mut self, outcome: RoundOutcome) {
        let tiles = self.grid.player_tile_counts();
        log::info!(
            "Round {} over after {:.1}s: {:?} (tiles {:?})",
            self.round,
            self.round_time,
            outcome,
            tiles
        );
        self.scoreboard.record(RoundRecord {
            round: self.round,
            outcome,
            tiles,
            duration: self.round_time,
        });
        self.phase = MatchPhase::RoundOver { outcome };
        self.events.push(GameEvent::RoundEnded { outcome });
    }

    /// Start the next round on the same arena layout.
    ///
    /// Ownership is wiped, players respawn at full health and live balloons
    /// are discarded.
    pub fn new_round(&mut self) {
        self.grid.reset_ownership();
        for player in &mut self.players {
            player.reset();
        }
        self.projectiles.clear();
        self.round += 1;
        self.round_time = 0.0;
        self.phase = MatchPhase::Playing;
        log::info!("Round {} started", self.round);
        self.events.push(GameEvent::RoundStarted { round: self.round });
    }
}

/// Opposite corners, inset by a couple of tiles and kept inside the arena
fn spawn_points(grid: &Grid, player_size: f32) -> [(PlayerId, Vec2); 2] {
    let world = grid.world_size();
    let half = player_size / 2.0;
    let inset = grid.tile_size() * SPAWN_INSET_TILES;
    let clamp = |v: f32| v.clamp(half, (world - half).max(half));
    [
        (1, Vec2::splat(clamp(inset))),
        (2, Vec2::splat(clamp(world - inset))),
    ]
}
