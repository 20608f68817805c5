//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - One seeded RNG per match
//! - Stable iteration order (player 1 before player 2, balloons by ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod grid;
pub mod interaction;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod tile;

pub use autopilot::autopilot_input;
pub use collision::{
    Aabb, ProjectileHit, RoundOutcome, circles_overlap, evaluate_outcome, majority_threshold,
    resolve_projectile_hits,
};
pub use grid::{Cell, Grid, roll_kind};
pub use interaction::{TileEvent, resolve_tile_interaction};
pub use player::{Direction, Player};
pub use projectile::Projectile;
pub use state::{GameEvent, MatchPhase, MatchState};
pub use tick::{FixedStep, PlayerInput, TickInput, tick};
pub use tile::{Tile, TileEffect, TileKind};
