//! Collision tests and round evaluation
//!
//! Players and tiles collide as axis-aligned boxes; balloons and players as
//! circles. Round evaluation is a pure read of grid and player state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::player::Player;
use super::projectile::Projectile;
use crate::PlayerId;
use crate::settings::ProjectileSettings;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// A balloon that struck its target this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileHit {
    pub projectile: u32,
    pub target: PlayerId,
    /// The hit brought the target to zero health
    pub eliminated: bool,
}

/// Test every balloon against its own target, apply damage and drop spent
/// balloons.
///
/// A balloon is removed when it hits or when it expires. Balloons never
/// touch their owner, and a missing or eliminated target cannot be hit.
pub fn resolve_projectile_hits(
    projectiles: &mut Vec<Projectile>,
    players: &mut [Player],
    tuning: &ProjectileSettings,
) -> Vec<ProjectileHit> {
    let mut hits = Vec::new();

    projectiles.retain(|projectile| {
        let target = projectile
            .target
            .filter(|&id| id != projectile.owner)
            .and_then(|id| players.iter_mut().find(|p| p.id == id))
            .filter(|p| p.is_active());

        if let Some(target) = target {
            if circles_overlap(projectile.pos, projectile.radius, target.pos, target.radius()) {
                let eliminated = target.take_damage(tuning.damage);
                hits.push(ProjectileHit {
                    projectile: projectile.id,
                    target: target.id,
                    eliminated,
                });
                return false;
            }
        }

        !projectile.is_expired(tuning)
    });

    hits
}

/// Result of a round as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// No winner yet
    #[default]
    InProgress,
    Won { player: PlayerId },
    Draw,
}

impl RoundOutcome {
    pub fn is_decided(&self) -> bool {
        *self != RoundOutcome::InProgress
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            RoundOutcome::Won { player } => Some(*player),
            _ => None,
        }
    }
}

/// Tiles needed for a majority win
#[inline]
pub fn majority_threshold(total_tiles: usize) -> usize {
    total_tiles / 2 + 1
}

/// Decide the round from current state (no side effects).
///
/// Tile majority is checked first, so owning the majority beats an
/// opponent's elimination in the same frame. Then: one player left alive
/// wins, nobody alive is a draw.
pub fn evaluate_outcome(grid: &Grid, players: &[Player]) -> RoundOutcome {
    let total = grid.total_tiles();
    if total > 0 {
        let threshold = majority_threshold(total);
        let counts = grid.player_tile_counts();
        let mut ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        for id in ids {
            if counts.get(&id).copied().unwrap_or(0) >= threshold {
                return RoundOutcome::Won { player: id };
            }
        }
    }

    if players.is_empty() {
        return RoundOutcome::InProgress;
    }

    let alive: Vec<&Player> = players.iter().filter(|p| p.health > 0).collect();
    match alive.as_slice() {
        [] => RoundOutcome::Draw,
        [survivor] if players.len() > 1 => RoundOutcome::Won {
            player: survivor.id,
        },
        _ => RoundOutcome::InProgress,
    }
}
