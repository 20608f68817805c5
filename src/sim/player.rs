//! Players: movement, health and status flags

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::grid::Cell;
use crate::consts::MIN_LAUNCH_SPEED;
use crate::settings::PlayerSettings;
use crate::{Color, PlayerId};

/// Eight-way movement intent (screen space, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    #[default]
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    /// Unit vector for this direction
    pub fn vector(&self) -> Vec2 {
        let raw = match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::UpRight => Vec2::new(1.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::DownRight => Vec2::new(1.0, 1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::DownLeft => Vec2::new(-1.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::UpLeft => Vec2::new(-1.0, -1.0),
        };
        raw.normalize()
    }

    /// Nearest of the eight directions to an arbitrary vector
    pub fn from_vector(v: Vec2) -> Option<Self> {
        if v.length_squared() < f32::EPSILON {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .max_by(|a, b| {
                a.vector()
                    .dot(v)
                    .partial_cmp(&b.vector().dot(v))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// A player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub color: Color,
    /// Center of the bounding square
    pub pos: Vec2,
    pub vel: Vec2,
    /// Side of the bounding square
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    pub eliminated: bool,
    /// Last direction the player moved in
    pub facing: Direction,

    // Tile status, rebuilt every frame by the resolver
    pub stuck: bool,
    pub stuck_factor: f32,
    pub on_damage_tile: bool,
    pub took_initial_damage: bool,
    /// Seconds since the last damage tick
    pub damage_clock: f32,
    /// Last cell whose effect was resolved (`None` after spawn or teleport)
    pub last_cell: Option<Cell>,

    /// Seconds until painting is allowed again
    pub paint_cooldown: f32,
    /// Seconds until the next balloon launch
    pub launch_cooldown: f32,

    /// Round start position
    pub spawn: Vec2,
}

impl Player {
    pub fn new(id: PlayerId, color: Color, spawn: Vec2, tuning: &PlayerSettings) -> Self {
        Self {
            id,
            color,
            pos: spawn,
            vel: Vec2::ZERO,
            size: tuning.size,
            health: tuning.max_health,
            max_health: tuning.max_health,
            eliminated: false,
            facing: Direction::default(),
            stuck: false,
            stuck_factor: 1.0,
            on_damage_tile: false,
            took_initial_damage: false,
            damage_clock: 0.0,
            last_cell: None,
            paint_cooldown: 0.0,
            launch_cooldown: 0.0,
            spawn,
        }
    }

    /// Radius used for balloon hits
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Axis-aligned bounds centred on the player
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size / 2.0))
    }

    pub fn is_active(&self) -> bool {
        !self.eliminated
    }

    /// Movement speed after tile slowdown
    pub fn effective_speed(&self, base_speed: f32) -> f32 {
        if self.stuck {
            base_speed * self.stuck_factor
        } else {
            base_speed
        }
    }

    /// Apply movement intent and integrate position, staying inside the arena
    pub fn apply_movement(
        &mut self,
        direction: Option<Direction>,
        dt: f32,
        base_speed: f32,
        world_size: f32,
    ) {
        match direction {
            Some(dir) => {
                self.vel = dir.vector() * self.effective_speed(base_speed);
                self.facing = dir;
            }
            None => self.vel = Vec2::ZERO,
        }

        self.pos += self.vel * dt;
        self.clamp_to_arena(world_size);
    }

    fn clamp_to_arena(&mut self, world_size: f32) {
        let half = self.size / 2.0;
        let max = (world_size - half).max(half);
        self.pos = self.pos.clamp(Vec2::splat(half), Vec2::splat(max));
    }

    /// Direction a balloon leaves in: current heading, else facing
    pub fn launch_direction(&self) -> Vec2 {
        let speed = self.vel.length();
        if speed > MIN_LAUNCH_SPEED {
            self.vel / speed
        } else {
            self.facing.vector()
        }
    }

    /// Move instantly (teleport). Tile status starts over.
    pub fn relocate(&mut self, pos: Vec2) {
        self.pos = pos;
        self.stuck = false;
        self.stuck_factor = 1.0;
        self.set_on_damage_tile(false);
        self.last_cell = None;
    }

    pub fn set_on_damage_tile(&mut self, on_tile: bool) {
        self.on_damage_tile = on_tile;
        if !on_tile {
            self.took_initial_damage = false;
        }
    }

    /// Reduce health, clamping at zero.
    ///
    /// Returns true if this call eliminated the player. Damage to an already
    /// eliminated player is ignored.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.eliminated {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.eliminated = true;
            return true;
        }
        false
    }

    /// Restore health up to the maximum. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.eliminated {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    /// Count down paint/launch cooldowns
    pub fn tick_cooldowns(&mut self, dt: f32) {
        self.paint_cooldown = (self.paint_cooldown - dt).max(0.0);
        self.launch_cooldown = (self.launch_cooldown - dt).max(0.0);
    }

    /// Back to spawn with full health (new round)
    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
        self.health = self.max_health;
        self.eliminated = false;
        self.facing = Direction::default();
        self.stuck = false;
        self.stuck_factor = 1.0;
        self.on_damage_tile = false;
        self.took_initial_damage = false;
        self.damage_clock = 0.0;
        self.last_cell = None;
        self.paint_cooldown = 0.0;
        self.launch_cooldown = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(1, Color::BLUE, Vec2::new(100.0, 100.0), &PlayerSettings::default())
    }

    #[test]
    fn test_diagonal_speed_is_normalized() {
        let mut p = player();
        p.apply_movement(Some(Direction::DownRight), 1.0, 250.0, 2000.0);
        assert!((p.vel.length() - 250.0).abs() < 0.01);
        assert_eq!(p.facing, Direction::DownRight);
    }

    #[test]
    fn test_stuck_slows_movement() {
        let mut p = player();
        p.stuck = true;
        p.stuck_factor = 0.4;
        p.apply_movement(Some(Direction::Right), 0.1, 250.0, 2000.0);
        assert!((p.pos.x - 110.0).abs() < 0.001);
    }

    #[test]
    fn test_no_input_stops() {
        let mut p = player();
        p.apply_movement(Some(Direction::Left), 0.1, 250.0, 2000.0);
        p.apply_movement(None, 0.1, 250.0, 2000.0);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.facing, Direction::Left);
    }

    #[test]
    fn test_clamped_to_arena() {
        let mut p = player();
        p.apply_movement(Some(Direction::UpLeft), 10.0, 250.0, 2000.0);
        assert_eq!(p.pos, Vec2::splat(20.0));
        p.apply_movement(Some(Direction::DownRight), 100.0, 250.0, 2000.0);
        assert_eq!(p.pos, Vec2::splat(1980.0));
    }

    #[test]
    fn test_launch_direction_falls_back_to_facing() {
        let mut p = player();
        assert_eq!(p.launch_direction(), Vec2::new(0.0, 1.0));
        p.apply_movement(Some(Direction::Right), 0.1, 250.0, 2000.0);
        assert_eq!(p.launch_direction(), Vec2::new(1.0, 0.0));
        p.apply_movement(None, 0.1, 250.0, 2000.0);
        assert_eq!(p.launch_direction(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_damage_eliminates_once() {
        let mut p = player();
        assert!(!p.take_damage(60));
        assert_eq!(p.health, 40);
        assert!(p.take_damage(60));
        assert_eq!(p.health, 0);
        assert!(p.eliminated);
        // Further damage is a no-op
        assert!(!p.take_damage(10));
        assert_eq!(p.health, 0);
        assert!(p.eliminated);
    }

    #[test]
    fn test_heal_is_capped() {
        let mut p = player();
        p.take_damage(3);
        assert_eq!(p.heal(5), 3);
        assert_eq!(p.health, 100);
        assert_eq!(p.heal(5), 0);
        assert_eq!(p.health, 100);
    }

    #[test]
    fn test_eliminated_player_cannot_heal() {
        let mut p = player();
        p.take_damage(200);
        assert_eq!(p.heal(50), 0);
        assert_eq!(p.health, 0);
    }

    #[test]
    fn test_reset_restores_spawn_state() {
        let mut p = player();
        p.apply_movement(Some(Direction::Right), 1.0, 250.0, 2000.0);
        p.take_damage(500);
        p.last_cell = Some(Cell::new(3, 3));
        p.reset();
        assert_eq!(p.pos, p.spawn);
        assert_eq!(p.health, 100);
        assert!(!p.eliminated);
        assert_eq!(p.last_cell, None);
    }

    #[test]
    fn test_direction_from_vector() {
        assert_eq!(Direction::from_vector(Vec2::ZERO), None);
        assert_eq!(
            Direction::from_vector(Vec2::new(3.0, 0.2)),
            Some(Direction::Right)
        );
        assert_eq!(
            Direction::from_vector(Vec2::new(-1.0, -1.1)),
            Some(Direction::UpLeft)
        );
    }
}
