//! Tile Arena - a split-screen, two-player territory game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, tile effects, balloons, win rules)
//! - `settings`: Data-driven match tuning
//! - `scoreboard`: Round results across a session
//!
//! Rendering, input devices and audio live outside this crate. They feed
//! [`sim::TickInput`] into [`sim::tick`] and read the public state back.

pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use scoreboard::Scoreboard;
pub use settings::{ArenaPreset, ConfigError, Settings};

use serde::{Deserialize, Serialize};

/// Stable player identifier (players are numbered from 1)
pub type PlayerId = u32;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the simulation will accept
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Distances below this are treated as zero when normalizing
    pub const EPSILON: f32 = 1e-4;
    /// Untracked balloons slower than this are stopped
    pub const MIN_DRIFT_SPEED: f32 = 1.0;
    /// A player standing still below this speed launches along its facing
    pub const MIN_LAUNCH_SPEED: f32 = 0.1;

    /// Player spawn inset from the arena corner, in tiles
    pub const SPAWN_INSET_TILES: f32 = 2.0;
}

/// 8-bit RGB color handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}
