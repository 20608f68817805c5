//! Match tuning
//!
//! Every balance constant of the arena lives here so a match can be
//! configured from a JSON file. All sections default to the standard rules.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Construction-time configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be zero or more (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} probability must be within [0, 1] (got {value})")]
    InvalidProbability { name: &'static str, value: f32 },
    #[error("special tile probabilities sum to {0}, which exceeds 1")]
    ProbabilityOverflow(f32),
    #[error("{name} slow factor must be within (0, 1] (got {value})")]
    InvalidSlowFactor { name: &'static str, value: f32 },
    #[error("max health must be at least 1")]
    ZeroHealth,
}

/// Arena size presets (the game shipped with both sizes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArenaPreset {
    Compact,
    #[default]
    Standard,
}

impl ArenaPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaPreset::Compact => "Compact",
            ArenaPreset::Standard => "Standard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "compact" | "small" => Some(ArenaPreset::Compact),
            "standard" | "std" => Some(ArenaPreset::Standard),
            _ => None,
        }
    }

    /// Grid side length for this preset
    pub fn grid_size(&self) -> usize {
        match self {
            ArenaPreset::Compact => 50,
            ArenaPreset::Standard => 100,
        }
    }
}

/// Per-cell probability of each special tile type.
///
/// Bands are stacked in declaration order, so overlapping mass goes to the
/// earlier type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileProbabilities {
    pub teleporter: f32,
    pub damage: f32,
    pub sticky: f32,
    pub healing: f32,
    #[serde(rename = "super")]
    pub super_tile: f32,
}

impl Default for TileProbabilities {
    fn default() -> Self {
        Self {
            teleporter: 0.005,
            damage: 0.02,
            sticky: 0.02,
            healing: 0.005,
            super_tile: 0.01,
        }
    }
}

impl TileProbabilities {
    /// Probabilities paired with their names, in band order
    pub fn named(&self) -> [(&'static str, f32); 5] {
        [
            ("teleporter", self.teleporter),
            ("damage", self.damage),
            ("sticky", self.sticky),
            ("healing", self.healing),
            ("super", self.super_tile),
        ]
    }

    pub fn total(&self) -> f32 {
        self.named().iter().map(|(_, p)| p).sum()
    }
}

/// Arena layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// Tiles per side
    pub grid_size: usize,
    /// World units per tile side
    pub tile_size: f32,
    pub probabilities: TileProbabilities,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            grid_size: ArenaPreset::Standard.grid_size(),
            tile_size: 20.0,
            probabilities: TileProbabilities::default(),
        }
    }
}

/// Tile effect strengths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSettings {
    /// Speed multiplier while on a sticky tile
    pub sticky_slow: f32,
    /// Speed multiplier while on a super tile
    pub super_slow: f32,
    pub damage_per_tick: u32,
    pub super_damage_per_tick: u32,
    /// Seconds between continuous damage ticks
    pub damage_tick_interval: f32,
    pub heal_amount: u32,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            sticky_slow: 0.4,
            super_slow: 0.4,
            damage_per_tick: 1,
            super_damage_per_tick: 5,
            damage_tick_interval: 1.0,
            heal_amount: 5,
        }
    }
}

/// Player movement, health and painting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// World units per second
    pub speed: f32,
    /// Side of the square collision bounds
    pub size: f32,
    pub max_health: u32,
    /// Paint radius in multiples of the player size
    pub paint_radius_factor: f32,
    /// Seconds between paints
    pub paint_cooldown: f32,
    pub colors: [Color; 2],
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            speed: 250.0,
            size: 40.0,
            max_health: 100,
            paint_radius_factor: 3.0,
            paint_cooldown: 3.0,
            colors: [Color::BLUE, Color::CYAN],
        }
    }
}

impl PlayerSettings {
    /// Paint circle radius in world units
    pub fn paint_radius(&self) -> f32 {
        self.paint_radius_factor * self.size
    }
}

/// Homing balloon behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSettings {
    pub damage: u32,
    pub radius: f32,
    /// Seconds until the balloon pops on its own
    pub lifespan: f32,
    pub tracking_speed: f32,
    pub max_speed: f32,
    /// Seconds over which the launch impulse fades out
    pub launch_duration: f32,
    pub attenuation_exponent: f32,
    /// Launch impulse magnitude
    pub launch_force: f32,
    /// Spawn distance in front of the launching player
    pub spawn_offset: f32,
    /// Seconds between launches, per player
    pub launch_cooldown: f32,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            damage: 10,
            radius: 8.0,
            lifespan: 12.0,
            tracking_speed: 250.0,
            max_speed: 700.0,
            launch_duration: 0.5,
            attenuation_exponent: 1.5,
            launch_force: 1500.0,
            spawn_offset: 30.0,
            launch_cooldown: 1.0,
        }
    }
}

/// Complete match tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena: ArenaSettings,
    pub tiles: TileSettings,
    pub player: PlayerSettings,
    pub projectile: ProjectileSettings,
}

impl Settings {
    /// Create settings from an arena preset
    pub fn from_preset(preset: ArenaPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: ArenaPreset) {
        self.arena.grid_size = preset.grid_size();
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject tunings that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        for (name, p) in self.arena.probabilities.named() {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidProbability { name, value: p });
            }
        }
        let total = self.arena.probabilities.total();
        if total > 1.0 {
            return Err(ConfigError::ProbabilityOverflow(total));
        }
        for (name, slow) in [
            ("sticky", self.tiles.sticky_slow),
            ("super", self.tiles.super_slow),
        ] {
            if !(slow > 0.0 && slow <= 1.0) {
                return Err(ConfigError::InvalidSlowFactor { name, value: slow });
            }
        }
        if self.player.max_health == 0 {
            return Err(ConfigError::ZeroHealth);
        }

        let positive = [
            ("tile_size", self.arena.tile_size),
            ("damage_tick_interval", self.tiles.damage_tick_interval),
            ("player.speed", self.player.speed),
            ("player.size", self.player.size),
            ("projectile.radius", self.projectile.radius),
            ("projectile.lifespan", self.projectile.lifespan),
            ("projectile.max_speed", self.projectile.max_speed),
            ("projectile.launch_duration", self.projectile.launch_duration),
            ("projectile.attenuation_exponent", self.projectile.attenuation_exponent),
            ("projectile.tracking_speed", self.projectile.tracking_speed),
            ("projectile.launch_force", self.projectile.launch_force),
            ("player.paint_radius_factor", self.player.paint_radius_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let non_negative = [
            ("projectile.spawn_offset", self.projectile.spawn_offset),
            ("player.paint_cooldown", self.player.paint_cooldown),
            ("projectile.launch_cooldown", self.projectile.launch_cooldown),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}
