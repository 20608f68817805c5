//! Arena tiles and their effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::TileSettings;
use crate::{Color, PlayerId};

/// Special tile types (fixed at generation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    None,
    Sticky,
    Damage,
    Healing,
    Teleporter,
    Super, // Sticky and Damage at once
}

impl TileKind {
    pub const ALL: [TileKind; 6] = [
        TileKind::None,
        TileKind::Sticky,
        TileKind::Damage,
        TileKind::Healing,
        TileKind::Teleporter,
        TileKind::Super,
    ];

    /// Base render color for this type
    pub fn color(&self) -> Color {
        match self {
            TileKind::None => Color::WHITE,
            TileKind::Sticky => Color::YELLOW,
            TileKind::Damage => Color::RED,
            TileKind::Healing => Color::GREEN,
            TileKind::Teleporter => Color::MAGENTA,
            TileKind::Super => Color::PURPLE,
        }
    }
}

/// What a tile does to a player standing on it.
///
/// Composite tiles simply fill in more than one field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileEffect {
    /// Speed multiplier while overlapping
    pub slow: Option<f32>,
    /// Health lost per damage tick
    pub damage: Option<u32>,
    /// Health gained on entering a tile the player owns
    pub heal: Option<u32>,
    /// Relocate the player on entry
    pub teleport: bool,
}

impl TileEffect {
    /// Effect descriptor for a tile type under the given tuning
    pub fn for_kind(kind: TileKind, tuning: &TileSettings) -> Self {
        match kind {
            TileKind::None => Self::default(),
            TileKind::Sticky => Self {
                slow: Some(tuning.sticky_slow),
                ..Self::default()
            },
            TileKind::Damage => Self {
                damage: Some(tuning.damage_per_tick),
                ..Self::default()
            },
            TileKind::Healing => Self {
                heal: Some(tuning.heal_amount),
                ..Self::default()
            },
            TileKind::Teleporter => Self {
                teleport: true,
                ..Self::default()
            },
            TileKind::Super => Self {
                slow: Some(tuning.super_slow),
                damage: Some(tuning.super_damage_per_tick),
                ..Self::default()
            },
        }
    }

    /// True if the tile does anything at all
    pub fn is_active(&self) -> bool {
        self.slow.is_some() || self.damage.is_some() || self.heal.is_some() || self.teleport
    }
}

/// A single grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    kind: TileKind,
    effect: TileEffect,
    /// World-space top-left corner
    pos: Vec2,
    owner: Option<PlayerId>,
    /// Color of the owning player (drawn by the renderer)
    owner_color: Option<Color>,
}

impl Tile {
    pub fn new(kind: TileKind, pos: Vec2, tuning: &TileSettings) -> Self {
        Self {
            kind,
            effect: TileEffect::for_kind(kind, tuning),
            pos,
            owner: None,
            owner_color: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    #[inline]
    pub fn effect(&self) -> &TileEffect {
        &self.effect
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// Claim the tile for a player (overwrites any previous owner)
    pub fn claim(&mut self, player: PlayerId, color: Color) {
        self.owner = Some(player);
        self.owner_color = Some(color);
    }

    /// Return the tile to the unclaimed state
    pub fn release(&mut self) {
        self.owner = None;
        self.owner_color = None;
    }

    /// Color as seen from one player's half of the split screen.
    ///
    /// Owners still see the special type of their own tiles; everyone else
    /// only sees the owner's color.
    pub fn display_color(&self, viewer: PlayerId) -> Color {
        match (self.owner, self.owner_color) {
            (Some(owner), Some(color)) => {
                if owner == viewer && self.kind != TileKind::None {
                    self.kind.color()
                } else {
                    color
                }
            }
            _ => self.kind.color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> TileSettings {
        TileSettings::default()
    }

    #[test]
    fn test_super_combines_slow_and_damage() {
        let t = tuning();
        let effect = TileEffect::for_kind(TileKind::Super, &t);
        assert_eq!(effect.slow, Some(t.super_slow));
        assert_eq!(effect.damage, Some(t.super_damage_per_tick));
        assert_eq!(effect.heal, None);
        assert!(!effect.teleport);
    }

    #[test]
    fn test_only_none_is_inactive() {
        let t = tuning();
        for kind in TileKind::ALL {
            let active = TileEffect::for_kind(kind, &t).is_active();
            assert_eq!(active, kind != TileKind::None, "{kind:?}");
        }
    }

    #[test]
    fn test_claim_and_release() {
        let mut tile = Tile::new(TileKind::None, Vec2::ZERO, &tuning());
        assert_eq!(tile.owner(), None);
        tile.claim(1, Color::BLUE);
        assert!(tile.is_owned_by(1));
        tile.claim(2, Color::CYAN);
        assert!(tile.is_owned_by(2));
        assert!(!tile.is_owned_by(1));
        tile.release();
        assert_eq!(tile.owner(), None);
        assert_eq!(tile.kind(), TileKind::None);
    }

    #[test]
    fn test_display_color_per_viewer() {
        let mut tile = Tile::new(TileKind::Damage, Vec2::ZERO, &tuning());
        assert_eq!(tile.display_color(1), Color::RED);

        tile.claim(1, Color::BLUE);
        // Owner keeps seeing the hazard, opponent only sees territory
        assert_eq!(tile.display_color(1), Color::RED);
        assert_eq!(tile.display_color(2), Color::BLUE);

        let mut plain = Tile::new(TileKind::None, Vec2::ZERO, &tuning());
        plain.claim(2, Color::CYAN);
        assert_eq!(plain.display_color(2), Color::CYAN);
        assert_eq!(plain.display_color(1), Color::CYAN);
    }
}
