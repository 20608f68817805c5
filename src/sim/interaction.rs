//! Player-tile interaction
//!
//! Once per frame per active player: find the first special tile under the
//! player's bounds and apply its effect. Only one tile acts per frame, even
//! when the bounds span several special tiles.
//!
//! "Entering" a tile means the resolved cell differs from the player's
//! `last_cell`. Teleport and heal fire only on entry. Damage applies an
//! initial tick once per occupancy (entering a cell, or coming back after a
//! frame off damage tiles) and then one tick per `damage_tick_interval`.

use rand::Rng;

use super::grid::{Cell, Grid};
use super::player::Player;
use crate::settings::TileSettings;

/// What happened to the player this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileEvent {
    Teleported { from: Cell, to: Cell },
    Damaged { amount: u32, initial: bool, eliminated: bool },
    Healed { amount: u32 },
    Slowed { factor: f32 },
}

/// Resolve tile effects for one player.
///
/// The caller skips eliminated players. Returns every event applied this
/// frame (a super tile can slow and damage at once).
pub fn resolve_tile_interaction<R: Rng>(
    player: &mut Player,
    grid: &Grid,
    tuning: &TileSettings,
    dt: f32,
    rng: &mut R,
) -> Vec<TileEvent> {
    let mut events = Vec::new();

    player.damage_clock += dt;
    player.stuck = false;
    player.stuck_factor = 1.0;
    player.on_damage_tile = false;

    let bounds = player.bounds();
    let (min, max) = grid.cell_range(&bounds);

    let mut resolved = None;
    'scan: for row in min.row..=max.row {
        for col in min.col..=max.col {
            let cell = Cell::new(col, row);
            let Some(tile) = grid.tile(cell) else {
                continue;
            };
            let effect = *tile.effect();
            if !effect.is_active() || !grid.cell_bounds(cell).intersects(&bounds) {
                continue;
            }

            let entered = player.last_cell != Some(cell);

            if effect.teleport {
                if entered {
                    let to = grid.random_cell(rng);
                    player.relocate(grid.cell_center(to));
                    log::debug!("Player {} teleported {:?} -> {:?}", player.id, cell, to);
                    events.push(TileEvent::Teleported { from: cell, to });
                    // last_cell stays cleared so the destination counts as a fresh entry
                    break 'scan;
                }
                resolved = Some(cell);
                break 'scan;
            }

            if let Some(factor) = effect.slow {
                player.stuck = true;
                player.stuck_factor = factor;
                events.push(TileEvent::Slowed { factor });
            }

            if let Some(amount) = effect.damage {
                player.on_damage_tile = true;
                if entered {
                    player.took_initial_damage = false;
                }
                let initial = !player.took_initial_damage;
                let due = initial || player.damage_clock >= tuning.damage_tick_interval;
                if due {
                    let eliminated = player.take_damage(amount);
                    player.damage_clock = 0.0;
                    player.took_initial_damage = true;
                    if eliminated {
                        log::debug!("Player {} eliminated by a damage tile", player.id);
                    }
                    events.push(TileEvent::Damaged {
                        amount,
                        initial,
                        eliminated,
                    });
                }
            }

            if let Some(amount) = effect.heal {
                if entered && tile.is_owned_by(player.id) {
                    let healed = player.heal(amount);
                    events.push(TileEvent::Healed { amount: healed });
                }
            }

            resolved = Some(cell);
            break 'scan;
        }
    }

    if let Some(cell) = resolved {
        player.last_cell = Some(cell);
    }
    // Off every damage tile: the next one starts a new occupancy
    if !player.on_damage_tile {
        player.set_on_damage_tile(false);
    }

    events
}
