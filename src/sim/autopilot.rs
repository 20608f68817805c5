//! Computer-controlled player
//!
//! Picks a heading toward unclaimed ground, steers around harmful tiles,
//! paints whenever it can and throws balloons at a nearby opponent. Purely a
//! function of the match state, so replays stay deterministic.

use glam::Vec2;

use super::grid::{Cell, Grid};
use super::player::{Direction, Player};
use super::state::MatchState;
use super::tick::PlayerInput;
use super::tile::TileKind;
use crate::PlayerId;

/// Launch only when the opponent is within this many world units
pub const LAUNCH_RANGE: f32 = 600.0;
/// Cells scanned around each lookahead point (square radius)
const SCAN_RADIUS: i64 = 2;
/// Score penalty for heading onto a damaging or slowing tile
const HAZARD_PENALTY: i32 = 10;

/// Input for the player at `index` (0 or 1)
pub fn autopilot_input(state: &MatchState, index: usize) -> PlayerInput {
    let me = &state.players[index];
    if !me.is_active() {
        return PlayerInput::default();
    }
    let foe = &state.players[MatchState::opponent_index(index)];

    let launch = me.launch_cooldown <= 0.0
        && foe.is_active()
        && me.pos.distance(foe.pos) < LAUNCH_RANGE;

    PlayerInput {
        direction: choose_direction(&state.grid, me, state.settings.player.paint_radius()),
        launch,
        paint: me.paint_cooldown <= 0.0,
    }
}

fn choose_direction(grid: &Grid, me: &Player, lookahead: f32) -> Option<Direction> {
    let here = grid.cell_at(me.pos);
    let mut best: Option<(i32, Direction)> = None;

    // Current facing first so ties keep the heading steady
    let order = std::iter::once(me.facing)
        .chain(Direction::ALL.into_iter().filter(|d| *d != me.facing));
    for dir in order {
        let probe = me.pos + dir.vector() * lookahead;
        let cell = grid.cell_at(probe);
        if cell == here {
            continue;
        }
        let score = score_cell(grid, cell, me.id);
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, dir));
        }
    }

    match best {
        Some((score, dir)) if score > 0 => Some(dir),
        // Nothing left to claim nearby: head for the middle
        _ => Direction::from_vector(Vec2::splat(grid.world_size() / 2.0) - me.pos),
    }
}

/// Unclaimed-or-enemy tiles around `center`, minus a hazard penalty
fn score_cell(grid: &Grid, center: Cell, me: PlayerId) -> i32 {
    let size = grid.size() as i64;
    let mut score = 0;
    for dy in -SCAN_RADIUS..=SCAN_RADIUS {
        for dx in -SCAN_RADIUS..=SCAN_RADIUS {
            let col = center.col as i64 + dx;
            let row = center.row as i64 + dy;
            if col < 0 || row < 0 || col >= size || row >= size {
                continue;
            }
            let cell = Cell::new(col as usize, row as usize);
            if let Some(tile) = grid.tile(cell) {
                if !tile.is_owned_by(me) {
                    score += 1;
                }
            }
        }
    }

    if let Some(tile) = grid.tile(center) {
        if matches!(
            tile.kind(),
            TileKind::Damage | TileKind::Super | TileKind::Sticky
        ) {
            score -= HAZARD_PENALTY;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::tick::{TickInput, tick};

    fn plain_match(seed: u64) -> MatchState {
        let mut settings = Settings::default();
        settings.arena.grid_size = 30;
        let mut state = MatchState::new(seed, settings).unwrap();
        state.grid = Grid::from_fn(30, 20.0, &state.settings.tiles, |_| TileKind::None);
        state
    }

    #[test]
    fn test_fresh_player_paints_and_moves() {
        let state = plain_match(1);
        let input = autopilot_input(&state, 0);
        assert!(input.paint);
        assert!(input.direction.is_some());
    }

    #[test]
    fn test_launch_only_in_range() {
        let mut state = plain_match(2);
        // Spawns are far apart on a 30x30 arena (about 735 units)
        assert!(!autopilot_input(&state, 0).launch);
        state.players[1].pos = state.players[0].pos + Vec2::new(100.0, 0.0);
        assert!(autopilot_input(&state, 0).launch);
        state.players[1].take_damage(1000);
        assert!(!autopilot_input(&state, 0).launch);
    }

    #[test]
    fn test_eliminated_player_idles() {
        let mut state = plain_match(3);
        state.players[0].take_damage(1000);
        assert_eq!(autopilot_input(&state, 0), PlayerInput::default());
    }

    #[test]
    fn test_avoids_hazard() {
        let mut state = plain_match(4);
        state.players[0].pos = Vec2::new(300.0, 300.0);
        state.players[0].facing = Direction::Down;

        // Damage everywhere except the cell straight up from the player
        let reach = state.settings.player.paint_radius();
        let safe = state
            .grid
            .cell_at(state.players[0].pos + Direction::Up.vector() * reach);
        state.grid = Grid::from_fn(30, 20.0, &state.settings.tiles, |cell| {
            if cell == safe {
                TileKind::None
            } else {
                TileKind::Damage
            }
        });
        assert_eq!(autopilot_input(&state, 0).direction, Some(Direction::Up));
    }

    #[test]
    fn test_autopilot_match_finishes() {
        let mut settings = Settings::default();
        settings.arena.grid_size = 20;
        let mut state = MatchState::new(7, settings).unwrap();

        for _ in 0..(60 * 600) {
            if state.is_round_over() {
                break;
            }
            let input = TickInput {
                players: [autopilot_input(&state, 0), autopilot_input(&state, 1)],
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.is_round_over());
        assert_eq!(state.scoreboard.rounds_played(), 1);
    }
}
