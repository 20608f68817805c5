//! Tile Arena headless driver
//!
//! Seeds a match, lets the autopilot play both sides in a fixed-step loop and
//! prints each round's outcome.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;

use tile_arena::consts::SIM_DT;
use tile_arena::sim::{FixedStep, MatchState, RoundOutcome, TickInput, autopilot_input, tick};
use tile_arena::{ArenaPreset, PlayerId, Settings};

/// Frame time fed to the accumulator (a 30 Hz presenter)
const FRAME_DT: f32 = 1.0 / 30.0;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// JSON tuning file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Match seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Arena size preset: compact or standard
    #[arg(long)]
    preset: Option<String>,
    /// Give up on a round after this many simulated seconds
    #[arg(long, default_value_t = 300.0)]
    max_seconds: f32,
    /// Number of rounds to play
    #[arg(long, default_value_t = 1)]
    rounds: u32,
    /// Write the scoreboard as JSON to this path
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(name) = &cli.preset {
        let Some(preset) = ArenaPreset::from_str(name) else {
            bail!("unknown preset '{name}' (expected compact or standard)");
        };
        settings.apply_preset(preset);
    }

    let seed = cli.seed.unwrap_or_else(seed_from_clock);
    let mut state = MatchState::new(seed, settings).context("invalid match settings")?;
    println!(
        "Tile Arena: seed {seed}, {0}x{0} grid, {1} rounds",
        state.grid.size(),
        cli.rounds
    );

    for round in 0..cli.rounds {
        if round > 0 {
            state.new_round();
        }
        play_round(&mut state, cli.max_seconds);
        report_round(&state);
    }

    let board = &state.scoreboard;
    println!(
        "Wins: P1 {} / P2 {} / draws {}",
        board.wins(1),
        board.wins(2),
        board.draws()
    );

    if let Some(path) = &cli.summary_out {
        let json = serde_json::to_string_pretty(board).context("serializing scoreboard")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing summary to {}", path.display()))?;
    }

    Ok(())
}

/// Run until the round is decided or the time limit passes
fn play_round(state: &mut MatchState, max_seconds: f32) {
    let mut clock = FixedStep::new();
    while !state.is_round_over() && state.round_time < max_seconds {
        for _ in 0..clock.advance(FRAME_DT) {
            let input = TickInput {
                players: [autopilot_input(state, 0), autopilot_input(state, 1)],
                ..Default::default()
            };
            tick(state, &input, SIM_DT);
            if state.is_round_over() {
                break;
            }
        }
    }
}

fn report_round(state: &MatchState) {
    let tiles = state.grid.player_tile_counts();
    let owned = |id: PlayerId| tiles.get(&id).copied().unwrap_or(0);
    let result = match state.outcome() {
        RoundOutcome::Won { player } => format!("player {player} wins"),
        RoundOutcome::Draw => "draw".to_string(),
        RoundOutcome::InProgress => "time limit reached".to_string(),
    };
    println!(
        "Round {}: {} after {:.1}s | tiles P1 {} P2 {} of {} | health P1 {} P2 {}",
        state.round,
        result,
        state.round_time,
        owned(1),
        owned(2),
        state.grid.total_tiles(),
        state.players[0].health,
        state.players[1].health,
    );
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
