//! Round results for the current session
//!
//! Tracks wins per player and the most recent rounds. Kept in memory only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::PlayerId;
use crate::sim::RoundOutcome;

/// Maximum number of rounds kept in the history
pub const MAX_HISTORY: usize = 10;

/// One finished round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-based)
    pub round: u32,
    pub outcome: RoundOutcome,
    /// Tiles owned per player when the round ended
    pub tiles: BTreeMap<PlayerId, usize>,
    /// Round length in seconds
    pub duration: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    wins: BTreeMap<PlayerId, u32>,
    draws: u32,
    /// Most recent first
    pub history: Vec<RoundRecord>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished round. Undecided outcomes are ignored.
    pub fn record(&mut self, record: RoundRecord) {
        match record.outcome {
            RoundOutcome::InProgress => return,
            RoundOutcome::Won { player } => *self.wins.entry(player).or_insert(0) += 1,
            RoundOutcome::Draw => self.draws += 1,
        }
        self.history.insert(0, record);
        self.history.truncate(MAX_HISTORY);
    }

    pub fn wins(&self, player: PlayerId) -> u32 {
        self.wins.get(&player).copied().unwrap_or(0)
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn rounds_played(&self) -> u32 {
        self.wins.values().sum::<u32>() + self.draws
    }

    /// Player with strictly the most wins, if any
    pub fn leader(&self) -> Option<PlayerId> {
        let best = self.wins.values().copied().max()?;
        let mut leaders = self.wins.iter().filter(|(_, w)| **w == best);
        let (id, _) = leaders.next()?;
        if leaders.next().is_some() {
            None
        } else {
            Some(*id)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn last(&self) -> Option<&RoundRecord> {
        self.history.first()
    }
}
