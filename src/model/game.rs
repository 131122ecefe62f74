//! Domain models for matching-game sessions.
//!
//! These are the types the service layer hands to the bot adapter: board
//! projections for rendering, the end-of-game summary, and the reward grant
//! passed to the user store.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::card::CardId;

/// Unique identifier for a running game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Covered/revealed projection of a board.
///
/// Covered positions project as `None`; the underlying card identity is never
/// exposed for a covered position. This is the only view of the board that
/// leaves the game core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// One entry per board position, `Some` when revealed.
    pub slots: Vec<Option<CardId>>,
    /// Number of positions displayed per row.
    pub per_row: usize,
}

/// Snapshot of a session's displayable state after a transition.
///
/// Returned by every accepted pick and by timer callbacks. Rendering a
/// snapshot is a read of already-committed state; a render failure cannot
/// corrupt the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// The session this snapshot was taken from.
    pub session_id: SessionId,
    /// Difficulty level of the session.
    pub level: String,
    /// Current covered/revealed projection of the board.
    pub view: BoardView,
    /// Clicks remaining out of the session's attempt budget.
    pub clicks_left: u32,
    /// Number of pairs locked as matched so far.
    pub matched_pairs: u32,
    /// Whether a mismatched pair is currently being shown before re-covering.
    pub resolving: bool,
    /// Whether the session has ended.
    pub ended: bool,
}

/// Increment-amounts to apply to a user's reward totals.
///
/// The game never applies these itself; the grant is handed to the user store
/// collaborator. The built-in reward tables are empty, so grants are empty
/// until a reward table is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardGrant {
    /// Map of stat name to increment amount.
    pub increments: HashMap<String, i64>,
}

impl RewardGrant {
    /// Returns true when the grant carries no increments.
    pub fn is_empty(&self) -> bool {
        self.increments.is_empty()
    }
}

/// Terminal summary of a finished session, emitted exactly once per game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    /// The session that ended.
    pub session_id: SessionId,
    /// Discord id of the player.
    pub author: u64,
    /// Difficulty level that was played.
    pub level: String,
    /// Pairs matched when the game ended.
    pub matched_pairs: u32,
    /// Clicks used when the game ended.
    pub attempts_used: u32,
    /// Rewards granted for the result.
    pub grant: RewardGrant,
}
