use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Reasons a pick was refused before it could change any game state.
///
/// Every variant is recovered locally: the rejection is surfaced to the player
/// who clicked and nothing about the session mutates. A pick either fully
/// applies its state transition or is rejected with one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickRejection {
    /// Someone other than the player who started the game clicked a button.
    #[error("Only the player who started this game can play it")]
    NotAuthor,

    /// The game already ended; all further input is refused.
    #[error("This game has already ended")]
    GameEnded,

    /// The player clicked faster than the fixed click window allows.
    ///
    /// Carries the remaining wait time so the caller can tell the player how
    /// long to hold off.
    #[error("You're on cooldown for {} more second(s)", .0.as_secs())]
    OnCooldown(Duration),

    /// A mismatched pair is still being shown; input is suspended until the
    /// pair is covered again.
    #[error("Too fast. Please slower!")]
    ResolvePending,

    /// The position is out of range or already revealed.
    #[error("Position {0} cannot be picked")]
    InvalidPosition(usize),
}

/// Errors from the matching-game service.
#[derive(Error, Debug)]
pub enum GameError {
    /// The requested difficulty level does not exist.
    #[error("Invalid level selection: {0}")]
    InvalidLevel(String),

    /// The player's previous game cooldown has not expired yet.
    ///
    /// Carries the time at which the player may start another game.
    #[error("Matching game on cooldown until {0}")]
    GameCooldown(DateTime<Utc>),

    /// The card catalog could not supply enough unique cards for a board.
    ///
    /// Fatal to session creation; raised before any board is built.
    #[error("Card catalog cannot supply {requested} unique cards ({available} available)")]
    CatalogExhausted { requested: usize, available: usize },

    /// No session is registered under the given id. Sessions are removed from
    /// the registry once they end.
    #[error("Unknown or expired game session")]
    UnknownSession,

    /// A pick was refused; see [`PickRejection`].
    #[error(transparent)]
    Rejected(#[from] PickRejection),

    /// The render adapter failed to produce a board view.
    ///
    /// Raised after the state transition committed; the session is unaffected.
    #[error("Failed to render board: {0}")]
    Render(String),

    /// The user store failed to read or write a user record.
    #[error("User store unavailable: {0}")]
    Store(String),
}
