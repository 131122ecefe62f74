//! Session lifecycle and game orchestration.
//!
//! `MatchSession` serializes all input and timer callbacks against one game's
//! state; `MatchGameService` owns the session registry, the start-of-game
//! gates, and the per-session timeout supervisor.

pub mod match_game;
pub mod session;
