//! Domain models shared across the game core, service layer, and bot adapter.

pub mod card;
pub mod game;
