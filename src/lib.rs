//! Discord photocard matching-game bot.
//!
//! Players start a memory game at a chosen difficulty level, then flip board
//! positions two at a time trying to pair up identical photocards within a
//! limited number of clicks before the game times out.
//!
//! # Architecture
//!
//! The crate keeps the game core free of any Discord type so it can be tested
//! without a gateway connection:
//!
//! - **Game core** (`game/`) - Board layout, the pick state machine, the
//!   per-user click limiter, and the reward hook. Pure state, no I/O.
//! - **Service layer** (`service/`) - Session lifecycle: serialized access to
//!   a running game, the mismatch resolve timer, the session timeout, and the
//!   per-user game cooldown gate.
//! - **Collaborator seams** (`catalog`, `render`, `store`) - Traits for the
//!   card pool, board rendering, and user persistence, with in-memory
//!   implementations used by the binary and by tests.
//! - **Model layer** (`model/`) - Domain types shared across layers.
//! - **Error layer** (`error/`) - Application error types.
//! - **Bot adapter** (`bot/`) - Serenity event handlers that map component
//!   interactions onto game actions and render the returned snapshots.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod model;
pub mod render;
pub mod service;
pub mod store;
