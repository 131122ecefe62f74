//! The matching-game core.
//!
//! Everything in this module is pure state: no Discord types, no I/O, no
//! timers. The service layer owns serialization and scheduling around it.
//!
//! - **Board** (`board`) - the shuffled paired card layout and its
//!   covered/revealed projection.
//! - **Engine** (`engine`) - the pick state machine: matching rules, the
//!   attempt budget, and terminal detection.
//! - **Limiter** (`limiter`) - the fixed-window click limiter.
//! - **Reward** (`reward`) - the reward table hook applied at game end.

pub mod board;
pub mod engine;
pub mod limiter;
pub mod reward;
