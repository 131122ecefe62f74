//! Discord bot adapter for the matching game.
//!
//! This is the only layer that touches serenity types. It maps the `!match`
//! command onto [`MatchGameService::start_session`], maps guess-button
//! component interactions onto `submit_pick`, and renders the snapshots the
//! service hands back. Game state never lives here; a restart of the
//! adapter only loses the display, not the rules.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive guild availability events
//! - `GUILD_MESSAGES` - Receive messages so the command trigger works
//! - `MESSAGE_CONTENT` - Read message content (privileged intent, must be
//!   enabled in the Discord Developer Portal)
//!
//! [`MatchGameService::start_session`]: crate::service::match_game::MatchGameService::start_session

pub mod handler;
pub mod start;
