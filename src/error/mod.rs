//! Error types for the application.
//!
//! This module provides the application's error hierarchy. The `AppError` enum
//! serves as the top-level error type for the binary and bot layer, wrapping
//! domain-specific errors from the game service and infrastructure failures
//! from configuration loading and the Discord client.

pub mod config;
pub mod game;

use thiserror::Error;

use crate::error::{config::ConfigError, game::GameError};

/// Top-level application error type.
///
/// Aggregates the error types that can reach the binary or the bot adapter.
/// Game rejections that only matter to the player (cooldowns, invalid picks)
/// are handled where they occur and never bubble up this far.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Game service error that was not recoverable at the bot layer.
    #[error(transparent)]
    GameErr(#[from] GameError),

    /// Discord API error from Serenity. Boxed due to large size.
    #[error(transparent)]
    DiscordErr(Box<serenity::Error>),
}

impl From<serenity::Error> for AppError {
    fn from(error: serenity::Error) -> Self {
        Self::DiscordErr(Box::new(error))
    }
}
