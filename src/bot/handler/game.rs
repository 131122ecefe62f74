//! Matching-game command and button handling.

use std::sync::Arc;
use std::time::Duration;

use serenity::all::{
    ButtonStyle, ComponentInteraction, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, EditMessage,
    Message,
};

use crate::config::LevelSettings;
use crate::error::game::GameError;
use crate::model::game::{RenderSnapshot, SessionId};
use crate::render::RenderAdapter;
use crate::service::match_game::MatchGameService;

/// Message trigger for starting a game.
pub const COMMAND_PREFIX: &str = "!match";

/// Custom-id namespace for guess buttons.
const BUTTON_PREFIX: &str = "match";

/// Handles a `!match <level>` message.
///
/// Starts a session, posts the covered board with its guess buttons, and
/// spawns the watcher that posts the final board and summary when the game
/// ends, whether by clicks or by timeout.
pub async fn handle_game_command(
    service: &Arc<MatchGameService>,
    renderer: &Arc<dyn RenderAdapter>,
    ctx: Context,
    message: Message,
) {
    let mut parts = message.content.split_whitespace();
    if parts.next() != Some(COMMAND_PREFIX) {
        return;
    }
    let level = parts.next().unwrap_or("1");
    let author = message.author.id.get();

    let session = match service.start_session(author, level).await {
        Ok(session) => session,
        Err(error) => {
            let reply = start_error_message(&error).unwrap_or_else(|| {
                tracing::error!("Failed to start game for user {}: {}", author, error);
                "Something went wrong starting your game, please try again.".to_string()
            });
            if let Err(e) = message.reply(&ctx.http, reply).await {
                tracing::error!("Failed to send start rejection: {:?}", e);
            }
            return;
        }
    };

    let snapshot = session.snapshot().await;
    let content = match renderer.render(&snapshot).await {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Failed to render new board: {}", e);
            return;
        }
    };

    let builder = CreateMessage::new()
        .content(content)
        .components(board_buttons(&snapshot));
    let board_message = match message.channel_id.send_message(&ctx.http, builder).await {
        Ok(sent) => sent,
        Err(e) => {
            tracing::error!("Failed to post game board: {:?}", e);
            return;
        }
    };

    // Watch for the end of the game and post the closing state. The session
    // ends server-side either way; this task only owns the display.
    let http = ctx.http.clone();
    let renderer = Arc::clone(renderer);
    tokio::spawn(async move {
        session.wait_ended().await;

        let snapshot = session.snapshot().await;
        match renderer.render(&snapshot).await {
            Ok(content) => {
                let edit = EditMessage::new()
                    .content(content)
                    .components(board_buttons(&snapshot));
                if let Err(e) = board_message
                    .channel_id
                    .edit_message(&http, board_message.id, edit)
                    .await
                {
                    tracing::error!("Failed to edit final board: {:?}", e);
                }
            }
            Err(e) => tracing::error!("Failed to render final board: {}", e),
        }

        if let Some(summary) = session.summary().await {
            let closing = CreateMessage::new().content(format!(
                "<@{}> Game ended: {} pair(s) matched in {} click(s).",
                summary.author, summary.matched_pairs, summary.attempts_used
            ));
            if let Err(e) = board_message
                .channel_id
                .send_message(&http, closing)
                .await
            {
                tracing::error!("Failed to send game summary: {:?}", e);
            }
        }
    });
}

/// Handles a click on a guess button.
///
/// Accepted picks update the board message in place; rejections answer the
/// clicking user ephemerally and leave the board untouched.
pub async fn handle_guess_button(
    service: &Arc<MatchGameService>,
    renderer: &Arc<dyn RenderAdapter>,
    ctx: Context,
    component: ComponentInteraction,
) {
    let Some((session_id, position)) = parse_custom_id(&component.data.custom_id) else {
        return;
    };
    let user = component.user.id.get();

    match service.submit_pick(session_id, user, position).await {
        Ok(snapshot) => {
            let content = match renderer.render(&snapshot).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!("Failed to render board after pick: {}", e);
                    return;
                }
            };
            let response = CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .components(board_buttons(&snapshot)),
            );
            if let Err(e) = component.create_response(&ctx.http, response).await {
                tracing::error!("Failed to update board message: {:?}", e);
            }

            if snapshot.resolving && !snapshot.ended {
                schedule_recover_refresh(service, renderer, &ctx, &component, session_id);
            }
        }
        Err(GameError::Rejected(rejection)) => {
            respond_ephemeral(&ctx, &component, rejection.to_string()).await;
        }
        Err(GameError::UnknownSession) => {
            respond_ephemeral(&ctx, &component, "This game is no longer running.".to_string())
                .await;
        }
        Err(error) => {
            tracing::error!("Pick on session {} failed: {}", session_id, error);
            respond_ephemeral(&ctx, &component, "Something went wrong, please try again.".to_string())
                .await;
        }
    }
}

/// Refreshes the board message once a mismatched pair has been covered
/// again.
///
/// The re-cover itself happens in the session regardless; this only brings
/// the display back in sync. Skipped when the game ended in the meantime,
/// because the end watcher owns the final edit.
fn schedule_recover_refresh(
    service: &Arc<MatchGameService>,
    renderer: &Arc<dyn RenderAdapter>,
    ctx: &Context,
    component: &ComponentInteraction,
    session_id: SessionId,
) {
    let service = Arc::clone(service);
    let renderer = Arc::clone(renderer);
    let http = ctx.http.clone();
    let channel_id = component.message.channel_id;
    let message_id = component.message.id;

    tokio::spawn(async move {
        let Some(session) = service.session(session_id).await else {
            return;
        };
        tokio::time::sleep(session.settings().resolve_delay + Duration::from_millis(100)).await;

        let snapshot = session.snapshot().await;
        if snapshot.ended {
            return;
        }
        match renderer.render(&snapshot).await {
            Ok(content) => {
                let edit = EditMessage::new()
                    .content(content)
                    .components(board_buttons(&snapshot));
                if let Err(e) = channel_id.edit_message(&http, message_id, edit).await {
                    tracing::error!("Failed to refresh board after resolve: {:?}", e);
                }
            }
            Err(e) => tracing::error!("Failed to render board after resolve: {}", e),
        }
    });
}

async fn respond_ephemeral(ctx: &Context, component: &ComponentInteraction, text: String) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(text)
            .ephemeral(true),
    );
    if let Err(e) = component.create_response(&ctx.http, response).await {
        tracing::error!("Failed to send ephemeral rejection: {:?}", e);
    }
}

/// One secondary button per board position, labeled 1-based, disabled once
/// its position is revealed or the game ended.
fn board_buttons(snapshot: &RenderSnapshot) -> Vec<CreateActionRow> {
    let per_row = snapshot.view.per_row.max(1);
    snapshot
        .view
        .slots
        .chunks(per_row)
        .enumerate()
        .map(|(row, chunk)| {
            let buttons = chunk
                .iter()
                .enumerate()
                .map(|(offset, slot)| {
                    let position = row * per_row + offset;
                    CreateButton::new(format!(
                        "{}:{}:{}",
                        BUTTON_PREFIX, snapshot.session_id, position
                    ))
                    .label((position + 1).to_string())
                    .style(ButtonStyle::Secondary)
                    .disabled(slot.is_some() || snapshot.ended)
                })
                .collect();
            CreateActionRow::Buttons(buttons)
        })
        .collect()
}

fn parse_custom_id(custom_id: &str) -> Option<(SessionId, usize)> {
    let rest = custom_id.strip_prefix(BUTTON_PREFIX)?.strip_prefix(':')?;
    let (session, position) = rest.split_once(':')?;
    Some((
        SessionId(session.parse().ok()?),
        position.parse().ok()?,
    ))
}

fn start_error_message(error: &GameError) -> Option<String> {
    match error {
        GameError::InvalidLevel(_) => Some(format!(
            "Invalid level selection! Please select a valid level: `{}`",
            LevelSettings::known_levels().join(", ")
        )),
        GameError::GameCooldown(until) => {
            Some(format!("Your next game is <t:{}:R>", until.timestamp()))
        }
        GameError::CatalogExhausted { .. } => {
            Some("Not enough cards are available right now, please try again later.".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// Tests parsing guess-button custom ids.
    ///
    /// Expected: session id and position for well-formed ids, None otherwise
    #[test]
    fn test_parse_custom_id() {
        assert_eq!(parse_custom_id("match:7:3"), Some((SessionId(7), 3)));
        assert_eq!(parse_custom_id("match:7"), None);
        assert_eq!(parse_custom_id("shop:7:3"), None);
        assert_eq!(parse_custom_id("match:x:3"), None);
        assert_eq!(parse_custom_id(""), None);
    }

    /// Tests the player-facing start rejection messages.
    ///
    /// Expected: level list for InvalidLevel, relative timestamp for
    /// GameCooldown, None for internal errors
    #[test]
    fn test_start_error_messages() {
        let invalid = start_error_message(&GameError::InvalidLevel("9".to_string())).unwrap();
        assert!(invalid.contains("1, 2"));

        let until = Utc::now();
        let cooldown = start_error_message(&GameError::GameCooldown(until)).unwrap();
        assert!(cooldown.contains(&format!("<t:{}:R>", until.timestamp())));

        assert!(start_error_message(&GameError::UnknownSession).is_none());
    }
}
