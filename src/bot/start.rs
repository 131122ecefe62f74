use std::sync::Arc;

use serenity::all::{
    ActivityData, Client, Context, EventHandler, GatewayIntents, Interaction, Message, Ready,
};
use serenity::async_trait;

use crate::bot::handler;
use crate::config::Config;
use crate::error::AppError;
use crate::render::RenderAdapter;
use crate::service::match_game::MatchGameService;

/// Discord bot event handler
pub struct Handler {
    service: Arc<MatchGameService>,
    renderer: Arc<dyn RenderAdapter>,
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("{} is connected to Discord!", ready.user.name);

        ctx.set_activity(Some(ActivityData::playing("memory matching")));
    }

    /// Called for every message the bot can see
    async fn message(&self, ctx: Context, message: Message) {
        if message.author.bot {
            return;
        }
        handler::game::handle_game_command(&self.service, &self.renderer, ctx, message).await;
    }

    /// Called for component interactions, i.e. guess-button clicks
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Component(component) = interaction {
            handler::game::handle_guess_button(&self.service, &self.renderer, ctx, component)
                .await;
        }
    }
}

/// Starts the Discord bot in a blocking manner
///
/// This function creates and starts the Discord bot client. It blocks until
/// the bot shuts down, so callers that have other work to do should run it
/// inside a tokio task.
///
/// # Arguments
/// - `config` - Application configuration carrying the bot token
/// - `service` - The matching-game service the handlers act on
/// - `renderer` - Render adapter for board snapshots
///
/// # Returns
/// - `Ok(())` if the bot starts and runs successfully
/// - `Err(AppError)` if bot initialization or connection fails
pub async fn start_bot(
    config: &Config,
    service: Arc<MatchGameService>,
    renderer: Arc<dyn RenderAdapter>,
) -> Result<(), AppError> {
    // Configure gateway intents - what events the bot will receive
    // MESSAGE_CONTENT is a privileged intent - must be enabled in the
    // Discord Developer Portal
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler { service, renderer };

    let mut client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Starting Discord bot...");

    // Start the bot (this blocks until shutdown)
    client.start().await?;

    Ok(())
}
