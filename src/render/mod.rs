//! Render adapter seam.
//!
//! Image compositing is an external concern; the game hands a committed
//! [`RenderSnapshot`] to a `RenderAdapter` and displays whatever comes back.
//! `TextRenderer` produces the plain monospace view the bot ships with.

use serenity::async_trait;

use crate::error::game::GameError;
use crate::model::game::RenderSnapshot;

/// Turns a board snapshot into displayable message content.
///
/// Rendering is a read of already-committed state: implementations must not
/// assume their failure rolls anything back, because it does not.
#[async_trait]
pub trait RenderAdapter: Send + Sync {
    async fn render(&self, snapshot: &RenderSnapshot) -> Result<String, GameError>;
}

/// Plain-text board renderer.
///
/// Covered positions show their 1-based button label, revealed positions
/// show the card id. No visual assets are involved.
pub struct TextRenderer;

#[async_trait]
impl RenderAdapter for TextRenderer {
    async fn render(&self, snapshot: &RenderSnapshot) -> Result<String, GameError> {
        let mut body = format!(
            "Level:        {}\nClick left:   {}\nCard Matched: {}\n\n",
            snapshot.level, snapshot.clicks_left, snapshot.matched_pairs
        );

        for (index, slot) in snapshot.view.slots.iter().enumerate() {
            match slot {
                Some(card) => body.push_str(&format!("[{:^5}]", card.to_string())),
                None => body.push_str(&format!("[ #{:<2} ]", index + 1)),
            }
            if (index + 1) % snapshot.view.per_row.max(1) == 0 {
                body.push('\n');
            }
        }

        Ok(format!("```{}```", body.trim_end()))
    }
}
