//! Message transport module
//!
//! The `Transport` trait is the single outbound seam to Telegram. The
//! scheduler and controller only ever talk to `dyn Transport`, so tests
//! swap in a recording fake without touching the bot API.

use async_trait::async_trait;
use teloxide::{
    payloads::SendMessageSetters,
    prelude::Request,
    requests::Requester,
    types::{ChatId, ParseMode},
    Bot,
};
use tracing::{debug, error};

use crate::utils::errors::{DeadlineBuddyError, Result};

/// Outbound message delivery to a group chat.
///
/// Failures come back as an error value; callers decide whether to
/// log-and-continue (scheduled fires) or surface them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send MarkdownV2-formatted text to a group. The text must already be
    /// escaped (see `messages::escape_markdown_v2`).
    async fn send_markdown(&self, group_id: i64, text: String) -> Result<()>;
}

/// Production transport over the Telegram bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_markdown(&self, group_id: i64, text: String) -> Result<()> {
        match self
            .bot
            .send_message(ChatId(group_id), text)
            .parse_mode(ParseMode::MarkdownV2)
            .send()
            .await
        {
            Ok(_) => {
                debug!(group_id = group_id, "Message sent");
                Ok(())
            }
            Err(e) => {
                error!(group_id = group_id, error = %e, "Failed to send message");
                Err(DeadlineBuddyError::Telegram(e))
            }
        }
    }
}
