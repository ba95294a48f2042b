//! The transport seam between the sync engine and the external channel.
//!
//! Callers never see raw API failures: every outcome is one of the variants
//! of [`ChannelError`], classified at the adapter boundary. No code outside
//! the adapter may pattern-match on error message text.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identifier of a message inside the external channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelMessageId(pub i64);

impl std::fmt::Display for ChannelMessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The single interactive control attached to a channel message:
/// one button linking back into the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

/// Closed set of failure outcomes a transport call can produce.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel asked us to back off. Sets the shared cooldown.
    #[error("rate limited by the channel, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    /// The target message no longer exists; the stored id must be invalidated.
    #[error("message not found in the channel")]
    NotFound,
    /// The content was already current. A success for synchronization purposes.
    #[error("message content is already up to date")]
    NotModified,
    /// The target message carries no text body (photo with caption);
    /// the caller should retry the edit against the caption.
    #[error("target message has no editable text")]
    NoEditableText,
    /// Any other error the channel API reported.
    #[error("channel api error {code}: {description}")]
    Api { code: i64, description: String },
    /// Request never produced an API response (network, IO, decode).
    #[error("channel request failed: {0}")]
    Transport(String),
}

impl ChannelError {
    /// Whether spending retry budget on this failure can possibly help.
    pub fn is_transient(&self) -> bool {
        matches!(self, ChannelError::Api { .. } | ChannelError::Transport(_))
    }
}

/// Operations the sync engine needs from the external channel.
///
/// Send operations return the id of the message they created. For albums the
/// returned id is informational only: the engine records the id of the text
/// message it sends *after* the album, never the album's own id.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    async fn send_text(
        &self,
        text: &str,
        button: Option<&LinkButton>,
    ) -> Result<ChannelMessageId, ChannelError>;

    async fn send_photo(
        &self,
        photo: &Path,
        caption: &str,
        button: Option<&LinkButton>,
    ) -> Result<ChannelMessageId, ChannelError>;

    /// Send a group of images as one album unit, without caption or button.
    async fn send_album(&self, photos: &[PathBuf]) -> Result<ChannelMessageId, ChannelError>;

    async fn edit_text(
        &self,
        message_id: ChannelMessageId,
        text: &str,
        button: Option<&LinkButton>,
    ) -> Result<(), ChannelError>;

    async fn edit_caption(
        &self,
        message_id: ChannelMessageId,
        caption: &str,
        button: Option<&LinkButton>,
    ) -> Result<(), ChannelError>;
}
