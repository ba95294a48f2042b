//! The sync engine: publishes lots into the channel and keeps the published
//! messages aligned with live auction state.
//!
//! Per lot the engine walks a small state machine expressed through the
//! nullable channel message id: unpublished (None) -> published (Some) ->
//! invalidated (cleared again once the channel reports the message gone).
//! Publish and refresh for the *same* lot must not run concurrently; the
//! scheduler guarantees one task per lot per tick.

use crate::channel::compose::{channel_button, compose_lot_message};
use crate::channel::cooldown::Cooldown;
use crate::channel::media::{self, ResolvedMedia};
use crate::channel::transport::{ChannelError, ChannelMessageId, ChannelTransport, LinkButton};
use crate::constants::{PUBLISH_MAX_ATTEMPTS, PUBLISH_RETRY_DELAY_SECS};
use crate::database::models::{LeaderInfo, Lot, Seller};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Durable lot access the engine needs: load lot and seller, and the
/// atomic get/set/clear of the lot's publication record.
#[async_trait]
pub trait LotStore: Send + Sync {
    async fn fetch_lot(&self, lot_id: i64) -> Result<Option<Lot>, sqlx::Error>;
    async fn fetch_seller(&self, seller_id: i64) -> Result<Option<Seller>, sqlx::Error>;
    async fn record_message_id(
        &self,
        lot_id: i64,
        message_id: ChannelMessageId,
    ) -> Result<(), sqlx::Error>;
    async fn clear_message_id(&self, lot_id: i64) -> Result<(), sqlx::Error>;
}

/// Supplies the current-leader snapshot and public bid count for a lot.
/// The freshness policy (which bids still count) belongs to the resolver.
#[async_trait]
pub trait LeaderResolver: Send + Sync {
    async fn current_leader(&self, lot_id: i64) -> Result<Option<LeaderInfo>, sqlx::Error>;
    async fn bid_count(&self, lot_id: i64) -> Result<i64, sqlx::Error>;
}

/// Failure taxonomy of a single publish/refresh operation. None of these are
/// process-fatal: a failure is confined to one lot's sync cycle.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("lot {0} not found")]
    LotNotFound(i64),
    #[error("seller {seller_id} for lot {lot_id} not found")]
    SellerNotFound { lot_id: i64, seller_id: i64 },
    #[error("lot {0} already has a live channel message")]
    AlreadyPublished(i64),
    #[error("lot {0} has no channel message to refresh")]
    NotPublished(i64),
    #[error("channel is cooling down, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("channel message for lot {0} is gone, publication record cleared")]
    MessageGone(i64),
    #[error("publish of lot {lot_id} gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        lot_id: i64,
        attempts: u32,
        last: ChannelError,
    },
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Orchestrates publish and refresh against one channel identity.
#[derive(Clone)]
pub struct ChannelPublisher {
    transport: Arc<dyn ChannelTransport>,
    store: Arc<dyn LotStore>,
    leaders: Arc<dyn LeaderResolver>,
    cooldown: Arc<Cooldown>,
    bot_username: Option<String>,
}

impl ChannelPublisher {
    pub fn new(
        transport: Arc<dyn ChannelTransport>,
        store: Arc<dyn LotStore>,
        leaders: Arc<dyn LeaderResolver>,
        cooldown: Arc<Cooldown>,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            transport,
            store,
            leaders,
            cooldown,
            bot_username,
        }
    }

    /// Publish a lot that has no live channel message yet.
    ///
    /// Transient channel failures are retried up to
    /// [`PUBLISH_MAX_ATTEMPTS`] total attempts with a fixed delay. A rate
    /// limit records the shared cooldown and fails immediately without
    /// consuming retry budget. On success the new message id is recorded.
    pub async fn publish(&self, lot_id: i64) -> Result<ChannelMessageId, SyncError> {
        let lot = self
            .store
            .fetch_lot(lot_id)
            .await?
            .ok_or(SyncError::LotNotFound(lot_id))?;
        if lot.channel_message_id.is_some() {
            return Err(SyncError::AlreadyPublished(lot_id));
        }

        let (text, button) = self.compose_for(&lot).await?;
        let resolved = media::resolve_media(&media::listed_images(lot.images.as_deref()));

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.ensure_not_cooling().await?;

            match self.send(&resolved, &text, button.as_ref()).await {
                Ok(message_id) => {
                    self.store.record_message_id(lot_id, message_id).await?;
                    info!(
                        target: "channel.publisher",
                        lot_id,
                        message_id = message_id.0,
                        "lot published"
                    );
                    return Ok(message_id);
                }
                Err(ChannelError::RateLimited { retry_after_secs }) => {
                    self.cooldown
                        .record(Duration::from_secs(retry_after_secs))
                        .await;
                    warn!(target: "channel.publisher", lot_id, retry_after_secs, "publish rate limited");
                    return Err(SyncError::RateLimited { retry_after_secs });
                }
                Err(err) if err.is_transient() && attempt < PUBLISH_MAX_ATTEMPTS => {
                    warn!(
                        target: "channel.publisher",
                        lot_id,
                        attempt,
                        error = %err,
                        "publish attempt failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_secs(PUBLISH_RETRY_DELAY_SECS)).await;
                }
                Err(err) if err.is_transient() => {
                    error!(target: "channel.publisher", lot_id, attempt, error = %err, "publish gave up");
                    return Err(SyncError::RetriesExhausted {
                        lot_id,
                        attempts: attempt,
                        last: err,
                    });
                }
                Err(err) => {
                    error!(target: "channel.publisher", lot_id, error = %err, "publish failed");
                    return Err(SyncError::Channel(err));
                }
            }
        }
    }

    /// Re-render a published lot and edit its channel message in place.
    ///
    /// `NotModified` counts as success. `NotFound` clears the publication
    /// record so the next sync cycle republishes. Refresh never retries
    /// internally; it relies on the scheduler's cadence.
    pub async fn refresh(&self, lot_id: i64) -> Result<(), SyncError> {
        let lot = self
            .store
            .fetch_lot(lot_id)
            .await?
            .ok_or(SyncError::LotNotFound(lot_id))?;
        let Some(raw_id) = lot.channel_message_id else {
            return Err(SyncError::NotPublished(lot_id));
        };
        let message_id = ChannelMessageId(raw_id);

        let (text, button) = self.compose_for(&lot).await?;
        self.ensure_not_cooling().await?;

        let first = self
            .transport
            .edit_text(message_id, &text, button.as_ref())
            .await;
        let outcome = match first {
            // Photo-with-caption message: retry identical content as caption.
            Err(ChannelError::NoEditableText) => {
                self.transport
                    .edit_caption(message_id, &text, button.as_ref())
                    .await
            }
            other => other,
        };

        match outcome {
            Ok(()) => {
                debug!(target: "channel.publisher", lot_id, message_id = message_id.0, "lot message refreshed");
                Ok(())
            }
            Err(ChannelError::NotModified) => {
                debug!(target: "channel.publisher", lot_id, "lot message already current");
                Ok(())
            }
            Err(ChannelError::NotFound) => {
                self.store.clear_message_id(lot_id).await?;
                warn!(
                    target: "channel.publisher",
                    lot_id,
                    message_id = message_id.0,
                    "channel message gone, publication record cleared"
                );
                Err(SyncError::MessageGone(lot_id))
            }
            Err(ChannelError::RateLimited { retry_after_secs }) => {
                self.cooldown
                    .record(Duration::from_secs(retry_after_secs))
                    .await;
                warn!(target: "channel.publisher", lot_id, retry_after_secs, "refresh rate limited");
                Err(SyncError::RateLimited { retry_after_secs })
            }
            Err(err) => {
                error!(target: "channel.publisher", lot_id, error = %err, "refresh failed");
                Err(SyncError::Channel(err))
            }
        }
    }

    async fn compose_for(&self, lot: &Lot) -> Result<(String, Option<LinkButton>), SyncError> {
        let seller = self
            .store
            .fetch_seller(lot.seller_id)
            .await?
            .ok_or(SyncError::SellerNotFound {
                lot_id: lot.lot_id,
                seller_id: lot.seller_id,
            })?;
        let leader = self.leaders.current_leader(lot.lot_id).await?;
        let bid_count = self.leaders.bid_count(lot.lot_id).await?;
        let text = compose_lot_message(lot, &seller, leader.as_ref(), bid_count, Utc::now());
        let button = channel_button(lot.lot_id, self.bot_username.as_deref());
        Ok((text, button))
    }

    /// Fail fast with `RateLimited` while the shared cooldown is active.
    async fn ensure_not_cooling(&self) -> Result<(), SyncError> {
        if let Some(left) = self.cooldown.remaining().await {
            return Err(SyncError::RateLimited {
                retry_after_secs: left.as_secs().max(1),
            });
        }
        Ok(())
    }

    /// One publication attempt down the path the resolved media dictates.
    /// For an album the id of record is the follow-up text message's id.
    async fn send(
        &self,
        resolved: &ResolvedMedia,
        text: &str,
        button: Option<&LinkButton>,
    ) -> Result<ChannelMessageId, ChannelError> {
        match resolved {
            ResolvedMedia::None => self.transport.send_text(text, button).await,
            ResolvedMedia::Single(path) => self.transport.send_photo(path, text, button).await,
            ResolvedMedia::Album(paths) => {
                self.transport.send_album(paths).await?;
                self.transport.send_text(text, button).await
            }
        }
    }
}
