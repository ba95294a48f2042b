//! Contains all database functions related to lots and their publication record.
//! The publication record is the lot's own nullable `channel_message_id` column;
//! every mutation of it is a single-statement atomic update.

use super::models::{Lot, Seller};
use crate::channel::publisher::LotStore;
use crate::channel::transport::ChannelMessageId;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::chrono::{DateTime, Utc};

const LOT_COLUMNS: &str = "lot_id, title, description, starting_price, current_price, \
     min_bid_increment, seller_id, status, location, seller_link, images, \
     start_time, end_time, channel_message_id";

/// Fetch a single lot by id.
pub async fn get_lot(pool: &PgPool, lot_id: i64) -> Result<Option<Lot>, sqlx::Error> {
    sqlx::query_as::<_, Lot>(&format!(
        "SELECT {LOT_COLUMNS} FROM lots WHERE lot_id = $1"
    ))
    .bind(lot_id)
    .fetch_optional(pool)
    .await
}

/// Fetch the seller fields the composer needs.
pub async fn get_seller(pool: &PgPool, user_id: i64) -> Result<Option<Seller>, sqlx::Error> {
    sqlx::query_as::<_, Seller>(
        "SELECT user_id, username, first_name FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Record the channel message id after a successful publish.
pub async fn record_channel_message_id(
    pool: &PgPool,
    lot_id: i64,
    message_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE lots SET channel_message_id = $2 WHERE lot_id = $1")
        .bind(lot_id)
        .bind(message_id)
        .execute(pool)
        .await
        .map(|_| ())
}

/// Clear the channel message id once the channel reports the message gone.
/// The lot is back to "unpublished" and the next sync cycle republishes it.
pub async fn clear_channel_message_id(pool: &PgPool, lot_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE lots SET channel_message_id = NULL WHERE lot_id = $1")
        .bind(lot_id)
        .execute(pool)
        .await
        .map(|_| ())
}

/// Active lots whose start time has arrived (or was never set) and which have
/// no live channel message yet.
pub async fn lots_due_for_publication(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<Vec<Lot>, sqlx::Error> {
    sqlx::query_as::<_, Lot>(&format!(
        "SELECT {LOT_COLUMNS} FROM lots \
         WHERE status = 'active' AND channel_message_id IS NULL \
         AND (start_time IS NULL OR start_time <= $1) \
         ORDER BY lot_id"
    ))
    .bind(now)
    .fetch_all(pool)
    .await
}

/// Active lots that already have a live channel message and may need a refresh.
pub async fn published_active_lots(pool: &PgPool) -> Result<Vec<Lot>, sqlx::Error> {
    sqlx::query_as::<_, Lot>(&format!(
        "SELECT {LOT_COLUMNS} FROM lots \
         WHERE status = 'active' AND channel_message_id IS NOT NULL \
         ORDER BY lot_id"
    ))
    .fetch_all(pool)
    .await
}

/// Postgres-backed implementation of the publisher's lot/seller seam.
#[derive(Clone)]
pub struct PgLotStore {
    pool: PgPool,
}

impl PgLotStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LotStore for PgLotStore {
    async fn fetch_lot(&self, lot_id: i64) -> Result<Option<Lot>, sqlx::Error> {
        get_lot(&self.pool, lot_id).await
    }

    async fn fetch_seller(&self, seller_id: i64) -> Result<Option<Seller>, sqlx::Error> {
        get_seller(&self.pool, seller_id).await
    }

    async fn record_message_id(
        &self,
        lot_id: i64,
        message_id: ChannelMessageId,
    ) -> Result<(), sqlx::Error> {
        record_channel_message_id(&self.pool, lot_id, message_id.0).await
    }

    async fn clear_message_id(&self, lot_id: i64) -> Result<(), sqlx::Error> {
        clear_channel_message_id(&self.pool, lot_id).await
    }
}
