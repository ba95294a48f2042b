//! Contains all database functions related to bids: the current-leader
//! snapshot rendered into channel messages, and the public bid counter.

use super::models::LeaderInfo;
use crate::channel::publisher::LeaderResolver;
use crate::util::{mask_first_name, mask_username};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct TopBidRow {
    amount: f64,
    username: Option<String>,
    first_name: Option<String>,
}

/// Resolve the current leading bid for a lot: the highest amount, newest bid
/// winning ties. Returns the bidder already masked for public display.
pub async fn get_current_leader(
    pool: &PgPool,
    lot_id: i64,
) -> Result<Option<LeaderInfo>, sqlx::Error> {
    let row = sqlx::query_as::<_, TopBidRow>(
        "SELECT b.amount, u.username, u.first_name \
         FROM bids b LEFT JOIN users u ON u.user_id = b.bidder_id \
         WHERE b.lot_id = $1 \
         ORDER BY b.amount DESC, b.created_at DESC \
         LIMIT 1",
    )
    .bind(lot_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|top| {
        // Prefer the username; fall back to a masked first name; an
        // anonymous bidder still shows up, just without a name.
        let display_name = match (top.username.as_deref(), top.first_name.as_deref()) {
            (Some(username), _) if !username.is_empty() => mask_username(username),
            (_, Some(first_name)) if !first_name.is_empty() => mask_first_name(first_name),
            _ => "—".to_string(),
        };
        LeaderInfo {
            display_name,
            amount: top.amount,
        }
    }))
}

/// Number of bids placed on a lot, shown in the channel message.
pub async fn count_bids(pool: &PgPool, lot_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bids WHERE lot_id = $1")
        .bind(lot_id)
        .fetch_one(pool)
        .await
}

/// Postgres-backed implementation of the publisher's leader-resolver seam.
#[derive(Clone)]
pub struct PgLeaderResolver {
    pool: PgPool,
}

impl PgLeaderResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderResolver for PgLeaderResolver {
    async fn current_leader(&self, lot_id: i64) -> Result<Option<LeaderInfo>, sqlx::Error> {
        get_current_leader(&self.pool, lot_id).await
    }

    async fn bid_count(&self, lot_id: i64) -> Result<i64, sqlx::Error> {
        count_bids(&self.pool, lot_id).await
    }
}
