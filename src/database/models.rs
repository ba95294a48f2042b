//! Contains all the data structures that map to database tables or query results.

use sqlx::Type;
use sqlx::types::chrono::{DateTime, Utc};

/// Lifecycle status of a lot. Only `Active` lots are eligible for publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type)]
#[sqlx(type_name = "lot_status", rename_all = "snake_case")]
pub enum LotStatus {
    Draft,
    PendingApproval,
    Active,
    Sold,
    Cancelled,
}

/// A sellable item being auctioned. The engine reads every field and writes
/// exactly one: `channel_message_id`, the lot's publication record.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Lot {
    pub lot_id: i64,
    pub title: String,
    pub description: String,
    pub starting_price: f64,
    pub current_price: f64,
    pub min_bid_increment: f64,
    pub seller_id: i64,
    pub status: LotStatus,
    /// Optional human-readable pickup location.
    pub location: Option<String>,
    /// Optional public link to the seller's profile or storefront.
    pub seller_link: Option<String>,
    /// JSON array of image file paths, as stored by the lot creation flow.
    pub images: Option<String>,
    /// None means "starts immediately".
    pub start_time: Option<DateTime<Utc>>,
    /// None means "no fixed end".
    pub end_time: Option<DateTime<Utc>>,
    /// Id of the live channel message for this lot; None means unpublished
    /// (or the previous message is gone and a republish is required).
    pub channel_message_id: Option<i64>,
}

impl Lot {
    /// A lot counts as open while it is `Active` and its end time has not passed.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == LotStatus::Active && self.end_time.is_some_and(|end| end > now)
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Seller {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
}

/// Snapshot of the current top bid on a lot, already masked for public display.
/// Valid only at the moment it was resolved; the composer treats it as opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderInfo {
    pub display_name: String,
    pub amount: f64,
}
