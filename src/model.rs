//! This module defines the shared data structures used throughout the application.

use crate::channel::publisher::ChannelPublisher;
use sqlx::PgPool;
use std::time::Duration;

/// The central, shared state of the application.
/// An `Arc<AppState>` is handed to the scheduler and to any handler layer
/// that needs to publish or refresh lots.
pub struct AppState {
    /// The connection pool for the PostgreSQL database.
    pub db: PgPool,
    /// The sync engine wired to the live channel transport. Cheap to clone;
    /// all clones share the same cooldown gate.
    pub publisher: ChannelPublisher,
    /// Cadence of the background sync loop.
    pub sync_interval: Duration,
}
