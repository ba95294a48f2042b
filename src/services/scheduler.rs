//! Periodic lot synchronization: publishes lots whose start time has arrived
//! and refreshes the channel messages of lots that are already live.
//!
//! Each tick fans the work out as one task per lot, so different lots sync in
//! parallel while publish/refresh for a single lot stays serialized. A lot's
//! failure is logged and confined to that lot; the loop itself never stops.

use crate::channel::publisher::SyncError;
use crate::constants::{PRICE_UPDATE_MIN_ABSOLUTE, PRICE_UPDATE_MIN_PERCENT};
use crate::database::lots;
use crate::model::AppState;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Run the sync loop forever. Intended to be the main task of the process.
pub async fn run(state: Arc<AppState>) {
    let mut ticker = tokio::time::interval(state.sync_interval);
    info!(
        target: "services.scheduler",
        interval_secs = state.sync_interval.as_secs(),
        "lot scheduler started"
    );
    loop {
        ticker.tick().await;
        tick(&state).await;
    }
}

/// One pass over the database: publish what is due, refresh what is live.
pub async fn tick(state: &AppState) {
    match lots::lots_due_for_publication(&state.db, Utc::now()).await {
        Ok(due) => {
            let mut tasks = JoinSet::new();
            for lot in due {
                let publisher = state.publisher.clone();
                tasks.spawn(async move { (lot.lot_id, publisher.publish(lot.lot_id).await) });
            }
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((lot_id, Ok(message_id))) => {
                        info!(target: "services.scheduler", lot_id, message_id = message_id.0, "published due lot");
                    }
                    Ok((lot_id, Err(err))) => log_sync_failure("publish", lot_id, &err),
                    Err(join_err) => {
                        error!(target: "services.scheduler", error = %join_err, "publish task panicked")
                    }
                }
            }
        }
        Err(err) => {
            error!(target: "services.scheduler", error = %err, "failed to query lots due for publication")
        }
    }

    match lots::published_active_lots(&state.db).await {
        Ok(live) => {
            let mut tasks = JoinSet::new();
            for lot in live {
                let publisher = state.publisher.clone();
                tasks.spawn(async move { (lot.lot_id, publisher.refresh(lot.lot_id).await) });
            }
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((_, Ok(()))) => {}
                    Ok((lot_id, Err(err))) => log_sync_failure("refresh", lot_id, &err),
                    Err(join_err) => {
                        error!(target: "services.scheduler", error = %join_err, "refresh task panicked")
                    }
                }
            }
        }
        Err(err) => {
            error!(target: "services.scheduler", error = %err, "failed to query published lots")
        }
    }
}

fn log_sync_failure(operation: &str, lot_id: i64, err: &SyncError) {
    match err {
        // Expected, self-healing outcomes: next tick takes care of them.
        SyncError::RateLimited { retry_after_secs } => {
            warn!(target: "services.scheduler", operation, lot_id, retry_after_secs, "channel cooling down");
        }
        SyncError::MessageGone(_) => {
            warn!(target: "services.scheduler", operation, lot_id, "message gone, lot will republish");
        }
        other => {
            error!(target: "services.scheduler", operation, lot_id, error = %other, "lot sync failed");
        }
    }
}

/// Whether a price move is significant enough to warrant an immediate channel
/// edit outside the regular cadence: a rise of at least 10% or at least 1000
/// currency units. Price drops never trigger an edit.
pub fn should_update_channel(old_price: f64, new_price: f64) -> bool {
    let change = new_price - old_price;
    let change_percent = if old_price > 0.0 {
        change / old_price * 100.0
    } else {
        0.0
    };
    change_percent >= PRICE_UPDATE_MIN_PERCENT || change >= PRICE_UPDATE_MIN_ABSOLUTE
}
