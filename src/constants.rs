// Central constants for publication retries, scheduling, and formatting.

/// Total attempts a single publish operation may spend on transient failures.
pub const PUBLISH_MAX_ATTEMPTS: u32 = 3;
/// Fixed pause between publish attempts, in seconds.
pub const PUBLISH_RETRY_DELAY_SECS: u64 = 2;
/// Fallback cooldown when the channel rate-limits us without a retry_after hint.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 30;
/// Default cadence of the background sync loop, overridable via SYNC_INTERVAL_SECS.
pub const SYNC_INTERVAL_SECS: u64 = 60;

// Thresholds for the "is this price change worth an immediate channel edit" gate.
pub const PRICE_UPDATE_MIN_PERCENT: f64 = 10.0;
pub const PRICE_UPDATE_MIN_ABSOLUTE: f64 = 1000.0;

/// Currency suffix rendered after every amount in channel messages.
pub const CURRENCY: &str = "₽";
/// Timestamp format used in channel messages.
pub const MESSAGE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";
