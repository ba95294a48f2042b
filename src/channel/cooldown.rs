//! Process-wide rate-limit state for one channel identity.
//!
//! A single `cooldown_until` instant gates every send and edit against the
//! channel, across all lots. It is injected into the publisher rather than
//! living as a module global, and is only touched through these two methods
//! so concurrent writers cannot shorten a cooldown the server asked for.

use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct Cooldown {
    until: RwLock<Option<Instant>>,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before transport calls are allowed again, or `None` when clear.
    /// Never blocks waiting for the cooldown to pass.
    pub async fn remaining(&self) -> Option<Duration> {
        let until = (*self.until.read().await)?;
        let now = Instant::now();
        if until > now { Some(until - now) } else { None }
    }

    /// Record a rate-limit signal from the channel. The most recent signal
    /// wins: any earlier value is overwritten, even a longer one.
    pub async fn record(&self, retry_after: Duration) {
        let mut until = self.until.write().await;
        *until = Some(Instant::now() + retry_after);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_clear() {
        let gate = Cooldown::new();
        assert!(gate.remaining().await.is_none());
    }

    #[tokio::test]
    async fn record_sets_remaining_and_expires() {
        let gate = Cooldown::new();
        gate.record(Duration::from_millis(50)).await;
        let left = gate.remaining().await.expect("cooldown should be active");
        assert!(left <= Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(gate.remaining().await.is_none());
    }

    #[tokio::test]
    async fn most_recent_signal_wins() {
        let gate = Cooldown::new();
        gate.record(Duration::from_secs(3600)).await;
        gate.record(Duration::from_millis(10)).await;
        let left = gate.remaining().await.expect("cooldown should be active");
        assert!(left <= Duration::from_millis(10));
    }
}
