//! Long-running background services built on top of the channel publisher.

pub mod scheduler;
