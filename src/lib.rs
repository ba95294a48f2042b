// Library entry so integration tests and external tools can reference internal modules.
// Re-export the same modules used by the binary (`main.rs`).
pub mod channel;
pub mod constants;
pub mod database;
pub mod model;
pub mod services;
pub mod util;

// Convenient re-exports for frequently used types.
pub use model::AppState;
