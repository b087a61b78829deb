// rapid-core: Call state model and reactive store between rapid-feed
// and consumers (the TUI dashboard).

pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;
pub mod watcher;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::FeedConfig;
pub use error::CoreError;
pub use model::{CallPhase, IncidentKind, IncidentRecord, Severity};
pub use store::{CallState, CallStateStore};
pub use stream::StateStream;
pub use watcher::CallWatcher;

// Re-export the feed layer's public surface consumers need.
pub use rapid_feed::{FEED_PORT, RetryPolicy};
