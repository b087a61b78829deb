// ── Runtime feed configuration ──
//
// Describes *where* the live feed lives. Built by the consuming binary
// and handed to `CallWatcher` -- core never reads config files.

use rapid_feed::{FEED_PORT, RetryPolicy};

/// Configuration for watching one dispatch backend.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Backend hostname or address, without scheme or port.
    pub host: String,
    /// Backend port. [`FEED_PORT`] everywhere but tests.
    pub port: u16,
    /// Use the secure streaming scheme (`wss`). Follows the security
    /// context the dashboard itself is served from.
    pub secure: bool,
    /// Reconnection policy for the underlying socket.
    pub retry: RetryPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: FEED_PORT,
            secure: false,
            retry: RetryPolicy::default(),
        }
    }
}
