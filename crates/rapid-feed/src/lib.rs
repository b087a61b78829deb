// rapid-feed: WebSocket live-feed client for the RAPID-100 dispatch backend

pub mod classify;
pub mod error;
pub mod feed;

pub use classify::{CallEvent, IncidentUpdate, classify};
pub use error::Error;
pub use feed::{FEED_PATH, FEED_PORT, FeedEvent, FeedHandle, RetryPolicy, feed_url};
