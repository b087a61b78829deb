//! Live-feed connection with auto-reconnect.
//!
//! Owns the long-lived WebSocket to the dispatch backend and streams
//! classified events through a [`tokio::sync::broadcast`] channel.
//! On any close or transport fault the socket is torn down and exactly
//! one reconnection attempt is scheduled after a fixed delay, with no
//! backoff growth and no attempt cap. The dashboard must recover from
//! any transient network fault without operator intervention.
//!
//! # Example
//!
//! ```rust,ignore
//! use rapid_feed::{FeedHandle, RetryPolicy, feed_url};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let url = feed_url("dispatch.local", rapid_feed::FEED_PORT, false)?;
//!
//! let (handle, mut rx) = FeedHandle::connect(url, RetryPolicy::default(), cancel);
//!
//! while let Ok(event) = rx.recv().await {
//!     println!("{event:?}");
//! }
//!
//! handle.shutdown().await;
//! ```

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::classify::{CallEvent, classify};
use crate::error::Error;

// ── Endpoint ─────────────────────────────────────────────────────────

/// Fixed port the backend serves the live feed on.
pub const FEED_PORT: u16 = 8000;

/// Fixed path of the live feed endpoint.
pub const FEED_PATH: &str = "/live";

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Build the feed endpoint for a backend host.
///
/// A secure origin gets the secure streaming scheme, mirroring how the
/// dashboard derives `ws`/`wss` from the page it is served on. The port
/// is [`FEED_PORT`] in any real deployment; it is a parameter so tests
/// can point at an ephemeral local server.
pub fn feed_url(host: &str, port: u16, secure: bool) -> Result<Url, Error> {
    let scheme = if secure { "wss" } else { "ws" };
    Ok(Url::parse(&format!("{scheme}://{host}:{port}{FEED_PATH}"))?)
}

// ── FeedEvent ────────────────────────────────────────────────────────

/// Everything the feed can tell its subscribers, in arrival order.
///
/// Socket transitions and classified call events share one channel so
/// consumers see them in the exact order they occurred. A late update
/// can never appear to arrive after the close that superseded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// The socket finished its handshake. Not the user-facing
    /// "connected"; that is decided by call lifecycle events.
    SocketOpened,
    /// The socket closed, cleanly or not. A reconnect is already scheduled.
    SocketClosed,
    /// A classified call event.
    Call(CallEvent),
}

// ── RetryPolicy ──────────────────────────────────────────────────────

/// Reconnection policy: a fixed delay between attempts, retried forever.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay between a close and the next connection attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
        }
    }
}

// ── FeedHandle ───────────────────────────────────────────────────────

/// Handle to a running feed connection task.
pub struct FeedHandle {
    event_tx: broadcast::Sender<FeedEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl FeedHandle {
    /// Spawn the connection loop and return a handle plus the primary
    /// event receiver.
    ///
    /// The receiver is created before the background task starts, so it
    /// observes every event from the very first connection attempt.
    /// Returns immediately; the first attempt happens asynchronously.
    pub fn connect(
        url: Url,
        retry: RetryPolicy,
        cancel: CancellationToken,
    ) -> (Self, broadcast::Receiver<FeedEvent>) {
        let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let task_cancel = cancel.clone();
        let task_tx = event_tx.clone();
        let task = tokio::spawn(async move {
            feed_loop(url, task_tx, retry, task_cancel).await;
        });

        (
            Self {
                event_tx,
                cancel,
                task,
            },
            event_rx,
        )
    }

    /// Get an additional broadcast receiver for the event stream.
    ///
    /// Observes events sent after this call. A consumer that falls
    /// behind receives [`broadcast::error::RecvError::Lagged`].
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.event_tx.subscribe()
    }

    /// Tear down the connection: cancel any pending retry, close the
    /// socket, and wait for the background task to finish. After this
    /// returns, no further events can reach subscribers.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

// ── Background reconnection loop ─────────────────────────────────────

/// Main loop: connect → read until close → fixed delay → reconnect.
///
/// At most one retry is ever pending; cancellation wins over both the
/// open socket and the pending sleep.
async fn feed_loop(
    url: Url,
    event_tx: broadcast::Sender<FeedEvent>,
    retry: RetryPolicy,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = connect_and_read(&url, &event_tx, &cancel) => {
                match result {
                    Ok(()) => tracing::info!("feed disconnected, reconnecting"),
                    Err(e) => tracing::warn!(error = %e, "feed connection failed"),
                }

                tracing::debug!(delay_ms = retry.delay.as_millis() as u64, "waiting before reconnect");
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(retry.delay) => {}
                }
            }
        }
    }

    tracing::debug!("feed loop exiting");
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Establish one WebSocket connection and read frames until it drops.
///
/// Read errors are normalized into a close: `SocketClosed` is emitted
/// and `Ok(())` returned, so only a failed handshake surfaces as `Err`.
/// Cancellation returns without emitting; the owner resets state itself.
async fn connect_and_read(
    url: &Url,
    event_tx: &broadcast::Sender<FeedEvent>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "connecting to live feed");

    let uri: tungstenite::http::Uri = url
        .as_str()
        .parse()
        .map_err(|e: tungstenite::http::uri::InvalidUri| Error::Connect(e.to_string()))?;

    let (ws_stream, _response) = tokio_tungstenite::connect_async(uri)
        .await
        .map_err(|e| Error::Connect(e.to_string()))?;

    tracing::info!("live feed connected");
    let _ = event_tx.send(FeedEvent::SocketOpened);

    let (_write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        if let Some(event) = classify(&text) {
                            // Send errors just mean no subscribers right now
                            let _ = event_tx.send(FeedEvent::Call(event));
                        }
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite answers pongs automatically
                        tracing::trace!("feed ping");
                    }
                    Some(Ok(tungstenite::Message::Close(close_frame))) => {
                        if let Some(ref cf) = close_frame {
                            tracing::info!(code = %cf.code, reason = %cf.reason, "feed close frame received");
                        } else {
                            tracing::info!("feed close frame received (no payload)");
                        }
                        let _ = event_tx.send(FeedEvent::SocketClosed);
                        return Ok(());
                    }
                    Some(Err(e)) => {
                        // Transport error mid-stream: normalized into a close
                        tracing::debug!(error = %e, "feed read error, treating as close");
                        let _ = event_tx.send(FeedEvent::SocketClosed);
                        return Ok(());
                    }
                    None => {
                        tracing::info!("feed stream ended");
                        let _ = event_tx.send(FeedEvent::SocketClosed);
                        return Ok(());
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
