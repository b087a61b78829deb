// ── Call watcher ──
//
// Lifecycle facade tying the feed connection to the state store.
// `start` spawns the feed and a fold task; `stop` guarantees teardown:
// pending retry cancelled, socket closed, tasks joined, state reset.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use rapid_feed::{FeedEvent, FeedHandle, feed_url};

use crate::config::FeedConfig;
use crate::error::CoreError;
use crate::store::{CallState, CallStateStore};
use crate::stream::StateStream;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. Owns the feed connection lifecycle and
/// the fold task bridging feed events into the [`CallStateStore`].
#[derive(Clone)]
pub struct CallWatcher {
    inner: Arc<WatcherInner>,
}

struct WatcherInner {
    config: FeedConfig,
    store: Arc<CallStateStore>,
    // Lock order everywhere: feed → cancel → tasks.
    feed: Mutex<Option<FeedHandle>>,
    cancel: Mutex<Option<CancellationToken>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl CallWatcher {
    /// Create a watcher from configuration. Does NOT connect -- call
    /// [`start()`](Self::start) to begin streaming.
    pub fn new(config: FeedConfig) -> Self {
        Self {
            inner: Arc::new(WatcherInner {
                config,
                store: Arc::new(CallStateStore::new()),
                feed: Mutex::new(None),
                cancel: Mutex::new(None),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Begin connecting. Idempotent while running: a second `start`
    /// does nothing, so exactly one connection attempt or open socket
    /// exists at any time.
    pub async fn start(&self) -> Result<(), CoreError> {
        let mut feed_guard = self.inner.feed.lock().await;
        if feed_guard.is_some() {
            debug!("watcher already running, ignoring start");
            return Ok(());
        }

        let config = &self.inner.config;
        let url = feed_url(&config.host, config.port, config.secure)?;

        let cancel = CancellationToken::new();
        let (handle, events) = FeedHandle::connect(url, config.retry.clone(), cancel.clone());
        *feed_guard = Some(handle);
        *self.inner.cancel.lock().await = Some(cancel.clone());

        let store = Arc::clone(&self.inner.store);
        self.inner
            .tasks
            .lock()
            .await
            .push(tokio::spawn(fold_task(store, events, cancel)));

        info!(host = %config.host, "call watcher started");
        Ok(())
    }

    /// Scoped teardown. On every exit path the socket is closed, any
    /// pending retry is cancelled, background tasks are joined, and
    /// the state triple is reset to its initial values. A late frame
    /// can never mutate state after `stop` returns. Idempotent.
    pub async fn stop(&self) {
        let feed = self.inner.feed.lock().await.take();
        let cancel = self.inner.cancel.lock().await.take();

        if let Some(cancel) = cancel {
            cancel.cancel();
        }
        if let Some(feed) = feed {
            feed.shutdown().await;
        }

        let mut tasks = self.inner.tasks.lock().await;
        for task in tasks.drain(..) {
            let _ = task.await;
        }

        self.inner.store.reset();
        debug!("call watcher stopped");
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe with snapshot + change notification.
    pub fn state(&self) -> StateStream {
        self.inner.store.subscribe()
    }

    /// Raw watch receiver, for `select!`-style consumers.
    pub fn watch(&self) -> watch::Receiver<CallState> {
        self.inner.store.watch()
    }

    /// Point-in-time copy of the current state.
    pub fn snapshot(&self) -> CallState {
        self.inner.store.snapshot()
    }
}

// ── Background fold task ─────────────────────────────────────────

/// Drain the feed broadcast into the store, strictly in arrival order.
async fn fold_task(
    store: Arc<CallStateStore>,
    mut events: broadcast::Receiver<FeedEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = events.recv() => {
                match event {
                    Ok(event) => store.fold(&event),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "state fold lagged behind the feed");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
    debug!("fold task exiting");
}
