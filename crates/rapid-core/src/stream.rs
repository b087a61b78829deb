// ── Reactive state stream ──
//
// Subscription type for consuming call-state changes from the store.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::CallState;

/// A subscription to the call state.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via `changed()` or by converting to a `Stream`.
pub struct StateStream {
    current: CallState,
    receiver: watch::Receiver<CallState>,
}

impl StateStream {
    pub(crate) fn new(receiver: watch::Receiver<CallState>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or last `changed()` call.
    pub fn current(&self) -> &CallState {
        &self.current
    }

    /// The latest snapshot (may have changed since `current`).
    pub fn latest(&self) -> CallState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<CallState> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> WatchStream<CallState> {
        WatchStream::new(self.receiver)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
