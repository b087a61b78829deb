// ── Call state store ──
//
// The single owner of the dashboard's state triple. All transitions go
// through the pure fold in `CallState::apply`; the store wraps it with
// a `watch` channel so every applied event publishes a fresh snapshot
// to subscribers.

use tokio::sync::watch;

use rapid_feed::{CallEvent, FeedEvent};

use crate::model::{CallPhase, EventTime, IncidentRecord};
use crate::stream::StateStream;

/// The state triple consumers render from, plus staleness metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallState {
    /// User-facing "connected": a call is in progress. Deliberately not
    /// the socket-open flag -- socket connectivity is a transport
    /// concern the operator only sees through staleness of data.
    pub connected: bool,
    pub phase: CallPhase,
    /// Present iff the phase is `Active` and a valid update has been
    /// folded since the last `call_started`.
    pub record: Option<IncidentRecord>,
    /// When the last accepted call event was folded.
    pub last_event_at: Option<EventTime>,
}

impl CallState {
    /// Pure fold: returns the state after applying one feed event.
    ///
    /// Transition table:
    ///
    /// | phase       | event        | phase'   | record                      |
    /// |-------------|--------------|----------|-----------------------------|
    /// | any         | Started      | Active   | cleared                     |
    /// | any         | Ended        | Ended    | cleared                     |
    /// | Active      | Update       | Active   | replaced (or rejected)      |
    /// | Idle/Ended  | Update       | same     | ignored                     |
    /// | any         | SocketClosed | Idle     | cleared (full reset)        |
    /// | any         | SocketOpened | same     | unchanged                   |
    pub fn apply(&self, event: &FeedEvent) -> CallState {
        match event {
            // Socket-open is not "connected" -- the call lifecycle
            // events downstream decide the user-facing status.
            FeedEvent::SocketOpened => self.clone(),

            // A disconnect resets the whole triple; whatever was on
            // display belongs to a feed we no longer trust.
            FeedEvent::SocketClosed => CallState::default(),

            FeedEvent::Call(CallEvent::Started) => CallState {
                connected: true,
                phase: CallPhase::Active,
                record: None,
                last_event_at: Some(chrono::Utc::now()),
            },

            FeedEvent::Call(CallEvent::Ended) => CallState {
                connected: false,
                phase: CallPhase::Ended,
                record: None,
                last_event_at: Some(chrono::Utc::now()),
            },

            FeedEvent::Call(CallEvent::Update(update)) => {
                if self.phase != CallPhase::Active {
                    // Updates outside an active call must not
                    // resurrect a record.
                    tracing::debug!("ignoring update outside an active call");
                    return self.clone();
                }

                match IncidentRecord::from_update(update) {
                    Some(record) => CallState {
                        record: Some(record),
                        last_event_at: Some(chrono::Utc::now()),
                        ..self.clone()
                    },
                    None => {
                        // Invalid severity: reject the update wholesale,
                        // keep the previous record on display.
                        tracing::warn!(
                            severity = update.severity.as_deref().unwrap_or("<absent>"),
                            "rejecting update with invalid severity"
                        );
                        self.clone()
                    }
                }
            }
        }
    }
}

/// Reactive wrapper around the fold. The store exclusively owns the
/// state; everyone else reads through a subscription.
pub struct CallStateStore {
    state: watch::Sender<CallState>,
}

impl CallStateStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CallState::default());
        Self { state }
    }

    /// Fold one event into the current state and publish the result.
    /// Applied atomically per event -- subscribers never observe a
    /// half-applied transition.
    pub fn fold(&self, event: &FeedEvent) {
        self.state.send_modify(|state| *state = state.apply(event));
    }

    /// Reset to the initial triple (teardown path).
    pub fn reset(&self) {
        self.state.send_replace(CallState::default());
    }

    /// Point-in-time copy of the current state.
    pub fn snapshot(&self) -> CallState {
        self.state.borrow().clone()
    }

    /// Subscribe with snapshot + change notification.
    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.state.subscribe())
    }

    /// Raw watch receiver, for `select!`-style consumers.
    pub fn watch(&self) -> watch::Receiver<CallState> {
        self.state.subscribe()
    }
}

impl Default for CallStateStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
