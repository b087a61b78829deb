//! End-to-end tests: a scripted in-process feed server driving the
//! watcher, observed through the state watch channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;

use rapid_core::{
    CallPhase, CallState, CallWatcher, FeedConfig, IncidentKind, RetryPolicy, Severity,
};

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Spawn a one-connection feed server that forwards scripted frames.
/// Returns the port it listens on.
async fn spawn_server(mut frames: mpsc::UnboundedReceiver<String>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(frame) = frames.recv().await {
            if ws.send(Message::text(frame)).await.is_err() {
                break;
            }
        }
    });

    port
}

fn test_config(port: u16) -> FeedConfig {
    FeedConfig {
        host: "127.0.0.1".into(),
        port,
        secure: false,
        retry: RetryPolicy {
            delay: Duration::from_millis(100),
        },
    }
}

/// Wait until the observed state satisfies the predicate.
async fn wait_for(
    rx: &mut watch::Receiver<CallState>,
    predicate: impl FnMut(&CallState) -> bool,
) -> CallState {
    tokio::time::timeout(WAIT_TIMEOUT, rx.wait_for(predicate))
        .await
        .expect("timed out waiting for state")
        .expect("state channel closed")
        .clone()
}

#[tokio::test(flavor = "multi_thread")]
async fn full_call_scenario() {
    let (frames, frames_rx) = mpsc::unbounded_channel();
    let port = spawn_server(frames_rx).await;

    let watcher = CallWatcher::new(test_config(port));
    let mut rx = watcher.watch();
    watcher.start().await.unwrap();

    // Call picked up: status flips, transcript area still waiting.
    frames.send(r#"{"event":"call_started"}"#.into()).unwrap();
    let state = wait_for(&mut rx, |s| s.connected).await;
    assert_eq!(state.phase, CallPhase::Active);
    assert_eq!(state.record, None);

    // First full snapshot arrives.
    frames
        .send(
            r#"{"transcript":"hello","type":"fire","severity":"high","risks":["gas leak"]}"#
                .into(),
        )
        .unwrap();
    let state = wait_for(&mut rx, |s| s.record.is_some()).await;
    let record = state.record.expect("record");
    assert_eq!(record.transcript, "hello");
    assert_eq!(record.kind, IncidentKind::Fire);
    assert_eq!(record.severity, Severity::High);
    assert_eq!(record.risks, vec!["gas leak"]);

    // Call ends: everything resets to placeholders.
    frames.send(r#"{"event":"call_ended"}"#.into()).unwrap();
    let state = wait_for(&mut rx, |s| !s.connected).await;
    assert_eq!(state.phase, CallPhase::Ended);
    assert_eq!(state.record, None);

    watcher.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn update_before_call_started_is_ignored() {
    let (frames, frames_rx) = mpsc::unbounded_channel();
    let port = spawn_server(frames_rx).await;

    let watcher = CallWatcher::new(test_config(port));
    let mut rx = watcher.watch();
    watcher.start().await.unwrap();

    // An update while idle must not resurrect a record. The fold runs
    // strictly in arrival order, so once we observe the Active phase
    // the earlier update has already been (not) applied.
    frames
        .send(r#"{"transcript":"ghost","severity":"high"}"#.into())
        .unwrap();
    frames.send(r#"{"event":"call_started"}"#.into()).unwrap();

    let state = wait_for(&mut rx, |s| s.phase == CallPhase::Active).await;
    assert_eq!(state.record, None);

    watcher.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_resets_state_and_is_idempotent() {
    let (frames, frames_rx) = mpsc::unbounded_channel();
    let port = spawn_server(frames_rx).await;

    let watcher = CallWatcher::new(test_config(port));
    let mut rx = watcher.watch();
    watcher.start().await.unwrap();

    frames.send(r#"{"event":"call_started"}"#.into()).unwrap();
    frames
        .send(r#"{"transcript":"hello","severity":"low"}"#.into())
        .unwrap();
    wait_for(&mut rx, |s| s.record.is_some()).await;

    watcher.stop().await;
    assert_eq!(watcher.snapshot(), CallState::default());

    // A second stop is a no-op, not a hang or panic.
    watcher.stop().await;
    assert_eq!(watcher.snapshot(), CallState::default());
}

#[tokio::test(flavor = "multi_thread")]
async fn start_is_idempotent_while_running() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let accepts = Arc::new(AtomicUsize::new(0));
    let server_accepts = accepts.clone();
    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            server_accepts.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                let _ = ws
                    .send(Message::text(r#"{"event":"call_started"}"#.to_string()))
                    .await;
                std::future::pending::<()>().await;
            });
        }
    });

    let watcher = CallWatcher::new(test_config(port));
    let mut rx = watcher.watch();
    watcher.start().await.unwrap();
    watcher.start().await.unwrap();

    wait_for(&mut rx, |s| s.connected).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        accepts.load(Ordering::SeqCst),
        1,
        "a second start opened a second connection"
    );

    watcher.stop().await;
}
