//! Application core: event loop and state tracking.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use rapid_core::{CallState, CallWatcher};

use crate::event::{Event, EventReader};
use crate::tui::Tui;
use crate::ui;

/// Top-level application state and event loop.
pub struct App {
    state: CallState,
    running: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: CallState::default(),
            running: true,
        }
    }

    /// Run the main loop: redraw on every state change and render tick,
    /// quit on `q`/`Esc`/`Ctrl-C`. The watcher is stopped before the
    /// terminal is restored, so teardown is guaranteed on every exit.
    pub async fn run(&mut self, watcher: &CallWatcher) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut state_rx = watcher.watch();
        watcher.start().await?;
        self.state = watcher.snapshot();

        let mut events = EventReader::new(Duration::from_millis(250));
        info!("dashboard event loop started");

        while self.running {
            tokio::select! {
                Some(event) = events.next() => {
                    match event {
                        Event::Key(key) => self.handle_key(key),
                        Event::Resize(..) | Event::Render => {}
                    }
                }
                Ok(()) = state_rx.changed() => {
                    self.state = state_rx.borrow_and_update().clone();
                }
            }

            tui.draw(|frame| ui::draw(frame, &self.state))?;
        }

        watcher.stop().await;
        tui.exit()?;
        info!("dashboard shut down cleanly");
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            _ => {}
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
