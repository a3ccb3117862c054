//! Async driver for [`SearchMachine`].
//!
//! One actor task owns the machine. Input arrives over a command channel,
//! request tasks report back over a completion channel, and the visible
//! state is published on a `watch` channel. Superseded request tasks are
//! cancelled through their token; should one still report, the machine
//! discards it by identity.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tvsearch_core::types::SearchResult;

use crate::api::{SearchBackend, SearchFailure};
use crate::machine::{QueryId, SearchMachine, SearchState};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

enum Command {
    /// Raw text changed; restarts the debounce timer.
    Input(String),
    /// Search immediately, skipping the debounce.
    Submit(String),
    Clear,
}

struct Completion {
    id: QueryId,
    outcome: Result<Vec<SearchResult>, SearchFailure>,
}

/// Cheap, cloneable handle to a running controller. The controller stops
/// and cancels its in-flight request once every handle is dropped.
#[derive(Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchState>,
}

impl SearchHandle {
    pub fn set_query(&self, text: impl Into<String>) {
        let _ = self.commands.send(Command::Input(text.into()));
    }

    pub fn submit(&self, text: impl Into<String>) {
        let _ = self.commands.send(Command::Submit(text.into()));
    }

    pub fn clear(&self) {
        let _ = self.commands.send(Command::Clear);
    }

    /// Snapshot of the visible state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }
}

pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    debounce: Duration,
    machine: SearchMachine,
    pending_text: Option<String>,
    deadline: Option<Instant>,
    in_flight: Option<CancellationToken>,
    completions: mpsc::UnboundedSender<Completion>,
    state: watch::Sender<SearchState>,
}

impl SearchController {
    /// Start the controller on the current Tokio runtime.
    pub fn spawn(backend: Arc<dyn SearchBackend>, debounce: Duration) -> SearchHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchState::Idle);

        let controller = Self {
            backend,
            debounce,
            machine: SearchMachine::new(),
            pending_text: None,
            deadline: None,
            in_flight: None,
            completions: completions_tx,
            state: state_tx,
        };
        tokio::spawn(controller.run(commands_rx, completions_rx));

        SearchHandle {
            commands: commands_tx,
            state: state_rx,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        loop {
            let timer_armed = self.deadline.is_some();
            let deadline = self.deadline.unwrap_or_else(Instant::now);

            // Input first: a completion that lands together with newer input
            // is already stale.
            tokio::select! {
                biased;
                cmd = commands.recv() => match cmd {
                    Some(Command::Input(text)) => {
                        self.pending_text = Some(text);
                        self.deadline = Some(Instant::now() + self.debounce);
                    }
                    Some(Command::Submit(text)) => {
                        self.disarm_timer();
                        self.start(&text);
                    }
                    Some(Command::Clear) => {
                        self.disarm_timer();
                        self.cancel_in_flight();
                        self.machine.clear();
                        self.publish();
                    }
                    None => break,
                },
                Some(done) = completions.recv() => self.complete(done),
                _ = tokio::time::sleep_until(deadline), if timer_armed => {
                    self.deadline = None;
                    let text = self.pending_text.take().unwrap_or_default();
                    self.start(&text);
                }
            }
        }

        self.cancel_in_flight();
        debug!("search controller stopped");
    }

    fn disarm_timer(&mut self) {
        self.deadline = None;
        self.pending_text = None;
    }

    /// Supersede whatever is running and, for non-blank text, issue a new
    /// request.
    fn start(&mut self, text: &str) {
        self.cancel_in_flight();

        if let Some(id) = self.machine.begin(text) {
            let token = CancellationToken::new();
            self.in_flight = Some(token.clone());

            let backend = self.backend.clone();
            let completions = self.completions.clone();
            let query = text.trim().to_string();
            debug!(id = %id, query = %query, "search issued");

            tokio::spawn(async move {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!(id = %id, "search cancelled");
                    }
                    outcome = backend.search(&query) => {
                        let _ = completions.send(Completion { id, outcome });
                    }
                }
            });
        }

        self.publish();
    }

    fn complete(&mut self, done: Completion) {
        let outcome = done.outcome.map_err(|e| e.to_string());
        if self.machine.resolve(done.id, outcome) {
            self.in_flight = None;
            self.publish();
        } else {
            debug!(id = %done.id, "stale search result discarded");
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    fn publish(&self) {
        self.state.send_replace(self.machine.state().clone());
    }
}
