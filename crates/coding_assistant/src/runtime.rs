//! Turn execution off the UI thread.
//!
//! One worker thread runs the engine's full model/tool loop for a turn and
//! posts a single terminal event back over an mpsc channel. The UI polls
//! the channel between key events; repaint ticks read log snapshots and
//! never mutate them.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use ledger_tui::DebugLog;

use crate::engine::{ConversationEngine, TurnOutcome};

/// Terminal event of one turn.
#[derive(Debug)]
pub enum TurnEvent {
    Completed(TurnOutcome),
    Failed(String),
}

pub struct TurnRunner {
    engine: Arc<ConversationEngine>,
    debug_log: Arc<DebugLog>,
    events_tx: Sender<TurnEvent>,
    events_rx: Receiver<TurnEvent>,
    worker: Option<JoinHandle<()>>,
}

impl TurnRunner {
    #[must_use]
    pub fn new(engine: Arc<ConversationEngine>, debug_log: Arc<DebugLog>) -> Self {
        let (events_tx, events_rx) = channel();
        Self {
            engine,
            debug_log,
            events_tx,
            events_rx,
            worker: None,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<ConversationEngine> {
        &self.engine
    }

    /// Spawns the worker for one turn.
    ///
    /// The caller keeps the input surface disabled until the terminal event
    /// arrives, so at most one worker is ever live.
    pub fn start_turn(&mut self, message: String) {
        self.join_finished_worker();

        let engine = Arc::clone(&self.engine);
        let debug_log = Arc::clone(&self.debug_log);
        let events_tx = self.events_tx.clone();

        let handle = std::thread::Builder::new()
            .name("assistant-turn".to_string())
            .spawn(move || {
                debug_log.log("turn started");
                let event = match engine.chat(&message) {
                    Ok(outcome) => {
                        debug_log.log(&format!(
                            "turn completed with {} tool call(s)",
                            outcome.tool_calls.len()
                        ));
                        TurnEvent::Completed(outcome)
                    }
                    Err(error) => {
                        let error = error.to_string();
                        debug_log.log(&format!("turn failed: {error}"));
                        TurnEvent::Failed(error)
                    }
                };
                let _ = events_tx.send(event);
            });

        match handle {
            Ok(handle) => self.worker = Some(handle),
            Err(error) => {
                let _ = self
                    .events_tx
                    .send(TurnEvent::Failed(format!("Failed to spawn turn worker: {error}")));
            }
        }
    }

    /// Non-blocking poll for the turn's terminal event.
    #[must_use]
    pub fn try_recv(&self) -> Option<TurnEvent> {
        match self.events_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    fn join_finished_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                self.worker = Some(handle);
            }
        }
    }
}

impl Drop for TurnRunner {
    fn drop(&mut self) {
        self.join_finished_worker();
    }
}
