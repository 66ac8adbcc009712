// SPDX-License-Identifier: GPL-3.0-only

//! Deferred transition scheduling
//!
//! Each deferred transition is a spawned sleep task that posts a phase
//! event back to the controller loop. Handles are tracked so the whole
//! in-flight set can be cancelled at once; events additionally carry the
//! sequence generation, so a message already sitting in the channel when
//! its sequence is torn down is dropped on receipt.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use super::controller::SessionEvent;

/// A deferred transition of the scan sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Capturing -> Highlighting
    Highlight,
    /// Highlighting -> Previewing
    Preview,
    /// Previewing -> Acting
    Act,
    /// Acting: linger elapsed, invoke the opener (URL payloads)
    Launch,
    /// Cooldown -> Idle
    Reset,
}

pub(crate) struct Scheduler {
    events: mpsc::UnboundedSender<SessionEvent>,
    timers: Vec<JoinHandle<()>>,
    generation: u64,
}

impl Scheduler {
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            events,
            timers: Vec::new(),
            generation: 0,
        }
    }

    /// Generation of the current sequence; events from older generations
    /// must be ignored by the receiver
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Schedule a phase event after `delay`
    pub fn defer(&mut self, phase: Phase, delay: Duration) {
        let seq = self.generation;
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SessionEvent::PhaseElapsed { seq, phase });
        });
        self.track(handle);
    }

    /// Track an auxiliary task (snapshot, opener settle) so teardown
    /// cancels it with the timers
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.timers.retain(|h| !h.is_finished());
        self.timers.push(handle);
    }

    /// Cancel every pending timer of the current sequence
    pub fn cancel_all(&mut self) {
        let cancelled = self.timers.len();
        for handle in self.timers.drain(..) {
            handle.abort();
        }
        if cancelled > 0 {
            trace!(cancelled, generation = self.generation, "Cancelled pending timers");
        }
    }

    /// Cancel pending timers and advance the generation, invalidating any
    /// event of the old sequence still in flight
    pub fn begin_sequence(&mut self) -> u64 {
        self.cancel_all();
        self.generation += 1;
        self.generation
    }
}
