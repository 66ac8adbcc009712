// SPDX-License-Identifier: GPL-3.0-only

//! The scan session event loop
//!
//! [`ScanController::spawn`] starts the loop as a tokio task and returns a
//! [`SessionHandle`] for feeding it events plus a receiver of
//! [`SessionUpdate`]s for the presentation layer. Detections arriving while
//! a sequence is in flight are dropped, never queued. Timer and opener
//! events carry the sequence generation they belong to; events from a
//! superseded sequence are ignored on receipt.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use super::scheduler::{Phase, Scheduler};
use super::state::{
    DetectionEvent, FocusState, PreviewKind, ScanSession, SessionState, SessionUpdate,
};
use crate::backends::capture::{CaptureSource, ImageHandle};
use crate::backends::opener::ResourceOpener;
use crate::config::ScanConfig;
use crate::errors::{CaptureError, OpenError};
use crate::geometry::{self, DisplaySize, Geometry, ViewfinderRegion};
use crate::metrics::MetricsSink;
use crate::payload::{self, PayloadKind};

/// Events consumed by the controller loop
#[derive(Debug)]
pub(crate) enum SessionEvent {
    Detection(DetectionEvent),
    PhaseElapsed {
        seq: u64,
        phase: Phase,
    },
    SnapshotReady {
        seq: u64,
        result: Result<ImageHandle, CaptureError>,
    },
    OpenSettled {
        seq: u64,
        result: Result<(), OpenError>,
    },
    FocusChanged(FocusState),
    SetIllumination(bool),
    Resize(DisplaySize),
    Shutdown,
}

/// Handle to a running scan controller
///
/// Dropping the handle requests shutdown; every pending timer of the
/// in-flight sequence is cancelled before the loop exits, so no transition
/// callback can touch a torn-down presentation layer.
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Feed a detection event from the capture source
    pub fn on_detection(&self, payload: impl Into<String>, bounds: Option<Geometry>) {
        let _ = self
            .events
            .send(SessionEvent::Detection(DetectionEvent::new(payload, bounds)));
    }

    /// Report an application foreground-state change
    pub fn focus_changed(&self, focus: FocusState) {
        let _ = self.events.send(SessionEvent::FocusChanged(focus));
    }

    /// Request the illumination toggle; independent of session state
    pub fn set_illumination(&self, on: bool) {
        let _ = self.events.send(SessionEvent::SetIllumination(on));
    }

    /// Re-derive the viewfinder region after a display resize
    pub fn resize(&self, display: DisplaySize) {
        let _ = self.events.send(SessionEvent::Resize(display));
    }

    /// Shut the controller down and wait for its loop to finish
    pub async fn shutdown(mut self) {
        let _ = self.events.send(SessionEvent::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.events.send(SessionEvent::Shutdown);
    }
}

/// The scan session controller
///
/// One instance exists per screen mount; it owns the session, the
/// scheduler, and the collaborator seams.
pub struct ScanController {
    config: ScanConfig,
    region: ViewfinderRegion,
    session: ScanSession,
    /// Sole re-entrancy guard; false while a sequence is in flight
    armed: bool,
    focus: FocusState,
    illumination: bool,
    capture: Box<dyn CaptureSource>,
    opener: Arc<dyn ResourceOpener>,
    metrics: Box<dyn MetricsSink>,
    scheduler: Scheduler,
    events: mpsc::UnboundedSender<SessionEvent>,
    updates: mpsc::UnboundedSender<SessionUpdate>,
    state_entered: Instant,
    sequence_started: Option<Instant>,
}

impl ScanController {
    /// Start a controller loop on the current tokio runtime.
    ///
    /// Returns the handle for feeding events and the update stream for the
    /// presentation layer.
    pub fn spawn(
        config: ScanConfig,
        display: DisplaySize,
        capture: Box<dyn CaptureSource>,
        opener: Arc<dyn ResourceOpener>,
        metrics: Box<dyn MetricsSink>,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<SessionUpdate>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let region = ViewfinderRegion::centered(display, config.viewfinder_side);
        info!(
            x = region.rect().x,
            y = region.rect().y,
            side = config.viewfinder_side,
            "Scan controller starting"
        );

        let controller = Self {
            config,
            region,
            session: ScanSession::new(),
            armed: true,
            focus: FocusState::Active,
            illumination: false,
            capture,
            opener,
            metrics,
            scheduler: Scheduler::new(event_tx.clone()),
            events: event_tx.clone(),
            updates: update_tx,
            state_entered: Instant::now(),
            sequence_started: None,
        };

        let task = tokio::spawn(controller.run(event_rx));

        (
            SessionHandle {
                events: event_tx,
                task: Some(task),
            },
            update_rx,
        )
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Detection(detection) => self.handle_detection(detection),
                SessionEvent::PhaseElapsed { seq, phase } => self.handle_phase_elapsed(seq, phase),
                SessionEvent::SnapshotReady { seq, result } => {
                    self.handle_snapshot_ready(seq, result)
                }
                SessionEvent::OpenSettled { seq, result } => self.handle_open_settled(seq, result),
                SessionEvent::FocusChanged(focus) => self.handle_focus_changed(focus),
                SessionEvent::SetIllumination(on) => self.handle_set_illumination(on),
                SessionEvent::Resize(display) => self.handle_resize(display),
                SessionEvent::Shutdown => break,
            }
        }
        self.teardown();
    }

    // =========================================================================
    // Detection handling
    // =========================================================================

    fn handle_detection(&mut self, detection: DetectionEvent) {
        if !self.armed || !self.session.state.is_idle() {
            trace!(state = %self.session.state, "Detection dropped mid-sequence");
            return;
        }
        if !self.focus.is_active() {
            trace!(focus = ?self.focus, "Detection dropped while backgrounded");
            return;
        }

        let acceptance = geometry::evaluate(
            detection.bounds.as_ref(),
            &self.region,
            self.config.acceptance_margin,
        );
        if !acceptance.accepted {
            trace!("Detection outside viewfinder, ignored");
            return;
        }

        let seq = self.scheduler.begin_sequence();
        self.armed = false;
        self.sequence_started = Some(Instant::now());
        info!(payload = %detection.payload, seq, "Detection accepted");

        self.session.payload = Some(detection.payload);
        self.session.bounds = acceptance.normalized_bounds;
        self.set_state(SessionState::Capturing);

        self.pause_capture();
        self.request_snapshot(seq);
        self.scheduler
            .defer(Phase::Highlight, self.config.snapshot_delay());
    }

    // =========================================================================
    // Timer-driven transitions
    // =========================================================================

    fn handle_phase_elapsed(&mut self, seq: u64, phase: Phase) {
        if seq != self.scheduler.generation() {
            debug!(seq, ?phase, "Stale timer event dropped");
            return;
        }

        match phase {
            Phase::Highlight => {
                self.set_state(SessionState::Highlighting);
                self.scheduler.defer(Phase::Preview, self.config.highlight());
            }
            Phase::Preview => {
                self.session.preview_kind = PreviewKind::Code;
                self.set_state(SessionState::Previewing);
                self.scheduler.defer(Phase::Act, self.config.preview());
            }
            Phase::Act => self.begin_action(),
            Phase::Launch => self.launch(seq),
            Phase::Reset => self.finish_sequence(),
        }
    }

    fn begin_action(&mut self) {
        self.set_state(SessionState::Acting);

        let Some(payload) = self.session.payload.clone() else {
            warn!("Entered acting state without a payload");
            self.enter_cooldown();
            return;
        };

        match PayloadKind::classify(&payload) {
            PayloadKind::Url => {
                let resource = payload::icon_lookup_uri(&payload, self.config.icon_size);
                debug!(resource = %resource, "Derived icon lookup for URL payload");
                self.session.preview_kind = PreviewKind::RemoteImage;
                self.session.preview_resource = Some(resource);
                self.publish();
                self.scheduler
                    .defer(Phase::Launch, self.config.action_linger());
            }
            PayloadKind::Opaque => {
                info!(payload = %payload, "Opaque payload acknowledged");
                let _ = self
                    .updates
                    .send(SessionUpdate::PayloadAcknowledged { payload });
                self.enter_cooldown();
            }
        }
    }

    fn launch(&mut self, seq: u64) {
        let Some(payload) = self.session.payload.clone() else {
            self.enter_cooldown();
            return;
        };

        info!(url = %payload, "Opening URL payload");
        let future = self.opener.open(&payload);
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let result = future.await;
            let _ = events.send(SessionEvent::OpenSettled { seq, result });
        });
        self.scheduler.track(handle);
    }

    fn handle_open_settled(&mut self, seq: u64, result: Result<(), OpenError>) {
        if seq != self.scheduler.generation() {
            debug!(seq, "Stale opener settlement dropped");
            return;
        }
        if let Err(err) = result {
            error!(error = %err, "Failed to open payload URL");
        }
        self.enter_cooldown();
    }

    fn enter_cooldown(&mut self) {
        self.set_state(SessionState::Cooldown);
        self.scheduler.defer(Phase::Reset, self.config.cooldown());
    }

    fn finish_sequence(&mut self) {
        self.scheduler.cancel_all();

        let elapsed = self.state_entered.elapsed();
        self.metrics
            .record_duration(self.session.state.metric_name(), elapsed);
        self.session.reset();
        self.state_entered = Instant::now();
        self.publish();

        self.resume_capture();
        self.armed = true;
        if let Some(started) = self.sequence_started.take() {
            self.metrics
                .record_duration("session.sequence", started.elapsed());
        }
        info!("Session re-armed");
    }

    // =========================================================================
    // Snapshot handling
    // =========================================================================

    fn request_snapshot(&mut self, seq: u64) {
        if !self.capture.capabilities().snapshot {
            debug!("Capture source does not support snapshots; frozen frame skipped");
            return;
        }
        let future = self.capture.snapshot();
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let result = future.await;
            let _ = events.send(SessionEvent::SnapshotReady { seq, result });
        });
        self.scheduler.track(handle);
    }

    fn handle_snapshot_ready(&mut self, seq: u64, result: Result<ImageHandle, CaptureError>) {
        if seq != self.scheduler.generation() || self.session.state.is_idle() {
            debug!(seq, "Stale snapshot dropped");
            return;
        }
        match result {
            Ok(handle) => {
                debug!(uri = %handle.uri, "Frozen frame captured");
                self.session.frozen_frame = Some(handle);
                self.publish();
            }
            Err(err) => {
                warn!(error = %err, "Snapshot failed; frozen-frame visual skipped");
            }
        }
    }

    // =========================================================================
    // Focus, illumination, resize
    // =========================================================================

    fn handle_focus_changed(&mut self, focus: FocusState) {
        if focus == self.focus {
            return;
        }
        info!(?focus, "Application focus changed");
        self.focus = focus;

        if !focus.is_active() && self.illumination {
            if let Err(err) = self.capture.set_illumination(false) {
                warn!(error = %err, "Failed to force illumination off");
            }
            self.illumination = false;
        }
    }

    fn handle_set_illumination(&mut self, on: bool) {
        if !self.capture.capabilities().illumination {
            debug!("Capture source does not support illumination");
            return;
        }
        match self.capture.set_illumination(on) {
            Ok(()) => {
                info!(on, "Illumination toggled");
                self.illumination = on;
            }
            Err(err) => warn!(error = %err, "Failed to toggle illumination"),
        }
    }

    fn handle_resize(&mut self, display: DisplaySize) {
        self.region = ViewfinderRegion::centered(display, self.config.viewfinder_side);
        let width = display.width;
        let height = display.height;
        info!(width, height, "Viewfinder region recomputed");
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn pause_capture(&mut self) {
        if !self.capture.capabilities().pause_resume {
            debug!("Capture source does not support pause; relying on lockout");
            return;
        }
        if let Err(err) = self.capture.pause() {
            warn!(error = %err, "Failed to pause capture source");
        }
    }

    fn resume_capture(&mut self) {
        if !self.capture.capabilities().pause_resume {
            return;
        }
        if let Err(err) = self.capture.resume() {
            warn!(error = %err, "Failed to resume capture source");
        }
    }

    fn set_state(&mut self, next: SessionState) {
        let elapsed = self.state_entered.elapsed();
        self.metrics
            .record_duration(self.session.state.metric_name(), elapsed);
        debug!(from = %self.session.state, to = %next, "Session transition");
        self.session.state = next;
        self.state_entered = Instant::now();
        self.publish();
    }

    fn publish(&self) {
        let _ = self
            .updates
            .send(SessionUpdate::StateChanged(self.session.clone()));
    }

    fn teardown(&mut self) {
        self.scheduler.cancel_all();
        debug!("Scan controller torn down");
    }
}
