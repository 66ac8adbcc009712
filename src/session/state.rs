// SPDX-License-Identifier: GPL-3.0-only

//! Session state types
//!
//! One `ScanSession` exists per screen mount. It walks the sequence states
//! on each accepted detection and returns to `Idle` automatically; it is
//! only destroyed at unmount.

use std::fmt;

use crate::backends::capture::ImageHandle;
use crate::geometry::{Geometry, Rect};

/// A detection event produced by the capture source
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEvent {
    /// Decoded text content
    pub payload: String,
    /// Geometry in capture-source coordinates, when the source reports it
    pub bounds: Option<Geometry>,
}

impl DetectionEvent {
    pub fn new(payload: impl Into<String>, bounds: Option<Geometry>) -> Self {
        Self {
            payload: payload.into(),
            bounds,
        }
    }
}

/// Application foreground state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Active,
    Background,
    Inactive,
}

impl FocusState {
    /// Whether the application is in the foreground
    pub fn is_active(&self) -> bool {
        matches!(self, FocusState::Active)
    }
}

/// Phase of the scan-to-action sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Armed and waiting for a detection
    #[default]
    Idle,
    /// Detection accepted; still-snapshot freeze window
    Capturing,
    /// Detected code highlighted in place
    Highlighting,
    /// Decoded-code preview animating to center
    Previewing,
    /// Payload classified; action in flight
    Acting,
    /// Visual elements fading out before re-arm
    Cooldown,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    /// Metric name for time spent in this state
    pub fn metric_name(&self) -> &'static str {
        match self {
            SessionState::Idle => "session.idle",
            SessionState::Capturing => "session.capturing",
            SessionState::Highlighting => "session.highlighting",
            SessionState::Previewing => "session.previewing",
            SessionState::Acting => "session.acting",
            SessionState::Cooldown => "session.cooldown",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Capturing => "capturing",
            SessionState::Highlighting => "highlighting",
            SessionState::Previewing => "previewing",
            SessionState::Acting => "acting",
            SessionState::Cooldown => "cooldown",
        };
        f.write_str(name)
    }
}

/// What the preview slot is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewKind {
    /// Nothing
    #[default]
    None,
    /// A rendering of the decoded payload itself
    Code,
    /// A remote image (icon lookup for URL payloads)
    RemoteImage,
}

/// The single mutable entity owned by the controller
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanSession {
    pub state: SessionState,
    /// Accepted payload; cleared on reset
    pub payload: Option<String>,
    pub preview_kind: PreviewKind,
    /// Derived preview resource, e.g. the icon lookup URI
    pub preview_resource: Option<String>,
    /// Normalized bounds of the accepted detection, when known
    pub bounds: Option<Rect>,
    /// Still frame taken at acceptance, when the source supports it
    pub frozen_frame: Option<ImageHandle>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all per-sequence fields and return to `Idle`
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Updates published to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// The session changed; carries a full snapshot
    StateChanged(ScanSession),
    /// An opaque payload completed its sequence and should be acknowledged
    /// to the user (no launch action)
    PayloadAcknowledged { payload: String },
}
