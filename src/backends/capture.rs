// SPDX-License-Identifier: GPL-3.0-only

//! Capture source abstraction
//!
//! A capture source feeds detection events into the session (through the
//! controller handle) and accepts control requests back: pause/resume of
//! the detection stream, a still snapshot for the frozen-frame visual, and
//! the illumination toggle.

use futures::future::BoxFuture;

use crate::errors::CaptureError;

/// An optional capture-source capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Stream can be paused and resumed
    PauseResume,
    /// Still snapshots can be taken
    Snapshot,
    /// Illumination (torch) can be toggled
    Illumination,
}

impl Capability {
    pub fn display_name(&self) -> &'static str {
        match self {
            Capability::PauseResume => "pause/resume",
            Capability::Snapshot => "snapshot",
            Capability::Illumination => "illumination",
        }
    }
}

/// Capabilities advertised by a capture source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureCapabilities {
    pub pause_resume: bool,
    pub snapshot: bool,
    pub illumination: bool,
}

impl CaptureCapabilities {
    /// A fully capable source
    pub fn all() -> Self {
        Self {
            pause_resume: true,
            snapshot: true,
            illumination: true,
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::PauseResume => self.pause_resume,
            Capability::Snapshot => self.snapshot,
            Capability::Illumination => self.illumination,
        }
    }
}

/// Opaque handle to a captured still frame
///
/// The core never inspects the image; it only threads the handle to the
/// presentation layer for the frozen-frame visual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub uri: String,
}

impl ImageHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// A source of detection events with negotiated control capabilities.
///
/// Every control method has a default body returning
/// [`CaptureError::Unsupported`]; implementations override exactly the
/// methods for the capabilities they advertise. The controller treats an
/// `Unsupported` response as a degraded-but-fine condition and logs it.
pub trait CaptureSource: Send {
    /// Capabilities this source advertises
    fn capabilities(&self) -> CaptureCapabilities;

    /// Stop delivering detection events
    fn pause(&mut self) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported(Capability::PauseResume))
    }

    /// Resume delivering detection events
    fn resume(&mut self) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported(Capability::PauseResume))
    }

    /// Take a still snapshot of the current frame
    fn snapshot(&mut self) -> BoxFuture<'static, Result<ImageHandle, CaptureError>> {
        Box::pin(async { Err(CaptureError::Unsupported(Capability::Snapshot)) })
    }

    /// Turn illumination on or off
    fn set_illumination(&mut self, _on: bool) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported(Capability::Illumination))
    }
}

/// A capture source with no control capabilities.
///
/// Detections still flow through the controller handle; pause, snapshot,
/// and illumination requests come back as `Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCapture;

impl CaptureSource for NullCapture {
    fn capabilities(&self) -> CaptureCapabilities {
        CaptureCapabilities::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_capture_rejects_controls() {
        let mut source = NullCapture;
        assert!(!source.capabilities().supports(Capability::PauseResume));
        assert!(matches!(
            source.pause(),
            Err(CaptureError::Unsupported(Capability::PauseResume))
        ));
        assert!(matches!(
            source.set_illumination(true),
            Err(CaptureError::Unsupported(Capability::Illumination))
        ));
    }

    #[tokio::test]
    async fn test_default_snapshot_is_unsupported() {
        let mut source = NullCapture;
        let result = source.snapshot().await;
        assert!(matches!(
            result,
            Err(CaptureError::Unsupported(Capability::Snapshot))
        ));
    }
}
