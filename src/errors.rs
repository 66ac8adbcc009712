// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the scan session core
//!
//! No failure in this crate is fatal: capture and opener errors are logged
//! by the controller and the session lifecycle continues without the
//! affected visual or action.

use std::fmt;

use crate::backends::capture::Capability;

/// Result type alias using ScanError
pub type ScanResult<T> = Result<T, ScanError>;

/// Main error type for the scan session core
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Capture-source errors
    Capture(CaptureError),
    /// Resource opener errors
    Open(OpenError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Capture-source errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The source does not advertise this capability
    Unsupported(Capability),
    /// Still snapshot failed
    SnapshotFailed(String),
    /// Backend error (device-specific)
    Backend(String),
}

/// Resource opener errors
///
/// Launch failures are logged by the controller and never surfaced to the
/// user; the session still completes its cooldown and re-arms.
#[derive(Debug, Clone)]
pub enum OpenError {
    /// Nothing to open
    EmptyUri,
    /// Platform launch action failed
    LaunchFailed(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Capture(e) => write!(f, "Capture error: {}", e),
            ScanError::Open(e) => write!(f, "Open error: {}", e),
            ScanError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ScanError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Unsupported(cap) => {
                write!(f, "Capability not supported: {}", cap.display_name())
            }
            CaptureError::SnapshotFailed(msg) => write!(f, "Snapshot failed: {}", msg),
            CaptureError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::EmptyUri => write!(f, "No URI to open"),
            OpenError::LaunchFailed(msg) => write!(f, "Failed to launch: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for OpenError {}

// Conversions from sub-errors to ScanError
impl From<CaptureError> for ScanError {
    fn from(err: CaptureError) -> Self {
        ScanError::Capture(err)
    }
}

impl From<OpenError> for ScanError {
    fn from(err: OpenError) -> Self {
        ScanError::Open(err)
    }
}

impl From<String> for ScanError {
    fn from(msg: String) -> Self {
        ScanError::Other(msg)
    }
}

impl From<&str> for ScanError {
    fn from(msg: &str) -> Self {
        ScanError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Other(err.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Config(err.to_string())
    }
}
