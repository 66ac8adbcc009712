// SPDX-License-Identifier: GPL-3.0-only

//! viewfinder - scan-to-action session core for QR camera screens
//!
//! This library implements the state machine behind a camera scan screen:
//! a detection event is validated against the viewfinder region, animated
//! through highlight and preview phases, acted on (URL launch or opaque
//! acknowledgement), and automatically reset to a scanning-ready state.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: The scan session controller and its state machine
//! - [`geometry`]: Viewfinder region and the geometric acceptance filter
//! - [`payload`]: Payload classification and icon lookup derivation
//! - [`visuals`]: Pure visual interpolation mapping for the presentation layer
//! - [`backends`]: Capture source and resource opener seams
//! - [`config`]: Tunable durations and geometry settings
//! - [`metrics`]: Injectable phase-timing sink
//!
//! Camera hardware access, QR symbol decoding, and rendering are not part
//! of this crate; they sit behind the [`backends`] traits and the
//! [`session::SessionUpdate`] stream.

pub mod backends;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod metrics;
pub mod payload;
pub mod session;
pub mod visuals;

// Re-export commonly used types
pub use backends::{CaptureCapabilities, CaptureSource, ResourceOpener, SystemOpener};
pub use config::ScanConfig;
pub use errors::{CaptureError, OpenError, ScanError, ScanResult};
pub use geometry::{DisplaySize, Geometry, Point, Rect, ViewfinderRegion};
pub use session::{
    FocusState, PreviewKind, ScanController, ScanSession, SessionHandle, SessionState,
    SessionUpdate,
};
