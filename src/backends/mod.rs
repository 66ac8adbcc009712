// SPDX-License-Identifier: GPL-3.0-only

//! Collaborator seams for the scan session
//!
//! The controller never talks to camera hardware or the platform shell
//! directly; it consumes these traits. Capture capabilities are negotiated
//! explicitly: the controller uses pause/resume, snapshot, and illumination
//! when the source advertises them, and a source rejects unadvertised calls
//! with a typed error instead of silently ignoring them.

pub mod capture;
pub mod opener;

pub use capture::{Capability, CaptureCapabilities, CaptureSource, ImageHandle, NullCapture};
pub use opener::{ResourceOpener, SystemOpener};
