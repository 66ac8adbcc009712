// SPDX-License-Identifier: GPL-3.0-only

//! Scan session controller
//!
//! Owns the scan-to-action state machine and the timers that drive it. All
//! state mutation happens on a single event loop; detection events, timer
//! expirations, opener settlement, and focus changes arrive as messages and
//! are handled one at a time. The arm flag is the sole re-entrancy guard:
//! it is cleared atomically with the `Idle -> Capturing` transition and
//! restored when the sequence returns to `Idle`.

pub mod controller;
mod scheduler;
pub mod state;

pub use controller::{ScanController, SessionHandle};
pub use state::{
    DetectionEvent, FocusState, PreviewKind, ScanSession, SessionState, SessionUpdate,
};
