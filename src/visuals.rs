// SPDX-License-Identifier: GPL-3.0-only

//! Visual interpolation mapping
//!
//! Deterministic presentation parameters for the current session state.
//! Everything here is a pure function of `(state, bounds, elapsed)`; there
//! is no interpolation state beyond what the state machine and its timers
//! already track. The presentation layer samples [`snapshot`] at its own
//! frame rate and renders the result.

use std::time::Duration;

use crate::config::ScanConfig;
use crate::geometry::{Point, Rect, ViewfinderRegion};
use crate::session::{PreviewKind, SessionState};

/// Ease-in window for the highlight moving onto the detected code
const HIGHLIGHT_EASE: Duration = Duration::from_millis(300);

/// Window for the highlight and preview easing back to the centered pose
const RECENTER: Duration = Duration::from_millis(400);

/// Fade-in window for the code preview
const CODE_FADE_IN: Duration = Duration::from_millis(100);

/// Cross-fade window from code preview to remote image
const CROSSFADE: Duration = Duration::from_millis(800);

/// Window for the highlight color returning to rest during cooldown
const COLOR_RESTORE: Duration = Duration::from_millis(200);

/// Peak opacity of the acceptance flash pulse
const FLASH_PEAK: f32 = 0.8;

/// The highlight frames the code slightly larger than its bounds
const HIGHLIGHT_OVERSHOOT: f32 = 1.1;

/// Peak scale gain of the idle breathing cycle
const BREATHING_AMPLITUDE: f32 = 0.05;

/// An RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Rest highlight color (white)
    pub const REST: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Accepted highlight color (green)
    pub const ACCEPTED: Color = Color {
        r: 0.30,
        g: 0.69,
        b: 0.31,
    };

    fn lerp(a: Color, b: Color, t: f32) -> Color {
        Color {
            r: lerp(a.r, b.r, t),
            g: lerp(a.g, b.g, t),
            b: lerp(a.b, b.b, t),
        }
    }
}

/// Deterministic visual parameters for one instant of the session
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSnapshot {
    pub highlight_color: Color,
    /// Highlight offset from the viewfinder center
    pub highlight_offset: Point,
    pub highlight_scale: f32,
    /// Opacity of the decoded-code preview
    pub code_opacity: f32,
    /// Opacity of the remote-image preview
    pub image_opacity: f32,
    /// Preview offset from the viewfinder center
    pub preview_offset: Point,
    pub preview_scale: f32,
    /// Acceptance flash pulse value
    pub flash: f32,
    /// Whether the frozen still frame covers the live feed
    pub frozen_frame_visible: bool,
}

impl VisualSnapshot {
    fn rest() -> Self {
        Self {
            highlight_color: Color::REST,
            highlight_offset: Point::new(0.0, 0.0),
            highlight_scale: 1.0,
            code_opacity: 0.0,
            image_opacity: 0.0,
            preview_offset: Point::new(0.0, 0.0),
            preview_scale: 1.0,
            flash: 0.0,
            frozen_frame_visible: false,
        }
    }
}

/// Highlight pose derived from the accepted detection
struct DetectionPose {
    offset: Point,
    scale: f32,
}

fn detection_pose(bounds: Option<&Rect>, region: &ViewfinderRegion) -> DetectionPose {
    match bounds {
        Some(rect) => {
            let center = region.center();
            let rect_center = rect.center();
            DetectionPose {
                offset: Point::new(rect_center.x - center.x, rect_center.y - center.y),
                scale: (rect.width.max(rect.height) / region.side()) * HIGHLIGHT_OVERSHOOT,
            }
        }
        // Unknown bounds originate from center directly
        None => DetectionPose {
            offset: Point::new(0.0, 0.0),
            scale: 1.0,
        },
    }
}

/// Visual parameters for the session at `elapsed` time into `state`.
pub fn snapshot(
    state: SessionState,
    preview_kind: PreviewKind,
    bounds: Option<&Rect>,
    region: &ViewfinderRegion,
    config: &ScanConfig,
    elapsed: Duration,
) -> VisualSnapshot {
    let mut visual = VisualSnapshot::rest();
    let pose = detection_pose(bounds, region);

    match state {
        SessionState::Idle => {}
        SessionState::Capturing => {
            visual.flash = flash_pulse(elapsed, config.flash_rise(), config.flash_decay());
            visual.frozen_frame_visible = true;
        }
        SessionState::Highlighting => {
            let t = progress(elapsed, HIGHLIGHT_EASE);
            visual.highlight_color = Color::lerp(Color::REST, Color::ACCEPTED, t);
            visual.highlight_offset = Point::new(lerp(0.0, pose.offset.x, t), lerp(0.0, pose.offset.y, t));
            visual.highlight_scale = lerp(1.0, pose.scale, t);
            visual.frozen_frame_visible = true;
        }
        SessionState::Previewing => {
            let t = progress(elapsed, RECENTER);
            // Highlight eases back to rest while the preview takes over
            visual.highlight_color = Color::ACCEPTED;
            visual.highlight_offset =
                Point::new(lerp(pose.offset.x, 0.0, t), lerp(pose.offset.y, 0.0, t));
            visual.highlight_scale = lerp(pose.scale, 1.0, t);
            visual.code_opacity = progress(elapsed, CODE_FADE_IN);
            visual.preview_offset =
                Point::new(lerp(pose.offset.x, 0.0, t), lerp(pose.offset.y, 0.0, t));
            visual.preview_scale = lerp(pose.scale, 1.0, t);
            visual.frozen_frame_visible = true;
        }
        SessionState::Acting => {
            visual.highlight_color = Color::ACCEPTED;
            visual.frozen_frame_visible = true;
            match preview_kind {
                PreviewKind::RemoteImage => {
                    let t = progress(elapsed, CROSSFADE);
                    visual.code_opacity = 1.0 - t;
                    visual.image_opacity = t;
                }
                PreviewKind::Code => {
                    visual.code_opacity = 1.0;
                }
                PreviewKind::None => {}
            }
        }
        SessionState::Cooldown => {
            let t = progress(elapsed, COLOR_RESTORE);
            visual.highlight_color = Color::lerp(Color::ACCEPTED, Color::REST, t);
        }
    }

    visual
}

/// Acceptance flash pulse: rises to its peak, then decays to zero.
pub fn flash_pulse(elapsed: Duration, rise: Duration, decay: Duration) -> f32 {
    if elapsed < rise {
        FLASH_PEAK * progress(elapsed, rise)
    } else {
        let fall = progress(elapsed.saturating_sub(rise), decay);
        FLASH_PEAK * (1.0 - fall)
    }
}

/// Idle viewfinder breathing scale: a triangular cycle between 1.0 and
/// 1.0 + amplitude over the configured period.
pub fn breathing_scale(elapsed_idle: Duration, period: Duration) -> f32 {
    if period.is_zero() {
        return 1.0;
    }
    let phase = (elapsed_idle.as_secs_f32() % period.as_secs_f32()) / period.as_secs_f32();
    let tri = 1.0 - (2.0 * phase - 1.0).abs();
    1.0 + BREATHING_AMPLITUDE * tri
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear progress through a window, clamped to 0..=1
fn progress(elapsed: Duration, window: Duration) -> f32 {
    if window.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / window.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DisplaySize;

    fn region() -> ViewfinderRegion {
        ViewfinderRegion::centered(DisplaySize::new(1000.0, 2000.0), 240.0)
    }

    #[test]
    fn test_idle_is_rest_pose() {
        let visual = snapshot(
            SessionState::Idle,
            PreviewKind::None,
            None,
            &region(),
            &ScanConfig::default(),
            Duration::from_secs(3),
        );
        assert_eq!(visual, VisualSnapshot::rest());
    }

    #[test]
    fn test_highlight_converges_on_detection_pose() {
        let bounds = Rect::new(420.0, 920.0, 120.0, 100.0);
        let visual = snapshot(
            SessionState::Highlighting,
            PreviewKind::None,
            Some(&bounds),
            &region(),
            &ScanConfig::default(),
            Duration::from_secs(1),
        );
        // Bounds center (480, 970) relative to viewfinder center (500, 1000)
        assert_eq!(visual.highlight_offset, Point::new(-20.0, -30.0));
        // max(120, 100) / 240 * 1.1
        assert!((visual.highlight_scale - 0.55).abs() < 1e-4);
        assert_eq!(visual.highlight_color, Color::ACCEPTED);
    }

    #[test]
    fn test_unknown_bounds_originate_from_center() {
        let visual = snapshot(
            SessionState::Previewing,
            PreviewKind::Code,
            None,
            &region(),
            &ScanConfig::default(),
            Duration::ZERO,
        );
        assert_eq!(visual.preview_offset, Point::new(0.0, 0.0));
        assert_eq!(visual.preview_scale, 1.0);
    }

    #[test]
    fn test_preview_recenters() {
        let bounds = Rect::new(420.0, 920.0, 120.0, 100.0);
        let visual = snapshot(
            SessionState::Previewing,
            PreviewKind::Code,
            Some(&bounds),
            &region(),
            &ScanConfig::default(),
            Duration::from_secs(1),
        );
        assert_eq!(visual.preview_offset, Point::new(0.0, 0.0));
        assert_eq!(visual.preview_scale, 1.0);
        assert_eq!(visual.code_opacity, 1.0);
    }

    #[test]
    fn test_crossfade_swaps_preview_opacities() {
        let mid = snapshot(
            SessionState::Acting,
            PreviewKind::RemoteImage,
            None,
            &region(),
            &ScanConfig::default(),
            Duration::from_millis(400),
        );
        assert!((mid.code_opacity - 0.5).abs() < 1e-4);
        assert!((mid.image_opacity - 0.5).abs() < 1e-4);

        let done = snapshot(
            SessionState::Acting,
            PreviewKind::RemoteImage,
            None,
            &region(),
            &ScanConfig::default(),
            Duration::from_secs(2),
        );
        assert_eq!(done.code_opacity, 0.0);
        assert_eq!(done.image_opacity, 1.0);
    }

    #[test]
    fn test_flash_pulse_rises_and_decays() {
        let rise = Duration::from_millis(100);
        let decay = Duration::from_millis(100);
        assert_eq!(flash_pulse(Duration::ZERO, rise, decay), 0.0);
        assert!((flash_pulse(Duration::from_millis(100), rise, decay) - FLASH_PEAK).abs() < 1e-4);
        assert_eq!(flash_pulse(Duration::from_millis(200), rise, decay), 0.0);
        assert_eq!(flash_pulse(Duration::from_secs(5), rise, decay), 0.0);
    }

    #[test]
    fn test_breathing_cycle() {
        let period = Duration::from_secs(4);
        assert!((breathing_scale(Duration::ZERO, period) - 1.0).abs() < 1e-4);
        assert!((breathing_scale(Duration::from_secs(2), period) - 1.05).abs() < 1e-4);
        assert!((breathing_scale(Duration::from_secs(4), period) - 1.0).abs() < 1e-4);
        // Repeats every period
        assert!((breathing_scale(Duration::from_secs(6), period) - 1.05).abs() < 1e-4);
    }

    #[test]
    fn test_cooldown_restores_rest_color() {
        let visual = snapshot(
            SessionState::Cooldown,
            PreviewKind::None,
            None,
            &region(),
            &ScanConfig::default(),
            Duration::from_secs(1),
        );
        assert_eq!(visual.highlight_color, Color::REST);
        assert_eq!(visual.code_opacity, 0.0);
        assert_eq!(visual.image_opacity, 0.0);
    }
}
