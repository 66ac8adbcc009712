// SPDX-License-Identifier: GPL-3.0-only

//! Scan session configuration
//!
//! Every phase duration and the acceptance margin are named, tunable
//! settings. The defaults are illustrative, not contractual.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Side length of the centered viewfinder square, in capture-source units
    pub viewfinder_side: f32,
    /// Tolerance margin added around the viewfinder when filtering
    /// detections (compensates for sensor/geometry noise)
    pub acceptance_margin: f32,
    /// Delay between lockout and the highlight animation; covers the
    /// still-snapshot freeze window
    pub snapshot_delay_ms: u64,
    /// How long the detected code stays highlighted in place
    pub highlight_ms: u64,
    /// How long the decoded-code preview rests at center
    pub preview_ms: u64,
    /// How long the remote-image preview lingers before the launch action
    /// (URL payloads only)
    pub action_linger_ms: u64,
    /// Fade-out window after the action settles, before re-arming
    pub cooldown_ms: u64,
    /// Acceptance flash pulse rise time
    pub flash_rise_ms: u64,
    /// Acceptance flash pulse decay time
    pub flash_decay_ms: u64,
    /// Full period of the idle viewfinder breathing cycle
    pub breathing_period_ms: u64,
    /// Requested edge length for the remote icon lookup, in pixels
    pub icon_size: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            viewfinder_side: 240.0,
            acceptance_margin: 10.0,
            snapshot_delay_ms: 200,
            highlight_ms: 1500,
            preview_ms: 2000,
            action_linger_ms: 2000,
            cooldown_ms: 1000,
            flash_rise_ms: 100,
            flash_decay_ms: 100,
            breathing_period_ms: 4000,
            icon_size: 180,
        }
    }
}

impl ScanConfig {
    pub fn snapshot_delay(&self) -> Duration {
        Duration::from_millis(self.snapshot_delay_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn preview(&self) -> Duration {
        Duration::from_millis(self.preview_ms)
    }

    pub fn action_linger(&self) -> Duration {
        Duration::from_millis(self.action_linger_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn flash_rise(&self) -> Duration {
        Duration::from_millis(self.flash_rise_ms)
    }

    pub fn flash_decay(&self) -> Duration {
        Duration::from_millis(self.flash_decay_ms)
    }

    pub fn breathing_period(&self) -> Duration {
        Duration::from_millis(self.breathing_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.viewfinder_side, 240.0);
        assert_eq!(config.acceptance_margin, 10.0);
        assert_eq!(config.highlight(), Duration::from_millis(1500));
        assert_eq!(config.preview(), Duration::from_millis(2000));
        assert_eq!(config.cooldown(), Duration::from_millis(1000));
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = ScanConfig::default();
        config.highlight_ms = 300;
        config.acceptance_margin = 4.0;

        let json = serde_json::to_string(&config).unwrap();
        let parsed: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: ScanConfig = serde_json::from_str(r#"{"preview_ms": 800}"#).unwrap();
        assert_eq!(parsed.preview_ms, 800);
        assert_eq!(parsed.viewfinder_side, 240.0);
        assert_eq!(parsed.cooldown_ms, 1000);
    }
}
