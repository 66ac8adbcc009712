// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the scan session demo
//!
//! This module provides command-line functionality for:
//! - Driving a scripted scan session end to end
//! - Classifying payloads and printing derived icon lookups

use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use viewfinder::backends::capture::{CaptureCapabilities, CaptureSource, ImageHandle};
use viewfinder::backends::opener::{ResourceOpener, SystemOpener};
use viewfinder::config::ScanConfig;
use viewfinder::errors::{CaptureError, OpenError};
use viewfinder::geometry::{DisplaySize, Geometry, Rect, ViewfinderRegion};
use viewfinder::metrics::LogMetrics;
use viewfinder::payload::{self, PayloadKind};
use viewfinder::session::{PreviewKind, ScanController, SessionState, SessionUpdate};

/// Display dimensions assumed for the simulated screen
const DISPLAY: DisplaySize = DisplaySize {
    width: 1080.0,
    height: 1920.0,
};

/// Classify a payload and print what the session would do with it
pub fn classify(payload: &str) -> Result<(), Box<dyn std::error::Error>> {
    match PayloadKind::classify(payload) {
        PayloadKind::Url => {
            println!("kind:   url");
            match payload::origin(payload) {
                Some(origin) => println!("origin: {}", origin),
                None => println!("origin: (unparseable, raw payload used)"),
            }
            println!(
                "icon:   {}",
                payload::icon_lookup_uri(payload, ScanConfig::default().icon_size)
            );
        }
        PayloadKind::Opaque => {
            println!("kind:   opaque");
            println!("action: acknowledge to user, no launch");
        }
    }
    Ok(())
}

/// Fully capable in-memory capture source for the simulation
struct DemoCapture;

impl CaptureSource for DemoCapture {
    fn capabilities(&self) -> CaptureCapabilities {
        CaptureCapabilities::all()
    }

    fn pause(&mut self) -> Result<(), CaptureError> {
        info!("Capture paused");
        Ok(())
    }

    fn resume(&mut self) -> Result<(), CaptureError> {
        info!("Capture resumed");
        Ok(())
    }

    fn snapshot(&mut self) -> BoxFuture<'static, Result<ImageHandle, CaptureError>> {
        Box::pin(async { Ok(ImageHandle::new("memory://frozen-frame")) })
    }

    fn set_illumination(&mut self, on: bool) -> Result<(), CaptureError> {
        info!(on, "Illumination set");
        Ok(())
    }
}

/// Prints the launch instead of performing it
struct DryRunOpener;

impl ResourceOpener for DryRunOpener {
    fn open(&self, uri: &str) -> BoxFuture<'static, Result<(), OpenError>> {
        let uri = uri.to_string();
        Box::pin(async move {
            println!("(dry run) would open {}", uri);
            Ok(())
        })
    }
}

/// Drive one full scan sequence and print every transition
pub fn simulate(
    payload: String,
    no_bounds: bool,
    open_links: bool,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_session(payload, no_bounds, open_links, config))
}

async fn run_session(
    payload: String,
    no_bounds: bool,
    open_links: bool,
    config: ScanConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let opener: Arc<dyn ResourceOpener> = if open_links {
        Arc::new(SystemOpener)
    } else {
        Arc::new(DryRunOpener)
    };

    let (handle, mut updates) = ScanController::spawn(
        config.clone(),
        DISPLAY,
        Box::new(DemoCapture),
        opener,
        Box::new(LogMetrics),
    );

    let bounds = if no_bounds {
        None
    } else {
        Some(Geometry::Rect(centered_bounds(&config)))
    };

    println!("Feeding detection: {}", payload);
    let started = Instant::now();
    handle.on_detection(payload, bounds);

    while let Some(update) = updates.recv().await {
        match update {
            SessionUpdate::StateChanged(session) => {
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                let mut line = format!(
                    "[{:>7.1}ms] state={:<12} preview={:?}",
                    elapsed_ms,
                    session.state.to_string(),
                    session.preview_kind
                );
                if session.preview_kind == PreviewKind::RemoteImage {
                    if let Some(resource) = session.preview_resource.as_deref() {
                        line.push_str(&format!(" resource={}", resource));
                    }
                }
                println!("{}", line);

                if session.state == SessionState::Idle {
                    break;
                }
            }
            SessionUpdate::PayloadAcknowledged { payload } => {
                println!("Scanned data: {}", payload);
            }
        }
    }

    handle.shutdown().await;
    println!("Session complete, re-armed");
    Ok(())
}

/// A detection comfortably inside the configured viewfinder
fn centered_bounds(config: &ScanConfig) -> Rect {
    let rect = ViewfinderRegion::centered(DISPLAY, config.viewfinder_side).rect();
    Rect::new(
        rect.x + rect.width * 0.25,
        rect.y + rect.height * 0.25,
        rect.width * 0.5,
        rect.height * 0.5,
    )
}

fn load_config(path: Option<PathBuf>) -> Result<ScanConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        None => Ok(ScanConfig::default()),
    }
}
