//! `scrollview-replay`: drive a [`ScrollView`] from a scripted gesture file.
//!
//! The script is JSON: window and content rects, optional zoom bounds and
//! config, then a list of events. `frame` events advance a manual clock by one
//! frame period and run an update; every other event is fed to the view at the
//! current clock time. One JSON line is written to stdout per frame.


use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use serde_json::json;

use scrollview::ScrollView;
use scrollview::clock::ManualClock;
use scrollview::config::{ConfigError, ScrollViewConfig};
use scrollview::geometry::{Point, Rect};
use scrollview::input::ContactId;

#[derive(Debug, thiserror::Error)]
enum ReplayError {
    #[error("cannot read script {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid script JSON: {0}")]
    Script(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("frames per second must be positive, got {0}")]
    InvalidFrameRate(f64),
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "scrollview-replay", about = "Replay a scripted gesture file through a scroll view")]
struct Cli {
    /// Path to the JSON script.
    script: PathBuf,

    #[arg(long, env = "SCROLLVIEW_REPLAY_FPS", default_value_t = 60.0)]
    frames_per_sec: f64,
}

// =============================================================================
// SCRIPT FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
struct Script {
    window: Rect,
    #[serde(default)]
    content: Option<Rect>,
    #[serde(default)]
    zoom_min: Option<f64>,
    #[serde(default)]
    zoom_max: Option<f64>,
    #[serde(default)]
    zoom_multiplier: Option<f64>,
    /// Derive the minimum zoom from the window and content sizes.
    #[serde(default)]
    fit_content: bool,
    #[serde(default)]
    config: Option<ScrollViewConfig>,
    #[serde(default)]
    events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ScriptEvent {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        id: ContactId,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        id: ContactId,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        id: ContactId,
    },
    Cancel {
        x: f64,
        y: f64,
        #[serde(default)]
        id: ContactId,
    },
    DoubleTap {
        x: f64,
        y: f64,
        #[serde(default)]
        id: ContactId,
    },
    ZoomTo {
        x: f64,
        y: f64,
        zoom: f64,
        #[serde(default)]
        secs: f64,
    },
    SetScroll {
        x: f64,
        y: f64,
        #[serde(default)]
        ease: bool,
    },
    Frame {
        #[serde(default = "one_frame")]
        count: u32,
    },
}

fn one_frame() -> u32 {
    1
}

// =============================================================================
// REPLAY
// =============================================================================

fn main() -> Result<(), ReplayError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.script).map_err(|source| ReplayError::Read { path: cli.script.clone(), source })?;
    let script: Script = serde_json::from_str(&text)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let frames = replay(&script, cli.frames_per_sec, &mut out)?;
    tracing::info!(frames, script = %cli.script.display(), "replay finished");
    Ok(())
}

/// Run `script` and write one JSON line per frame to `out`. Returns the frame count.
fn replay<W: Write>(script: &Script, frames_per_sec: f64, out: &mut W) -> Result<u64, ReplayError> {
    if !(frames_per_sec.is_finite() && frames_per_sec > 0.0) {
        return Err(ReplayError::InvalidFrameRate(frames_per_sec));
    }
    let frame_secs = 1.0 / frames_per_sec;

    let config = script.config.unwrap_or_default().with_env_overrides()?;
    let clock = ManualClock::new(0.0);
    let mut view = build_view(script, config, clock.clone());

    let mut frame: u64 = 0;
    for event in &script.events {
        match *event {
            ScriptEvent::Frame { count } => {
                for _ in 0..count {
                    frame += 1;
                    let now = clock_secs(frame, frame_secs);
                    clock.set(now);
                    view.update();
                    write_frame(out, frame, now, &view)?;
                }
            }
            other => apply_event(&mut view, other),
        }
    }
    Ok(frame)
}

fn build_view(script: &Script, config: ScrollViewConfig, clock: ManualClock) -> ScrollView {
    let mut view = ScrollView::with_clock(clock);
    view.set_window_rect(script.window);
    if let Some(content) = script.content {
        view.set_content_rect(content);
    }
    view.setup();
    view.apply_config(config);

    if let (Some(min), Some(max)) = (script.zoom_min, script.zoom_max) {
        view.set_zoom_min_max(min, max);
    }
    if let Some(multiplier) = script.zoom_multiplier {
        view.set_zoom_multiplier(multiplier);
    }
    if script.fit_content {
        view.fit_content_to_window();
    }
    view.reset();
    view
}

fn apply_event(view: &mut ScrollView, event: ScriptEvent) {
    let consumed = match event {
        ScriptEvent::Down { x, y, id } => view.pointer_down(x, y, id),
        ScriptEvent::Move { x, y, id } => view.pointer_moved(x, y, id),
        ScriptEvent::Up { x, y, id } => view.pointer_up(x, y, id),
        ScriptEvent::Cancel { x, y, id } => view.pointer_cancelled(x, y, id),
        ScriptEvent::DoubleTap { x, y, id } => view.double_tap(x, y, id),
        ScriptEvent::ZoomTo { x, y, zoom, secs } => {
            view.zoom_to(Point::new(x, y), zoom, secs);
            true
        }
        ScriptEvent::SetScroll { x, y, ease } => {
            view.set_scroll_position(x, y, ease);
            true
        }
        ScriptEvent::Frame { .. } => false,
    };
    tracing::debug!(?event, consumed, "event applied");
}

fn clock_secs(frame: u64, frame_secs: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let frames = frame as f64;
    frames * frame_secs
}

fn write_frame<W: Write>(out: &mut W, frame: u64, time_secs: f64, view: &ScrollView) -> Result<(), ReplayError> {
    let scroll = view.scroll_position();
    let line = json!({
        "frame": frame,
        "time": time_secs,
        "scroll": [scroll.x, scroll.y],
        "zoom": view.zoom(),
        "matrix": view.matrix().to_cols_array(),
    });
    writeln!(out, "{line}")?;
    Ok(())
}
