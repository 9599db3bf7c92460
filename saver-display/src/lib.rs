//! Seams to the screensaver's external collaborators: the rendering
//! surface, the termination signal and the report channel. Real windowed
//! backends implement these traits in downstream binaries; this crate ships
//! the headless and stdio implementations the runner and tests use.

use saver_core::Rgb;
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

// --- Error type ---

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render surface unavailable: {0}")]
    Surface(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

// --- Draw primitives ---

/// One filled shape per entity per frame. Coordinates are the shape center
/// in viewport units; the color is an opaque payload owned by the sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Square {
        x: f32,
        y: f32,
        side: f32,
        color: Rgb,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgb,
    },
}

// --- Benchmark report payload ---

/// A ratio that may be undefined when its denominator was zero. Keeps
/// NaN/Inf out of every report sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    Undefined,
}

impl Metric {
    /// `num / den`, or `Undefined` when `den` is zero.
    pub fn ratio(num: f64, den: f64) -> Metric {
        if den == 0.0 {
            Metric::Undefined
        } else {
            Metric::Value(num / den)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Undefined => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v:.4}"),
            Metric::Undefined => write!(f, "undefined"),
        }
    }
}

/// Outcome of one sequential-vs-parallel benchmark run. Immutable once
/// computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub sequential_secs: f64,
    pub parallel_secs: f64,
    pub workers: usize,
    pub speedup: Metric,
    pub efficiency: Metric,
}

// --- Traits ---

/// Accepts one frame's draw primitives followed by a `present` call. Owns
/// the window/surface lifecycle; surface failure is fatal to the run.
pub trait RenderSink {
    fn begin_frame(&mut self) -> Result<(), RenderError>;
    fn draw(&mut self, primitive: &Primitive) -> Result<(), RenderError>;
    fn present(&mut self) -> Result<(), RenderError>;
}

/// Termination signal, polled exactly once per frame before any update
/// work.
pub trait InputSource {
    /// Whether termination was requested since the last poll.
    fn should_quit(&mut self) -> bool;
}

/// Receives the once-per-second FPS figure and the final benchmark report.
pub trait ReportSink {
    fn report_fps(&mut self, fps: u32);
    fn report_run(&mut self, report: &RunReport);
}

// --- Render sinks ---

/// Headless sink: validates the frame protocol and counts primitives, draws
/// nothing. Used for unattended benchmark runs and tests.
#[derive(Debug, Default)]
pub struct NullRenderer {
    frames: u64,
    primitives: u64,
    in_frame: bool,
}

impl NullRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn primitives(&self) -> u64 {
        self.primitives
    }
}

impl RenderSink for NullRenderer {
    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.in_frame = true;
        Ok(())
    }

    fn draw(&mut self, primitive: &Primitive) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::Surface(
                "draw outside of begin_frame/present".to_string(),
            ));
        }
        log::trace!("draw {primitive:?}");
        self.primitives += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.in_frame = false;
        self.frames += 1;
        Ok(())
    }
}

// --- Report sinks ---

/// Prints FPS and benchmark figures to standard output, matching the
/// original program's once-per-second and end-of-run lines.
pub struct StdioReporter {
    stdout: io::Stdout,
}

impl StdioReporter {
    pub fn new() -> Self {
        StdioReporter {
            stdout: io::stdout(),
        }
    }
}

impl Default for StdioReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for StdioReporter {
    fn report_fps(&mut self, fps: u32) {
        if let Err(e) = writeln!(self.stdout, "FPS: {fps}") {
            log::warn!("failed to write FPS report: {e}");
        }
    }

    fn report_run(&mut self, report: &RunReport) {
        let mut write = || -> io::Result<()> {
            writeln!(
                self.stdout,
                "Sequential time: {:.3} s",
                report.sequential_secs
            )?;
            writeln!(self.stdout, "Parallel time: {:.3} s", report.parallel_secs)?;
            writeln!(self.stdout, "Workers: {}", report.workers)?;
            writeln!(self.stdout, "Speedup: {}", report.speedup)?;
            writeln!(self.stdout, "Efficiency: {}", report.efficiency)
        };
        if let Err(e) = write() {
            log::warn!("failed to write benchmark report: {e}");
        }
    }
}

/// Captures everything it receives; for tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub fps: Vec<u32>,
    pub runs: Vec<RunReport>,
}

impl ReportSink for MemoryReporter {
    fn report_fps(&mut self, fps: u32) {
        self.fps.push(fps);
    }

    fn report_run(&mut self, report: &RunReport) {
        self.runs.push(*report);
    }
}

// --- Input sources ---

/// Never requests termination; pair with a frame cap.
#[derive(Debug, Default)]
pub struct Never;

impl InputSource for Never {
    fn should_quit(&mut self) -> bool {
        false
    }
}

/// Requests termination after a fixed number of polls. Gives benchmark
/// phases a deterministic length in tests and unattended runs.
#[derive(Debug)]
pub struct FrameLimit {
    remaining: u64,
}

impl FrameLimit {
    pub fn new(frames: u64) -> Self {
        FrameLimit { remaining: frames }
    }
}

impl InputSource for FrameLimit {
    fn should_quit(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// Turns Ctrl+C presses into per-frame quit polls. The handler is installed
/// once per process; clones share the same channel, so each press ends
/// exactly one phase.
#[derive(Debug, Clone)]
pub struct CtrlcInput {
    signals: crossbeam_channel::Receiver<()>,
}

impl CtrlcInput {
    pub fn install() -> Result<Self, ctrlc::Error> {
        let (tx, rx) = crossbeam_channel::unbounded();
        ctrlc::set_handler(move || {
            // A full channel just means a press is already pending.
            let _ = tx.send(());
        })?;
        log::debug!("Ctrl+C handler installed");
        Ok(CtrlcInput { signals: rx })
    }
}

impl InputSource for CtrlcInput {
    fn should_quit(&mut self) -> bool {
        self.signals.try_recv().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_ratio_guards_zero_denominator() {
        assert_eq!(Metric::ratio(2.0, 0.0), Metric::Undefined);
        assert_eq!(Metric::ratio(2.0, 4.0), Metric::Value(0.5));
    }

    #[test]
    fn metric_display_never_prints_nan() {
        assert_eq!(Metric::Undefined.to_string(), "undefined");
        assert_eq!(Metric::Value(1.5).to_string(), "1.5000");
    }

    #[test]
    fn null_renderer_counts_frames_and_primitives() {
        let mut sink = NullRenderer::default();
        let square = Primitive::Square {
            x: 1.0,
            y: 2.0,
            side: 4.0,
            color: Rgb { r: 1, g: 2, b: 3 },
        };

        for _ in 0..3 {
            sink.begin_frame().unwrap();
            sink.draw(&square).unwrap();
            sink.draw(&square).unwrap();
            sink.present().unwrap();
        }

        assert_eq!(sink.frames(), 3);
        assert_eq!(sink.primitives(), 6);
    }

    #[test]
    fn null_renderer_rejects_draw_outside_frame() {
        let mut sink = NullRenderer::default();
        let circle = Primitive::Circle {
            x: 0.0,
            y: 0.0,
            radius: 1.0,
            color: Rgb { r: 0, g: 0, b: 0 },
        };
        assert!(sink.draw(&circle).is_err());
    }

    #[test]
    fn frame_limit_quits_after_cap() {
        let mut input = FrameLimit::new(2);
        assert!(!input.should_quit());
        assert!(!input.should_quit());
        assert!(input.should_quit());
        assert!(input.should_quit());
    }

    #[test]
    fn memory_reporter_captures_reports() {
        let mut sink = MemoryReporter::default();
        sink.report_fps(60);
        sink.report_run(&RunReport {
            sequential_secs: 2.0,
            parallel_secs: 1.0,
            workers: 4,
            speedup: Metric::Value(2.0),
            efficiency: Metric::Value(0.5),
        });
        assert_eq!(sink.fps, vec![60]);
        assert_eq!(sink.runs.len(), 1);
    }
}
