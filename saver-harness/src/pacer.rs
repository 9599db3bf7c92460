use hdrhistogram::Histogram;
use saver_display::ReportSink;
use spin_sleep::SpinSleeper;
use std::time::{Duration, Instant};

/// Frame-time percentiles over the frames recorded since the last reset,
/// measured before the pacing sleep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacerSummary {
    pub frames: u64,
    pub mean: Duration,
    pub p50: Duration,
    pub p99: Duration,
}

/// Paces frames to a fixed budget and aggregates an FPS figure over a
/// rolling one-second window.
///
/// `begin_frame` marks the frame start; `end_frame` sleeps away whatever is
/// left of the budget and, once per window, hands the frame count to the
/// report sink. The sleep is bounded by the budget, so pacing can never
/// delay a shutdown past the next frame boundary.
pub struct FramePacer {
    budget: Duration,
    window: Duration,
    sleeper: SpinSleeper,
    frame_start: Instant,
    window_start: Instant,
    frames_in_window: u32,
    frame_times: Histogram<u64>,
}

impl FramePacer {
    /// A `target_fps` of zero disables pacing (frames run back to back);
    /// the FPS window still reports.
    pub fn new(target_fps: u32) -> Self {
        Self::with_window(target_fps, Duration::from_secs(1))
    }

    /// Same as [`FramePacer::new`] with an explicit FPS window, so tests do
    /// not have to wait out a full second.
    pub fn with_window(target_fps: u32, window: Duration) -> Self {
        let budget = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        };
        let now = Instant::now();
        FramePacer {
            budget,
            window,
            sleeper: SpinSleeper::default(),
            frame_start: now,
            window_start: now,
            frames_in_window: 0,
            frame_times: Histogram::new(3).expect("3 significant figures is a valid precision"),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Record the frame's working time, sleep out the rest of the budget,
    /// and emit an FPS figure once per window.
    pub fn end_frame(&mut self, report: &mut dyn ReportSink) {
        let elapsed = self.frame_start.elapsed();
        if self
            .frame_times
            .record(elapsed.as_micros() as u64)
            .is_err()
        {
            log::warn!("frame time {elapsed:?} exceeded histogram range");
        }

        if elapsed < self.budget {
            self.sleeper.sleep(self.budget - elapsed);
        } else if !self.budget.is_zero() {
            log::debug!("frame time exceeded budget: {elapsed:?} > {:?}", self.budget);
        }

        self.frames_in_window += 1;
        if self.window_start.elapsed() >= self.window {
            report.report_fps(self.frames_in_window);
            self.frames_in_window = 0;
            self.window_start = Instant::now();
        }
    }

    /// Clear the window and histogram; called between benchmark phases so
    /// each phase measures a fresh workload.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.frame_start = now;
        self.window_start = now;
        self.frames_in_window = 0;
        self.frame_times.reset();
    }

    pub fn summary(&self) -> PacerSummary {
        let micros = |v: u64| Duration::from_micros(v);
        PacerSummary {
            frames: self.frame_times.len(),
            mean: Duration::from_secs_f64(self.frame_times.mean() / 1_000_000.0),
            p50: micros(self.frame_times.value_at_quantile(0.5)),
            p99: micros(self.frame_times.value_at_quantile(0.99)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saver_display::MemoryReporter;

    #[test]
    fn sleeps_out_the_frame_budget() {
        let mut pacer = FramePacer::new(100); // 10 ms budget
        let mut report = MemoryReporter::default();

        let start = Instant::now();
        pacer.begin_frame();
        pacer.end_frame(&mut report);
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn zero_fps_means_unpaced() {
        let mut pacer = FramePacer::new(0);
        let mut report = MemoryReporter::default();

        let start = Instant::now();
        for _ in 0..100 {
            pacer.begin_frame();
            pacer.end_frame(&mut report);
        }
        // No budget, so 100 frames take well under a real frame budget.
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn reports_fps_once_per_window() {
        let mut pacer = FramePacer::with_window(0, Duration::from_millis(20));
        let mut report = MemoryReporter::default();

        let start = Instant::now();
        while start.elapsed() < Duration::from_millis(50) {
            pacer.begin_frame();
            pacer.end_frame(&mut report);
        }

        assert!(!report.fps.is_empty(), "expected at least one FPS report");
        let total: u32 = report.fps.iter().sum();
        assert!(total > 0);
    }

    #[test]
    fn summary_tracks_recorded_frames() {
        let mut pacer = FramePacer::new(0);
        let mut report = MemoryReporter::default();
        for _ in 0..10 {
            pacer.begin_frame();
            pacer.end_frame(&mut report);
        }
        assert_eq!(pacer.summary().frames, 10);

        pacer.reset();
        assert_eq!(pacer.summary().frames, 0);
    }
}
