use crate::pacer::FramePacer;
use crate::session::run_session;
use saver_core::{ParallelStepper, Scene, SequentialStepper, Stepper};
use saver_display::{InputSource, Metric, RenderError, RenderSink, ReportSink, RunReport};
use std::time::Duration;
use thiserror::Error;

// --- Error type ---

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("cannot {operation} during the {phase:?} phase")]
    Phase {
        operation: &'static str,
        phase: BenchPhase,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

// --- State machine ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchPhase {
    Idle,
    RunningSequential,
    RunningParallel,
    Reported,
}

/// Derive the benchmark figures from the two phase timings. Both ratios
/// fall back to [`Metric::Undefined`] when their denominator is zero, so
/// division never produces NaN or infinity.
pub fn compute_report(sequential: Duration, parallel: Duration, workers: usize) -> RunReport {
    let sequential_secs = sequential.as_secs_f64();
    let parallel_secs = parallel.as_secs_f64();
    let speedup = Metric::ratio(sequential_secs, parallel_secs);
    let efficiency = match speedup {
        Metric::Value(s) => Metric::ratio(s, workers as f64),
        Metric::Undefined => Metric::Undefined,
    };
    RunReport {
        sequential_secs,
        parallel_secs,
        workers,
        speedup,
        efficiency,
    }
}

/// Times a sequential pass and a parallel pass over the same scene and
/// reports speedup and efficiency.
///
/// Phases must run in order: `run_sequential`, then `run_parallel`, then
/// `finish`; anything else is a [`BenchError::Phase`]. The harness only
/// times — giving both phases comparable workloads (same entity count,
/// same termination policy) is the caller's obligation, or the resulting
/// ratio is meaningless.
pub struct Benchmark {
    phase: BenchPhase,
    workers: usize,
    sequential: Duration,
    parallel: Duration,
}

impl Benchmark {
    pub fn new(workers: usize) -> Self {
        Benchmark {
            phase: BenchPhase::Idle,
            workers,
            sequential: Duration::ZERO,
            parallel: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> BenchPhase {
        self.phase
    }

    /// Drive the sequential baseline until the input source quits or the
    /// frame cap is reached, recording wall-clock time as T_seq.
    #[allow(clippy::too_many_arguments)]
    pub fn run_sequential(
        &mut self,
        scene: &mut Scene,
        stepper: &SequentialStepper,
        renderer: &mut dyn RenderSink,
        input: &mut dyn InputSource,
        pacer: &mut FramePacer,
        report: &mut dyn ReportSink,
        max_frames: Option<u64>,
    ) -> Result<(), BenchError> {
        if self.phase != BenchPhase::Idle {
            return Err(BenchError::Phase {
                operation: "start the sequential phase",
                phase: self.phase,
            });
        }
        self.phase = BenchPhase::RunningSequential;
        pacer.reset();
        let outcome = run_session(scene, stepper, renderer, input, pacer, report, max_frames)?;
        self.sequential = outcome.elapsed;
        log::info!(
            "sequential phase: {} frames, {:.3} s",
            outcome.frames,
            self.sequential.as_secs_f64()
        );
        Ok(())
    }

    /// Drive the parallel stepper over the same scene, recording T_par.
    /// Counters reset at phase entry so the FPS window starts fresh.
    #[allow(clippy::too_many_arguments)]
    pub fn run_parallel(
        &mut self,
        scene: &mut Scene,
        stepper: &ParallelStepper,
        renderer: &mut dyn RenderSink,
        input: &mut dyn InputSource,
        pacer: &mut FramePacer,
        report: &mut dyn ReportSink,
        max_frames: Option<u64>,
    ) -> Result<(), BenchError> {
        if self.phase != BenchPhase::RunningSequential {
            return Err(BenchError::Phase {
                operation: "start the parallel phase",
                phase: self.phase,
            });
        }
        self.phase = BenchPhase::RunningParallel;
        pacer.reset();
        let outcome = run_session(scene, stepper, renderer, input, pacer, report, max_frames)?;
        self.parallel = outcome.elapsed;
        log::info!(
            "parallel phase ({} workers): {} frames, {:.3} s",
            stepper.workers(),
            outcome.frames,
            self.parallel.as_secs_f64()
        );
        Ok(())
    }

    /// Compute the report, deliver it to the sink, and move to `Reported`.
    pub fn finish(&mut self, report: &mut dyn ReportSink) -> Result<RunReport, BenchError> {
        if self.phase != BenchPhase::RunningParallel {
            return Err(BenchError::Phase {
                operation: "finish",
                phase: self.phase,
            });
        }
        let run = compute_report(self.sequential, self.parallel, self.workers);
        report.report_run(&run);
        self.phase = BenchPhase::Reported;
        Ok(run)
    }

    /// Return to `Idle` for another run.
    pub fn reset(&mut self) {
        self.phase = BenchPhase::Idle;
        self.sequential = Duration::ZERO;
        self.parallel = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use saver_core::{Bounds, Shape};
    use saver_display::{MemoryReporter, Never, NullRenderer};

    fn scene(n: usize) -> Scene {
        let mut rng = StdRng::seed_from_u64(42);
        Scene::populate(
            n,
            Bounds {
                width: 700.0,
                height: 700.0,
            },
            5.0,
            Shape::Circle,
            &mut rng,
        )
    }

    #[test]
    fn undefined_when_parallel_time_is_zero() {
        let run = compute_report(Duration::from_secs(2), Duration::ZERO, 6);
        assert_eq!(run.speedup, Metric::Undefined);
        assert_eq!(run.efficiency, Metric::Undefined);
    }

    #[test]
    fn undefined_when_worker_count_is_zero() {
        let run = compute_report(Duration::from_secs(2), Duration::from_secs(1), 0);
        assert_eq!(run.speedup, Metric::Value(2.0));
        assert_eq!(run.efficiency, Metric::Undefined);
    }

    #[test]
    fn efficiency_is_speedup_over_workers() {
        let run = compute_report(Duration::from_secs(3), Duration::from_secs(1), 6);
        let speedup = run.speedup.value().unwrap();
        let efficiency = run.efficiency.value().unwrap();
        assert!((speedup - 3.0).abs() < 1e-9);
        assert!((efficiency - 0.5).abs() < 1e-9);
    }

    #[test]
    fn phases_must_run_in_order() {
        let mut bench = Benchmark::new(6);
        let mut report = MemoryReporter::default();

        // Finishing from Idle is a phase error.
        assert!(matches!(
            bench.finish(&mut report),
            Err(BenchError::Phase { .. })
        ));

        // The parallel phase cannot come first either.
        let mut scene = scene(10);
        let parallel = ParallelStepper::new(2).unwrap();
        let mut renderer = NullRenderer::default();
        let mut input = Never;
        let mut pacer = FramePacer::new(0);
        assert!(matches!(
            bench.run_parallel(
                &mut scene,
                &parallel,
                &mut renderer,
                &mut input,
                &mut pacer,
                &mut report,
                Some(1),
            ),
            Err(BenchError::Phase { .. })
        ));
    }

    #[test]
    fn full_run_produces_a_well_formed_report() {
        // Matched workloads: same scene, 120 frames per phase, six workers.
        let mut scene = scene(50);
        let sequential = SequentialStepper;
        let parallel = ParallelStepper::new(6).unwrap();
        let mut renderer = NullRenderer::default();
        let mut pacer = FramePacer::new(0);
        let mut report = MemoryReporter::default();
        let mut bench = Benchmark::new(6);

        bench
            .run_sequential(
                &mut scene,
                &sequential,
                &mut renderer,
                &mut Never,
                &mut pacer,
                &mut report,
                Some(120),
            )
            .unwrap();
        assert_eq!(bench.phase(), BenchPhase::RunningSequential);

        bench
            .run_parallel(
                &mut scene,
                &parallel,
                &mut renderer,
                &mut Never,
                &mut pacer,
                &mut report,
                Some(120),
            )
            .unwrap();
        assert_eq!(bench.phase(), BenchPhase::RunningParallel);

        let run = bench.finish(&mut report).unwrap();
        assert_eq!(bench.phase(), BenchPhase::Reported);
        assert_eq!(report.runs.len(), 1);

        assert!(run.sequential_secs > 0.0);
        assert!(run.parallel_secs > 0.0);
        assert_eq!(run.workers, 6);
        let speedup = run.speedup.value().expect("nonzero times give a value");
        let efficiency = run.efficiency.value().expect("nonzero workers");
        assert!(speedup > 0.0);
        assert!((efficiency - speedup / 6.0).abs() < 1e-9);

        // Both phases rendered the full workload.
        assert_eq!(renderer.frames(), 240);
        assert_eq!(renderer.primitives(), 240 * 50);

        bench.reset();
        assert_eq!(bench.phase(), BenchPhase::Idle);
    }
}
