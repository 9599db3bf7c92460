//! The frame loop and its instrumentation: pacing to a target frame rate,
//! the per-frame update/render session, and the sequential-vs-parallel
//! benchmark state machine.

pub mod bench;
pub mod pacer;
pub mod session;

pub use bench::{compute_report, BenchError, BenchPhase, Benchmark};
pub use pacer::{FramePacer, PacerSummary};
pub use session::{run_session, SessionOutcome};
