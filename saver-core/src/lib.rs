//! Core simulation state for the screensaver: entities, the scene arena that
//! owns them, index partitioning and the sequential/parallel steppers.
//!
//! Rendering, input and reporting live behind traits in `saver-display`; this
//! crate performs no I/O and owns no threads other than the parallel
//! stepper's worker pool.

pub mod entity;
pub mod partition;
pub mod scene;
pub mod stepper;

pub use entity::{Entity, Rgb, Shape};
pub use partition::{partition, PartitionError};
pub use scene::{Bounds, Scene};
pub use stepper::{ParallelStepper, SequentialStepper, Stepper, StepperError};
