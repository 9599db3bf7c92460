use crate::partition::{partition, PartitionError};
use crate::scene::Scene;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

// --- Error type ---

#[derive(Debug, Error)]
pub enum StepperError {
    #[error(transparent)]
    Partition(#[from] PartitionError),
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

// --- Stepper seam ---

/// Advances every entity in a scene exactly once per call.
///
/// Implementations must guarantee that when `advance` returns, all entities
/// have been stepped: the render phase runs strictly after this barrier and
/// never observes a partially-updated frame.
pub trait Stepper: Send {
    fn advance(&self, scene: &mut Scene);

    /// Degree of parallelism applied to the update phase.
    fn workers(&self) -> usize;

    fn label(&self) -> &'static str;
}

// --- Sequential baseline ---

/// Steps entities in index order on the calling thread. Serves as the
/// benchmark baseline and as the correctness reference for the parallel
/// stepper.
pub struct SequentialStepper;

impl Stepper for SequentialStepper {
    fn advance(&self, scene: &mut Scene) {
        let bounds = scene.bounds();
        let limit = scene.speed_limit();
        for entity in scene.entities_mut() {
            entity.step(bounds, limit);
        }
    }

    fn workers(&self) -> usize {
        1
    }

    fn label(&self) -> &'static str {
        "sequential"
    }
}

// --- Parallel stepper ---

/// Steps disjoint index ranges of the entity buffer on a persistent worker
/// pool. Each frame is a fork-join: one task per partition range is spawned
/// into a pool scope, and the scope's exit is the barrier — `advance`
/// returns only after every worker has finished its range.
pub struct ParallelStepper {
    pool: ThreadPool,
    workers: usize,
}

impl ParallelStepper {
    pub fn new(workers: usize) -> Result<Self, StepperError> {
        if workers == 0 {
            return Err(PartitionError::ZeroWorkers.into());
        }
        let pool = ThreadPoolBuilder::new().num_threads(workers).build()?;
        log::debug!("parallel stepper ready with {workers} workers");
        Ok(ParallelStepper { pool, workers })
    }
}

impl Stepper for ParallelStepper {
    fn advance(&self, scene: &mut Scene) {
        let bounds = scene.bounds();
        let limit = scene.speed_limit();
        let ranges =
            partition(scene.len(), self.workers).expect("worker count validated at construction");

        let mut rest = scene.entities_mut();
        self.pool.scope(|scope| {
            for range in ranges {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                scope.spawn(move |_| {
                    for entity in chunk {
                        entity.step(bounds, limit);
                    }
                });
            }
            // The scope joins every spawned task before returning: this is
            // the per-frame barrier between update and render.
        });
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn label(&self) -> &'static str {
        "parallel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Shape;
    use crate::scene::{Bounds, Scene};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BOUNDS: Bounds = Bounds {
        width: 700.0,
        height: 700.0,
    };

    fn scene(n: usize, seed: u64) -> Scene {
        let mut rng = StdRng::seed_from_u64(seed);
        Scene::populate(n, BOUNDS, 5.0, Shape::Circle, &mut rng)
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(
            ParallelStepper::new(0),
            Err(StepperError::Partition(PartitionError::ZeroWorkers))
        ));
    }

    #[test]
    fn parallel_matches_sequential() {
        // Same seed, 100 ticks, four workers: the per-entity rule touches no
        // other entity, so the final states must agree.
        let mut seq_scene = scene(10, 42);
        let mut par_scene = scene(10, 42);

        let sequential = SequentialStepper;
        let parallel = ParallelStepper::new(4).unwrap();

        for _ in 0..100 {
            sequential.advance(&mut seq_scene);
            parallel.advance(&mut par_scene);
        }

        for (a, b) in seq_scene.entities().iter().zip(par_scene.entities()) {
            assert!((a.x - b.x).abs() < f32::EPSILON);
            assert!((a.y - b.y).abs() < f32::EPSILON);
            assert!((a.vx - b.vx).abs() < f32::EPSILON);
            assert!((a.vy - b.vy).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn more_workers_than_entities() {
        let mut small = scene(3, 9);
        let parallel = ParallelStepper::new(6).unwrap();
        let before: Vec<_> = small.entities().to_vec();
        parallel.advance(&mut small);
        // Every entity advanced exactly once.
        for (old, new) in before.iter().zip(small.entities()) {
            assert_eq!(new.x, old.x + old.vx);
            assert_eq!(new.y, old.y + old.vy);
        }
    }

    #[test]
    fn scene_stays_in_bounds_under_parallel_stepping() {
        let mut s = scene(50, 1234);
        let parallel = ParallelStepper::new(6).unwrap();
        for _ in 0..1_000 {
            parallel.advance(&mut s);
        }
        for e in s.entities() {
            assert!(e.x >= 0.0 && e.x <= BOUNDS.width);
            assert!(e.y >= 0.0 && e.y <= BOUNDS.height);
            assert!(e.vx.abs() <= 5.0 && e.vy.abs() <= 5.0);
        }
    }
}
