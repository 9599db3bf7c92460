use crate::pacer::FramePacer;
use saver_core::{Entity, Scene, Shape, Stepper};
use saver_display::{InputSource, Primitive, RenderError, RenderSink, ReportSink};
use std::time::{Duration, Instant};

/// What a frame loop did before it stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOutcome {
    pub frames: u64,
    pub elapsed: Duration,
}

fn primitive_for(entity: &Entity) -> Primitive {
    match entity.shape {
        Shape::Circle => Primitive::Circle {
            x: entity.x,
            y: entity.y,
            radius: entity.extent,
            color: entity.color,
        },
        Shape::Square => Primitive::Square {
            x: entity.x,
            y: entity.y,
            side: entity.extent * 2.0,
            color: entity.color,
        },
    }
}

/// Drive the frame loop until the input source requests termination or the
/// optional frame cap is reached.
///
/// Each frame: poll quit → advance every entity through the stepper (the
/// stepper's barrier guarantees a fully-updated scene) → submit one
/// primitive per entity and present → pace. Rendering only ever sees the
/// scene between ticks, read-only.
pub fn run_session(
    scene: &mut Scene,
    stepper: &dyn Stepper,
    renderer: &mut dyn RenderSink,
    input: &mut dyn InputSource,
    pacer: &mut FramePacer,
    report: &mut dyn ReportSink,
    max_frames: Option<u64>,
) -> Result<SessionOutcome, RenderError> {
    let started = Instant::now();
    let mut frames = 0u64;

    loop {
        if input.should_quit() {
            log::debug!("{} session: quit requested", stepper.label());
            break;
        }
        if max_frames.is_some_and(|cap| frames >= cap) {
            break;
        }

        pacer.begin_frame();
        stepper.advance(scene);

        renderer.begin_frame()?;
        for entity in scene.entities() {
            renderer.draw(&primitive_for(entity))?;
        }
        renderer.present()?;

        pacer.end_frame(report);
        frames += 1;
    }

    let outcome = SessionOutcome {
        frames,
        elapsed: started.elapsed(),
    };
    let summary = pacer.summary();
    log::info!(
        "{} session: {} frames in {:.3} s (frame time p50 {:?}, p99 {:?})",
        stepper.label(),
        outcome.frames,
        outcome.elapsed.as_secs_f64(),
        summary.p50,
        summary.p99,
    );
    Ok(outcome)
}
