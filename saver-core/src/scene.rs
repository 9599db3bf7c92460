use crate::entity::{Entity, Rgb, Shape};
use rand::Rng;

/// Viewport extents. Entities live in `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

// Spawn ranges used by the original screensaver: entities appear at least
// this far from the walls, with extents and per-axis speeds in these bands.
const SPAWN_INSET: f32 = 30.0;
const MIN_EXTENT: f32 = 5.0;
const MAX_EXTENT: f32 = 15.0;
const MIN_SPEED: i32 = 1;
const MAX_SPEED: i32 = 5;

/// The entity collection: one contiguously-owned buffer holding all entities
/// for the whole run, plus the viewport bounds and the symmetric velocity
/// clamp shared by every update.
///
/// The buffer is never resized after construction. Steppers mutate it in
/// place, exactly once per frame; rendering reads it between frames.
pub struct Scene {
    entities: Vec<Entity>,
    bounds: Bounds,
    speed_limit: f32,
}

impl Scene {
    /// Build a scene of `count` randomly-placed entities from an explicit
    /// generator, so a fixed seed reproduces the exact initial state.
    ///
    /// `bounds` must leave room for the spawn inset on both axes (the
    /// config layer validates this before construction).
    pub fn populate(
        count: usize,
        bounds: Bounds,
        speed_limit: f32,
        shape: Shape,
        rng: &mut impl Rng,
    ) -> Self {
        let mut entities = Vec::with_capacity(count);
        for _ in 0..count {
            let x = rng.gen_range(SPAWN_INSET..bounds.width - SPAWN_INSET);
            let y = rng.gen_range(SPAWN_INSET..bounds.height - SPAWN_INSET);
            let extent = rng.gen_range(MIN_EXTENT..MAX_EXTENT);
            let vx = rng.gen_range(MIN_SPEED..=MAX_SPEED) as f32;
            let vy = rng.gen_range(MIN_SPEED..=MAX_SPEED) as f32;
            let color = Rgb {
                r: rng.gen(),
                g: rng.gen(),
                b: rng.gen(),
            };
            entities.push(Entity {
                x,
                y,
                vx,
                vy,
                extent,
                shape,
                color,
            });
        }
        Scene {
            entities,
            bounds,
            speed_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn speed_limit(&self) -> f32 {
        self.speed_limit
    }

    /// Read-only view for the render phase.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Mutable view for the update phase. Steppers hold this exclusively for
    /// the duration of a tick.
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }
}
