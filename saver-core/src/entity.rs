use crate::scene::Bounds;

// --- Cosmetic payload ---

/// Opaque RGB color carried through to the render sink. The core never
/// inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Which draw primitive the render sink should use for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
}

// --- Entity ---

/// One independently-moving simulated object. Its id is its index in the
/// scene's entity buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Radius for circles, half-size for squares.
    pub extent: f32,
    pub shape: Shape,
    pub color: Rgb,
}

impl Entity {
    /// Advance this entity by one tick: integrate velocity, reflect off the
    /// viewport walls, then clamp both velocity components to
    /// `[-speed_limit, speed_limit]`.
    ///
    /// Touches only `self` and performs no I/O, so disjoint entities can be
    /// stepped concurrently.
    pub fn step(&mut self, bounds: Bounds, speed_limit: f32) {
        self.x += self.vx;
        self.y += self.vy;

        // Reposition onto the legal interval before negating, so the bounds
        // invariant holds even for an entity pushed past a wall.
        if self.x - self.extent <= 0.0 {
            self.x = self.extent;
            self.vx = -self.vx;
        } else if self.x + self.extent >= bounds.width {
            self.x = bounds.width - self.extent;
            self.vx = -self.vx;
        }

        if self.y - self.extent <= 0.0 {
            self.y = self.extent;
            self.vy = -self.vy;
        } else if self.y + self.extent >= bounds.height {
            self.y = bounds.height - self.extent;
            self.vy = -self.vy;
        }

        self.vx = self.vx.clamp(-speed_limit, speed_limit);
        self.vy = self.vy.clamp(-speed_limit, speed_limit);
    }
}
