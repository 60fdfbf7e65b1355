use std::rc::Rc;

use crate::foundation::core::{Affine, PixelMap, Point, Repetition, Rgba8};

/// Image tiled across the plane, the way `createPattern` paints.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    image: Rc<PixelMap>,
    repetition: Repetition,
    transform: Affine,
}

impl Pattern {
    /// Tile `image` with the given repetition and an identity pattern transform.
    pub fn new(image: Rc<PixelMap>, repetition: Repetition) -> Self {
        Self {
            image,
            repetition,
            transform: Affine::IDENTITY,
        }
    }

    /// Replace the pattern-space to user-space transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    /// Builder form of [`Pattern::set_transform`].
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Source pixels.
    pub fn image(&self) -> &Rc<PixelMap> {
        &self.image
    }

    /// Tiling mode.
    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    /// Pattern transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Color painted at `p` in user space (nearest-neighbor).
    pub fn color_at(&self, p: Point) -> Rgba8 {
        let (w, h) = (i64::from(self.image.width()), i64::from(self.image.height()));
        if w == 0 || h == 0 {
            return Rgba8::TRANSPARENT;
        }
        let local = self.transform.inverse() * p;
        let (x, y) = (local.x.floor() as i64, local.y.floor() as i64);
        let (repeat_x, repeat_y) = match self.repetition {
            Repetition::Repeat => (true, true),
            Repetition::RepeatX => (true, false),
            Repetition::RepeatY => (false, true),
            Repetition::NoRepeat => (false, false),
        };
        let Some(x) = tile(x, w, repeat_x) else {
            return Rgba8::TRANSPARENT;
        };
        let Some(y) = tile(y, h, repeat_y) else {
            return Rgba8::TRANSPARENT;
        };
        self.image
            .pixel(x as u32, y as u32)
            .unwrap_or(Rgba8::TRANSPARENT)
    }
}

fn tile(v: i64, len: i64, repeat: bool) -> Option<i64> {
    if repeat {
        Some(v.rem_euclid(len))
    } else {
        (0..len).contains(&v).then_some(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/pattern.rs"]
mod tests;
