use std::f64::consts::TAU;

use smallvec::SmallVec;

use crate::foundation::core::{Point, Rgba8, Vec2};
use crate::foundation::error::{CanvasError, CanvasResult};

/// Geometry of a gradient.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GradientKind {
    /// Color varies along the line from `start` to `end`.
    Linear {
        /// Where offset 0 lies.
        start: Point,
        /// Where offset 1 lies.
        end: Point,
    },
    /// Color varies between two circles.
    Radial {
        /// Center of the start circle.
        start_center: Point,
        /// Radius of the start circle.
        start_radius: f64,
        /// Center of the end circle.
        end_center: Point,
        /// Radius of the end circle.
        end_radius: f64,
    },
    /// Color varies with the angle around `center`.
    Conic {
        /// Angle in radians where offset 0 lies.
        start_angle: f64,
        /// Center of rotation.
        center: Point,
    },
}

/// One color stop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    /// Position in `[0, 1]`.
    pub offset: f64,
    /// Straight-alpha color.
    pub color: Rgba8,
}

/// Canvas gradient: geometry plus ordered color stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    kind: GradientKind,
    stops: SmallVec<[ColorStop; 4]>,
}

impl Gradient {
    /// Gradient of the given geometry with no stops.
    pub fn new(kind: GradientKind) -> Self {
        Self {
            kind,
            stops: SmallVec::new(),
        }
    }

    /// Linear gradient from `start` to `end`.
    pub fn linear(start: Point, end: Point) -> Self {
        Self::new(GradientKind::Linear { start, end })
    }

    /// Two-circle radial gradient.
    pub fn radial(
        start_center: Point,
        start_radius: f64,
        end_center: Point,
        end_radius: f64,
    ) -> CanvasResult<Self> {
        if start_radius < 0.0 || end_radius < 0.0 {
            return Err(CanvasError::validation(format!(
                "radial gradient radii must be non-negative, got {start_radius} and {end_radius}"
            )));
        }
        Ok(Self::new(GradientKind::Radial {
            start_center,
            start_radius,
            end_center,
            end_radius,
        }))
    }

    /// Conic gradient around `center`, starting at `start_angle`.
    pub fn conic(start_angle: f64, center: Point) -> Self {
        Self::new(GradientKind::Conic {
            start_angle,
            center,
        })
    }

    /// Geometry.
    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    /// Stops in offset order. Stops at equal offsets keep insertion order.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Insert a color stop. `offset` must lie in `[0, 1]`.
    pub fn add_color_stop(&mut self, offset: f64, color: Rgba8) -> CanvasResult<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(CanvasError::validation(format!(
                "color stop offset must be in [0, 1], got {offset}"
            )));
        }
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
        Ok(())
    }

    /// Color at gradient parameter `t`, clamped to the stop range.
    pub fn sample(&self, t: f64) -> Rgba8 {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba8::TRANSPARENT;
        };
        let t = t.clamp(0.0, 1.0);
        if t < first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        let hi = self.stops.partition_point(|s| s.offset <= t);
        let (a, b) = (self.stops[hi - 1], self.stops[hi]);
        let span = b.offset - a.offset;
        if span <= 0.0 {
            return b.color;
        }
        a.color.lerp(b.color, (t - a.offset) / span)
    }

    /// Color painted at `p` in gradient space. Transparent where the gradient is undefined.
    pub fn color_at(&self, p: Point) -> Rgba8 {
        match self.param_at(p) {
            Some(t) => self.sample(t),
            None => Rgba8::TRANSPARENT,
        }
    }

    fn param_at(&self, p: Point) -> Option<f64> {
        match self.kind {
            GradientKind::Linear { start, end } => {
                let d = end - start;
                let len2 = d.hypot2();
                if len2 == 0.0 {
                    return None;
                }
                Some((p - start).dot(d) / len2)
            }
            GradientKind::Radial {
                start_center,
                start_radius,
                end_center,
                end_radius,
            } => radial_param(
                p - start_center,
                end_center - start_center,
                start_radius,
                end_radius,
            ),
            GradientKind::Conic {
                start_angle,
                center,
            } => {
                let v = p - center;
                let angle = v.y.atan2(v.x) - start_angle;
                Some(angle.rem_euclid(TAU) / TAU)
            }
        }
    }
}

/// Largest `w` with `|pd - w * dc| = r0 + w * dr` and a non-negative radius.
fn radial_param(pd: Vec2, dc: Vec2, r0: f64, r1: f64) -> Option<f64> {
    let dr = r1 - r0;
    let a = dc.hypot2() - dr * dr;
    let b = pd.dot(dc) + r0 * dr;
    let c = pd.hypot2() - r0 * r0;
    let radius_ok = |w: f64| r0 + w * dr >= 0.0;

    if a.abs() < 1e-12 {
        if b == 0.0 {
            return None;
        }
        let w = c / (2.0 * b);
        return radius_ok(w).then_some(w);
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let (w0, w1) = ((b + sq) / a, (b - sq) / a);
    let (hi, lo) = if w0 >= w1 { (w0, w1) } else { (w1, w0) };
    if radius_ok(hi) {
        Some(hi)
    } else if radius_ok(lo) {
        Some(lo)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/gradient.rs"]
mod tests;
