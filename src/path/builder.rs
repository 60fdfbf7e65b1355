use std::f64::consts::{PI, TAU};

use kurbo::{Arc, BezPath, PathEl, Shape};

use crate::foundation::core::{ArcParams, ArcToParams, EllipseParams, Point, Rect, Vec2};

/// Flattening tolerance used when arcs are converted to cubic segments.
pub const ARC_TOLERANCE: f64 = 0.1;

/// Canvas current-path semantics on top of a kurbo [`BezPath`].
///
/// Drawing commands issued with no current point start a subpath at their first point, and a
/// closed subpath restarts at its start point, the way the HTML canvas path API behaves.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    path: BezPath,
    current: Option<Point>,
    subpath_start: Option<Point>,
    pending_move: bool,
}

impl PathBuilder {
    /// Empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built path so far.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Take the built path, leaving the builder empty.
    pub fn take(&mut self) -> BezPath {
        let path = std::mem::take(&mut self.path);
        self.clear();
        path
    }

    /// Drop every subpath.
    pub fn clear(&mut self) {
        self.path.truncate(0);
        self.current = None;
        self.subpath_start = None;
        self.pending_move = false;
    }

    /// `true` when no segment has been added.
    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// Current point, if a subpath is open.
    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    /// Start a new subpath at `p`.
    pub fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
        self.current = Some(p);
        self.subpath_start = Some(p);
        self.pending_move = false;
    }

    /// Straight segment to `p`.
    pub fn line_to(&mut self, p: Point) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.resume();
        self.path.line_to(p);
        self.current = Some(p);
    }

    /// Quadratic Bézier segment.
    pub fn quadratic_curve_to(&mut self, c: Point, p: Point) {
        self.ensure_subpath(c);
        self.path.quad_to(c, p);
        self.current = Some(p);
    }

    /// Cubic Bézier segment.
    pub fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.ensure_subpath(c1);
        self.path.curve_to(c1, c2, p);
        self.current = Some(p);
    }

    /// Close the current subpath. The next segment starts at its start point.
    pub fn close(&mut self) {
        if self.current.is_none() || self.pending_move {
            return;
        }
        self.path.close_path();
        self.current = self.subpath_start;
        self.pending_move = true;
    }

    /// Closed rectangle subpath. `r` may have negative extent.
    pub fn rect(&mut self, r: Rect) {
        self.move_to(Point::new(r.x0, r.y0));
        self.path.line_to(Point::new(r.x1, r.y0));
        self.path.line_to(Point::new(r.x1, r.y1));
        self.path.line_to(Point::new(r.x0, r.y1));
        self.close();
    }

    /// Circular arc, connected to the current point by a straight line.
    pub fn arc(&mut self, a: &ArcParams) {
        let radius = a.radius.max(0.0);
        self.elliptical_arc(
            a.center,
            Vec2::new(radius, radius),
            0.0,
            a.start_angle,
            a.end_angle,
            a.anticlockwise,
        );
    }

    /// Elliptical arc. Equal start and end angles add nothing.
    pub fn ellipse(&mut self, e: &EllipseParams) {
        if e.start_angle == e.end_angle {
            return;
        }
        let radii = Vec2::new(e.radii.x.max(0.0), e.radii.y.max(0.0));
        self.elliptical_arc(
            e.center,
            radii,
            e.rotation,
            e.start_angle,
            e.end_angle,
            e.anticlockwise,
        );
    }

    /// Arc tangent to the lines (current, p1) and (p1, p2).
    pub fn arc_to(&mut self, a: &ArcToParams) {
        let Some(p0) = self.current else {
            self.move_to(a.p1);
            return;
        };
        let radius = a.radius.max(0.0);
        let v1 = p0 - a.p1;
        let v2 = a.p2 - a.p1;
        if radius == 0.0 || v1.hypot2() == 0.0 || v2.hypot2() == 0.0 || v1.cross(v2).abs() < 1e-12
        {
            self.line_to(a.p1);
            return;
        }
        let (u1, u2) = (v1.normalize(), v2.normalize());
        let half = u1.dot(u2).clamp(-1.0, 1.0).acos() / 2.0;
        let tangent_len = radius / half.tan();
        let t1 = a.p1 + u1 * tangent_len;
        let t2 = a.p1 + u2 * tangent_len;
        let center = a.p1 + (u1 + u2).normalize() * (radius / half.sin());

        let start = (t1 - center).atan2();
        let end = (t2 - center).atan2();
        let sweep = (end - start + PI).rem_euclid(TAU) - PI;

        self.line_to(t1);
        self.append_arc(Arc {
            center,
            radii: Vec2::new(radius, radius),
            start_angle: start,
            sweep_angle: sweep,
            x_rotation: 0.0,
        });
        self.current = Some(t2);
    }

    /// Append another path's elements through the canvas rules.
    pub fn extend(&mut self, path: &BezPath) {
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.move_to(p),
                PathEl::LineTo(p) => self.line_to(p),
                PathEl::QuadTo(c, p) => self.quadratic_curve_to(c, p),
                PathEl::CurveTo(c1, c2, p) => self.bezier_curve_to(c1, c2, p),
                PathEl::ClosePath => self.close(),
            }
        }
    }

    fn elliptical_arc(
        &mut self,
        center: Point,
        radii: Vec2,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) {
        let sweep = normalized_sweep(start_angle, end_angle, anticlockwise);
        let start = point_on_ellipse(center, radii, rotation, start_angle);
        if self.current.is_some() {
            self.line_to(start);
        } else {
            self.move_to(start);
        }
        if sweep == 0.0 {
            return;
        }
        self.append_arc(Arc {
            center,
            radii,
            start_angle,
            sweep_angle: sweep,
            x_rotation: rotation,
        });
        self.current = Some(point_on_ellipse(center, radii, rotation, start_angle + sweep));
    }

    fn append_arc(&mut self, arc: Arc) {
        for el in arc.path_elements(ARC_TOLERANCE).skip(1) {
            self.path.push(el);
        }
    }

    fn ensure_subpath(&mut self, p: Point) {
        if self.current.is_none() {
            self.move_to(p);
        } else {
            self.resume();
        }
    }

    fn resume(&mut self) {
        if self.pending_move {
            if let Some(start) = self.subpath_start {
                self.path.move_to(start);
            }
            self.pending_move = false;
        }
    }
}

/// Signed sweep from `start` to `end` in the requested direction, clamped to one full turn.
pub fn normalized_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if start == end {
        return 0.0;
    }
    let sweep = end - start;
    if anticlockwise {
        if sweep <= -TAU {
            -TAU
        } else if sweep > 0.0 {
            (sweep % TAU) - TAU
        } else {
            sweep
        }
    } else if sweep >= TAU {
        TAU
    } else if sweep < 0.0 {
        (sweep % TAU) + TAU
    } else {
        sweep
    }
}

fn point_on_ellipse(center: Point, radii: Vec2, rotation: f64, angle: f64) -> Point {
    let (s, c) = angle.sin_cos();
    let (rs, rc) = rotation.sin_cos();
    let local = Vec2::new(radii.x * c, radii.y * s);
    center + Vec2::new(local.x * rc - local.y * rs, local.x * rs + local.y * rc)
}

#[cfg(test)]
#[path = "../../tests/unit/path/builder.rs"]
mod tests;
