use kurbo::BezPath;

use crate::foundation::core::{Affine, ArcParams, ArcToParams, EllipseParams, Point, Rect};
use crate::path::builder::PathBuilder;

/// One recorded path command.
#[derive(Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Start a subpath.
    MoveTo(Point),
    /// Straight segment.
    LineTo(Point),
    /// Quadratic segment: control, end.
    QuadraticCurveTo(Point, Point),
    /// Cubic segment: control 1, control 2, end.
    BezierCurveTo(Point, Point, Point),
    /// Circular arc.
    Arc(ArcParams),
    /// Tangent arc.
    ArcTo(ArcToParams),
    /// Elliptical arc.
    Ellipse(EllipseParams),
    /// Closed rectangle subpath.
    Rect(Rect),
    /// Close the current subpath.
    ClosePath,
    /// Pre-built geometry appended through [`Path2D::add_path`] with a transform.
    Append(BezPath),
}

/// Reusable path object, recorded as commands and built on demand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path2D {
    cmds: Vec<PathCmd>,
}

impl Path2D {
    /// Empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in issue order.
    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    /// `true` when no command was recorded.
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Start a subpath.
    pub fn move_to(&mut self, p: Point) {
        self.cmds.push(PathCmd::MoveTo(p));
    }

    /// Straight segment.
    pub fn line_to(&mut self, p: Point) {
        self.cmds.push(PathCmd::LineTo(p));
    }

    /// Quadratic segment.
    pub fn quadratic_curve_to(&mut self, c: Point, p: Point) {
        self.cmds.push(PathCmd::QuadraticCurveTo(c, p));
    }

    /// Cubic segment.
    pub fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.cmds.push(PathCmd::BezierCurveTo(c1, c2, p));
    }

    /// Circular arc.
    pub fn arc(&mut self, a: ArcParams) {
        self.cmds.push(PathCmd::Arc(a));
    }

    /// Tangent arc.
    pub fn arc_to(&mut self, a: ArcToParams) {
        self.cmds.push(PathCmd::ArcTo(a));
    }

    /// Elliptical arc.
    pub fn ellipse(&mut self, e: EllipseParams) {
        self.cmds.push(PathCmd::Ellipse(e));
    }

    /// Closed rectangle subpath.
    pub fn rect(&mut self, r: Rect) {
        self.cmds.push(PathCmd::Rect(r));
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        self.cmds.push(PathCmd::ClosePath);
    }

    /// Append `other`, optionally transformed.
    pub fn add_path(&mut self, other: &Path2D, transform: Option<Affine>) {
        match transform {
            None => self.cmds.extend(other.cmds.iter().cloned()),
            Some(t) => self.cmds.push(PathCmd::Append(t * other.to_bez_path())),
        }
    }

    /// Replay every command through a [`PathBuilder`].
    pub fn build_into(&self, builder: &mut PathBuilder) {
        for cmd in &self.cmds {
            match cmd {
                PathCmd::MoveTo(p) => builder.move_to(*p),
                PathCmd::LineTo(p) => builder.line_to(*p),
                PathCmd::QuadraticCurveTo(c, p) => builder.quadratic_curve_to(*c, *p),
                PathCmd::BezierCurveTo(c1, c2, p) => builder.bezier_curve_to(*c1, *c2, *p),
                PathCmd::Arc(a) => builder.arc(a),
                PathCmd::ArcTo(a) => builder.arc_to(a),
                PathCmd::Ellipse(e) => builder.ellipse(e),
                PathCmd::Rect(r) => builder.rect(*r),
                PathCmd::ClosePath => builder.close(),
                PathCmd::Append(path) => builder.extend(path),
            }
        }
    }

    /// Geometry of the whole path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut builder = PathBuilder::new();
        self.build_into(&mut builder);
        builder.take()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/path2d.rs"]
mod tests;
