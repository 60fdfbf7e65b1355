//! Renderer that records every call it receives, for tests and debugging.

use crate::foundation::core::{
    Affine, ArcParams, ArcToParams, CompositeOperation, EllipseParams, FillRule, FontStyle,
    ImageSmoothingQuality, LineCap, LineJoin, PixelMap, Point, Rect, Rgba8, TextAlign,
    TextBaseline, Vec2,
};
use crate::paint::{Gradient, Pattern};
use crate::path::Path2D;
use crate::render::backend::{CanvasRenderer, FontSpec};

/// One renderer call with owned copies of its arguments.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum RenderCall {
    Save,
    Restore,
    SaveLayer,
    RestoreLayer,
    Reset,
    Scale(f64, f64),
    Rotate(f64),
    Translate(f64, f64),
    Transform(Affine),
    SetTransform(Affine),
    ResetTransform,
    SetFillColor(Rgba8),
    SetStrokeColor(Rgba8),
    SetFillGradient(Gradient),
    SetStrokeGradient(Gradient),
    SetFillPattern(Pattern),
    SetStrokePattern(Pattern),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    SetMiterLimit(f64),
    SetLineDash(Vec<f64>),
    SetLineDashOffset(f64),
    SetGlobalAlpha(f64),
    SetCompositeOperation(CompositeOperation),
    SetShadowBlur(f64),
    SetShadowColor(Rgba8),
    SetShadowOffset(Vec2),
    SetImageSmoothing(bool, ImageSmoothingQuality),
    SetFilter(String),
    SetFont {
        families: Vec<String>,
        size: f64,
        weight: u16,
        style: FontStyle,
    },
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    FillRect(Rect),
    StrokeRect(Rect),
    ClearRect(Rect),
    BeginPath,
    ClosePath,
    MoveTo(Point),
    LineTo(Point),
    Arc(ArcParams),
    ArcTo(ArcToParams),
    Ellipse(EllipseParams),
    BezierCurveTo(Point, Point, Point),
    QuadraticCurveTo(Point, Point),
    Rect(Rect),
    Fill(FillRule),
    Stroke,
    Clip(FillRule),
    FillPath(Path2D, FillRule),
    StrokePath(Path2D),
    ClipPath(Path2D, FillRule),
    FillText {
        text: String,
        at: Point,
        max_width: Option<f64>,
    },
    StrokeText {
        text: String,
        at: Point,
        max_width: Option<f64>,
    },
    DrawImage {
        width: u32,
        height: u32,
        src: Option<Rect>,
        dst: Rect,
    },
    PutImageData {
        width: u32,
        height: u32,
        at: Point,
    },
}

/// [`CanvasRenderer`] that keeps a log of [`RenderCall`]s.
#[derive(Clone, Debug, Default)]
pub struct CallRecorder {
    calls: Vec<RenderCall>,
}

impl CallRecorder {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far.
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Take the log, leaving it empty.
    pub fn take(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of calls received.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// `true` when no call was received.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    fn log(&mut self, call: RenderCall) {
        self.calls.push(call);
    }
}

impl CanvasRenderer for CallRecorder {
    fn save(&mut self) {
        self.log(RenderCall::Save);
    }

    fn restore(&mut self) {
        self.log(RenderCall::Restore);
    }

    fn save_layer(&mut self) {
        self.log(RenderCall::SaveLayer);
    }

    fn restore_layer(&mut self) {
        self.log(RenderCall::RestoreLayer);
    }

    fn reset(&mut self) {
        self.log(RenderCall::Reset);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.log(RenderCall::Scale(sx, sy));
    }

    fn rotate(&mut self, angle: f64) {
        self.log(RenderCall::Rotate(angle));
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.log(RenderCall::Translate(tx, ty));
    }

    fn transform(&mut self, m: Affine) {
        self.log(RenderCall::Transform(m));
    }

    fn set_transform(&mut self, m: Affine) {
        self.log(RenderCall::SetTransform(m));
    }

    fn reset_transform(&mut self) {
        self.log(RenderCall::ResetTransform);
    }

    fn set_fill_color(&mut self, color: Rgba8) {
        self.log(RenderCall::SetFillColor(color));
    }

    fn set_stroke_color(&mut self, color: Rgba8) {
        self.log(RenderCall::SetStrokeColor(color));
    }

    fn set_fill_gradient(&mut self, gradient: &Gradient) {
        self.log(RenderCall::SetFillGradient(gradient.clone()));
    }

    fn set_stroke_gradient(&mut self, gradient: &Gradient) {
        self.log(RenderCall::SetStrokeGradient(gradient.clone()));
    }

    fn set_fill_pattern(&mut self, pattern: &Pattern) {
        self.log(RenderCall::SetFillPattern(pattern.clone()));
    }

    fn set_stroke_pattern(&mut self, pattern: &Pattern) {
        self.log(RenderCall::SetStrokePattern(pattern.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.log(RenderCall::SetLineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.log(RenderCall::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.log(RenderCall::SetLineJoin(join));
    }

    fn set_miter_limit(&mut self, limit: f64) {
        self.log(RenderCall::SetMiterLimit(limit));
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.log(RenderCall::SetLineDash(segments.to_vec()));
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.log(RenderCall::SetLineDashOffset(offset));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.log(RenderCall::SetGlobalAlpha(alpha));
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        self.log(RenderCall::SetCompositeOperation(op));
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.log(RenderCall::SetShadowBlur(blur));
    }

    fn set_shadow_color(&mut self, color: Rgba8) {
        self.log(RenderCall::SetShadowColor(color));
    }

    fn set_shadow_offset(&mut self, offset: Vec2) {
        self.log(RenderCall::SetShadowOffset(offset));
    }

    fn set_image_smoothing(&mut self, enabled: bool, quality: ImageSmoothingQuality) {
        self.log(RenderCall::SetImageSmoothing(enabled, quality));
    }

    fn set_filter(&mut self, filter: &str) {
        self.log(RenderCall::SetFilter(filter.to_owned()));
    }

    fn set_font(&mut self, font: &FontSpec<'_>) {
        self.log(RenderCall::SetFont {
            families: font.families.to_vec(),
            size: font.size,
            weight: font.weight,
            style: font.style,
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.log(RenderCall::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.log(RenderCall::SetTextBaseline(baseline));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.log(RenderCall::FillRect(rect));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.log(RenderCall::StrokeRect(rect));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.log(RenderCall::ClearRect(rect));
    }

    fn begin_path(&mut self) {
        self.log(RenderCall::BeginPath);
    }

    fn close_path(&mut self) {
        self.log(RenderCall::ClosePath);
    }

    fn move_to(&mut self, p: Point) {
        self.log(RenderCall::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.log(RenderCall::LineTo(p));
    }

    fn arc(&mut self, arc: &ArcParams) {
        self.log(RenderCall::Arc(*arc));
    }

    fn arc_to(&mut self, arc: &ArcToParams) {
        self.log(RenderCall::ArcTo(*arc));
    }

    fn ellipse(&mut self, ellipse: &EllipseParams) {
        self.log(RenderCall::Ellipse(*ellipse));
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.log(RenderCall::BezierCurveTo(c1, c2, p));
    }

    fn quadratic_curve_to(&mut self, c: Point, p: Point) {
        self.log(RenderCall::QuadraticCurveTo(c, p));
    }

    fn rect(&mut self, rect: Rect) {
        self.log(RenderCall::Rect(rect));
    }

    fn fill(&mut self, rule: FillRule) {
        self.log(RenderCall::Fill(rule));
    }

    fn stroke(&mut self) {
        self.log(RenderCall::Stroke);
    }

    fn clip(&mut self, rule: FillRule) {
        self.log(RenderCall::Clip(rule));
    }

    fn fill_path(&mut self, path: &Path2D, rule: FillRule) {
        self.log(RenderCall::FillPath(path.clone(), rule));
    }

    fn stroke_path(&mut self, path: &Path2D) {
        self.log(RenderCall::StrokePath(path.clone()));
    }

    fn clip_path(&mut self, path: &Path2D, rule: FillRule) {
        self.log(RenderCall::ClipPath(path.clone(), rule));
    }

    fn fill_text(&mut self, text: &str, at: Point, max_width: Option<f64>) {
        self.log(RenderCall::FillText {
            text: text.to_owned(),
            at,
            max_width,
        });
    }

    fn stroke_text(&mut self, text: &str, at: Point, max_width: Option<f64>) {
        self.log(RenderCall::StrokeText {
            text: text.to_owned(),
            at,
            max_width,
        });
    }

    fn draw_image(&mut self, image: &PixelMap, src: Option<Rect>, dst: Rect) {
        self.log(RenderCall::DrawImage {
            width: image.width(),
            height: image.height(),
            src,
            dst,
        });
    }

    fn put_image_data(&mut self, image: &PixelMap, at: Point) {
        self.log(RenderCall::PutImageData {
            width: image.width(),
            height: image.height(),
            at,
        });
    }
}
