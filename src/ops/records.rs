//! Record types, one per canvas operation.
//!
//! Plain records hold only [`Wire`] fields. Records that carry heap data keep a [`Slot`] into
//! the op buffer's [`OwnedPool`] and release it as their destructor. Records that reference
//! shared paint resources keep a weak [`ResourceKey`]; when the key no longer resolves at
//! playback the op is skipped.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::foundation::core::{
    Affine, ArcParams, ArcToParams, CompositeOperation, EllipseParams, FillRule, FontStyle,
    ImageSmoothingQuality, LineCap, LineJoin, PixelMap, Point, Rect, Rgba8, TextAlign,
    TextBaseline, Vec2,
};
use crate::foundation::error::CanvasResult;
use crate::ops::codec::{Payload, PayloadReader, PayloadWriter, Wire, wire_struct};
use crate::ops::pool::{OwnedPool, Slot};
use crate::ops::registry::{ApplyContext, OpKind, Record, Tagged};
use crate::path::Path2D;
use crate::render::backend::FontSpec;
use crate::resources::ResourceKey;

/// Implement [`Record`] for records without owned payloads.
macro_rules! plain_record {
    ($($rec:ty => |$op:ident, $r:ident| $body:expr;)+) => {$(
        impl Record for $rec {
            type Owned = ();

            fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
                let $op = self;
                let $r = cx.renderer();
                $body;
                Ok(())
            }
        }
    )+};
}

fn skip_missing(kind: OpKind, key: ResourceKey) -> CanvasResult<()> {
    tracing::debug!(op = kind.name(), ?key, "resource no longer registered, op skipped");
    Ok(())
}

wire_struct! {
    /// `save()`.
    pub struct SaveOp {}
}

wire_struct! {
    /// `restore()`.
    pub struct RestoreOp {}
}

wire_struct! {
    /// Save the state and open an offscreen layer composited with the current operator.
    pub struct SaveLayerOp {}
}

wire_struct! {
    /// Composite the innermost layer and pop its state.
    pub struct RestoreLayerOp {}
}

wire_struct! {
    /// `reset()`: default drawing state, empty state stack, empty path.
    pub struct ResetOp {}
}

wire_struct! {
    /// `scale(sx, sy)`.
    pub struct ScaleOp {
        /// Horizontal factor.
        pub sx: f64,
        /// Vertical factor.
        pub sy: f64,
    }
}

wire_struct! {
    /// `rotate(angle)`.
    pub struct RotateOp {
        /// Angle in radians.
        pub angle: f64,
    }
}

wire_struct! {
    /// `translate(tx, ty)`.
    pub struct TranslateOp {
        /// Horizontal offset.
        pub tx: f64,
        /// Vertical offset.
        pub ty: f64,
    }
}

wire_struct! {
    /// `transform(a, b, c, d, e, f)`.
    pub struct TransformOp {
        /// Matrix to post-multiply.
        pub matrix: Affine,
    }
}

wire_struct! {
    /// `setTransform(a, b, c, d, e, f)`.
    pub struct SetTransformOp {
        /// Replacement matrix.
        pub matrix: Affine,
    }
}

wire_struct! {
    /// `resetTransform()`.
    pub struct ResetTransformOp {}
}

wire_struct! {
    /// Solid `fillStyle`.
    pub struct SetFillColorOp {
        /// Fill color.
        pub color: Rgba8,
    }
}

wire_struct! {
    /// Solid `strokeStyle`.
    pub struct SetStrokeColorOp {
        /// Stroke color.
        pub color: Rgba8,
    }
}

wire_struct! {
    /// Gradient `fillStyle`.
    pub struct SetFillGradientOp {
        /// Weak gradient handle.
        pub gradient: ResourceKey,
    }
}

wire_struct! {
    /// Gradient `strokeStyle`.
    pub struct SetStrokeGradientOp {
        /// Weak gradient handle.
        pub gradient: ResourceKey,
    }
}

wire_struct! {
    /// Pattern `fillStyle`.
    pub struct SetFillPatternOp {
        /// Weak pattern handle.
        pub pattern: ResourceKey,
    }
}

wire_struct! {
    /// Pattern `strokeStyle`.
    pub struct SetStrokePatternOp {
        /// Weak pattern handle.
        pub pattern: ResourceKey,
    }
}

wire_struct! {
    /// `lineWidth`.
    pub struct SetLineWidthOp {
        /// Stroke width.
        pub width: f64,
    }
}

wire_struct! {
    /// `lineCap`.
    pub struct SetLineCapOp {
        /// Cap style.
        pub cap: LineCap,
    }
}

wire_struct! {
    /// `lineJoin`.
    pub struct SetLineJoinOp {
        /// Join style.
        pub join: LineJoin,
    }
}

wire_struct! {
    /// `miterLimit`.
    pub struct SetMiterLimitOp {
        /// Limit ratio.
        pub limit: f64,
    }
}

/// `setLineDash(segments)`. The segment list is stored inline after a `u32` count.
#[derive(Debug, PartialEq)]
pub struct SetLineDashOp {
    /// Dash and gap lengths, already doubled when given an odd count.
    pub segments: SmallVec<[f64; 8]>,
}

impl SetLineDashOp {
    /// Canvas rules: any negative or non-finite value drops the call, an odd list is repeated.
    pub fn new(segments: &[f64]) -> Option<Self> {
        if segments.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return None;
        }
        let mut out: SmallVec<[f64; 8]> = segments.iter().copied().collect();
        if out.len() % 2 == 1 {
            out.extend_from_slice(segments);
        }
        Some(Self { segments: out })
    }
}

impl Payload for SetLineDashOp {
    fn payload_len(&self) -> usize {
        u32::SIZE + self.segments.len() * f64::SIZE
    }

    fn encode(&self, w: &mut PayloadWriter<'_>) {
        w.put(&(self.segments.len() as u32));
        for v in &self.segments {
            w.put(v);
        }
    }

    fn decode(r: &mut PayloadReader<'_>) -> CanvasResult<Self> {
        let n = r.take::<u32>()? as usize;
        let mut segments = SmallVec::new();
        for _ in 0..n {
            segments.push(r.take::<f64>()?);
        }
        Ok(Self { segments })
    }
}

wire_struct! {
    /// `lineDashOffset`.
    pub struct SetLineDashOffsetOp {
        /// Dash phase.
        pub offset: f64,
    }
}

wire_struct! {
    /// `globalAlpha`.
    pub struct SetGlobalAlphaOp {
        /// Alpha in `[0, 1]`.
        pub alpha: f64,
    }
}

wire_struct! {
    /// `globalCompositeOperation`.
    pub struct SetCompositeOperationOp {
        /// Operator.
        pub op: CompositeOperation,
    }
}

wire_struct! {
    /// `shadowBlur`.
    pub struct SetShadowBlurOp {
        /// Blur radius.
        pub blur: f64,
    }
}

wire_struct! {
    /// `shadowColor`.
    pub struct SetShadowColorOp {
        /// Shadow color.
        pub color: Rgba8,
    }
}

wire_struct! {
    /// `shadowOffsetX` / `shadowOffsetY`.
    pub struct SetShadowOffsetOp {
        /// Offset in device pixels.
        pub offset: Vec2,
    }
}

wire_struct! {
    /// `imageSmoothingEnabled` and `imageSmoothingQuality`.
    pub struct SetImageSmoothingOp {
        /// Smoothing switch.
        pub enabled: bool,
        /// Resampling quality.
        pub quality: ImageSmoothingQuality,
    }
}

wire_struct! {
    /// `filter`.
    pub struct SetFilterOp {
        /// Filter string in the pool.
        pub filter: Slot<String>,
    }
}

wire_struct! {
    /// `font`.
    pub struct SetFontOp {
        /// Family list in the pool.
        pub families: Slot<Vec<String>>,
        /// Size in CSS pixels.
        pub size: f64,
        /// CSS weight.
        pub weight: u16,
        /// Slant.
        pub style: FontStyle,
    }
}

wire_struct! {
    /// `textAlign`.
    pub struct SetTextAlignOp {
        /// Alignment.
        pub align: TextAlign,
    }
}

wire_struct! {
    /// `textBaseline`.
    pub struct SetTextBaselineOp {
        /// Baseline.
        pub baseline: TextBaseline,
    }
}

wire_struct! {
    /// `fillRect(x, y, w, h)`.
    pub struct FillRectOp {
        /// Rectangle in user space.
        pub rect: Rect,
    }
}

wire_struct! {
    /// `strokeRect(x, y, w, h)`.
    pub struct StrokeRectOp {
        /// Rectangle in user space.
        pub rect: Rect,
    }
}

wire_struct! {
    /// `clearRect(x, y, w, h)`.
    pub struct ClearRectOp {
        /// Rectangle in user space.
        pub rect: Rect,
    }
}

wire_struct! {
    /// `beginPath()`.
    pub struct BeginPathOp {}
}

wire_struct! {
    /// `closePath()`.
    pub struct ClosePathOp {}
}

wire_struct! {
    /// `moveTo(x, y)`.
    pub struct MoveToOp {
        /// New subpath start.
        pub point: Point,
    }
}

wire_struct! {
    /// `lineTo(x, y)`.
    pub struct LineToOp {
        /// Segment end.
        pub point: Point,
    }
}

wire_struct! {
    /// `arc(x, y, r, start, end, ccw)`.
    pub struct ArcOp {
        /// Circle center.
        pub center: Point,
        /// Radius.
        pub radius: f64,
        /// Start angle in radians.
        pub start_angle: f64,
        /// End angle in radians.
        pub end_angle: f64,
        /// Sweep direction.
        pub anticlockwise: bool,
    }
}

impl From<ArcParams> for ArcOp {
    fn from(a: ArcParams) -> Self {
        Self {
            center: a.center,
            radius: a.radius,
            start_angle: a.start_angle,
            end_angle: a.end_angle,
            anticlockwise: a.anticlockwise,
        }
    }
}

wire_struct! {
    /// `arcTo(x1, y1, x2, y2, r)`.
    pub struct ArcToOp {
        /// Corner point.
        pub p1: Point,
        /// Direction point.
        pub p2: Point,
        /// Radius.
        pub radius: f64,
    }
}

wire_struct! {
    /// `ellipse(x, y, rx, ry, rotation, start, end, ccw)`.
    pub struct EllipseOp {
        /// Ellipse center.
        pub center: Point,
        /// Radii.
        pub radii: Vec2,
        /// Rotation in radians.
        pub rotation: f64,
        /// Start angle in radians.
        pub start_angle: f64,
        /// End angle in radians.
        pub end_angle: f64,
        /// Sweep direction.
        pub anticlockwise: bool,
    }
}

impl From<EllipseParams> for EllipseOp {
    fn from(e: EllipseParams) -> Self {
        Self {
            center: e.center,
            radii: e.radii,
            rotation: e.rotation,
            start_angle: e.start_angle,
            end_angle: e.end_angle,
            anticlockwise: e.anticlockwise,
        }
    }
}

wire_struct! {
    /// `bezierCurveTo(...)`.
    pub struct BezierCurveToOp {
        /// First control point.
        pub c1: Point,
        /// Second control point.
        pub c2: Point,
        /// End point.
        pub point: Point,
    }
}

wire_struct! {
    /// `quadraticCurveTo(...)`.
    pub struct QuadraticCurveToOp {
        /// Control point.
        pub control: Point,
        /// End point.
        pub point: Point,
    }
}

wire_struct! {
    /// `rect(x, y, w, h)` on the current path.
    pub struct AddRectOp {
        /// Rectangle in user space.
        pub rect: Rect,
    }
}

wire_struct! {
    /// `fill(rule)`.
    pub struct FillOp {
        /// Winding rule.
        pub rule: FillRule,
    }
}

wire_struct! {
    /// `stroke()`.
    pub struct StrokeOp {}
}

wire_struct! {
    /// `clip(rule)`.
    pub struct ClipOp {
        /// Winding rule.
        pub rule: FillRule,
    }
}

wire_struct! {
    /// `fill(path, rule)`.
    pub struct FillPath2DOp {
        /// Path captured at record time.
        pub path: Slot<Rc<Path2D>>,
        /// Winding rule.
        pub rule: FillRule,
    }
}

wire_struct! {
    /// `stroke(path)`.
    pub struct StrokePath2DOp {
        /// Path captured at record time.
        pub path: Slot<Rc<Path2D>>,
    }
}

wire_struct! {
    /// `clip(path, rule)`.
    pub struct ClipPath2DOp {
        /// Path captured at record time.
        pub path: Slot<Rc<Path2D>>,
        /// Winding rule.
        pub rule: FillRule,
    }
}

wire_struct! {
    /// `fillText(text, x, y, maxWidth)`.
    pub struct FillTextOp {
        /// Text in the pool.
        pub text: Slot<String>,
        /// Anchor point.
        pub at: Point,
        /// Optional width limit.
        pub max_width: Option<f64>,
    }
}

wire_struct! {
    /// `strokeText(text, x, y, maxWidth)`.
    pub struct StrokeTextOp {
        /// Text in the pool.
        pub text: Slot<String>,
        /// Anchor point.
        pub at: Point,
        /// Optional width limit.
        pub max_width: Option<f64>,
    }
}

wire_struct! {
    /// `drawImage(image, ...)`.
    pub struct DrawImageOp {
        /// Weak image handle.
        pub image: ResourceKey,
        /// Source rectangle, whole image when absent.
        pub src: Option<Rect>,
        /// Destination rectangle in user space.
        pub dst: Rect,
    }
}

wire_struct! {
    /// `putImageData(data, x, y)`.
    pub struct PutImageDataOp {
        /// Pixels captured at record time.
        pub image: Slot<Rc<PixelMap>>,
        /// Device-space position.
        pub at: Point,
    }
}

plain_record! {
    SaveOp => |_op, r| r.save();
    RestoreOp => |_op, r| r.restore();
    SaveLayerOp => |_op, r| r.save_layer();
    RestoreLayerOp => |_op, r| r.restore_layer();
    ResetOp => |_op, r| r.reset();
    ScaleOp => |op, r| r.scale(op.sx, op.sy);
    RotateOp => |op, r| r.rotate(op.angle);
    TranslateOp => |op, r| r.translate(op.tx, op.ty);
    TransformOp => |op, r| r.transform(op.matrix);
    SetTransformOp => |op, r| r.set_transform(op.matrix);
    ResetTransformOp => |_op, r| r.reset_transform();
    SetFillColorOp => |op, r| r.set_fill_color(op.color);
    SetStrokeColorOp => |op, r| r.set_stroke_color(op.color);
    SetLineWidthOp => |op, r| r.set_line_width(op.width);
    SetLineCapOp => |op, r| r.set_line_cap(op.cap);
    SetLineJoinOp => |op, r| r.set_line_join(op.join);
    SetMiterLimitOp => |op, r| r.set_miter_limit(op.limit);
    SetLineDashOp => |op, r| r.set_line_dash(&op.segments);
    SetLineDashOffsetOp => |op, r| r.set_line_dash_offset(op.offset);
    SetGlobalAlphaOp => |op, r| r.set_global_alpha(op.alpha);
    SetCompositeOperationOp => |op, r| r.set_composite_operation(op.op);
    SetShadowBlurOp => |op, r| r.set_shadow_blur(op.blur);
    SetShadowColorOp => |op, r| r.set_shadow_color(op.color);
    SetShadowOffsetOp => |op, r| r.set_shadow_offset(op.offset);
    SetImageSmoothingOp => |op, r| r.set_image_smoothing(op.enabled, op.quality);
    SetTextAlignOp => |op, r| r.set_text_align(op.align);
    SetTextBaselineOp => |op, r| r.set_text_baseline(op.baseline);
    FillRectOp => |op, r| r.fill_rect(op.rect);
    StrokeRectOp => |op, r| r.stroke_rect(op.rect);
    ClearRectOp => |op, r| r.clear_rect(op.rect);
    BeginPathOp => |_op, r| r.begin_path();
    ClosePathOp => |_op, r| r.close_path();
    MoveToOp => |op, r| r.move_to(op.point);
    LineToOp => |op, r| r.line_to(op.point);
    ArcOp => |op, r| r.arc(&ArcParams {
        center: op.center,
        radius: op.radius,
        start_angle: op.start_angle,
        end_angle: op.end_angle,
        anticlockwise: op.anticlockwise,
    });
    ArcToOp => |op, r| r.arc_to(&ArcToParams {
        p1: op.p1,
        p2: op.p2,
        radius: op.radius,
    });
    EllipseOp => |op, r| r.ellipse(&EllipseParams {
        center: op.center,
        radii: op.radii,
        rotation: op.rotation,
        start_angle: op.start_angle,
        end_angle: op.end_angle,
        anticlockwise: op.anticlockwise,
    });
    BezierCurveToOp => |op, r| r.bezier_curve_to(op.c1, op.c2, op.point);
    QuadraticCurveToOp => |op, r| r.quadratic_curve_to(op.control, op.point);
    AddRectOp => |op, r| r.rect(op.rect);
    FillOp => |op, r| r.fill(op.rule);
    StrokeOp => |_op, r| r.stroke();
    ClipOp => |op, r| r.clip(op.rule);
}

impl Record for SetFillGradientOp {
    type Owned = ();

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let Some(gradient) = cx.resources().gradient(self.gradient) else {
            return skip_missing(Self::KIND, self.gradient);
        };
        cx.renderer().set_fill_gradient(gradient);
        Ok(())
    }
}

impl Record for SetStrokeGradientOp {
    type Owned = ();

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let Some(gradient) = cx.resources().gradient(self.gradient) else {
            return skip_missing(Self::KIND, self.gradient);
        };
        cx.renderer().set_stroke_gradient(gradient);
        Ok(())
    }
}

impl Record for SetFillPatternOp {
    type Owned = ();

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let Some(pattern) = cx.resources().pattern(self.pattern) else {
            return skip_missing(Self::KIND, self.pattern);
        };
        cx.renderer().set_fill_pattern(pattern);
        Ok(())
    }
}

impl Record for SetStrokePatternOp {
    type Owned = ();

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let Some(pattern) = cx.resources().pattern(self.pattern) else {
            return skip_missing(Self::KIND, self.pattern);
        };
        cx.renderer().set_stroke_pattern(pattern);
        Ok(())
    }
}

impl Record for DrawImageOp {
    type Owned = ();

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let Some(image) = cx.resources().image(self.image) else {
            return skip_missing(Self::KIND, self.image);
        };
        cx.renderer().draw_image(image, self.src, self.dst);
        Ok(())
    }
}

impl Record for SetFilterOp {
    type Owned = String;

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let filter = cx.owned(&self.filter)?;
        cx.renderer().set_filter(filter);
        Ok(())
    }

    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        pool.release(&self.filter)
    }
}

impl Record for SetFontOp {
    type Owned = Vec<String>;

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let families = cx.owned(&self.families)?;
        cx.renderer().set_font(&FontSpec {
            families,
            size: self.size,
            weight: self.weight,
            style: self.style,
        });
        Ok(())
    }

    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        pool.release(&self.families)
    }
}

impl Record for FillPath2DOp {
    type Owned = Rc<Path2D>;

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let path = cx.owned(&self.path)?;
        cx.renderer().fill_path(path, self.rule);
        Ok(())
    }

    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        pool.release(&self.path)
    }
}

impl Record for StrokePath2DOp {
    type Owned = Rc<Path2D>;

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let path = cx.owned(&self.path)?;
        cx.renderer().stroke_path(path);
        Ok(())
    }

    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        pool.release(&self.path)
    }
}

impl Record for ClipPath2DOp {
    type Owned = Rc<Path2D>;

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let path = cx.owned(&self.path)?;
        cx.renderer().clip_path(path, self.rule);
        Ok(())
    }

    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        pool.release(&self.path)
    }
}

impl Record for FillTextOp {
    type Owned = String;
    const HAS_TEXT: bool = true;

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let text = cx.owned(&self.text)?;
        cx.renderer().fill_text(text, self.at, self.max_width);
        Ok(())
    }

    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        pool.release(&self.text)
    }
}

impl Record for StrokeTextOp {
    type Owned = String;
    const HAS_TEXT: bool = true;

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let text = cx.owned(&self.text)?;
        cx.renderer().stroke_text(text, self.at, self.max_width);
        Ok(())
    }

    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        pool.release(&self.text)
    }
}

impl Record for PutImageDataOp {
    type Owned = Rc<PixelMap>;

    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
        let image = cx.owned(&self.image)?;
        cx.renderer().put_image_data(image, self.at);
        Ok(())
    }

    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        pool.release(&self.image)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/records.rs"]
mod tests;
