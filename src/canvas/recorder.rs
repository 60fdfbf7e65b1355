//! [`CanvasRecorder`]: canvas calls in, recorded ops out.

use std::rc::Rc;

use crate::foundation::config::OpBufferConfig;
use crate::foundation::core::{
    Affine, ArcParams, ArcToParams, CompositeOperation, EllipseParams, FillRule, FontStyle,
    ImageSmoothingQuality, LineCap, LineJoin, PixelMap, Point, Rect, Repetition, Rgba8,
    TextAlign, TextBaseline, Vec2,
};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::ops::{
    AddRectOp, ArcOp, ArcToOp, BeginPathOp, BezierCurveToOp, ClearRectOp, ClipOp, ClipPath2DOp,
    ClosePathOp, DrawImageOp, EllipseOp, FillOp, FillPath2DOp, FillRectOp, FillTextOp, LineToOp,
    MoveToOp, OpBuffer, PutImageDataOp, QuadraticCurveToOp, ResetOp, ResetTransformOp,
    RestoreLayerOp, RestoreOp, RotateOp, SaveLayerOp, SaveOp, ScaleOp, SetCompositeOperationOp, SetFillColorOp, SetFillGradientOp, SetFillPatternOp,
    SetFilterOp, SetFontOp, SetGlobalAlphaOp, SetImageSmoothingOp, SetLineCapOp, SetLineDashOffsetOp,
    SetLineDashOp, SetLineJoinOp, SetLineWidthOp, SetMiterLimitOp, SetShadowBlurOp,
    SetShadowColorOp, SetShadowOffsetOp, SetStrokeColorOp, SetStrokeGradientOp,
    SetStrokePatternOp, SetTextAlignOp, SetTextBaselineOp, SetTransformOp, StrokeOp,
    StrokePath2DOp, StrokeRectOp, StrokeTextOp, TransformOp, TranslateOp,
};
use crate::paint::{Gradient, Pattern};
use crate::path::Path2D;
use crate::render::backend::CanvasRenderer;
use crate::resources::{ResourceKey, ResourceRegistry};

/// Records canvas calls into an [`OpBuffer`] and replays them into a renderer on flush.
///
/// Every drawing method appends exactly one op. Paint resources (gradients, patterns, images)
/// live in the recorder's [`ResourceRegistry`] and are referenced weakly by the ops that use
/// them, so releasing a resource before a flush turns those ops into no-ops.
#[derive(Debug, Default)]
pub struct CanvasRecorder {
    ops: OpBuffer,
    resources: ResourceRegistry,
}

impl CanvasRecorder {
    /// Recorder with a default-configured buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose buffer uses `config`.
    pub fn with_config(config: &OpBufferConfig) -> CanvasResult<Self> {
        Ok(Self {
            ops: OpBuffer::with_config(config)?,
            resources: ResourceRegistry::new(),
        })
    }

    /// Recorded ops not yet flushed.
    pub fn ops(&self) -> &OpBuffer {
        &self.ops
    }

    /// Registered paint resources.
    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    /// Whether any pending op draws text.
    pub fn has_text(&self) -> bool {
        self.ops.has_text()
    }

    /// Replay pending ops into `renderer`, then drop them.
    ///
    /// The buffer is reset even when playback fails; the playback error is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(records = self.ops.len()))]
    pub fn flush(&mut self, renderer: &mut dyn CanvasRenderer) -> CanvasResult<()> {
        let applied = self.ops.apply(renderer, &self.resources);
        if let Err(e) = &applied {
            tracing::warn!(error = %e, "playback aborted");
        }
        self.ops.reset();
        applied
    }

    /// Drop pending ops without replaying them.
    pub fn discard(&mut self) {
        self.ops.reset();
    }

    // Resources.

    /// Register a linear gradient from `start` to `end`.
    pub fn create_linear_gradient(&mut self, start: Point, end: Point) -> ResourceKey {
        self.resources.insert_gradient(Gradient::linear(start, end))
    }

    /// Register a two-circle radial gradient. Radii must be non-negative.
    pub fn create_radial_gradient(
        &mut self,
        start_center: Point,
        start_radius: f64,
        end_center: Point,
        end_radius: f64,
    ) -> CanvasResult<ResourceKey> {
        let g = Gradient::radial(start_center, start_radius, end_center, end_radius)?;
        Ok(self.resources.insert_gradient(g))
    }

    /// Register a conic gradient around `center`.
    pub fn create_conic_gradient(&mut self, start_angle: f64, center: Point) -> ResourceKey {
        self.resources.insert_gradient(Gradient::conic(start_angle, center))
    }

    /// Add a color stop to a registered gradient.
    ///
    /// Ops already recorded see the new stop too, since they resolve the gradient at playback.
    pub fn add_color_stop(
        &mut self,
        gradient: ResourceKey,
        offset: f64,
        color: Rgba8,
    ) -> CanvasResult<()> {
        self.resources
            .gradient_mut(gradient)
            .ok_or_else(|| CanvasError::validation("no gradient registered under this key"))?
            .add_color_stop(offset, color)
    }

    /// Register an image for `draw_image` and `create_pattern`.
    pub fn register_image(&mut self, image: impl Into<Rc<PixelMap>>) -> ResourceKey {
        self.resources.insert_image(image.into())
    }

    /// Register a pattern over a registered image.
    pub fn create_pattern(
        &mut self,
        image: ResourceKey,
        repetition: Repetition,
    ) -> CanvasResult<ResourceKey> {
        let image = self
            .resources
            .image(image)
            .cloned()
            .ok_or_else(|| CanvasError::validation("no image registered under this key"))?;
        Ok(self.resources.insert_pattern(Pattern::new(image, repetition)))
    }

    /// Unregister a resource. Returns `false` if the key was already gone.
    pub fn release(&mut self, key: ResourceKey) -> bool {
        self.resources.remove(key).is_some()
    }

    // State.

    /// `save()`.
    pub fn save(&mut self) -> CanvasResult<()> {
        self.ops.push(SaveOp {})
    }

    /// `restore()`.
    pub fn restore(&mut self) -> CanvasResult<()> {
        self.ops.push(RestoreOp {})
    }

    /// Save and open a layer composited with the current `globalCompositeOperation`.
    pub fn save_layer(&mut self) -> CanvasResult<()> {
        self.ops.push(SaveLayerOp {})
    }

    /// Close the innermost layer opened by [`save_layer`](Self::save_layer).
    pub fn restore_layer(&mut self) -> CanvasResult<()> {
        self.ops.push(RestoreLayerOp {})
    }

    /// `reset()`.
    pub fn reset(&mut self) -> CanvasResult<()> {
        self.ops.push(ResetOp {})
    }

    // Transform.

    /// `scale(sx, sy)`.
    pub fn scale(&mut self, sx: f64, sy: f64) -> CanvasResult<()> {
        self.ops.push(ScaleOp { sx, sy })
    }

    /// `rotate(angle)`.
    pub fn rotate(&mut self, angle: f64) -> CanvasResult<()> {
        self.ops.push(RotateOp { angle })
    }

    /// `translate(tx, ty)`.
    pub fn translate(&mut self, tx: f64, ty: f64) -> CanvasResult<()> {
        self.ops.push(TranslateOp { tx, ty })
    }

    /// `transform(..)`.
    pub fn transform(&mut self, matrix: Affine) -> CanvasResult<()> {
        self.ops.push(TransformOp { matrix })
    }

    /// `setTransform(..)`.
    pub fn set_transform(&mut self, matrix: Affine) -> CanvasResult<()> {
        self.ops.push(SetTransformOp { matrix })
    }

    /// `resetTransform()`.
    pub fn reset_transform(&mut self) -> CanvasResult<()> {
        self.ops.push(ResetTransformOp {})
    }

    // Fill and stroke styles.

    /// Solid `fillStyle`.
    pub fn set_fill_color(&mut self, color: Rgba8) -> CanvasResult<()> {
        self.ops.push(SetFillColorOp { color })
    }

    /// Solid `strokeStyle`.
    pub fn set_stroke_color(&mut self, color: Rgba8) -> CanvasResult<()> {
        self.ops.push(SetStrokeColorOp { color })
    }

    /// Gradient `fillStyle`.
    pub fn set_fill_gradient(&mut self, gradient: ResourceKey) -> CanvasResult<()> {
        self.ops.push(SetFillGradientOp { gradient })
    }

    /// Gradient `strokeStyle`.
    pub fn set_stroke_gradient(&mut self, gradient: ResourceKey) -> CanvasResult<()> {
        self.ops.push(SetStrokeGradientOp { gradient })
    }

    /// Pattern `fillStyle`.
    pub fn set_fill_pattern(&mut self, pattern: ResourceKey) -> CanvasResult<()> {
        self.ops.push(SetFillPatternOp { pattern })
    }

    /// Pattern `strokeStyle`.
    pub fn set_stroke_pattern(&mut self, pattern: ResourceKey) -> CanvasResult<()> {
        self.ops.push(SetStrokePatternOp { pattern })
    }

    // Line style.

    /// `lineWidth`.
    pub fn set_line_width(&mut self, width: f64) -> CanvasResult<()> {
        self.ops.push(SetLineWidthOp { width })
    }

    /// `lineCap`.
    pub fn set_line_cap(&mut self, cap: LineCap) -> CanvasResult<()> {
        self.ops.push(SetLineCapOp { cap })
    }

    /// `lineJoin`.
    pub fn set_line_join(&mut self, join: LineJoin) -> CanvasResult<()> {
        self.ops.push(SetLineJoinOp { join })
    }

    /// `miterLimit`.
    pub fn set_miter_limit(&mut self, limit: f64) -> CanvasResult<()> {
        self.ops.push(SetMiterLimitOp { limit })
    }

    /// `setLineDash(segments)`. A list with a negative or non-finite entry is ignored.
    pub fn set_line_dash(&mut self, segments: &[f64]) -> CanvasResult<()> {
        match SetLineDashOp::new(segments) {
            Some(op) => self.ops.push(op),
            None => {
                tracing::debug!(?segments, "invalid dash list ignored");
                Ok(())
            }
        }
    }

    /// `lineDashOffset`.
    pub fn set_line_dash_offset(&mut self, offset: f64) -> CanvasResult<()> {
        self.ops.push(SetLineDashOffsetOp { offset })
    }

    // Compositing.

    /// `globalAlpha`.
    pub fn set_global_alpha(&mut self, alpha: f64) -> CanvasResult<()> {
        self.ops.push(SetGlobalAlphaOp { alpha })
    }

    /// `globalCompositeOperation`.
    pub fn set_composite_operation(&mut self, op: CompositeOperation) -> CanvasResult<()> {
        self.ops.push(SetCompositeOperationOp { op })
    }

    // Shadow.

    /// `shadowBlur`.
    pub fn set_shadow_blur(&mut self, blur: f64) -> CanvasResult<()> {
        self.ops.push(SetShadowBlurOp { blur })
    }

    /// `shadowColor`.
    pub fn set_shadow_color(&mut self, color: Rgba8) -> CanvasResult<()> {
        self.ops.push(SetShadowColorOp { color })
    }

    /// `shadowOffsetX` and `shadowOffsetY`.
    pub fn set_shadow_offset(&mut self, offset: Vec2) -> CanvasResult<()> {
        self.ops.push(SetShadowOffsetOp { offset })
    }

    // Image and filter.

    /// `imageSmoothingEnabled` and `imageSmoothingQuality`.
    pub fn set_image_smoothing(
        &mut self,
        enabled: bool,
        quality: ImageSmoothingQuality,
    ) -> CanvasResult<()> {
        self.ops.push(SetImageSmoothingOp { enabled, quality })
    }

    /// `filter`. The string is forwarded unparsed.
    pub fn set_filter(&mut self, filter: &str) -> CanvasResult<()> {
        let filter = self.ops.store(filter.to_owned())?;
        self.ops.push(SetFilterOp { filter })
    }

    // Text style.

    /// `font`, already split into its parts.
    pub fn set_font<S: AsRef<str>>(
        &mut self,
        families: &[S],
        size: f64,
        weight: u16,
        style: FontStyle,
    ) -> CanvasResult<()> {
        let families = families.iter().map(|f| f.as_ref().to_owned()).collect();
        let families = self.ops.store::<Vec<String>>(families)?;
        self.ops.push(SetFontOp {
            families,
            size,
            weight,
            style,
        })
    }

    /// `textAlign`.
    pub fn set_text_align(&mut self, align: TextAlign) -> CanvasResult<()> {
        self.ops.push(SetTextAlignOp { align })
    }

    /// `textBaseline`.
    pub fn set_text_baseline(&mut self, baseline: TextBaseline) -> CanvasResult<()> {
        self.ops.push(SetTextBaselineOp { baseline })
    }

    // Rects.

    /// `fillRect(..)`.
    pub fn fill_rect(&mut self, rect: Rect) -> CanvasResult<()> {
        self.ops.push(FillRectOp { rect })
    }

    /// `strokeRect(..)`.
    pub fn stroke_rect(&mut self, rect: Rect) -> CanvasResult<()> {
        self.ops.push(StrokeRectOp { rect })
    }

    /// `clearRect(..)`.
    pub fn clear_rect(&mut self, rect: Rect) -> CanvasResult<()> {
        self.ops.push(ClearRectOp { rect })
    }

    // Current path.

    /// `beginPath()`.
    pub fn begin_path(&mut self) -> CanvasResult<()> {
        self.ops.push(BeginPathOp {})
    }

    /// `closePath()`.
    pub fn close_path(&mut self) -> CanvasResult<()> {
        self.ops.push(ClosePathOp {})
    }

    /// `moveTo(x, y)`.
    pub fn move_to(&mut self, point: Point) -> CanvasResult<()> {
        self.ops.push(MoveToOp { point })
    }

    /// `lineTo(x, y)`.
    pub fn line_to(&mut self, point: Point) -> CanvasResult<()> {
        self.ops.push(LineToOp { point })
    }

    /// `arc(..)`. The radius must be non-negative.
    pub fn arc(&mut self, arc: ArcParams) -> CanvasResult<()> {
        non_negative("arc radius", arc.radius)?;
        self.ops.push(ArcOp::from(arc))
    }

    /// `arcTo(..)`. The radius must be non-negative.
    pub fn arc_to(&mut self, arc: ArcToParams) -> CanvasResult<()> {
        non_negative("arcTo radius", arc.radius)?;
        self.ops.push(ArcToOp {
            p1: arc.p1,
            p2: arc.p2,
            radius: arc.radius,
        })
    }

    /// `ellipse(..)`. Both radii must be non-negative.
    pub fn ellipse(&mut self, ellipse: EllipseParams) -> CanvasResult<()> {
        non_negative("ellipse x radius", ellipse.radii.x)?;
        non_negative("ellipse y radius", ellipse.radii.y)?;
        self.ops.push(EllipseOp::from(ellipse))
    }

    /// `bezierCurveTo(..)`.
    pub fn bezier_curve_to(&mut self, c1: Point, c2: Point, point: Point) -> CanvasResult<()> {
        self.ops.push(BezierCurveToOp { c1, c2, point })
    }

    /// `quadraticCurveTo(..)`.
    pub fn quadratic_curve_to(&mut self, control: Point, point: Point) -> CanvasResult<()> {
        self.ops.push(QuadraticCurveToOp { control, point })
    }

    /// `rect(..)` on the current path.
    pub fn rect(&mut self, rect: Rect) -> CanvasResult<()> {
        self.ops.push(AddRectOp { rect })
    }

    /// `fill(rule)` of the current path.
    pub fn fill(&mut self, rule: FillRule) -> CanvasResult<()> {
        self.ops.push(FillOp { rule })
    }

    /// `stroke()` of the current path.
    pub fn stroke(&mut self) -> CanvasResult<()> {
        self.ops.push(StrokeOp {})
    }

    /// `clip(rule)` to the current path.
    pub fn clip(&mut self, rule: FillRule) -> CanvasResult<()> {
        self.ops.push(ClipOp { rule })
    }

    // Path2D.

    /// `fill(path, rule)`. The path is shared, not copied.
    pub fn fill_path(&mut self, path: &Rc<Path2D>, rule: FillRule) -> CanvasResult<()> {
        let path = self.ops.store(Rc::clone(path))?;
        self.ops.push(FillPath2DOp { path, rule })
    }

    /// `stroke(path)`.
    pub fn stroke_path(&mut self, path: &Rc<Path2D>) -> CanvasResult<()> {
        let path = self.ops.store(Rc::clone(path))?;
        self.ops.push(StrokePath2DOp { path })
    }

    /// `clip(path, rule)`.
    pub fn clip_path(&mut self, path: &Rc<Path2D>, rule: FillRule) -> CanvasResult<()> {
        let path = self.ops.store(Rc::clone(path))?;
        self.ops.push(ClipPath2DOp { path, rule })
    }

    // Text.

    /// `fillText(text, x, y, maxWidth)`.
    pub fn fill_text(
        &mut self,
        text: &str,
        at: Point,
        max_width: Option<f64>,
    ) -> CanvasResult<()> {
        let text = self.ops.store(text.to_owned())?;
        self.ops.push(FillTextOp {
            text,
            at,
            max_width,
        })
    }

    /// `strokeText(text, x, y, maxWidth)`.
    pub fn stroke_text(
        &mut self,
        text: &str,
        at: Point,
        max_width: Option<f64>,
    ) -> CanvasResult<()> {
        let text = self.ops.store(text.to_owned())?;
        self.ops.push(StrokeTextOp {
            text,
            at,
            max_width,
        })
    }

    // Images.

    /// `drawImage(..)` of a registered image. `src` defaults to the whole image.
    pub fn draw_image(
        &mut self,
        image: ResourceKey,
        src: Option<Rect>,
        dst: Rect,
    ) -> CanvasResult<()> {
        self.ops.push(DrawImageOp { image, src, dst })
    }

    /// `putImageData(image, x, y)`. The pixels are held until the op is flushed or discarded.
    pub fn put_image_data(&mut self, image: &Rc<PixelMap>, at: Point) -> CanvasResult<()> {
        let image = self.ops.store(Rc::clone(image))?;
        self.ops.push(PutImageDataOp { image, at })
    }
}

fn non_negative(what: &str, v: f64) -> CanvasResult<()> {
    if v < 0.0 {
        return Err(CanvasError::validation(format!(
            "{what} must be non-negative, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/recorder.rs"]
mod tests;
