//! The renderer façade recorded ops replay into.

use crate::foundation::core::{
    Affine, ArcParams, ArcToParams, CompositeOperation, EllipseParams, FillRule, FontStyle,
    ImageSmoothingQuality, LineCap, LineJoin, PixelMap, Point, Rect, Rgba8, TextAlign,
    TextBaseline, Vec2,
};
use crate::paint::{Gradient, Pattern};
use crate::path::Path2D;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as stored, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4)?.try_into().ok()
    }
}

/// Font selection as recorded by `font` assignments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec<'a> {
    /// Family names in fallback order.
    pub families: &'a [String],
    /// Size in CSS pixels.
    pub size: f64,
    /// CSS weight, 1..=1000.
    pub weight: u16,
    /// Slant.
    pub style: FontStyle,
}

/// Drawing target that recorded ops are replayed into.
///
/// Every recorded op makes exactly one call here, in recording order. Implementations own the
/// canvas state machine (save/restore stack, current path, styles); the op buffer only
/// forwards arguments.
pub trait CanvasRenderer {
    /// Push the drawing state.
    fn save(&mut self);
    /// Pop the drawing state.
    fn restore(&mut self);
    /// Push the drawing state and start an offscreen layer. The layer is composited with the
    /// composite operation current at this call when it is restored.
    fn save_layer(&mut self);
    /// Composite the innermost layer and pop the state pushed with it.
    fn restore_layer(&mut self);
    /// Return every style to its default and drop saved states and the current path.
    fn reset(&mut self);

    /// Post-multiply a scale.
    fn scale(&mut self, sx: f64, sy: f64);
    /// Post-multiply a rotation in radians.
    fn rotate(&mut self, angle: f64);
    /// Post-multiply a translation.
    fn translate(&mut self, tx: f64, ty: f64);
    /// Post-multiply an arbitrary transform.
    fn transform(&mut self, m: Affine);
    /// Replace the current transform.
    fn set_transform(&mut self, m: Affine);
    /// Reset the current transform to identity.
    fn reset_transform(&mut self);

    /// Solid fill style.
    fn set_fill_color(&mut self, color: Rgba8);
    /// Solid stroke style.
    fn set_stroke_color(&mut self, color: Rgba8);
    /// Gradient fill style.
    fn set_fill_gradient(&mut self, gradient: &Gradient);
    /// Gradient stroke style.
    fn set_stroke_gradient(&mut self, gradient: &Gradient);
    /// Pattern fill style.
    fn set_fill_pattern(&mut self, pattern: &Pattern);
    /// Pattern stroke style.
    fn set_stroke_pattern(&mut self, pattern: &Pattern);

    /// Stroke width.
    fn set_line_width(&mut self, width: f64);
    /// Stroke end caps.
    fn set_line_cap(&mut self, cap: LineCap);
    /// Stroke joins.
    fn set_line_join(&mut self, join: LineJoin);
    /// Miter join limit.
    fn set_miter_limit(&mut self, limit: f64);
    /// Dash pattern; empty means solid.
    fn set_line_dash(&mut self, segments: &[f64]);
    /// Dash phase.
    fn set_line_dash_offset(&mut self, offset: f64);

    /// Global alpha in `[0, 1]`.
    fn set_global_alpha(&mut self, alpha: f64);
    /// Compositing operator.
    fn set_composite_operation(&mut self, op: CompositeOperation);

    /// Shadow blur radius.
    fn set_shadow_blur(&mut self, blur: f64);
    /// Shadow color.
    fn set_shadow_color(&mut self, color: Rgba8);
    /// Shadow offset.
    fn set_shadow_offset(&mut self, offset: Vec2);

    /// Image smoothing switch and quality.
    fn set_image_smoothing(&mut self, enabled: bool, quality: ImageSmoothingQuality);
    /// CSS filter string, unparsed.
    fn set_filter(&mut self, filter: &str);

    /// Font selection.
    fn set_font(&mut self, font: &FontSpec<'_>);
    /// Text alignment.
    fn set_text_align(&mut self, align: TextAlign);
    /// Text baseline.
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    /// Fill a rectangle with the fill style.
    fn fill_rect(&mut self, rect: Rect);
    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect);
    /// Clear a rectangle to transparent black.
    fn clear_rect(&mut self, rect: Rect);

    /// Drop the current path.
    fn begin_path(&mut self);
    /// Close the current subpath.
    fn close_path(&mut self);
    /// Start a subpath.
    fn move_to(&mut self, p: Point);
    /// Straight segment.
    fn line_to(&mut self, p: Point);
    /// Circular arc.
    fn arc(&mut self, arc: &ArcParams);
    /// Tangent arc.
    fn arc_to(&mut self, arc: &ArcToParams);
    /// Elliptical arc.
    fn ellipse(&mut self, ellipse: &EllipseParams);
    /// Cubic segment.
    fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point);
    /// Quadratic segment.
    fn quadratic_curve_to(&mut self, c: Point, p: Point);
    /// Closed rectangle subpath.
    fn rect(&mut self, rect: Rect);
    /// Fill the current path.
    fn fill(&mut self, rule: FillRule);
    /// Stroke the current path.
    fn stroke(&mut self);
    /// Intersect the clip with the current path.
    fn clip(&mut self, rule: FillRule);

    /// Fill a path object.
    fn fill_path(&mut self, path: &Path2D, rule: FillRule);
    /// Stroke a path object.
    fn stroke_path(&mut self, path: &Path2D);
    /// Intersect the clip with a path object.
    fn clip_path(&mut self, path: &Path2D, rule: FillRule);

    /// Fill text at `at`.
    fn fill_text(&mut self, text: &str, at: Point, max_width: Option<f64>);
    /// Stroke text at `at`.
    fn stroke_text(&mut self, text: &str, at: Point, max_width: Option<f64>);

    /// Draw `src` of `image` (the whole image when `None`) into `dst`.
    fn draw_image(&mut self, image: &PixelMap, src: Option<Rect>, dst: Rect);
    /// Write pixels directly at device position `at`, ignoring transform, clip and compositing.
    fn put_image_data(&mut self, image: &PixelMap, at: Point);
}
