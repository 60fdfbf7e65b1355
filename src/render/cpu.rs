//! Reference rasterizer built on `vello_cpu`.
//!
//! Vector drawing goes through a `vello_cpu::RenderContext`. Operations that write pixels
//! directly (`clearRect`, `putImageData`) and frame readback first settle the context into the
//! frame buffer; the next segment starts by drawing the settled frame back as its background,
//! so compositing operators see everything drawn before them.
//!
//! The current path is kept in user space and interpreted with the transform active when it
//! is filled, stroked or clipped. Text, shadows and filters are accepted and ignored.

use std::sync::Arc;

use kurbo::{BezPath, PathEl, Shape, Stroke, StrokeOpts};
use smallvec::SmallVec;

use crate::foundation::core::{
    Affine, ArcParams, ArcToParams, CompositeOperation, EllipseParams, FillRule,
    ImageSmoothingQuality, LineCap, LineJoin, PixelMap, Point, Rect, Rgba8, TextAlign,
    TextBaseline, Vec2,
};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::paint::{Gradient, Pattern};
use crate::path::{ARC_TOLERANCE, Path2D, PathBuilder};
use crate::render::backend::{CanvasRenderer, FontSpec, FrameRGBA};

/// Options for [`CpuCanvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CpuCanvasOpts {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// If set, the canvas starts filled with this straight-alpha RGBA8 color.
    #[serde(default)]
    pub clear_rgba: Option<[u8; 4]>,
}

impl CpuCanvasOpts {
    /// Transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear_rgba: None,
        }
    }

    /// Start from a solid background.
    pub fn with_clear_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.clear_rgba = Some(rgba);
        self
    }
}

#[derive(Clone, Debug)]
enum PaintStyle {
    Color(Rgba8),
    Gradient(Gradient),
    Pattern(Pattern),
}

#[derive(Clone, Debug)]
struct DrawState {
    transform: Affine,
    fill: PaintStyle,
    stroke: PaintStyle,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f64,
    dash: SmallVec<[f64; 8]>,
    dash_offset: f64,
    global_alpha: f64,
    composite: CompositeOperation,
    // Layers pushed on the render context, outermost first.
    layers: Vec<Layer>,
}

#[derive(Clone, Debug)]
enum Layer {
    /// Device-space clip path.
    Clip(BezPath, FillRule),
    /// Offscreen group composited with this operator when popped.
    Blend(CompositeOperation),
}

#[derive(Clone, Debug)]
struct Saved {
    state: DrawState,
    opened_layer: bool,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: PaintStyle::Color(Rgba8::BLACK),
            stroke: PaintStyle::Color(Rgba8::BLACK),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            dash: SmallVec::new(),
            dash_offset: 0.0,
            global_alpha: 1.0,
            composite: CompositeOperation::SourceOver,
            layers: Vec::new(),
        }
    }
}

/// CPU canvas that renders replayed ops into premultiplied RGBA8.
pub struct CpuCanvas {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    frame: Vec<u8>,
    state: DrawState,
    stack: Vec<Saved>,
    path: PathBuilder,
}

impl std::fmt::Debug for CpuCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("saved_states", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl CpuCanvas {
    /// Create a canvas. Dimensions must fit in `u16`.
    pub fn new(opts: CpuCanvasOpts) -> CanvasResult<Self> {
        let width: u16 = opts
            .width
            .try_into()
            .map_err(|_| CanvasError::validation("canvas width exceeds u16"))?;
        let height: u16 = opts
            .height
            .try_into()
            .map_err(|_| CanvasError::validation("canvas height exceeds u16"))?;
        let pixels = usize::from(width) * usize::from(height);
        let frame = match opts.clear_rgba {
            Some([r, g, b, a]) => Rgba8::rgba(r, g, b, a).to_premul_array().repeat(pixels),
            None => vec![0; pixels * 4],
        };
        let mut canvas = Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
            frame,
            state: DrawState::default(),
            stack: Vec::new(),
            path: PathBuilder::new(),
        };
        canvas.begin_segment();
        Ok(canvas)
    }

    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Number of saved states not yet restored.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Render everything drawn so far and read it back.
    pub fn finish(&mut self) -> FrameRGBA {
        self.settle();
        let frame = FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.frame.clone(),
            premultiplied: true,
        };
        self.begin_segment();
        frame
    }

    fn settle(&mut self) {
        for _ in 0..self.state.layers.len() {
            self.ctx.pop_layer();
        }
        self.ctx.flush();
        let mut scratch = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut scratch);
        self.frame.copy_from_slice(scratch.data_as_u8_slice_mut());
        self.ctx.reset();
    }

    fn begin_segment(&mut self) {
        if self.frame.iter().any(|&b| b != 0) {
            match pixmap_from_premul_bytes(&self.frame, self.width(), self.height()) {
                Ok(pixmap) => {
                    self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
                    self.ctx.set_paint(vello_cpu::Image {
                        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                        sampler: vello_cpu::peniko::ImageSampler::default(),
                    });
                    self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        0.0,
                        0.0,
                        f64::from(self.width),
                        f64::from(self.height),
                    ));
                }
                Err(e) => tracing::error!(error = %e, "failed to restore settled frame"),
            }
        }
        let layers = std::mem::take(&mut self.state.layers);
        for layer in &layers {
            self.push_layer(layer);
        }
        self.state.layers = layers;
    }

    fn push_layer(&mut self, layer: &Layer) {
        match layer {
            Layer::Clip(path, rule) => self.push_clip(path, *rule),
            Layer::Blend(op) => self.ctx.push_blend_layer(blend_mode_for(*op)),
        }
    }

    fn pop_layers_above(&mut self, depth: usize) {
        for _ in depth..self.state.layers.len() {
            self.ctx.pop_layer();
        }
    }

    fn push_clip(&mut self, device_path: &BezPath, rule: FillRule) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_fill_rule(fill_rule_to_cpu(rule));
        self.ctx.push_clip_layer(&bezpath_to_cpu(device_path));
    }

    fn clip_device(&mut self, user_path: &BezPath, rule: FillRule) {
        let device = self.state.transform * user_path.clone();
        self.push_clip(&device, rule);
        self.state.layers.push(Layer::Clip(device, rule));
    }

    fn fill_user_path(&mut self, user_path: &BezPath, rule: FillRule, stroke: bool) {
        let style = if stroke {
            self.state.stroke.clone()
        } else {
            self.state.fill.clone()
        };
        let transform = self.state.transform;
        if !self.set_paint(&style, transform) {
            return;
        }
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_blend_mode(blend_mode_for(self.state.composite));
        self.ctx.set_fill_rule(fill_rule_to_cpu(rule));
        let alpha = self.state.global_alpha;
        if alpha < 1.0 {
            self.ctx.push_opacity_layer(alpha as f32);
        }
        self.ctx.fill_path(&bezpath_to_cpu(user_path));
        if alpha < 1.0 {
            self.ctx.pop_layer();
        }
    }

    fn stroke_user_path(&mut self, user_path: &BezPath) {
        let outline = kurbo::stroke(
            user_path.elements().iter().copied(),
            &self.stroke_style(),
            &StrokeOpts::default(),
            ARC_TOLERANCE,
        );
        self.fill_user_path(&outline, FillRule::NonZero, true);
    }

    fn stroke_style(&self) -> Stroke {
        let s = &self.state;
        let cap = match s.line_cap {
            LineCap::Butt => kurbo::Cap::Butt,
            LineCap::Round => kurbo::Cap::Round,
            LineCap::Square => kurbo::Cap::Square,
        };
        let join = match s.line_join {
            LineJoin::Miter => kurbo::Join::Miter,
            LineJoin::Round => kurbo::Join::Round,
            LineJoin::Bevel => kurbo::Join::Bevel,
        };
        let stroke = Stroke::new(s.line_width)
            .with_caps(cap)
            .with_join(join)
            .with_miter_limit(s.miter_limit);
        if s.dash.iter().sum::<f64>() > 0.0 {
            stroke.with_dashes(s.dash_offset, s.dash.iter().copied())
        } else {
            stroke
        }
    }

    /// Select `style` as the paint. Returns `false` when nothing can be painted.
    fn set_paint(&mut self, style: &PaintStyle, transform: Affine) -> bool {
        match style {
            PaintStyle::Color(c) => {
                self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                true
            }
            PaintStyle::Gradient(g) => self.set_sampled_paint(transform, |p| g.color_at(p)),
            PaintStyle::Pattern(p) => self.set_sampled_paint(transform, |q| p.color_at(q)),
        }
    }

    fn set_sampled_paint(&mut self, transform: Affine, sample: impl Fn(Point) -> Rgba8) -> bool {
        if transform.determinant() == 0.0 {
            return false;
        }
        let to_user = transform.inverse();
        let (w, h) = (usize::from(self.width), usize::from(self.height));
        let mut bytes = Vec::with_capacity(w * h * 4);
        for y in 0..h {
            for x in 0..w {
                let p = to_user * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                bytes.extend_from_slice(&sample(p).to_premul_array());
            }
        }
        match pixmap_from_premul_bytes(&bytes, self.width(), self.height()) {
            Ok(pixmap) => {
                self.ctx.set_paint(vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                });
                self.ctx.set_paint_transform(affine_to_cpu(to_user));
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to build paint image");
                false
            }
        }
    }

    fn device_pixels_in(&self, device_path: &BezPath) -> Vec<(usize, usize)> {
        let bounds = device_path
            .bounding_box()
            .intersect(Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height)));
        if bounds.is_zero_area() {
            return Vec::new();
        }
        let (x0, y0) = (bounds.x0.floor() as usize, bounds.y0.floor() as usize);
        let (x1, y1) = (bounds.x1.ceil() as usize, bounds.y1.ceil() as usize);
        let mut out = Vec::new();
        for y in y0..y1.min(usize::from(self.height)) {
            for x in x0..x1.min(usize::from(self.width)) {
                let c = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let inside = device_path.winding(c) != 0
                    && self.state.layers.iter().all(|layer| match layer {
                        Layer::Clip(clip, rule) => covers(clip, *rule, c),
                        Layer::Blend(_) => true,
                    });
                if inside {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

fn covers(path: &BezPath, rule: FillRule, p: Point) -> bool {
    let w = path.winding(p);
    match rule {
        FillRule::NonZero => w != 0,
        FillRule::EvenOdd => w % 2 != 0,
    }
}

fn finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl CanvasRenderer for CpuCanvas {
    fn save(&mut self) {
        self.stack.push(Saved {
            state: self.state.clone(),
            opened_layer: false,
        });
    }

    fn restore(&mut self) {
        let Some(prev) = self.stack.pop() else {
            tracing::debug!("restore without matching save ignored");
            return;
        };
        self.pop_layers_above(prev.state.layers.len());
        self.state = prev.state;
    }

    fn save_layer(&mut self) {
        self.stack.push(Saved {
            state: self.state.clone(),
            opened_layer: true,
        });
        let layer = Layer::Blend(self.state.composite);
        self.push_layer(&layer);
        self.state.layers.push(layer);
    }

    fn restore_layer(&mut self) {
        if !self.stack.last().is_some_and(|s| s.opened_layer) {
            tracing::debug!("restore_layer without matching save_layer ignored");
            return;
        }
        self.restore();
    }

    fn reset(&mut self) {
        self.pop_layers_above(0);
        self.stack.clear();
        self.state = DrawState::default();
        self.path = PathBuilder::new();
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        if finite(&[sx, sy]) {
            self.state.transform *= Affine::scale_non_uniform(sx, sy);
        }
    }

    fn rotate(&mut self, angle: f64) {
        if angle.is_finite() {
            self.state.transform *= Affine::rotate(angle);
        }
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        if finite(&[tx, ty]) {
            self.state.transform *= Affine::translate((tx, ty));
        }
    }

    fn transform(&mut self, m: Affine) {
        if finite(&m.as_coeffs()) {
            self.state.transform *= m;
        }
    }

    fn set_transform(&mut self, m: Affine) {
        if finite(&m.as_coeffs()) {
            self.state.transform = m;
        }
    }

    fn reset_transform(&mut self) {
        self.state.transform = Affine::IDENTITY;
    }

    fn set_fill_color(&mut self, color: Rgba8) {
        self.state.fill = PaintStyle::Color(color);
    }

    fn set_stroke_color(&mut self, color: Rgba8) {
        self.state.stroke = PaintStyle::Color(color);
    }

    fn set_fill_gradient(&mut self, gradient: &Gradient) {
        self.state.fill = PaintStyle::Gradient(gradient.clone());
    }

    fn set_stroke_gradient(&mut self, gradient: &Gradient) {
        self.state.stroke = PaintStyle::Gradient(gradient.clone());
    }

    fn set_fill_pattern(&mut self, pattern: &Pattern) {
        self.state.fill = PaintStyle::Pattern(pattern.clone());
    }

    fn set_stroke_pattern(&mut self, pattern: &Pattern) {
        self.state.stroke = PaintStyle::Pattern(pattern.clone());
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn set_miter_limit(&mut self, limit: f64) {
        if limit.is_finite() && limit > 0.0 {
            self.state.miter_limit = limit;
        }
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.state.dash = segments.iter().copied().collect();
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.state.dash_offset = offset;
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        self.state.composite = op;
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        tracing::debug!(blur, "shadows are not rasterized");
    }

    fn set_shadow_color(&mut self, color: Rgba8) {
        tracing::debug!(?color, "shadows are not rasterized");
    }

    fn set_shadow_offset(&mut self, offset: Vec2) {
        tracing::debug!(?offset, "shadows are not rasterized");
    }

    fn set_image_smoothing(&mut self, enabled: bool, quality: ImageSmoothingQuality) {
        tracing::debug!(enabled, ?quality, "image smoothing uses the default sampler");
    }

    fn set_filter(&mut self, filter: &str) {
        tracing::debug!(filter, "filters are not rasterized");
    }

    fn set_font(&mut self, font: &FontSpec<'_>) {
        tracing::debug!(families = ?font.families, size = font.size, "text is not rasterized");
    }

    fn set_text_align(&mut self, _align: TextAlign) {}

    fn set_text_baseline(&mut self, _baseline: TextBaseline) {}

    fn fill_rect(&mut self, rect: Rect) {
        self.fill_user_path(&rect.to_path(ARC_TOLERANCE), FillRule::NonZero, false);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.stroke_user_path(&rect.to_path(ARC_TOLERANCE));
    }

    fn clear_rect(&mut self, rect: Rect) {
        let device = self.state.transform * rect.to_path(ARC_TOLERANCE);
        self.settle();
        for (x, y) in self.device_pixels_in(&device) {
            let i = (y * usize::from(self.width) + x) * 4;
            self.frame[i..i + 4].fill(0);
        }
        self.begin_segment();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Point) {
        self.path.line_to(p);
    }

    fn arc(&mut self, arc: &ArcParams) {
        self.path.arc(arc);
    }

    fn arc_to(&mut self, arc: &ArcToParams) {
        self.path.arc_to(arc);
    }

    fn ellipse(&mut self, ellipse: &EllipseParams) {
        self.path.ellipse(ellipse);
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.path.bezier_curve_to(c1, c2, p);
    }

    fn quadratic_curve_to(&mut self, c: Point, p: Point) {
        self.path.quadratic_curve_to(c, p);
    }

    fn rect(&mut self, rect: Rect) {
        self.path.rect(rect);
    }

    fn fill(&mut self, rule: FillRule) {
        let path = self.path.path().clone();
        self.fill_user_path(&path, rule, false);
    }

    fn stroke(&mut self) {
        let path = self.path.path().clone();
        self.stroke_user_path(&path);
    }

    fn clip(&mut self, rule: FillRule) {
        let path = self.path.path().clone();
        self.clip_device(&path, rule);
    }

    fn fill_path(&mut self, path: &Path2D, rule: FillRule) {
        self.fill_user_path(&path.to_bez_path(), rule, false);
    }

    fn stroke_path(&mut self, path: &Path2D) {
        self.stroke_user_path(&path.to_bez_path());
    }

    fn clip_path(&mut self, path: &Path2D, rule: FillRule) {
        self.clip_device(&path.to_bez_path(), rule);
    }

    fn fill_text(&mut self, text: &str, at: Point, _max_width: Option<f64>) {
        tracing::debug!(text, ?at, "text is not rasterized");
    }

    fn stroke_text(&mut self, text: &str, at: Point, _max_width: Option<f64>) {
        tracing::debug!(text, ?at, "text is not rasterized");
    }

    fn draw_image(&mut self, image: &PixelMap, src: Option<Rect>, dst: Rect) {
        let src = src.unwrap_or_else(|| image.bounds());
        if src.width() == 0.0 || src.height() == 0.0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let premul: Vec<u8> = image
            .data()
            .chunks_exact(4)
            .flat_map(|px| Rgba8::rgba(px[0], px[1], px[2], px[3]).to_premul_array())
            .collect();
        let pixmap = match pixmap_from_premul_bytes(&premul, image.width(), image.height()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "image skipped");
                return;
            }
        };
        let fit = Affine::translate(dst.origin().to_vec2())
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate(-src.origin().to_vec2());
        self.ctx.set_transform(affine_to_cpu(self.state.transform * fit));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_blend_mode(blend_mode_for(self.state.composite));
        self.ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        let alpha = self.state.global_alpha;
        if alpha < 1.0 {
            self.ctx.push_opacity_layer(alpha as f32);
        }
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(src.x0, src.y0, src.x1, src.y1));
        if alpha < 1.0 {
            self.ctx.pop_layer();
        }
    }

    fn put_image_data(&mut self, image: &PixelMap, at: Point) {
        self.settle();
        let (fw, fh) = (i64::from(self.width), i64::from(self.height));
        let (iw, ih) = (i64::from(image.width()), i64::from(image.height()));
        // Anything outside [-image, frame] misses the frame entirely; NaN casts to 0.
        let ox = (at.x.round() as i64).clamp(-iw, fw);
        let oy = (at.y.round() as i64).clamp(-ih, fh);
        for y in 0..ih {
            for x in 0..iw {
                let (dx, dy) = (ox + x, oy + y);
                if dx < 0 || dy < 0 || dx >= fw || dy >= fh {
                    continue;
                }
                let Some(px) = image.pixel(x as u32, y as u32) else {
                    continue;
                };
                let i = ((dy * fw + dx) * 4) as usize;
                self.frame[i..i + 4].copy_from_slice(&px.to_premul_array());
            }
        }
        self.begin_segment();
    }
}

fn fill_rule_to_cpu(rule: FillRule) -> vello_cpu::peniko::Fill {
    match rule {
        FillRule::NonZero => vello_cpu::peniko::Fill::NonZero,
        FillRule::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
    }
}

fn blend_mode_for(op: CompositeOperation) -> vello_cpu::peniko::BlendMode {
    use vello_cpu::peniko::{BlendMode, Compose, Mix};

    let (mix, compose) = match op {
        CompositeOperation::SourceOver => (Mix::Normal, Compose::SrcOver),
        CompositeOperation::SourceAtop => (Mix::Normal, Compose::SrcAtop),
        CompositeOperation::SourceIn => (Mix::Normal, Compose::SrcIn),
        CompositeOperation::SourceOut => (Mix::Normal, Compose::SrcOut),
        CompositeOperation::DestinationOver => (Mix::Normal, Compose::DestOver),
        CompositeOperation::DestinationAtop => (Mix::Normal, Compose::DestAtop),
        CompositeOperation::DestinationIn => (Mix::Normal, Compose::DestIn),
        CompositeOperation::DestinationOut => (Mix::Normal, Compose::DestOut),
        CompositeOperation::Lighter => (Mix::Normal, Compose::Plus),
        CompositeOperation::Copy => (Mix::Normal, Compose::Copy),
        CompositeOperation::Xor => (Mix::Normal, Compose::Xor),
        CompositeOperation::Multiply => (Mix::Multiply, Compose::SrcOver),
        CompositeOperation::Screen => (Mix::Screen, Compose::SrcOver),
        CompositeOperation::Overlay => (Mix::Overlay, Compose::SrcOver),
        CompositeOperation::Darken => (Mix::Darken, Compose::SrcOver),
        CompositeOperation::Lighten => (Mix::Lighten, Compose::SrcOver),
        CompositeOperation::ColorDodge => (Mix::ColorDodge, Compose::SrcOver),
        CompositeOperation::ColorBurn => (Mix::ColorBurn, Compose::SrcOver),
        CompositeOperation::HardLight => (Mix::HardLight, Compose::SrcOver),
        CompositeOperation::SoftLight => (Mix::SoftLight, Compose::SrcOver),
        CompositeOperation::Difference => (Mix::Difference, Compose::SrcOver),
        CompositeOperation::Exclusion => (Mix::Exclusion, Compose::SrcOver),
        CompositeOperation::Hue => (Mix::Hue, Compose::SrcOver),
        CompositeOperation::Saturation => (Mix::Saturation, Compose::SrcOver),
        CompositeOperation::Color => (Mix::Color, Compose::SrcOver),
        CompositeOperation::Luminosity => (Mix::Luminosity, Compose::SrcOver),
    };
    BlendMode::new(mix, compose)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CanvasResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CanvasError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CanvasError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CanvasError::validation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
