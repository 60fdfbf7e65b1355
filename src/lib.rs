//! opcanvas records 2D canvas drawing calls into a compact command buffer and replays them
//! into a rendering backend later.
//!
//! - Record calls through a [`CanvasRecorder`] (or push records into an [`OpBuffer`] directly)
//! - Replay them into any [`CanvasRenderer`], such as the [`CpuCanvas`] rasterizer
//! - Reuse the same buffer frame after frame; its arena keeps its capacity across resets
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub mod arena;
pub mod canvas;
pub mod ops;
pub mod paint;
pub mod path;
pub mod render;
pub mod resources;

pub use crate::foundation::config::{DEFAULT_PAGE_SIZE, OpBufferConfig};
pub use crate::foundation::core::{
    Affine, ArcParams, ArcToParams, BezPath, CompositeOperation, EllipseParams, FillRule,
    FontStyle, ImageSmoothingQuality, LineCap, LineJoin, PixelMap, Point, Rect, Repetition,
    Rgba8, TextAlign, TextBaseline, Vec2,
};
pub use crate::foundation::error::{CanvasError, CanvasResult};

pub use crate::canvas::CanvasRecorder;
pub use crate::ops::{OpBuffer, OpKind, Record};
pub use crate::paint::{Gradient, Pattern};
pub use crate::path::{Path2D, PathBuilder};
pub use crate::render::{
    CallRecorder, CanvasRenderer, CpuCanvas, CpuCanvasOpts, FrameRGBA, RenderCall,
};
pub use crate::resources::{ResourceKey, ResourceRegistry};
