//! Renderer façade and the backends that implement it.

pub mod backend;
pub mod cpu;
pub mod trace;

pub use backend::{CanvasRenderer, FontSpec, FrameRGBA};
pub use cpu::{CpuCanvas, CpuCanvasOpts};
pub use trace::{CallRecorder, RenderCall};
