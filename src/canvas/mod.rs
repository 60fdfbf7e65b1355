//! Application-facing canvas API.

pub mod recorder;

pub use recorder::CanvasRecorder;
