//! Canvas path construction: the current-path builder and reusable `Path2D` objects.

pub(crate) mod builder;
pub(crate) mod path2d;

pub use builder::{ARC_TOLERANCE, PathBuilder, normalized_sweep};
pub use path2d::{Path2D, PathCmd};
