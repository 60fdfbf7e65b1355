//! Paint sources that styles can reference: gradients and image patterns.

pub(crate) mod gradient;
pub(crate) mod pattern;

pub use gradient::{ColorStop, Gradient, GradientKind};
pub use pattern::Pattern;
