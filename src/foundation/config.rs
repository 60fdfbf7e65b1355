use crate::foundation::error::{CanvasError, CanvasResult};
use crate::ops::header::RECORD_ALIGN;

/// Default arena growth quantum in bytes.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Tuning knobs for an [`crate::OpBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpBufferConfig {
    /// Arena growth quantum; must be a power of two no smaller than the record alignment.
    pub page_size: usize,
    /// Bytes reserved up front (rounded up to `page_size`).
    pub initial_capacity: usize,
}

impl Default for OpBufferConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            initial_capacity: 0,
        }
    }
}

impl OpBufferConfig {
    /// Return a config with a different growth quantum.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Return a config that reserves `bytes` when the buffer is created.
    pub fn with_initial_capacity(mut self, bytes: usize) -> Self {
        self.initial_capacity = bytes;
        self
    }

    /// Check the invariants the arena arithmetic relies on.
    pub fn validate(&self) -> CanvasResult<()> {
        if !self.page_size.is_power_of_two() {
            return Err(CanvasError::validation(format!(
                "page_size must be a power of two, got {}",
                self.page_size
            )));
        }
        if self.page_size < RECORD_ALIGN {
            return Err(CanvasError::validation(format!(
                "page_size must be at least {RECORD_ALIGN}, got {}",
                self.page_size
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> CanvasResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| CanvasError::validation(format!("invalid op buffer config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
