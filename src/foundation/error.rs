/// Convenience result type used across opcanvas.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Top-level error taxonomy used by the recording and playback APIs.
#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    /// The arena could not grow, or the requested size overflowed.
    #[error("allocation error: could not reserve {requested} bytes")]
    Allocation {
        /// Requested capacity in bytes (saturated on overflow).
        requested: usize,
    },

    /// A record would not fit the 24-bit skip field of its header.
    #[error("record too large: {kind} needs {size} bytes")]
    RecordTooLarge {
        /// Name of the operation kind being pushed.
        kind: &'static str,
        /// Aligned record size in bytes.
        size: usize,
    },

    /// The buffer bytes could not be interpreted as a valid record chain.
    #[error("corrupt op buffer at offset {offset}: {reason}")]
    Corrupt {
        /// Byte offset of the record being read.
        offset: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Error raised by embedder code around playback, such as a renderer that collects its own
    /// failures during replay and reports them after `flush`. Nothing in this crate builds it;
    /// the `From<anyhow::Error>` conversion lets such code use `?`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CanvasError {
    /// Build a [`CanvasError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CanvasError::Corrupt`] value.
    pub fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            offset,
            reason: reason.into(),
        }
    }

    /// Build a [`CanvasError::Allocation`] value.
    pub fn allocation(requested: usize) -> Self {
        Self::Allocation { requested }
    }

    /// Return `true` for errors that mean the buffer bytes can no longer be trusted.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }

    /// Rebase a [`CanvasError::Corrupt`] raised inside a record onto the record's offset.
    pub(crate) fn at_offset(self, base: usize) -> Self {
        match self {
            Self::Corrupt { offset, reason } => Self::Corrupt {
                offset: base.saturating_add(offset),
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
