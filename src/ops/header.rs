//! Fixed 4-byte record header.
//!
//! ```text
//!  31                              8 7        0
//! ┌─────────────────────────────────┬──────────┐
//! │ skip (24 bits)                  │ kind (8) │
//! └─────────────────────────────────┴──────────┘
//! ```
//!
//! `skip` is the aligned byte length of the whole record, header included, so the next record
//! starts at `offset + skip`. The header is stored little-endian.

use crate::foundation::error::{CanvasError, CanvasResult};
use crate::ops::registry::OpKind;

/// Size of an encoded header in bytes.
pub const HEADER_SIZE: usize = 4;

/// Every record length is a multiple of the native pointer width.
pub const RECORD_ALIGN: usize = std::mem::size_of::<usize>();

const KIND_BITS: u32 = 8;
const KIND_MASK: u32 = (1 << KIND_BITS) - 1;

/// Largest skip the 24-bit field can hold.
pub const MAX_SKIP: usize = (1 << (32 - KIND_BITS)) - 1;

/// Packed `(kind, skip)` record header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct OpHeader(u32);

const _: () = assert!(std::mem::size_of::<OpHeader>() == HEADER_SIZE);

impl OpHeader {
    /// Pack a header. Fails when `skip` exceeds [`MAX_SKIP`].
    pub fn new(kind: OpKind, skip: usize) -> CanvasResult<Self> {
        if skip > MAX_SKIP {
            return Err(CanvasError::RecordTooLarge {
                kind: kind.name(),
                size: skip,
            });
        }
        Ok(Self(((skip as u32) << KIND_BITS) | u32::from(kind.tag())))
    }

    /// Reinterpret raw header bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw header bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Kind tag in the low byte.
    pub const fn tag(self) -> u8 {
        (self.0 & KIND_MASK) as u8
    }

    /// Decoded kind, `None` for tags outside the registry.
    pub fn kind(self) -> Option<OpKind> {
        OpKind::from_tag(self.tag())
    }

    /// Byte distance to the next record.
    pub const fn skip(self) -> usize {
        (self.0 >> KIND_BITS) as usize
    }

    /// Little-endian encoding.
    pub const fn to_le_bytes(self) -> [u8; HEADER_SIZE] {
        self.0.to_le_bytes()
    }

    /// Read a header from the first four bytes of `bytes`.
    pub fn read(bytes: &[u8], offset: usize) -> CanvasResult<Self> {
        let raw: [u8; HEADER_SIZE] = bytes
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| CanvasError::corrupt(offset, "truncated record header"))?;
        Ok(Self(u32::from_le_bytes(raw)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/header.rs"]
mod tests;
