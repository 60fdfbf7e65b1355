//! Little-endian payload codec for op records.
//!
//! Every field type a record can hold implements [`Wire`] with a fixed encoded size. Record
//! structs get their [`Payload`] impl from [`wire_struct!`], which encodes fields in
//! declaration order with no padding between them. Decoding never trusts the bytes: a bad
//! enum code, a non-boolean flag or a short payload comes back as a corruption error.

use slotmap::{Key, KeyData};

use crate::foundation::core::{
    Affine, CompositeOperation, FillRule, FontStyle, ImageSmoothingQuality, LineCap, LineJoin,
    Point, Rect, Rgba8, TextAlign, TextBaseline, Vec2,
};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::ops::header::HEADER_SIZE;
use crate::ops::pool::Slot;
use crate::resources::ResourceKey;

/// Fixed-size little-endian field encoding.
pub trait Wire: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Write exactly [`Self::SIZE`] bytes into `out`.
    fn write(&self, out: &mut [u8]);

    /// Read from exactly [`Self::SIZE`] bytes. `None` if the bytes are not a valid value.
    fn read(bytes: &[u8]) -> Option<Self>;
}

fn array<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    bytes.get(..N)?.try_into().ok()
}

macro_rules! wire_le {
    ($($ty:ty),+) => {$(
        impl Wire for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn write(&self, out: &mut [u8]) {
                out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
            }

            fn read(bytes: &[u8]) -> Option<Self> {
                array(bytes).map(<$ty>::from_le_bytes)
            }
        }
    )+};
}

wire_le!(u8, u16, u32, u64, f64);

impl Wire for bool {
    const SIZE: usize = 1;

    fn write(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        match *bytes.first()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

impl Wire for Point {
    const SIZE: usize = 16;

    fn write(&self, out: &mut [u8]) {
        self.x.write(&mut out[..8]);
        self.y.write(&mut out[8..16]);
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        Some(Point::new(f64::read(bytes)?, f64::read(bytes.get(8..)?)?))
    }
}

impl Wire for Vec2 {
    const SIZE: usize = 16;

    fn write(&self, out: &mut [u8]) {
        self.x.write(&mut out[..8]);
        self.y.write(&mut out[8..16]);
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        Some(Vec2::new(f64::read(bytes)?, f64::read(bytes.get(8..)?)?))
    }
}

impl Wire for Rect {
    const SIZE: usize = 32;

    fn write(&self, out: &mut [u8]) {
        for (i, v) in [self.x0, self.y0, self.x1, self.y1].iter().enumerate() {
            v.write(&mut out[i * 8..(i + 1) * 8]);
        }
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        let f = |i: usize| f64::read(bytes.get(i * 8..)?);
        Some(Rect::new(f(0)?, f(1)?, f(2)?, f(3)?))
    }
}

impl Wire for Affine {
    const SIZE: usize = 48;

    fn write(&self, out: &mut [u8]) {
        for (i, v) in self.as_coeffs().iter().enumerate() {
            v.write(&mut out[i * 8..(i + 1) * 8]);
        }
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        let mut coeffs = [0.0; 6];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = f64::read(bytes.get(i * 8..)?)?;
        }
        Some(Affine::new(coeffs))
    }
}

impl Wire for Rgba8 {
    const SIZE: usize = 4;

    fn write(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&[self.r, self.g, self.b, self.a]);
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        let [r, g, b, a] = array(bytes)?;
        Some(Rgba8::rgba(r, g, b, a))
    }
}

impl<T: Wire> Wire for Option<T> {
    const SIZE: usize = 1 + T::SIZE;

    fn write(&self, out: &mut [u8]) {
        match self {
            Some(v) => {
                out[0] = 1;
                v.write(&mut out[1..]);
            }
            None => out[..Self::SIZE].fill(0),
        }
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        match *bytes.first()? {
            0 => Some(None),
            1 => T::read(bytes.get(1..)?).map(Some),
            _ => None,
        }
    }
}

impl<T> Wire for Slot<T> {
    const SIZE: usize = 4;

    fn write(&self, out: &mut [u8]) {
        self.index().write(out);
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        u32::read(bytes).map(Slot::from_index)
    }
}

impl Wire for ResourceKey {
    const SIZE: usize = 8;

    fn write(&self, out: &mut [u8]) {
        self.data().as_ffi().write(out);
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        u64::read(bytes).map(|v| KeyData::from_ffi(v).into())
    }
}

/// Implement [`Wire`] for a fieldless enum as a one-byte code.
macro_rules! wire_enum {
    ($ty:ty { $($variant:ident = $code:literal),+ $(,)? }) => {
        impl Wire for $ty {
            const SIZE: usize = 1;

            fn write(&self, out: &mut [u8]) {
                out[0] = match self {
                    $(Self::$variant => $code,)+
                };
            }

            fn read(bytes: &[u8]) -> Option<Self> {
                match *bytes.first()? {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

wire_enum!(FillRule { NonZero = 0, EvenOdd = 1 });
wire_enum!(LineCap { Butt = 0, Round = 1, Square = 2 });
wire_enum!(LineJoin { Miter = 0, Round = 1, Bevel = 2 });
wire_enum!(TextAlign { Start = 0, End = 1, Left = 2, Right = 3, Center = 4 });
wire_enum!(TextBaseline {
    Alphabetic = 0,
    Top = 1,
    Hanging = 2,
    Middle = 3,
    Ideographic = 4,
    Bottom = 5,
});
wire_enum!(FontStyle { Normal = 0, Italic = 1, Oblique = 2 });
wire_enum!(ImageSmoothingQuality { Low = 0, Medium = 1, High = 2 });
wire_enum!(CompositeOperation {
    SourceOver = 0,
    SourceAtop = 1,
    SourceIn = 2,
    SourceOut = 3,
    DestinationOver = 4,
    DestinationAtop = 5,
    DestinationIn = 6,
    DestinationOut = 7,
    Lighter = 8,
    Copy = 9,
    Xor = 10,
    Multiply = 11,
    Screen = 12,
    Overlay = 13,
    Darken = 14,
    Lighten = 15,
    ColorDodge = 16,
    ColorBurn = 17,
    HardLight = 18,
    SoftLight = 19,
    Difference = 20,
    Exclusion = 21,
    Hue = 22,
    Saturation = 23,
    Color = 24,
    Luminosity = 25,
});

/// Sequential writer over a record's payload bytes.
pub struct PayloadWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> PayloadWriter<'a> {
    /// Start writing at the beginning of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Append one field.
    pub fn put<T: Wire>(&mut self, value: &T) {
        let end = self.pos + T::SIZE;
        value.write(&mut self.buf[self.pos..end]);
        self.pos = end;
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Sequential reader over a record's payload bytes.
///
/// Errors carry offsets relative to the record start; the walker rebases them.
pub struct PayloadReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    /// Start reading at the beginning of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Read one field.
    pub fn take<T: Wire>(&mut self) -> CanvasResult<T> {
        let at = HEADER_SIZE + self.pos;
        let field = self
            .bytes
            .get(self.pos..self.pos + T::SIZE)
            .ok_or_else(|| CanvasError::corrupt(at, "truncated record payload"))?;
        let value = T::read(field).ok_or_else(|| {
            CanvasError::corrupt(
                at,
                format!("invalid {} in record payload", std::any::type_name::<T>()),
            )
        })?;
        self.pos += T::SIZE;
        Ok(value)
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }
}

/// Encoding of a whole record payload.
pub trait Payload: Sized {
    /// Bytes [`Payload::encode`] will write.
    fn payload_len(&self) -> usize;

    /// Write the payload. `w` has exactly [`Payload::payload_len`] bytes available.
    fn encode(&self, w: &mut PayloadWriter<'_>);

    /// Read a payload written by [`Payload::encode`].
    fn decode(r: &mut PayloadReader<'_>) -> CanvasResult<Self>;
}

/// Declare a record struct whose fields are all [`Wire`] types, with its [`Payload`] impl.
macro_rules! wire_struct {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($(#[$fmeta:meta])* pub $field:ident : $fty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq)]
        pub struct $name {
            $($(#[$fmeta])* pub $field: $fty,)*
        }

        impl $crate::ops::codec::Payload for $name {
            fn payload_len(&self) -> usize {
                0 $(+ <$fty as $crate::ops::codec::Wire>::SIZE)*
            }

            #[allow(unused_variables)]
            fn encode(&self, w: &mut $crate::ops::codec::PayloadWriter<'_>) {
                $(w.put(&self.$field);)*
            }

            #[allow(unused_variables)]
            fn decode(
                r: &mut $crate::ops::codec::PayloadReader<'_>,
            ) -> $crate::foundation::error::CanvasResult<Self> {
                Ok(Self {
                    $($field: r.take()?,)*
                })
            }
        }
    };
}

pub(crate) use wire_struct;

#[cfg(test)]
#[path = "../../tests/unit/ops/codec.rs"]
mod tests;
