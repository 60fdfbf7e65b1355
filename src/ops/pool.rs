//! Side storage for record payloads that own heap memory.
//!
//! Arena bytes only ever hold plain data. A record that needs a string, a vector or a shared
//! handle stores the value here and keeps a [`Slot`] index in its encoded payload. Releasing
//! the slot is that record's destructor.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::foundation::core::PixelMap;
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::path::Path2D;

/// A heap-owning payload held by the pool.
#[derive(Debug)]
pub enum OwnedPayload {
    /// Text to draw, or a filter string.
    Text(String),
    /// Font family list.
    Strings(Vec<String>),
    /// Path captured at record time.
    Path(Rc<Path2D>),
    /// Pixels captured at record time.
    Pixels(Rc<PixelMap>),
}

/// Types that can be stored in an [`OwnedPool`].
pub trait PoolValue: Sized + 'static {
    /// Wrap into the pool's payload enum.
    fn into_payload(self) -> OwnedPayload;
    /// Borrow back out, `None` if `payload` holds another type.
    fn from_payload(payload: &OwnedPayload) -> Option<&Self>;
}

macro_rules! pool_value {
    ($ty:ty => $variant:ident) => {
        impl PoolValue for $ty {
            fn into_payload(self) -> OwnedPayload {
                OwnedPayload::$variant(self)
            }

            fn from_payload(payload: &OwnedPayload) -> Option<&Self> {
                match payload {
                    OwnedPayload::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

pool_value!(String => Text);
pool_value!(Vec<String> => Strings);
pool_value!(Rc<Path2D> => Path);
pool_value!(Rc<PixelMap> => Pixels);

/// Typed index of a value in an [`OwnedPool`].
///
/// Not `Clone`: a slot backs exactly one pushed record, so it is released exactly once.
pub struct Slot<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Slot<T> {
    pub(crate) fn from_index(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Position in the pool.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.index).finish()
    }
}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Slot<T> {}

/// Vec-backed storage for owned payloads, cleared as a unit.
#[derive(Debug, Default)]
pub struct OwnedPool {
    slots: Vec<Option<OwnedPayload>>,
    live: usize,
}

impl OwnedPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `value` into the pool.
    pub fn insert<T: PoolValue>(&mut self, value: T) -> CanvasResult<Slot<T>> {
        let index = u32::try_from(self.slots.len())
            .map_err(|_| CanvasError::allocation(self.slots.len()))?;
        self.slots
            .try_reserve(1)
            .map_err(|_| CanvasError::allocation(self.slots.len() + 1))?;
        self.slots.push(Some(value.into_payload()));
        self.live += 1;
        Ok(Slot::from_index(index))
    }

    /// Borrow the value behind `slot`.
    pub fn get<T: PoolValue>(&self, slot: &Slot<T>) -> CanvasResult<&T> {
        match self.slots.get(slot.index as usize) {
            Some(Some(payload)) => T::from_payload(payload).ok_or_else(|| {
                CanvasError::corrupt(0, format!("slot {} holds another payload type", slot.index))
            }),
            Some(None) => Err(CanvasError::corrupt(
                0,
                format!("slot {} was already released", slot.index),
            )),
            None => Err(CanvasError::corrupt(
                0,
                format!("slot {} is out of range", slot.index),
            )),
        }
    }

    /// Drop the value behind `slot`.
    pub fn release<T: PoolValue>(&mut self, slot: &Slot<T>) -> CanvasResult<()> {
        let entry = self.slots.get_mut(slot.index as usize).ok_or_else(|| {
            CanvasError::corrupt(0, format!("slot {} is out of range", slot.index))
        })?;
        let type_matches = match entry.as_ref() {
            Some(payload) => T::from_payload(payload).is_some(),
            None => {
                return Err(CanvasError::corrupt(
                    0,
                    format!("slot {} released twice", slot.index),
                ));
            }
        };
        if !type_matches {
            return Err(CanvasError::corrupt(
                0,
                format!("slot {} holds another payload type", slot.index),
            ));
        }
        drop(entry.take());
        self.live -= 1;
        Ok(())
    }

    /// Number of values not yet released.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Drop every remaining value. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/pool.rs"]
mod tests;
