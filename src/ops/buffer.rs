//! The op buffer: records appended in issue order, replayed and destroyed by walking the skip
//! chain.

use std::ops::Range;

use crate::arena::{ByteArena, align_up};
use crate::foundation::config::OpBufferConfig;
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::ops::codec::PayloadWriter;
use crate::ops::header::{HEADER_SIZE, OpHeader, RECORD_ALIGN};
use crate::ops::pool::{OwnedPool, PoolValue, Slot};
use crate::ops::registry::{ApplyContext, OpKind, Record};
use crate::render::backend::CanvasRenderer;
use crate::resources::ResourceRegistry;

/// Observable lifecycle of an [`OpBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferState {
    /// Nothing recorded since the last reset.
    Idle,
    /// At least one record is waiting for playback.
    Recorded,
}

/// One record as seen by a walk.
#[derive(Clone, Copy, Debug)]
pub struct RawRecord<'a> {
    /// Byte offset of the header.
    pub offset: usize,
    /// Decoded kind.
    pub kind: OpKind,
    /// Aligned record length, header included.
    pub skip: usize,
    /// Bytes after the header, up to the next record (padding and trailing data included).
    pub payload: &'a [u8],
}

/// Iterator over the skip chain of a byte range.
///
/// Stops after the first corruption error.
pub struct Records<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Records<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    fn read_at(&self, offset: usize) -> CanvasResult<RawRecord<'a>> {
        let header = OpHeader::read(&self.bytes[offset..], offset)?;
        let kind = header.kind().ok_or_else(|| {
            CanvasError::corrupt(offset, format!("unknown op kind tag {}", header.tag()))
        })?;
        let skip = header.skip();
        if skip < HEADER_SIZE || skip % RECORD_ALIGN != 0 {
            return Err(CanvasError::corrupt(offset, format!("invalid skip {skip}")));
        }
        let end = offset
            .checked_add(skip)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                CanvasError::corrupt(offset, format!("skip {skip} runs past used length"))
            })?;
        Ok(RawRecord {
            offset,
            kind,
            skip,
            payload: &self.bytes[offset + HEADER_SIZE..end],
        })
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = CanvasResult<RawRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        match self.read_at(self.offset) {
            Ok(rec) => {
                self.offset += rec.skip;
                Some(Ok(rec))
            }
            Err(e) => {
                self.failed = true;
                tracing::warn!(error = %e, "op buffer walk aborted");
                Some(Err(e))
            }
        }
    }
}

/// Append-only sequence of encoded canvas operations.
///
/// Pushing needs `&mut self` while walking borrows `&self`, so a push can never land in the
/// middle of a walk.
#[derive(Debug)]
pub struct OpBuffer {
    arena: ByteArena,
    pool: OwnedPool,
    used: usize,
    count: usize,
    has_text: bool,
}

impl Default for OpBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OpBuffer {
    /// Empty buffer with the default config. Allocates nothing until the first push.
    pub fn new() -> Self {
        Self::from_arena(ByteArena::new(OpBufferConfig::default().page_size))
    }

    /// Empty buffer from a validated config.
    pub fn with_config(config: &OpBufferConfig) -> CanvasResult<Self> {
        Ok(Self::from_arena(ByteArena::with_config(config)?))
    }

    fn from_arena(arena: ByteArena) -> Self {
        Self {
            arena,
            pool: OwnedPool::new(),
            used: 0,
            count: 0,
            has_text: false,
        }
    }

    /// Move an owned payload into the buffer's pool for a record about to be pushed.
    pub fn store<T: PoolValue>(&mut self, value: T) -> CanvasResult<Slot<T>> {
        self.pool.insert(value)
    }

    /// Append `record`.
    pub fn push<R: Record>(&mut self, record: R) -> CanvasResult<()> {
        self.push_with_trailing(record, 0).map(|_| ())
    }

    /// Append `record` followed by `trailing` zeroed bytes the caller may fill in.
    ///
    /// On failure nothing is appended and the record's pool slots are released.
    pub fn push_with_trailing<R: Record>(
        &mut self,
        record: R,
        trailing: usize,
    ) -> CanvasResult<&mut [u8]> {
        match self.write_record(&record, trailing) {
            Ok(range) => Ok(&mut self.arena.data_mut()[range]),
            Err(e) => {
                if let Err(release) = record.release(&mut self.pool) {
                    tracing::warn!(error = %release, "failed to release payload of rejected record");
                }
                Err(e)
            }
        }
    }

    fn write_record<R: Record>(&mut self, record: &R, trailing: usize) -> CanvasResult<Range<usize>> {
        let payload_len = record.payload_len();
        let size = HEADER_SIZE
            .checked_add(payload_len)
            .and_then(|n| n.checked_add(trailing))
            .and_then(|n| align_up(n, RECORD_ALIGN))
            .ok_or_else(|| CanvasError::allocation(usize::MAX))?;
        let header = OpHeader::new(R::KIND, size)?;
        let start = self.used;
        let end = start
            .checked_add(size)
            .ok_or_else(|| CanvasError::allocation(usize::MAX))?;
        self.arena.reserve(end)?;

        let bytes = &mut self.arena.data_mut()[start..end];
        bytes.fill(0);
        bytes[..HEADER_SIZE].copy_from_slice(&header.to_le_bytes());
        let payload_end = HEADER_SIZE + payload_len;
        record.encode(&mut PayloadWriter::new(&mut bytes[HEADER_SIZE..payload_end]));

        self.used = end;
        self.count += 1;
        self.has_text |= R::HAS_TEXT;
        Ok(start + payload_end..start + payload_end + trailing)
    }

    /// Walk the records in push order.
    pub fn records(&self) -> Records<'_> {
        Records::new(self.as_bytes())
    }

    /// Visit every record, stopping at the first error.
    pub fn walk<F>(&self, mut visit: F) -> CanvasResult<()>
    where
        F: FnMut(RawRecord<'_>) -> CanvasResult<()>,
    {
        for rec in self.records() {
            visit(rec?)?;
        }
        Ok(())
    }

    /// Replay every record into `renderer`, in push order.
    ///
    /// A weak resource handle that no longer resolves skips that one op. Corruption aborts the
    /// walk with an error.
    #[tracing::instrument(level = "debug", skip_all, fields(records = self.count, bytes = self.used))]
    pub fn apply(
        &self,
        renderer: &mut dyn CanvasRenderer,
        resources: &ResourceRegistry,
    ) -> CanvasResult<()> {
        let mut cx = ApplyContext::new(renderer, resources, &self.pool);
        self.walk(|rec| {
            (rec.kind.entry().apply)(rec.payload, &mut cx).map_err(|e| e.at_offset(rec.offset))
        })
    }

    /// Destroy every record and rewind to empty. Arena capacity is kept.
    pub fn reset(&mut self) {
        let bytes = &self.arena.data()[..self.used];
        let pool = &mut self.pool;
        for rec in Records::new(bytes) {
            let Ok(rec) = rec else {
                break;
            };
            if let Some(destroy) = rec.kind.entry().destroy
                && let Err(e) = destroy(rec.payload, pool)
            {
                tracing::warn!(offset = rec.offset, error = %e, "record destructor failed");
            }
        }
        self.pool.clear();
        self.used = 0;
        self.count = 0;
        self.has_text = false;
    }

    /// `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Bytes written by pushes.
    pub fn used_size(&self) -> usize {
        self.used
    }

    /// Bytes reserved by the arena.
    pub fn capacity(&self) -> usize {
        self.arena.reserved()
    }

    /// Number of times the arena has grown.
    pub fn grow_events(&self) -> usize {
        self.arena.grow_events()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether any recorded op draws text.
    pub fn has_text(&self) -> bool {
        self.has_text
    }

    /// Owned payloads not yet released.
    pub fn live_payloads(&self) -> usize {
        self.pool.live()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BufferState {
        if self.is_empty() {
            BufferState::Idle
        } else {
            BufferState::Recorded
        }
    }

    /// Encoded records, `used_size()` bytes long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.arena.data()[..self.used]
    }

    /// Hash of the encoded records.
    pub fn fingerprint(&self) -> u64 {
        xxhash_rust::xxh3::xxh3_64(self.as_bytes())
    }
}

impl Drop for OpBuffer {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/buffer.rs"]
mod tests;
