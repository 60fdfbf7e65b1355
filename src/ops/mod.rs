//! Op recording engine: record header, payload codec, owned-payload pool, the kind registry
//! and the op buffer that ties them together.

pub(crate) mod buffer;
pub(crate) mod codec;
pub(crate) mod header;
pub(crate) mod pool;
pub(crate) mod records;
pub(crate) mod registry;

pub use buffer::{BufferState, OpBuffer, RawRecord, Records};
pub use codec::{Payload, PayloadReader, PayloadWriter, Wire};
pub use header::{HEADER_SIZE, MAX_SKIP, OpHeader, RECORD_ALIGN};
pub use pool::{OwnedPayload, OwnedPool, PoolValue, Slot};
pub use records::*;
pub use registry::{ApplyContext, OpKind, Record, Tagged};
