//! Split-brain merge entries: the wire-serializable snapshot of a single
//! cache entry exchanged when two cluster partitions are reconciled.

mod wire;

pub mod codec;
pub mod entry;
pub mod error;
pub mod registry;

pub use codec::ObjectCodec;
pub use entry::{MergeEntry, MergeEntryBuilder, UNSET};
pub use error::{Error, Result};
pub use registry::{FACTORY_ID, MERGE_ENTRY_TYPE_ID, Registry, merge_registry};
