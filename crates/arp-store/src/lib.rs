//! arp-store
//!
//! State ownership for the ledger. The domain crates never touch storage:
//! callers `load` a [`Snapshot`], run pure operations that return the next
//! snapshot, and `replace` it. Operations enforce referential integrity and
//! perform the cascades a deletion implies.

mod error;
mod ops;
mod role;
mod snapshot;
mod store;

pub use error::IntegrityError;
pub use ops::*;
pub use role::{require_admin, Role, Unauthorized};
pub use snapshot::Snapshot;
pub use store::{InMemoryStore, JsonFileStore, SnapshotStore};
