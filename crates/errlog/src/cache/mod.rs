//! Cache module — resumable snapshots of the aggregate.
//!
//! - `snapshot.rs`: the persisted `{offset, entries, types, counts}` plus
//!   the in-flight scan state, and its validity check
//! - `store.rs`: restore with fallback to a full rescan, atomic persist
//! - `lock.rs`: advisory lock serialising invocations on one cache

pub mod lock;
pub mod snapshot;
pub mod store;

pub use lock::CacheLock;
pub use snapshot::{CacheSnapshot, SNAPSHOT_VERSION};
pub use store::{CacheStore, RestoreOutcome};
