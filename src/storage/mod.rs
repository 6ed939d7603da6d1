pub mod memory;
pub mod persistence;

pub use memory::InMemoryStore;
pub use persistence::{SnapshotManager, StoreSnapshot};
