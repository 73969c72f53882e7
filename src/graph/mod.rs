/// Graph index trait and its in-memory implementation.
pub mod index;

/// Loading and saving graph snapshots.
pub mod snapshot;

pub use index::{GraphIndex, InMemoryGraph};
pub use snapshot::{load_snapshot, save_snapshot, GraphSnapshot};
