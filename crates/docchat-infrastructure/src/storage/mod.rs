//! Storage layer for snapshot persistence.

mod atomic_file;
mod key_value;

pub use atomic_file::{AtomicFile, AtomicFileError};
pub use key_value::{FileKeyValueStore, InMemoryKeyValueStore};
