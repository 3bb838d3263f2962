//! Storage layer: the collection trait, its in-memory backend and the
//! database bundle.

mod database;
mod memory;
mod traits;

pub use database::Database;
pub use memory::InMemoryCollection;
pub use traits::{Collection, StorageError};
