pub mod repository;
pub mod store;

pub use repository::{CommandRepo, SaveReport};
pub use store::{Change, MemoryStore, RecordStore};
