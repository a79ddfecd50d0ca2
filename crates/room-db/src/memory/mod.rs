//! In-memory repository backend

mod store;

pub use store::MemoryStore;
