pub mod index;
pub mod json;
pub mod memory;
pub mod store;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{ContextStore, LinkStore, StoreError};
