//! Store adapters.

mod memory;

pub use memory::InMemoryTaskStore;
