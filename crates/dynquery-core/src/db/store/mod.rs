//! Reference collaborators.

mod memory;


// re-exports
pub use memory::MemoryStore;
