//! Persistence Adapters
//!
//! Implementations of `ProfilePort`.

pub mod in_memory;

pub use in_memory::InMemoryProfileStore;
