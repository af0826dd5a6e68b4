//! Storage adapters - Session store implementations.
//!
//! `InMemorySessionStore` backs development and tests; `FileSessionStore`
//! persists each session as a JSON file with atomic replacement.

mod file_store;
mod in_memory;

pub use file_store::FileSessionStore;
pub use in_memory::InMemorySessionStore;
