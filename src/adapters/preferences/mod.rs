//! Preference store adapters.

mod file;
mod in_memory;

pub use file::JsonPreferenceStore;
pub use in_memory::InMemoryPreferenceStore;
