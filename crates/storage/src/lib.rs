#![forbid(unsafe_code)]

pub mod fs;
pub mod repository;
pub mod settings;
pub mod snapshot;

pub use fs::FileStore;
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
pub use snapshot::{PersistedAnswer, PersistedSession, SESSION_KEY};
