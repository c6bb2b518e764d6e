mod persistence;
mod state;
mod store;

// Public API of the session subsystem.
pub use persistence::{restore_state, snapshot_state};
pub use state::{SessionAction, SessionState, derive_current};
pub use store::SessionStore;
