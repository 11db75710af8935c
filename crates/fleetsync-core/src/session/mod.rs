//! Driver Session Management
//!
//! Holds the logged-in driver's identity and preferences over a pluggable
//! key-value backend. A session created with "remember me" survives a
//! process restart through [`FileBackend`]; otherwise it lives only as long
//! as the store instance.

mod backend;
mod error;
mod store;

pub use backend::{FileBackend, MemoryBackend, SessionBackend};
pub use error::{AuthError, StoreError};
pub use store::{Session, SessionStore, SharedSessionStore};
