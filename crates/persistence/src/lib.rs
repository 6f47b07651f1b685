//! Persistence layer for the manufacturing dashboard.
//!
//! This crate contains:
//! - Storage backends (JSON files on disk, in-memory)
//! - The generic observable [`Store`]
//! - [`AppState`], the account and token stores shared by every view

pub mod backend;
pub mod metrics;
pub mod state;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StoreBackend};
pub use state::{AppState, ACCOUNT_KEY, TOKEN_KEY};
pub use store::{Store, StoreError};
