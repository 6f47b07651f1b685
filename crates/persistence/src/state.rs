//! Process-wide client state: the signed-in account and its bearer token.

use std::path::Path;
use std::sync::Arc;

use domain::models::Account;
use tracing::info;

use crate::backend::{FileBackend, MemoryBackend, StoreBackend};
use crate::store::{Store, StoreError};

/// Key of the persisted account store.
pub const ACCOUNT_KEY: &str = "account-storage";
/// Key of the persisted token store.
pub const TOKEN_KEY: &str = "token-storage";

/// Shared handle to the account and token stores.
///
/// Cloning is cheap; every clone sees the same values. The role held in
/// the account only decides what the dashboard shows.
#[derive(Debug, Clone)]
pub struct AppState {
    pub account: Store<Option<Account>>,
    pub token: Store<Option<String>>,
}

impl AppState {
    /// Opens both stores over `backend`.
    pub fn open(backend: Arc<dyn StoreBackend>) -> Result<Self, StoreError> {
        Ok(Self {
            account: Store::open(ACCOUNT_KEY, Arc::clone(&backend))?,
            token: Store::open(TOKEN_KEY, backend)?,
        })
    }

    /// Opens both stores as JSON files inside `dir`.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let backend = FileBackend::new(dir.as_ref())?;
        info!(dir = %dir.as_ref().display(), "Opening client state");
        Self::open(Arc::new(backend))
    }

    /// State that lives only as long as the process.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(Arc::new(MemoryBackend::new()))
    }

    /// Bearer token for authorized calls, if signed in.
    pub fn bearer(&self) -> Option<String> {
        self.token.get().filter(|token| !token.is_empty())
    }

    pub fn is_signed_in(&self) -> bool {
        self.bearer().is_some()
    }

    /// Stores the token and account of a fresh login.
    pub fn sign_in(&self, token: String, account: Option<Account>) -> Result<(), StoreError> {
        self.token.set(Some(token))?;
        self.account.set(account)
    }

    /// Forgets both the token and the account.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.token.clear()?;
        self.account.clear()
    }
}
