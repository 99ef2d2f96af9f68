//! Driven port holding the bearer credential between requests.
//!
//! The store is a single slot: whoever writes last wins. It is only written
//! from user-driven actions (sign-in, sign-out) and from the auth-expiry
//! observer, never from background work.

use std::sync::{PoisonError, RwLock};

use super::define_port_error;
use crate::domain::Credential;

define_port_error! {
    /// Errors raised while reading or writing the stored credential.
    pub enum SessionStoreError {
        /// The stored credential could not be read.
        Read {
            /// Underlying failure.
            message: String,
        } => "session store read failed: {message}",
        /// The credential could not be written or removed.
        Write {
            /// Underlying failure.
            message: String,
        } => "session store write failed: {message}",
    }
}

/// Port for the persisted bearer credential.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Current credential, if one is stored. Never touches the network.
    fn credential(&self) -> Result<Option<Credential>, SessionStoreError>;

    /// Replace the stored credential.
    fn store(&self, credential: &Credential) -> Result<(), SessionStoreError>;

    /// Remove the stored credential. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Process-local store, for tests and for embedding without persistence.
///
/// # Examples
///
/// ```
/// use content_client::domain::Credential;
/// use content_client::domain::ports::{InMemorySessionStore, SessionStore};
///
/// let store = InMemorySessionStore::default();
/// store.store(&Credential::new("token")).unwrap();
/// assert!(store.credential().unwrap().is_some());
/// store.clear().unwrap();
/// assert!(store.credential().unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slot: RwLock<Option<Credential>>,
}

impl InMemorySessionStore {
    /// Start with a credential already stored.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn credential(&self) -> Result<Option<Credential>, SessionStoreError> {
        Ok(self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, credential: &Credential) -> Result<(), SessionStoreError> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
