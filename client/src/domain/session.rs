//! Signed-in user state.
//!
//! [`AuthSession`] keeps a cached [`User`] next to the credential held by the
//! session store. The store is the source of truth: once it is emptied, by
//! sign-out or by an auth expiry seen on any operation, the cache is dropped
//! on the next read.

use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};

use crate::domain::ports::{ContentApi, SessionStore};
use crate::domain::{
    AuthEvent, ClientError, ContentClient, LoginCredentials, Registration, RegistrationReceipt,
    TokenGrant, User,
};

/// Authentication state built on a [`ContentClient`].
pub struct AuthSession<A, S> {
    client: ContentClient<A, S>,
    user: RwLock<Option<User>>,
}

impl<A, S> AuthSession<A, S> {
    /// Wrap a client. No user is cached until [`Self::restore`] or
    /// [`Self::sign_in`] runs.
    #[must_use]
    pub fn new(client: ContentClient<A, S>) -> Self {
        Self {
            client,
            user: RwLock::new(None),
        }
    }

    /// Underlying client, for content operations.
    #[must_use]
    pub const fn client(&self) -> &ContentClient<A, S> {
        &self.client
    }

    fn cache(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

impl<A, S> AuthSession<A, S>
where
    S: SessionStore,
{
    /// Cached user, provided the store still holds a credential.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        if self.client.current_credential().is_none() {
            self.cache(None);
            return None;
        }
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the signed-in user is an administrator.
    ///
    /// Advisory only; the server enforces authorization.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin())
    }
}

impl<A, S> AuthSession<A, S>
where
    A: ContentApi,
    S: SessionStore,
{
    /// Resolve the user behind a previously stored credential.
    ///
    /// A credential the server no longer accepts is cleared.
    pub async fn restore(&self) -> Option<User> {
        let credential = self.client.current_credential()?;
        match self.client.fetch_current_user(&credential).await {
            Ok(user) => {
                info!(username = %user.username, "session restored");
                self.cache(Some(user.clone()));
                Some(user)
            }
            Err(err) => {
                warn!(error = %err, "stored credential could not be resolved; clearing");
                if let Err(clear_err) = self.client.clear_credential() {
                    warn!(error = %clear_err, "failed to clear stale credential");
                }
                self.cache(None);
                None
            }
        }
    }

    /// Log in, persist the credential, and resolve the signed-in user.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<User, ClientError> {
        let credentials = LoginCredentials::try_from_parts(username, password)
            .map_err(|err| ClientError::invalid_request(err.to_string()))?;
        let grant = self.client.login(&credentials).await?;
        self.client.store_credential(&grant.credential)?;
        let user = self.client.fetch_current_user(&grant.credential).await?;

        info!(username = %user.username, role = %user.role, "signed in");
        self.cache(Some(user.clone()));
        self.client.events().publish(AuthEvent::SignedIn {
            username: user.username.clone(),
        });
        Ok(user)
    }

    /// Register a new account. Does not sign in.
    pub async fn sign_up(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, ClientError> {
        self.client.register(registration).await
    }

    /// Sign out locally, telling the server on a best-effort basis.
    pub async fn sign_out(&self) {
        if self.client.current_credential().is_some() {
            if let Err(err) = self.client.end_remote_session().await {
                warn!(error = %err, "remote sign-out failed; clearing local session anyway");
            }
        }
        if let Err(err) = self.client.clear_credential() {
            warn!(error = %err, "failed to clear credential on sign-out");
        }
        self.cache(None);
        info!("signed out");
        self.client.events().publish(AuthEvent::SignedOut);
    }

    /// Exchange the stored credential for a fresh one and store it.
    pub async fn refresh(&self) -> Result<TokenGrant, ClientError> {
        let grant = self.client.refresh_token().await?;
        self.client.store_credential(&grant.credential)?;
        Ok(grant)
    }
}
