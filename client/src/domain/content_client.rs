//! Content client service.
//!
//! Wraps the [`ContentApi`] port with the behaviour every operation shares:
//! the stored credential is attached when present, port errors are
//! normalised into [`ClientError`], and any unauthorized response clears the
//! session store and publishes [`AuthEvent::Expired`].

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::ports::{ContentApi, ContentApiError, SessionStore};
use crate::domain::{
    AuthEvent, AuthEvents, ClientError, ContactMessage, ContactReceipt, Credential,
    DEFAULT_LOGIN_PATH, ImageUpload, LoginCredentials, NewAccount, NewPost,
    POST_NOT_FOUND_MESSAGE, Post, PostId, PostPatch, Registration, RegistrationReceipt, SiteStats,
    TokenGrant, UploadedImage, User, default_categories,
};

/// Authenticated client for the content API.
pub struct ContentClient<A, S> {
    api: Arc<A>,
    session: Arc<S>,
    clock: Arc<dyn Clock>,
    events: AuthEvents,
    login_path: String,
}

impl<A, S> Clone for ContentClient<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: Arc::clone(&self.session),
            clock: Arc::clone(&self.clock),
            events: self.events.clone(),
            login_path: self.login_path.clone(),
        }
    }
}

impl<A, S> ContentClient<A, S> {
    /// Create a client over the given API adapter and session store.
    #[must_use]
    pub fn new(api: Arc<A>, session: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            session,
            clock,
            events: AuthEvents::new(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
        }
    }

    /// Override the login path carried by [`AuthEvent::Expired`].
    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// Login path carried by [`AuthEvent::Expired`].
    #[must_use]
    pub fn login_path(&self) -> &str {
        self.login_path.as_str()
    }

    /// Subscribe to authentication events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub(crate) fn events(&self) -> &AuthEvents {
        &self.events
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

impl<A, S> ContentClient<A, S>
where
    S: SessionStore,
{
    /// Credential currently held by the session store.
    ///
    /// A store that cannot be read counts as empty.
    #[must_use]
    pub fn current_credential(&self) -> Option<Credential> {
        match self.session.credential() {
            Ok(credential) => credential,
            Err(err) => {
                warn!(error = %err, "session store unreadable; continuing without credential");
                None
            }
        }
    }

    /// Persist `credential` for later requests.
    pub fn store_credential(&self, credential: &Credential) -> Result<(), ClientError> {
        self.session
            .store(credential)
            .map_err(|err| ClientError::storage(err.to_string()))
    }

    /// Remove the stored credential.
    pub fn clear_credential(&self) -> Result<(), ClientError> {
        self.session
            .clear()
            .map_err(|err| ClientError::storage(err.to_string()))
    }

    fn expire(&self, operation: &'static str) {
        if let Err(err) = self.session.clear() {
            warn!(operation, error = %err, "failed to clear rejected credential");
        }
        info!(operation, login_path = %self.login_path, "credential rejected; session cleared");
        self.events.publish(AuthEvent::Expired {
            operation,
            login_path: self.login_path.clone(),
        });
    }

    fn settle<T>(
        &self,
        operation: &'static str,
        result: Result<T, ContentApiError>,
    ) -> Result<T, ClientError> {
        result.map_err(|err| {
            if err.is_unauthorized() {
                self.expire(operation);
            }
            ClientError::from(err)
        })
    }

    fn degrade<T>(
        &self,
        operation: &'static str,
        result: Result<T, ContentApiError>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        self.settle(operation, result).unwrap_or_else(|err| {
            warn!(operation, error = %err, "request failed; using fallback");
            fallback()
        })
    }
}

impl<A, S> ContentClient<A, S>
where
    A: ContentApi,
    S: SessionStore,
{
    /// Exchange a username and password for a bearer credential.
    ///
    /// The credential is returned, not stored.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<TokenGrant, ClientError> {
        debug!(username = credentials.username(), "login");
        let result = self.api.request_token(credentials).await;
        self.settle("login", result)
    }

    /// Register a new account.
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, ClientError> {
        debug!(username = registration.username(), "register");
        let result = self.api.register(registration).await;
        self.settle("register", result)
    }

    /// Resolve the user owning `credential`.
    pub async fn fetch_current_user(
        &self,
        credential: &Credential,
    ) -> Result<User, ClientError> {
        debug!("fetch current user");
        let result = self.api.current_user(credential.clone()).await;
        self.settle("fetch_current_user", result)
    }

    /// Exchange the stored credential for a fresh one. Nothing is stored.
    pub async fn refresh_token(&self) -> Result<TokenGrant, ClientError> {
        debug!("refresh token");
        let result = self.api.refresh_token(self.current_credential()).await;
        self.settle("refresh_token", result)
    }

    /// Tell the server the session is over. The stored credential is kept.
    pub async fn end_remote_session(&self) -> Result<(), ClientError> {
        debug!("end remote session");
        let result = self.api.end_session(self.current_credential()).await;
        self.settle("end_remote_session", result)
    }

    /// List posts in server order, optionally restricted to one type.
    ///
    /// Never fails: any error yields an empty list.
    pub async fn list_posts(&self, post_type: Option<&str>) -> Vec<Post> {
        let filter = post_type
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        debug!(post_type = ?filter, "list posts");
        let result = self.api.list_posts(filter, self.current_credential()).await;
        let today = self.today();
        self.degrade("list_posts", result, Vec::new)
            .into_iter()
            .map(|record| Post::from_record(record, today))
            .collect()
    }

    /// Fetch one post.
    ///
    /// Every failure, whatever its cause, is reported as
    /// [`POST_NOT_FOUND_MESSAGE`].
    pub async fn fetch_post(&self, id: PostId) -> Result<Post, ClientError> {
        debug!(%id, "fetch post");
        let result = self.api.fetch_post(id, self.current_credential()).await;
        match self.settle("fetch_post", result) {
            Ok(record) => Ok(Post::from_record(record, self.today())),
            Err(err) => {
                debug!(%id, error = %err, "post lookup failed");
                Err(ClientError::not_found(POST_NOT_FOUND_MESSAGE))
            }
        }
    }

    /// Create a post with the stored credential.
    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        debug!(title = %post.title, "create post");
        let result = self.api.create_post(post, self.current_credential()).await;
        let record = self.settle("create_post", result)?;
        Ok(Post::from_record(record, self.today()))
    }

    /// Apply a partial update with the stored credential.
    pub async fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
    ) -> Result<Post, ClientError> {
        debug!(%id, "update post");
        let result = self
            .api
            .update_post(id, patch, self.current_credential())
            .await;
        let record = self.settle("update_post", result)?;
        Ok(Post::from_record(record, self.today()))
    }

    /// Delete a post with the stored credential.
    pub async fn delete_post(&self, id: PostId) -> Result<(), ClientError> {
        debug!(%id, "delete post");
        let result = self.api.delete_post(id, self.current_credential()).await;
        self.settle("delete_post", result)
    }

    /// Upload an image with the stored credential.
    pub async fn upload_image(
        &self,
        upload: &ImageUpload,
    ) -> Result<UploadedImage, ClientError> {
        debug!(file_name = %upload.file_name, size = upload.bytes.len(), "upload image");
        let result = self
            .api
            .upload_image(upload, self.current_credential())
            .await;
        self.settle("upload_image", result)
    }

    /// Category labels, or the built-in defaults when the server fails.
    pub async fn list_categories(&self) -> Vec<String> {
        debug!("list categories");
        let result = self.api.list_categories(self.current_credential()).await;
        self.degrade("list_categories", result, default_categories)
    }

    /// Tag labels, or nothing when the server fails.
    pub async fn list_tags(&self) -> Vec<String> {
        debug!("list tags");
        let result = self.api.list_tags(self.current_credential()).await;
        self.degrade("list_tags", result, Vec::new)
    }

    /// Aggregate counters, or zeroes when the server fails.
    pub async fn fetch_stats(&self) -> SiteStats {
        debug!("fetch stats");
        let result = self.api.fetch_stats(self.current_credential()).await;
        self.degrade("fetch_stats", result, SiteStats::default)
    }

    /// Submit the public contact form.
    pub async fn submit_contact(
        &self,
        message: &ContactMessage,
    ) -> Result<ContactReceipt, ClientError> {
        debug!(subject = message.subject(), "submit contact message");
        let result = self
            .api
            .submit_contact(message, self.current_credential())
            .await;
        self.settle("submit_contact", result)
    }

    /// Create an account on someone else's behalf with the stored credential.
    pub async fn create_account(&self, account: &NewAccount) -> Result<(), ClientError> {
        debug!(username = account.username(), role = %account.role(), "create account");
        let result = self
            .api
            .create_account(account, self.current_credential())
            .await;
        self.settle("create_account", result)
    }
}

#[cfg(test)]
#[path = "content_client_tests.rs"]
mod tests;
