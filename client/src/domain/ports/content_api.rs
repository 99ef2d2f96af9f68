//! Driven port for the remote content API.
//!
//! Each method performs exactly one HTTP round-trip. Adapters translate wire
//! failures into [`ContentApiError`] with the message already extracted from
//! the response, so domain services only decide what to do with it.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    ContactMessage, ContactReceipt, Credential, ImageUpload, LoginCredentials, NewAccount,
    NewPost, PostId, PostPatch, Registration, RegistrationReceipt, SiteStats, TokenGrant,
    UploadedImage, User,
};

define_port_error! {
    /// Errors raised while talking to the content API.
    pub enum ContentApiError {
        /// No response was received.
        Transport {
            /// Message for the caller.
            message: String,
        } => "{message}",
        /// The request timed out, locally or at a gateway.
        Timeout {
            /// Message for the caller.
            message: String,
        } => "{message}",
        /// The server rejected the credential (HTTP 401).
        Unauthorized {
            /// Message for the caller.
            message: String,
        } => "{message}",
        /// The credential lacks permission (HTTP 403).
        Forbidden {
            /// Message for the caller.
            message: String,
        } => "{message}",
        /// The resource does not exist (HTTP 404).
        NotFound {
            /// Message for the caller.
            message: String,
        } => "{message}",
        /// Any other non-success status.
        Rejected {
            /// HTTP status code.
            status: u16,
            /// Message for the caller.
            message: String,
        } => "{message}",
        /// The response body did not have the expected shape.
        Decode {
            /// Message for the caller.
            message: String,
        } => "{message}",
    }
}

impl ContentApiError {
    /// Human-readable message carried by every variant.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message }
            | Self::Timeout { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Rejected { message, .. }
            | Self::Decode { message } => message.as_str(),
        }
    }
}

/// Post as sent by the server, before defaults are applied.
///
/// Only `id` is required; everything else may be absent. Convert with
/// [`crate::domain::Post::from_record`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostRecord {
    /// Server-assigned identifier.
    pub id: i64,
    /// Headline.
    pub title: Option<String>,
    /// Full body.
    pub content: Option<String>,
    /// Short summary.
    pub excerpt: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Raw date text, normally `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Reading time label.
    pub read_time: Option<String>,
    /// Image reference.
    pub image: Option<String>,
    /// Highlight flag.
    pub featured: Option<bool>,
    /// Tag list.
    pub tags: Option<Vec<String>>,
    /// Classification.
    pub post_type: Option<String>,
}

impl PostRecord {
    /// Record with only an identifier.
    #[must_use]
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Port for the content API.
///
/// Credentials are passed explicitly; the port never reads the session
/// store. `None` means the request is sent without an `Authorization`
/// header.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Exchange a username and password for a bearer credential.
    async fn request_token(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<TokenGrant, ContentApiError>;

    /// Exchange a still-valid credential for a fresh one.
    async fn refresh_token(
        &self,
        credential: Option<Credential>,
    ) -> Result<TokenGrant, ContentApiError>;

    /// Tell the server the session is over.
    async fn end_session(&self, credential: Option<Credential>) -> Result<(), ContentApiError>;

    /// Create an account through self-registration.
    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, ContentApiError>;

    /// Resolve the user that owns `credential`.
    async fn current_user(&self, credential: Credential) -> Result<User, ContentApiError>;

    /// List posts in server order, optionally restricted to one type.
    async fn list_posts(
        &self,
        post_type: Option<String>,
        credential: Option<Credential>,
    ) -> Result<Vec<PostRecord>, ContentApiError>;

    /// Fetch one post.
    async fn fetch_post(
        &self,
        id: PostId,
        credential: Option<Credential>,
    ) -> Result<PostRecord, ContentApiError>;

    /// Create a post and return the stored record.
    async fn create_post(
        &self,
        post: &NewPost,
        credential: Option<Credential>,
    ) -> Result<PostRecord, ContentApiError>;

    /// Apply a partial update and return the stored record.
    async fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
        credential: Option<Credential>,
    ) -> Result<PostRecord, ContentApiError>;

    /// Delete a post.
    async fn delete_post(
        &self,
        id: PostId,
        credential: Option<Credential>,
    ) -> Result<(), ContentApiError>;

    /// Upload an image file.
    async fn upload_image(
        &self,
        upload: &ImageUpload,
        credential: Option<Credential>,
    ) -> Result<UploadedImage, ContentApiError>;

    /// List category labels.
    async fn list_categories(
        &self,
        credential: Option<Credential>,
    ) -> Result<Vec<String>, ContentApiError>;

    /// List tag labels.
    async fn list_tags(&self, credential: Option<Credential>)
    -> Result<Vec<String>, ContentApiError>;

    /// Fetch aggregate counters.
    async fn fetch_stats(&self, credential: Option<Credential>)
    -> Result<SiteStats, ContentApiError>;

    /// Submit the public contact form.
    async fn submit_contact(
        &self,
        message: &ContactMessage,
        credential: Option<Credential>,
    ) -> Result<ContactReceipt, ContentApiError>;

    /// Create an account on someone else's behalf (admin only).
    async fn create_account(
        &self,
        account: &NewAccount,
        credential: Option<Credential>,
    ) -> Result<(), ContentApiError>;
}
