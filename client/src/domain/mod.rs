//! Domain primitives, services, and ports.
//!
//! Purpose: define the content model and the services that drive the remote
//! content API without knowing how it is reached. Adapters live in
//! [`crate::outbound`]; collaborators drive the services from
//! [`crate::inbound`].
//!
//! Public surface:
//! - [`ContentClient`] performs one API round-trip per operation and
//!   normalises both results and failures.
//! - [`AuthSession`] tracks the signed-in user on top of the client.
//! - [`Post`], [`NewPost`] and [`PostPatch`] model the posts resource.
//! - [`ClientError`] and [`ErrorCode`] are what every fallible operation returns.

pub mod auth;
pub mod catalog;
pub mod contact;
mod content_client;
pub mod error;
pub mod events;
pub mod media;
pub mod ports;
pub mod post;
mod session;
pub mod user;

pub use self::auth::{
    Credential, LoginCredentials, LoginValidationError, Registration, RegistrationReceipt,
    TokenGrant,
};
pub use self::catalog::{DEFAULT_CATEGORIES, SiteStats, default_categories};
pub use self::contact::{ContactMessage, ContactReceipt, ContactValidationError, NewAccount};
pub use self::content_client::ContentClient;
pub use self::error::{
    ClientError, ErrorCode, GENERIC_ERROR_MESSAGE, POST_NOT_FOUND_MESSAGE,
};
pub use self::events::{AuthEvent, AuthEvents, DEFAULT_LOGIN_PATH};
pub use self::media::{ImageUpload, UploadedImage};
pub use self::post::{DEFAULT_READ_TIME, NewPost, Post, PostId, PostPatch, UNCATEGORISED};
pub use self::session::AuthSession;
pub use self::user::{Role, User};
