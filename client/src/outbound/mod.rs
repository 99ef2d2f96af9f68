//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: the content API over reqwest
//! - **session**: the credential persisted under a local directory
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod http;
pub mod session;

pub use http::HttpContentApi;
pub use session::FileSessionStore;
