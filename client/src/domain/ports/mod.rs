//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod content_api;
mod session_store;

#[cfg(test)]
pub(crate) use content_api::MockContentApi;
pub use content_api::{ContentApi, ContentApiError, PostRecord};
#[cfg(test)]
pub(crate) use session_store::MockSessionStore;
pub use session_store::{InMemorySessionStore, SessionStore, SessionStoreError};
