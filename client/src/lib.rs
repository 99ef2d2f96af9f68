//! Authenticated content client for the cartography initiative website.
//!
//! The crate is laid out as a small hexagon:
//!
//! - [`domain`] holds the data model, the [`ContentClient`] and
//!   [`AuthSession`] services, and the ports they drive.
//! - [`outbound`] implements those ports over HTTP (reqwest) and the local
//!   filesystem (cap-std).
//! - [`inbound`] exposes the services through the `content-cli` binary.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use content_client::{ClientSettings, ContentClient};
//! use content_client::outbound::{FileSessionStore, HttpContentApi};
//! use mockable::DefaultClock;
//!
//! # async fn run(settings: ClientSettings) -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpContentApi::new(settings.base_url()?, settings.timeout())?;
//! let store = FileSessionStore::open(settings.session_dir())?;
//! let client = ContentClient::new(Arc::new(api), Arc::new(store), Arc::new(DefaultClock));
//!
//! for post in client.list_posts(Some("news")).await {
//!     println!("{} ({})", post.title, post.read_time);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod telemetry;

pub use config::ClientSettings;
pub use domain::{AuthEvent, AuthSession, ClientError, ContentClient, ErrorCode};
