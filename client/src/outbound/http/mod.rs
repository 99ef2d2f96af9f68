//! HTTP content API adapter.
//!
//! This module provides the reqwest implementation of the `ContentApi` port.

mod dto;
mod http_content_api;

pub use http_content_api::HttpContentApi;
