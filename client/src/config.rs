//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_LOGIN_PATH;

/// Base URL used when none is configured or the configured one is blank.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Transport timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Session directory used when none is configured.
pub const DEFAULT_SESSION_DIR: &str = ".content-client";

/// Settings for reaching the content API and persisting the session.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONTENT_API")]
pub struct ClientSettings {
    /// Base URL of the content API.
    pub base_url: Option<String>,
    /// Transport timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Directory holding the persisted credential.
    pub session_dir: Option<String>,
    /// Login surface announced when a credential expires.
    pub login_path: Option<String>,
    /// Emit logs as JSON lines.
    #[ortho_config(default = false)]
    pub json_logs: bool,
}

impl ClientSettings {
    /// Return the configured base URL, falling back to the default when
    /// unset or blank.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw)
    }

    /// Return the transport timeout, falling back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Return the session directory, falling back to the default.
    #[must_use]
    pub fn session_dir(&self) -> Utf8PathBuf {
        self.session_dir
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| Utf8PathBuf::from(DEFAULT_SESSION_DIR), Utf8PathBuf::from)
    }

    /// Return the login path, falling back to the default.
    #[must_use]
    pub fn login_path(&self) -> &str {
        self.login_path
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_LOGIN_PATH)
    }
}
