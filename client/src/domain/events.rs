//! Authentication events broadcast to collaborators.
//!
//! The client never navigates anywhere itself. When the server rejects the
//! credential it clears the session store and publishes
//! [`AuthEvent::Expired`]; whichever shell subscribed decides how to send the
//! user to the login surface.

use tokio::sync::broadcast;
use tracing::debug;

const EVENT_CAPACITY: usize = 16;

/// Login surface collaborators are pointed to by default.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Change in authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The server answered 401; the stored credential has been cleared.
    Expired {
        /// Operation whose response carried the 401.
        operation: &'static str,
        /// Where the collaborator should send the user to re-authenticate.
        login_path: String,
    },
    /// A user signed in through [`crate::domain::AuthSession`].
    SignedIn {
        /// Handle of the signed-in user.
        username: String,
    },
    /// The user signed out.
    SignedOut,
}

/// Fan-out hub for [`AuthEvent`]s.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    /// Create a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; having no subscribers is not an error.
    pub fn publish(&self, event: AuthEvent) {
        if let Err(unsent) = self.sender.send(event) {
            debug!(event = ?unsent.0, "no auth event subscribers");
        }
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
