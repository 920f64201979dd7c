//! Session state: credential presence plus the cached user profile

use batteries_core::{CredentialStore, UserPublic};
use tokio::sync::watch;

/// Derived session state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No credential stored
    Anonymous,
    /// Credential stored; the profile may be absent while it is being
    /// refreshed or after a failed login
    Authenticated { profile: Option<UserPublic> },
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&UserPublic> {
        match self {
            Self::Authenticated { profile } => profile.as_ref(),
            Self::Anonymous => None,
        }
    }
}

/// Process-wide profile cache. Only the session manager writes to it.
#[derive(Debug)]
pub struct SessionContext {
    credentials: CredentialStore,
    profile: watch::Sender<Option<UserPublic>>,
}

impl SessionContext {
    pub(crate) fn new(credentials: CredentialStore) -> Self {
        let (profile, _) = watch::channel(None);
        Self {
            credentials,
            profile,
        }
    }

    pub(crate) fn set_profile(&self, profile: Option<UserPublic>) {
        self.profile.send_replace(profile);
    }

    /// Snapshot of the cached profile
    #[must_use]
    pub fn profile(&self) -> Option<UserPublic> {
        self.profile.borrow().clone()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        derive_state(&self.credentials, self.profile())
    }

    /// Read-only handle for consumers
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            credentials: self.credentials.clone(),
            profile: self.profile.subscribe(),
        }
    }
}

/// Read-only access to the session
#[derive(Clone, Debug)]
pub struct SessionView {
    credentials: CredentialStore,
    profile: watch::Receiver<Option<UserPublic>>,
}

impl SessionView {
    #[must_use]
    pub fn profile(&self) -> Option<UserPublic> {
        self.profile.borrow().clone()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        derive_state(&self.credentials, self.profile())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.has()
    }

    /// Wait until the cached profile changes
    pub async fn changed(&mut self) -> Option<UserPublic> {
        if self.profile.changed().await.is_err() {
            // Manager dropped; the last value stays readable
            return self.profile.borrow().clone();
        }
        self.profile.borrow_and_update().clone()
    }
}

fn derive_state(credentials: &CredentialStore, profile: Option<UserPublic>) -> SessionState {
    if credentials.has() {
        SessionState::Authenticated { profile }
    } else {
        SessionState::Anonymous
    }
}
