//! Session transitions: login, logout and startup rehydration

use crate::context::{SessionContext, SessionState, SessionView};
use crate::error::SessionError;
use crate::navigation::Navigator;
use batteries_core::{AccessToken, CredentialStore, Notifier, Toast, UserPublic};
use batteries_http::ApiClientFactory;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

const LOGIN_MESSAGE: &str = "You are connected";
const LOGOUT_MESSAGE: &str = "You have been disconnected";

/// Destinations of the post-transition redirects
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRoutes {
    pub after_login: String,
    pub after_logout: String,
}

impl Default for SessionRoutes {
    fn default() -> Self {
        Self {
            after_login: "/badges".to_string(),
            after_logout: "/badges".to_string(),
        }
    }
}

/// Outcome of startup rehydration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rehydration {
    /// Rehydration already ran for this manager
    Skipped,
    /// No credential was stored
    Anonymous,
    /// The stored credential is valid and the profile is cached
    Restored(UserPublic),
    /// The stored credential was rejected or unusable; the session was torn down
    Expired,
}

/// Owns the session context and performs every transition on it
pub struct SessionManager {
    api: ApiClientFactory,
    credentials: CredentialStore,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    context: SessionContext,
    routes: SessionRoutes,
    rehydrated: AtomicBool,
}

impl SessionManager {
    /// Create a manager sharing the factory's credential store and notifier
    #[must_use]
    pub fn new(api: ApiClientFactory, navigator: Arc<dyn Navigator>) -> Self {
        let credentials = api.credentials().clone();
        let notifier = api.notifier().clone();
        Self {
            context: SessionContext::new(credentials.clone()),
            api,
            credentials,
            notifier,
            navigator,
            routes: SessionRoutes::default(),
            rehydrated: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_routes(mut self, routes: SessionRoutes) -> Self {
        self.routes = routes;
        self
    }

    #[must_use]
    pub const fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.context.view()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.context.state()
    }

    #[must_use]
    pub fn profile(&self) -> Option<UserPublic> {
        self.context.profile()
    }

    /// Store the credential, load the profile and redirect.
    ///
    /// When the profile fetch fails the error is returned as-is: the credential
    /// stays stored and no profile is cached.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the credential cannot be stored,
    /// [`SessionError::Client`] if the profile fetch fails and
    /// [`SessionError::Navigation`] if the redirect fails.
    pub async fn login(&self, token: &AccessToken) -> Result<UserPublic, SessionError> {
        self.credentials.set(&token.access_token)?;

        let user = self.api.client().me().await?;
        info!(user_id = %user.id, "Logged in");
        self.context.set_profile(Some(user.clone()));

        self.notifier.notify(Toast::success(LOGIN_MESSAGE));
        self.navigate(&self.routes.after_login).await?;
        Ok(user)
    }

    /// Drop the credential and the cached profile, then redirect.
    ///
    /// Safe to call without a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the credential cannot be removed (the
    /// profile is cleared regardless) and [`SessionError::Navigation`] if the
    /// redirect fails.
    pub async fn logout(&self, show_notification: bool) -> Result<(), SessionError> {
        let removal = if self.credentials.has() {
            self.credentials.remove()
        } else {
            Ok(())
        };
        self.context.set_profile(None);
        removal?;
        info!("Logged out");

        if show_notification {
            self.notifier.notify(Toast::success(LOGOUT_MESSAGE));
        }

        self.navigate(&self.routes.after_logout).await
    }

    /// Restore the session from a stored credential. Runs once per manager.
    ///
    /// Any failure to load the profile is treated as an invalid credential and
    /// ends in a logout without confirmation message.
    ///
    /// # Errors
    ///
    /// Only errors raised by the fallback logout are returned.
    pub async fn rehydrate(&self) -> Result<Rehydration, SessionError> {
        if self.rehydrated.swap(true, Ordering::SeqCst) {
            return Ok(Rehydration::Skipped);
        }

        if !self.credentials.has() {
            return Ok(Rehydration::Anonymous);
        }

        match self.api.client().me().await {
            Ok(user) => {
                info!(user_id = %user.id, "Session restored");
                self.context.set_profile(Some(user.clone()));
                Ok(Rehydration::Restored(user))
            }
            Err(err) => {
                warn!("Stored credential no longer usable: {err}");
                self.logout(false).await?;
                Ok(Rehydration::Expired)
            }
        }
    }

    async fn navigate(&self, path: &str) -> Result<(), SessionError> {
        self.navigator
            .navigate(path)
            .await
            .map_err(|err| SessionError::navigation(path, &err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use batteries_core::testing::RecordingNotifier;
    use batteries_core::MemoryStorage;
    use mockall::mock;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    mock! {
        pub Nav {}

        #[async_trait]
        impl Navigator for Nav {
            async fn navigate(&self, path: &str) -> anyhow::Result<()>;
        }
    }

    fn factory(base_url: String, notifier: Arc<RecordingNotifier>) -> ApiClientFactory {
        ApiClientFactory::builder()
            .base_url(base_url)
            .credentials(CredentialStore::new(Arc::new(MemoryStorage::new())))
            .notifier(notifier)
            .build()
            .unwrap()
    }

    async fn profile_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "usr_1",
                "email": "ada@example.com",
                "firstName": "Ada",
                "lastName": "LOVELACE",
                "isSuperuser": true
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn login_navigates_to_configured_route() {
        let server = profile_server().await;
        let notifier = Arc::new(RecordingNotifier::new());

        let mut navigator = MockNav::new();
        navigator
            .expect_navigate()
            .withf(|path| path == "/home")
            .times(1)
            .returning(|_| Ok(()));

        let manager = SessionManager::new(factory(server.uri(), notifier.clone()), Arc::new(navigator))
            .with_routes(SessionRoutes {
                after_login: "/home".to_string(),
                after_logout: "/".to_string(),
            });

        let user = manager.login(&AccessToken::bearer("T1")).await.unwrap();
        assert!(user.is_superuser);
        assert_eq!(notifier.success_titles(), vec![LOGIN_MESSAGE]);
    }

    #[tokio::test]
    async fn navigation_failure_is_reported_after_state_change() {
        let server = profile_server().await;
        let notifier = Arc::new(RecordingNotifier::new());

        let mut navigator = MockNav::new();
        navigator
            .expect_navigate()
            .returning(|_| Err(anyhow::anyhow!("router unavailable")));

        let manager = SessionManager::new(factory(server.uri(), notifier), Arc::new(navigator));

        let err = manager.login(&AccessToken::bearer("T1")).await.unwrap_err();
        assert!(matches!(err, SessionError::Navigation { ref path, .. } if path == "/badges"));
        assert!(manager.profile().is_some());
        assert!(manager.state().is_authenticated());
    }

    #[tokio::test]
    async fn logout_without_session_still_navigates_once() {
        let notifier = Arc::new(RecordingNotifier::new());

        let mut navigator = MockNav::new();
        navigator
            .expect_navigate()
            .withf(|path| path == "/badges")
            .times(1)
            .returning(|_| Ok(()));

        let manager = SessionManager::new(
            factory("http://127.0.0.1:1".to_string(), notifier.clone()),
            Arc::new(navigator),
        );

        manager.logout(false).await.unwrap();
        assert_eq!(manager.state(), SessionState::Anonymous);
        assert!(notifier.is_empty());
    }
}
