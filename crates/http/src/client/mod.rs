//! Batteries HTTP client

pub mod auth;
pub mod config;
pub mod error;
mod report;
pub mod status;

pub use config::{ClientConfig, REQUEST_TIMEOUT};
pub use error::{ClientError, TransportFailure};
pub use status::{RequestStatus, StatusCell};

use batteries_core::{CredentialStore, ErrorEnvelope, ErrorPayload, FormErrorSink, Notifier};
use report::ErrorReporter;
use reqwest::{Client, ClientBuilder, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Produces API clients that share one connection pool, one credential
/// store and one notification channel.
#[derive(Clone)]
pub struct ApiClientFactory {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
    notifier: Arc<dyn Notifier>,
}

impl ApiClientFactory {
    /// Create a new factory builder
    #[must_use]
    pub fn builder() -> ApiClientFactoryBuilder {
        ApiClientFactoryBuilder::default()
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential store read before every request
    #[must_use]
    pub const fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Notification channel failures are reported to
    #[must_use]
    pub const fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Bind a client to an optional form and an optional status cell.
    ///
    /// Without a status cell the client tracks its status in a private cell.
    #[must_use]
    pub fn create(
        &self,
        form: Option<Arc<dyn FormErrorSink>>,
        status: Option<StatusCell>,
    ) -> ApiClient {
        ApiClient {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            credentials: self.credentials.clone(),
            reporter: ErrorReporter::new(self.notifier.clone(), form),
            status: status.unwrap_or_default(),
        }
    }

    /// Client with no form and a private status cell
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.create(None, None)
    }

    /// Client reporting field errors to `form`
    #[must_use]
    pub fn with_form(&self, form: Arc<dyn FormErrorSink>) -> ApiClient {
        self.create(Some(form), None)
    }
}

/// Builder for ApiClientFactory
#[derive(Default)]
pub struct ApiClientFactoryBuilder {
    config: Option<ClientConfig>,
    credentials: Option<CredentialStore>,
    notifier: Option<Arc<dyn Notifier>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientFactoryBuilder {
    /// Set the endpoint configuration
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the endpoint from a full base URL (host plus API prefix)
    #[must_use]
    pub fn base_url(self, url: impl Into<String>) -> Self {
        self.config(ClientConfig::new(url, ""))
    }

    /// Set the credential store injected into every request
    #[must_use]
    pub fn credentials(mut self, credentials: CredentialStore) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the notification channel for reported failures
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Override the request timeout (defaults to [`REQUEST_TIMEOUT`])
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the factory
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the endpoint, credential store or
    /// notifier is missing, or if the endpoint URL is invalid.
    pub fn build(self) -> Result<ApiClientFactory, ClientError> {
        let config = self
            .config
            .ok_or_else(|| ClientError::Configuration("endpoint configuration is required".into()))?;
        let credentials = self
            .credentials
            .ok_or_else(|| ClientError::Configuration("credential store is required".into()))?;
        let notifier = self
            .notifier
            .ok_or_else(|| ClientError::Configuration("notifier is required".into()))?;

        let base_url = config.base_url()?;
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("batteries-client/{}", env!("CARGO_PKG_VERSION")));

        let client = ClientBuilder::new()
            .timeout(self.timeout.unwrap_or(REQUEST_TIMEOUT))
            .user_agent(user_agent)
            .build()
            .map_err(|err| ClientError::Configuration(format!("failed to build HTTP client: {err}")))?;

        Ok(ApiClientFactory {
            client,
            base_url,
            credentials,
            notifier,
        })
    }
}

/// HTTP client bound to a base URL, the credential store, a reporting
/// pipeline and a status cell
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
    reporter: ErrorReporter,
    status: StatusCell,
}

impl ApiClient {
    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Status cell updated by every call
    #[must_use]
    pub const fn status(&self) -> &StatusCell {
        &self.status
    }

    /// Absolute URL for an API path such as `auth/me`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Create a request builder for an API path.
    ///
    /// The credential is attached by [`ApiClient::execute`], right before sending.
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a request, report any failure and decode the JSON body
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when no response arrived,
    /// [`ClientError::Status`] for a non-2xx response and [`ClientError::Decode`]
    /// when a successful body does not match `T`. Every failure has already been
    /// reported when this returns.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        self.status.set(RequestStatus::Pending);

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                let kind = TransportFailure::classify(&source);
                self.status.set(RequestStatus::Error);
                warn!(?kind, "Request failed before a response arrived: {source}");
                self.reporter.report_transport(kind);
                return Err(ClientError::Transport { kind, source });
            }
        };

        let status = response.status();
        debug!(%status, url = %response.url(), "Received response");

        if status.is_success() {
            self.status.set(RequestStatus::Success);
            return response.json().await.map_err(|err| {
                warn!("Failed to decode response body: {err}");
                ClientError::Decode(err)
            });
        }

        self.status.set(RequestStatus::Error);
        let payload = match response.bytes().await {
            Ok(body) => ErrorEnvelope::parse(&body),
            Err(err) => {
                debug!("Failed to read error body: {err}");
                ErrorPayload::default()
            }
        };

        self.reporter.report_payload(status, &payload);

        Err(ClientError::Status { status, payload })
    }

    /// GET an API path
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.request(Method::GET, path);
        self.execute(request).await
    }

    /// POST a JSON body to an API path
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path).json(body);
        self.execute(request).await
    }

    /// POST a URL-encoded form to an API path
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn post_form<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path).form(body);
        self.execute(request).await
    }
}
