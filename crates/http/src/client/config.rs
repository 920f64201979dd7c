//! Client configuration

use super::ClientError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Request timeout applied to every call
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Prefix of the environment variables overriding file settings
pub const ENV_PREFIX: &str = "BATTERIES";

/// Remote endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme and host of the API server
    #[serde(default = "default_back_host_url")]
    pub back_host_url: String,
    /// Path prefix of the API below the host, may be empty
    #[serde(default)]
    pub api_base: String,
}

fn default_back_host_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            back_host_url: default_back_host_url(),
            api_base: String::new(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn new(back_host_url: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            back_host_url: back_host_url.into(),
            api_base: api_base.into(),
        }
    }

    /// Load configuration from defaults, config files and the environment
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if a config file cannot be read or a
    /// value has the wrong type.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ClientError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match explicit_path {
            Some(path) => {
                builder = builder.add_source(File::from(path));
            }
            None => {
                for path in ["batteries.toml", "config/batteries.toml"] {
                    if Path::new(path).exists() {
                        builder = builder.add_source(File::with_name(path).required(false));
                    }
                }
            }
        }

        // BATTERIES_BACK_HOST_URL, BATTERIES_API_BASE
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Root URL every request path is appended to
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if `back_host_url` is not an absolute
    /// http or https URL.
    pub fn base_url(&self) -> Result<String, ClientError> {
        let host = self.back_host_url.trim().trim_end_matches('/');
        let parsed = Url::parse(host)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "unsupported scheme '{}' in back host url",
                parsed.scheme()
            )));
        }

        let prefix = self.api_base.trim().trim_matches('/');
        if prefix.is_empty() {
            Ok(host.to_string())
        } else {
            Ok(format!("{host}/{prefix}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn base_url_joins_host_and_prefix() {
        let config = ClientConfig::new("https://api.example.com/", "/api/v1/");
        assert_eq!(config.base_url().unwrap(), "https://api.example.com/api/v1");
    }

    #[test]
    fn empty_prefix_uses_host_only() {
        let config = ClientConfig::new("http://localhost:8000", "");
        assert_eq!(config.base_url().unwrap(), "http://localhost:8000");
    }

    #[test]
    fn rejects_invalid_host() {
        let config = ClientConfig::new("not a url", "");
        assert!(matches!(
            config.base_url(),
            Err(ClientError::Configuration(_))
        ));

        let config = ClientConfig::new("ftp://files.example.com", "");
        assert!(matches!(
            config.base_url(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn file_values_override_defaults() {
        let config: ClientConfig = Config::builder()
            .add_source(Config::try_from(&ClientConfig::default()).unwrap())
            .add_source(File::from_str(
                "back_host_url = \"https://batteries.example.com\"",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.back_host_url, "https://batteries.example.com");
        assert_eq!(config.api_base, "");
    }

    #[test]
    fn load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batteries.toml");
        std::fs::write(
            &path,
            "back_host_url = \"http://127.0.0.1:9000\"\napi_base = \"api\"\n",
        )
        .unwrap();

        let config = ClientConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.base_url().unwrap(), "http://127.0.0.1:9000/api");
    }
}
