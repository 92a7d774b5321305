/// Client configuration
use crate::error::{ClientError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for connecting to a Nextcloud server.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "https://cloud.example.com")
    pub url: String,

    /// Login name used for basic auth
    #[serde(default)]
    pub username: Option<String>,

    /// Password or app password
    #[serde(default)]
    pub password: Option<String>,

    /// Whole-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Create a config with existing credentials (e.g. an app password).
    ///
    /// A client built from this config starts authenticated without
    /// probing the server.
    pub fn with_credentials(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::new(url)
        }
    }

    /// Load configuration from `nextcloud.toml` (if present) and environment.
    ///
    /// Environment variables are prefixed with `NEXTCLOUD_`, e.g.
    /// `NEXTCLOUD_URL` or `NEXTCLOUD_TIMEOUT_SECS`.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("nextcloud.toml");
        let file = config_path.exists().then_some(config_path);
        Self::build(file.as_deref())
    }

    /// Load configuration from the given file, with environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClientError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::build(Some(path))
    }

    fn build(file: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = file {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(config::Environment::with_prefix("NEXTCLOUD").try_parsing(true));

        let loaded: Self = settings
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.username.is_some() != self.password.is_some() {
            return Err(ClientError::Config(
                "username and password must be set together".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
