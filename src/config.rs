use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

pub const CATALOG_API_KEY_VAR: &str = "POKEMON_API_KEY";
pub const MARKETPLACE_CLIENT_ID_VAR: &str = "EBAY_SANDBOX_APP_ID";
pub const MARKETPLACE_CLIENT_SECRET_VAR: &str = "EBAY_SANDBOX_CERT_ID";
pub const CONFIG_PATH_VAR: &str = "VALUEDECK_CONFIG";

/// `VALUEDECK_CONFIG` if set, else `config.toml` in the working directory.
pub fn default_path() -> String {
    std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string())
}

/// Everything the service needs, built once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub server: Server,
    pub catalog: Catalog,
    pub marketplace: Marketplace,
    pub upstream: Upstream,
    pub search: Search,
    pub featured: Featured,
    /// Never read from the file, only from the environment.
    #[serde(skip)]
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    /// Where the presentation layer reaches this backend.
    pub public_base_url: String,
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            public_base_url: "http://localhost:5000".to_string(),
            allowed_origins: vec![
                "https://value-deck.netlify.app".to_string(),
                "http://localhost:3000".to_string(),
            ],
            allow_credentials: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub base_url: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            base_url: "https://api.pokemontcg.io/v2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Marketplace {
    pub token_url: String,
    pub base_url: String,
    pub scope: String,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self {
            token_url: "https://api.sandbox.ebay.com/identity/v1/oauth2/token".to_string(),
            base_url: "https://api.sandbox.ebay.com/buy/browse/v1".to_string(),
            scope: "https://api.ebay.com/oauth/api_scope".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Upstream {
    pub timeout_secs: u64,
    /// Extra attempts for idempotent GETs. 0 = single attempt.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            max_retries: 0,
            retry_backoff_ms: 200,
        }
    }
}

impl Upstream {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Search {
    /// Query the marketplace even when the request filter is off.
    pub always_query_marketplace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedStrategy {
    /// Look up a fixed list of names.
    #[default]
    Roster,
    /// Pull a bulk page and pick at random.
    Sample,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Featured {
    pub strategy: FeaturedStrategy,
    pub roster: Vec<String>,
    pub count: usize,
}

impl Default for Featured {
    fn default() -> Self {
        Self {
            strategy: FeaturedStrategy::Roster,
            roster: vec![
                "Charizard".to_string(),
                "Pikachu".to_string(),
                "Mewtwo".to_string(),
            ],
            count: 3,
        }
    }
}

/// A value that must never show up in logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub catalog_api_key: Secret,
    pub marketplace_client_id: Secret,
    pub marketplace_client_secret: Secret,
}

impl Credentials {
    /// Read all secrets through `lookup`; every one of them is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(Secret::new)
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::MissingSecret(name))
        };

        Ok(Self {
            catalog_api_key: required(CATALOG_API_KEY_VAR)?,
            marketplace_client_id: required(MARKETPLACE_CLIENT_ID_VAR)?,
            marketplace_client_secret: required(MARKETPLACE_CLIENT_SECRET_VAR)?,
        })
    }
}

impl Config {
    /// Load the TOML file (all defaults when it does not exist), then the
    /// secrets and overrides from the process environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        config.finish(|name| std::env::var(name).ok())
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply environment overrides, attach credentials and validate.
    pub fn finish<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(url) = lookup("PUBLIC_BASE_URL") {
            self.server.public_base_url = url;
        }
        if let Some(bind) = lookup("BIND_ADDR") {
            self.server.bind = bind;
        }

        self.credentials = Credentials::from_lookup(&lookup)?;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.allowed_origins.is_empty() {
            return Err(ConfigError::Invalid(
                "server.allowed_origins must list at least one origin".into(),
            ));
        }
        if self.featured.count == 0 {
            return Err(ConfigError::Invalid("featured.count must be at least 1".into()));
        }
        if self.featured.strategy == FeaturedStrategy::Roster && self.featured.roster.is_empty() {
            return Err(ConfigError::Invalid(
                "featured.roster is empty but the roster strategy is selected".into(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Invalid("upstream.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
