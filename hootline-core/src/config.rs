//! Layered configuration for the hoots service.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then environment variables. CLI flags in the server binary override
//! all of these.
//!
//! Environment variables:
//!   HOOTLINE_BIND           # listen address, e.g. 0.0.0.0:3000
//!   HOOTLINE_DATABASE_URL   # Postgres connection string
//!   DATABASE_URL            # fallback for HOOTLINE_DATABASE_URL
//!   HOOTLINE_JWT_SECRET     # HS256 signing secret shared with the identity service

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hootline.toml";

/// Top-level configuration for the server binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    pub bind: SocketAddr,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    /// Only use for development or documented use cases.
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Postgres connection string
    pub url: String,

    /// Maximum connections in the pool. Kept low for a single-resource service.
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret used to verify bearer tokens. No default: the service
    /// refuses to start without one (see [`AppConfig::validate`]).
    pub jwt_secret: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout_secs: 30,
            cors_permissive: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/hootline".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; without one, `./hootline.toml` is used
    /// if present, otherwise defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file. Missing tables and keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| CoreError::config_parse(path, e))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply environment overrides via the given lookup.
    ///
    /// Taking the lookup as a closure keeps this testable without mutating
    /// process-wide environment state.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = get("HOOTLINE_BIND") {
            match bind.parse() {
                Ok(addr) => self.server.bind = addr,
                Err(_) => tracing::warn!(%bind, "ignoring unparseable HOOTLINE_BIND"),
            }
        }
        if let Some(url) = get("HOOTLINE_DATABASE_URL").or_else(|| get("DATABASE_URL")) {
            self.database.url = url;
        }
        if let Some(secret) = get("HOOTLINE_JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
    }

    /// The token-verification secret, or an error if it was never set.
    pub fn jwt_secret(&self) -> Result<&str> {
        match self.auth.jwt_secret.as_deref() {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(CoreError::config(
                "auth.jwt_secret is not set (config file or HOOTLINE_JWT_SECRET)",
            )),
        }
    }

    /// Check the parts with no sensible default.
    pub fn validate(&self) -> Result<()> {
        self.jwt_secret().map(|_| ())
    }
}
