// ============================
// backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Layering, last wins: built-in defaults, then the TOML file, then
//! `WHATHEFOOD_` environment variables (`__` separates nesting, e.g.
//! `WHATHEFOOD_SESSION__SECRET`).
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use whathefood_common::LandingPaths;

use crate::auth::{PasswordRequirements, MIN_PASSWORD_LENGTH, SESSION_COOKIE, SESSION_TTL};
use crate::policy::{default_rules, PolicyError, RoutePolicy, RouteRule};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "WHATHEFOOD_";
const MIN_SECRET_BYTES: usize = 32;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("session.secret must be at least {MIN_SECRET_BYTES} bytes")]
    WeakSecret,

    #[error("session.ttl_secs must be greater than zero")]
    ZeroTtl,

    #[error("password.min_length must be at least {MIN_PASSWORD_LENGTH}")]
    PasswordTooShort,

    #[error("landing path {0:?} must start with '/'")]
    RelativeLanding(String),

    #[error("unknown log level {0:?}")]
    LogLevel(String),

    #[error("invalid listen address: {0}")]
    Address(String),

    #[error("invalid route table: {0}")]
    Routes(#[from] PolicyError),
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub session: SessionSettings,
    pub password: PasswordRequirements,
    pub landing: LandingSettings,
    /// Page classification table
    pub routes: Vec<RouteRule>,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            session: SessionSettings::default(),
            password: PasswordRequirements::default(),
            landing: LandingSettings::default(),
            routes: default_rules(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Built front-end served behind the route authorizer
    pub static_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Address(format!("{}:{} ({e})", self.host, self.port)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding `users.json`
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// HMAC key for session tokens. No default; must be configured.
    pub secret: String,
    pub ttl_secs: u64,
    pub cookie_name: String,
    /// Add `Secure` to the cookie (HTTPS deployments)
    pub secure_cookie: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_secs: SESSION_TTL.as_secs(),
            cookie_name: SESSION_COOKIE.to_string(),
            secure_cookie: false,
        }
    }
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .field("cookie_name", &self.cookie_name)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

/// Where the route authorizer and the login form send people
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LandingSettings {
    /// Anonymous callers of gated pages
    pub login: String,
    /// Per-role home pages
    #[serde(flatten)]
    pub home: LandingPaths,
}

impl Default for LandingSettings {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            home: LandingPaths::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Used when `RUST_LOG` is not set
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load from `config.toml` in the working directory plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific TOML file plus the environment.
    ///
    /// A missing file is not an error; defaults and env still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings: Settings = Self::figment(path.as_ref()).extract().map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret);
        }
        if self.session.ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.password.min_length < MIN_PASSWORD_LENGTH {
            return Err(ConfigError::PasswordTooShort);
        }
        for path in [&self.landing.login, &self.landing.home.admin, &self.landing.home.user] {
            if !path.starts_with('/') {
                return Err(ConfigError::RelativeLanding(path.clone()));
            }
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::LogLevel(self.logging.level.clone()));
        }
        self.socket_addr()?;
        self.route_policy()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.socket_addr()
    }

    pub fn route_policy(&self) -> Result<RoutePolicy, ConfigError> {
        Ok(RoutePolicy::new(&self.routes)?)
    }
}
