//! Shared configuration for favorcard front-ends.
//!
//! TOML profiles, session token resolution (env + keyring + plaintext),
//! and translation of a profile into a ready `favorcard_api::ApiClient`.
//! The CLI layers its flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use favorcard_api::{ApiClient, TlsMode, TransportConfig};

pub use favorcard_api::DEFAULT_FRIENDS_PATH;

mod keyring_store;

pub use keyring_store::{KEYRING_SERVICE, KeyringSessionStore};

/// Environment variable that overrides any stored session token.
pub const TOKEN_ENV: &str = "FAVORCARD_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the override, else `default_profile`,
    /// else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles.get(name).ok_or_else(|| ConfigError::UnknownProfile {
            name: name.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Server root URL (e.g. "https://cards.example.com").
    pub server: String,

    /// Last username logged in with; pre-fills the login prompt.
    pub username: Option<String>,

    /// Friends API prefix under `/api/`.
    #[serde(default = "default_friends_path")]
    pub friends_path: String,

    /// Session token (plaintext -- prefer the keyring).
    pub token: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override `defaults.insecure`.
    pub insecure: Option<bool>,

    /// Override `defaults.timeout`, in seconds.
    pub timeout: Option<u64>,
}

fn default_friends_path() -> String {
    DEFAULT_FRIENDS_PATH.into()
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            username: None,
            friends_path: default_friends_path(),
            token: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }

    pub fn server_url(&self) -> Result<url::Url, ConfigError> {
        let url: url::Url = self.server.parse().map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", self.server),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "server".into(),
                reason: format!("expected an http(s) URL, got '{}'", self.server),
            });
        }
        Ok(url)
    }

    /// TLS and timeout settings, with `defaults` filling the gaps.
    pub fn transport(&self, defaults: &Defaults) -> TransportConfig {
        let tls = if self.insecure.unwrap_or(defaults.insecure) {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else {
            TlsMode::System
        };
        TransportConfig::default()
            .with_tls(tls)
            .with_timeout(Duration::from_secs(self.timeout.unwrap_or(defaults.timeout)))
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "favorcard", "favorcard").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("favorcard");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from `path` (missing file is fine) layered under `FAVORCARD_*`
/// env vars. Nested keys use `__`, e.g. `FAVORCARD_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("FAVORCARD_")
                .ignore(&["token", "config"])
                .split("__"),
        );

    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Write `cfg` as TOML to `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Profile → client ────────────────────────────────────────────────

/// Build an API client for `profile`. Token handling is left to the
/// session store.
pub fn profile_to_client(profile: &Profile, defaults: &Defaults) -> Result<ApiClient, ConfigError> {
    let url = profile.server_url()?;
    let transport = profile.transport(defaults);
    let client = ApiClient::new(url, &transport).map_err(|e| ConfigError::Validation {
        field: "transport".into(),
        reason: e.to_string(),
    })?;
    Ok(client.with_friends_path(profile.friends_path.clone()))
}

// ── Token resolution ────────────────────────────────────────────────

/// Token that bypasses the session store: `FAVORCARD_TOKEN`, then the
/// profile's plaintext `token`. The keyring is consulted by
/// [`KeyringSessionStore`] itself.
pub fn override_token(profile: Option<&Profile>) -> Option<SecretString> {
    if let Some(val) = std::env::var(TOKEN_ENV).ok().filter(|v| !v.trim().is_empty()) {
        return Some(SecretString::from(val));
    }
    profile
        .and_then(|p| p.token.clone())
        .filter(|t| !t.trim().is_empty())
        .map(SecretString::from)
}
