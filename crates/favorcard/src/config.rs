//! CLI configuration: a thin wrapper around `favorcard_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --insecure, --timeout, --config) and assembles the
//! `CardService` every server-bound command runs against.

use std::path::PathBuf;

use favorcard_config::{
    Config, KeyringSessionStore, Profile, load_config_from, override_token, profile_to_client,
    save_config_to,
};
use favorcard_core::{CardService, MemorySessionStore, SessionStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub type Service = CardService<Box<dyn SessionStore>>;

// ── Paths & loading ──────────────────────────────────────────────────

/// Config file in use: `--config` / `FAVORCARD_CONFIG`, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(favorcard_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&config_file(global))?)
}

pub fn save(global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    Ok(save_config_to(cfg, &config_file(global))?)
}

/// Comma-separated profile names, for error hints.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

// ── Profile resolution ───────────────────────────────────────────────

/// The active profile with CLI flags applied.
///
/// A profile missing from the file is synthesized from `--server` when
/// given, so one-off use needs no config at all.
pub fn resolve_profile(
    cfg: &Config,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<Profile, CliError> {
    let mut profile = match (cfg.profiles.get(profile_name), global.server.as_deref()) {
        (Some(p), _) => p.clone(),
        (None, Some(server)) => Profile::new(server),
        (None, None) if cfg.profiles.is_empty() => {
            return Err(CliError::NoConfig {
                path: config_file(global).display().to_string(),
            });
        }
        (None, None) => {
            return Err(CliError::ProfileNotFound {
                name: profile_name.to_owned(),
                available: available_profiles(cfg),
            });
        }
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok(profile)
}

// ── Session assembly ─────────────────────────────────────────────────

/// Everything a server-bound command needs.
pub struct AppContext {
    pub service: Service,
    pub config: Config,
    pub profile_name: String,
    pub profile: Profile,
}

impl AppContext {
    pub fn build(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load(global)?;
        let profile_name = config.active_profile_name(global.profile.as_deref());
        let profile = resolve_profile(&config, &profile_name, global)?;

        let api = profile_to_client(&profile, &config.defaults)?;
        let store: Box<dyn SessionStore> = match override_token(Some(&profile)) {
            Some(token) => {
                tracing::debug!("using token from environment or profile");
                Box::new(MemorySessionStore::with_token(token))
            }
            None => Box::new(KeyringSessionStore::new(&profile_name)),
        };
        let service = CardService::new(api, store);

        Ok(Self {
            service,
            config,
            profile_name,
            profile,
        })
    }

    /// Record the last username on the profile, if it is a saved one.
    pub fn remember_username(&mut self, global: &GlobalOpts, username: &str) -> Result<(), CliError> {
        let Some(saved) = self.config.profiles.get_mut(&self.profile_name) else {
            return Ok(());
        };
        if saved.username.as_deref() == Some(username) {
            return Ok(());
        }
        saved.username = Some(username.to_owned());
        save(global, &self.config)
    }
}
