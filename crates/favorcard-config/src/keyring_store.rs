// ── Keyring-backed session store ──
//
// One keyring entry per profile: service `favorcard`, user
// `{profile}/token`.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use favorcard_core::{CoreError, SessionStore};

/// Keyring service name shared by all profiles.
pub const KEYRING_SERVICE: &str = "favorcard";

/// Persists the session token in the OS keyring.
pub struct KeyringSessionStore {
    key: String,
}

impl KeyringSessionStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            key: format!("{profile_name}/token"),
        }
    }

    /// The keyring user name this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn entry(&self) -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.key).map_err(session_error)
    }
}

fn session_error(err: keyring::Error) -> CoreError {
    CoreError::Session {
        message: format!("keyring: {err}"),
    }
}

impl SessionStore for KeyringSessionStore {
    /// A keyring that cannot be reached reads as "no stored token".
    fn get(&self) -> Result<Option<SecretString>, CoreError> {
        let entry = match keyring::Entry::new(KEYRING_SERVICE, &self.key) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %self.key, error = %e, "keyring unavailable");
                return Ok(None);
            }
        };
        match entry.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(key = %self.key, error = %e, "could not read token from keyring");
                Ok(None)
            }
        }
    }

    fn set(&self, token: &SecretString) -> Result<(), CoreError> {
        debug!(key = %self.key, "saving session token to keyring");
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(session_error)
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(session_error(e)),
        }
    }
}
