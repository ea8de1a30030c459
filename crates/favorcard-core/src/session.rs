// ── Session token storage ──
//
// The bearer token outlives a single process. Where it lives (memory,
// OS keyring) is the store's business; the service only reads it at
// startup, writes it after login and clears it on logout or 401.

use std::sync::{Arc, Mutex};

use secrecy::SecretString;

use crate::error::CoreError;

/// Persistent home for the session token.
pub trait SessionStore: Send + Sync {
    /// The saved token, if any.
    fn get(&self) -> Result<Option<SecretString>, CoreError>;

    /// Replace the saved token.
    fn set(&self, token: &SecretString) -> Result<(), CoreError>;

    /// Forget the saved token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-process store. Used for tests and `FAVORCARD_TOKEN` one-shots.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<SecretString>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<SecretString>>, CoreError> {
        self.token.lock().map_err(|_| CoreError::Session {
            message: "session lock poisoned".into(),
        })
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, token: &SecretString) -> Result<(), CoreError> {
        *self.lock()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.lock()? = None;
        Ok(())
    }
}

macro_rules! forward_session_store {
    ($ptr:ident) => {
        impl<S: SessionStore + ?Sized> SessionStore for $ptr<S> {
            fn get(&self) -> Result<Option<SecretString>, CoreError> {
                (**self).get()
            }

            fn set(&self, token: &SecretString) -> Result<(), CoreError> {
                (**self).set(token)
            }

            fn clear(&self) -> Result<(), CoreError> {
                (**self).clear()
            }
        }
    };
}

forward_session_store!(Arc);
forward_session_store!(Box);
