// ── Core error types ──
//
// User-facing errors from favorcard-core. Consumers never see raw HTTP
// statuses or JSON failures; the `From<favorcard_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in -- run `favorcard login` first")]
    NotLoggedIn,

    #[error("Session storage error: {message}")]
    Session { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// The server refused the operation (bad state, not the owner, ...).
    #[error("Rejected by server: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` when the stored session is unusable and the user must log in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. } | Self::NotLoggedIn)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<favorcard_api::Error> for CoreError {
    fn from(err: favorcard_api::Error) -> Self {
        use favorcard_api::Error as E;

        match err {
            E::Authentication { message } => CoreError::AuthenticationFailed { message },
            E::NotAuthenticated => CoreError::NotLoggedIn,
            E::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            E::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid server URL: {e}"),
            },
            E::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            E::Api { status: 404, message } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: message,
            },
            E::Api {
                status: 400 | 403 | 409,
                message,
            } => CoreError::Rejected { message },
            E::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            E::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected server response: {message}"))
            }
        }
    }
}
