//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::{DateTime, Duration, Local, Utc};
use secrecy::SecretString;

use favorcard_core::convert::parse_datetime;

use crate::error::CliError;

/// Environment variable read instead of prompting for a password.
pub const PASSWORD_ENV: &str = "FAVORCARD_PASSWORD";

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so this fails instead
/// of hanging.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Password from `FAVORCARD_PASSWORD`, else a hidden prompt.
pub fn read_password(prompt: &str) -> Result<SecretString, CliError> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }
    let pw = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if pw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(pw))
}

/// Parse a `--expires` value.
///
/// Accepts a relative offset (`90m`, `12h`, `7d`, `2w`), an RFC 3339
/// timestamp, or a date / date-time read as UTC.
pub fn parse_expiry(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, CliError> {
    let input = input.trim();
    let invalid = |reason: String| CliError::Validation {
        field: "expires".into(),
        reason,
    };

    if let Some(offset) = parse_offset(input) {
        return offset
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| invalid(format!("'{input}' is too far in the future")));
    }

    parse_datetime(Some(input)).ok_or_else(|| {
        invalid(format!(
            "'{input}' is not a date (YYYY-MM-DD), timestamp (RFC 3339) or offset like 7d"
        ))
    })
}

/// `Some(None)` means the input looked like an offset but overflowed.
fn parse_offset(input: &str) -> Option<Option<Duration>> {
    let unit = input.chars().last()?;
    let amount: i64 = input.get(..input.len() - unit.len_utf8())?.parse().ok()?;
    if amount <= 0 {
        return None;
    }
    Some(match unit {
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        _ => return None,
    })
}

/// Local wall-clock rendering for tables.
pub fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
