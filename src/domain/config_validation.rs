//! Configuration validation.
//!
//! Checks every journal setting before the ledger is opened. Missing keys
//! fall back to defaults, so only values that are present are checked.

use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;

pub fn validate_journal_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_positive_double(config, "journal", "point_value")?;
    validate_positive_double(config, "journal", "stop_distance")?;
    validate_storage_key(config)?;
    validate_positive_uint(config, "metrics", "streak_window")?;
    validate_positive_uint(config, "metrics", "equity_window")?;
    validate_non_empty(config, "journal", "storage_dir")?;
    validate_non_empty(config, "export", "output_dir")?;
    validate_non_empty(config, "export", "file_prefix")?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> JournalError {
    JournalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_positive_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), JournalError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        _ => Err(invalid(
            section,
            key,
            &format!("{key} must be a positive number"),
        )),
    }
}

fn validate_positive_uint(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), JournalError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<u64>() {
        Ok(v) if v >= 1 => Ok(()),
        _ => Err(invalid(
            section,
            key,
            &format!("{key} must be a whole number of at least 1"),
        )),
    }
}

fn validate_storage_key(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let Some(key) = config.get_string("journal", "storage_key") else {
        return Ok(());
    };
    let key = key.trim();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(invalid(
            "journal",
            "storage_key",
            "storage_key must be non-empty letters, digits, '_' or '-'",
        ));
    }
    Ok(())
}

fn validate_non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), JournalError> {
    match config.get_string(section, key) {
        Some(s) if s.trim().is_empty() => Err(invalid(
            section,
            key,
            &format!("{key} must not be empty"),
        )),
        _ => Ok(()),
    }
}
