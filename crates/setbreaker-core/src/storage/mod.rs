mod preferences;

pub use preferences::{
    snap_rest_period, validate_rest_period, Platform, Preferences, PreferencesObserver,
    PreferencesStore, PREFERENCE_KEYS, REST_PERIOD_MAX, REST_PERIOD_MIN, REST_PERIOD_STEP,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the preferences directory.
///
/// `SETBREAKER_CONFIG_DIR` wins when set. Otherwise `~/.config/setbreaker[-dev]/`
/// based on `SETBREAKER_ENV` (set it to `dev` for the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SETBREAKER_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SETBREAKER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("setbreaker-dev")
            } else {
                base_dir.join("setbreaker")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
