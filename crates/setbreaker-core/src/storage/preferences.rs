//! TOML-based user preferences.
//!
//! Four scalars drive the whole app:
//! - `rest_period`: countdown length in seconds (15..=300, step 15)
//! - `auto_start_timer`: start on launch and after every reset
//! - `start_on_scroll`: a qualifying scroll arms an idle timer
//! - `platform`: which feed the viewport loads
//!
//! Stored at `~/.config/setbreaker/preferences.toml`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};

pub const REST_PERIOD_MIN: u32 = 15;
pub const REST_PERIOD_MAX: u32 = 300;
pub const REST_PERIOD_STEP: u32 = 15;

pub const PREFERENCE_KEYS: [&str; 4] = [
    "rest_period",
    "auto_start_timer",
    "start_on_scroll",
    "platform",
];

/// Feed the viewport shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Instagram,
    TikTok,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Instagram, Platform::TikTok];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            Platform::Instagram => "https://www.instagram.com",
            Platform::TikTok => "https://www.tiktok.com",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "platform".into(),
                message: format!("'{s}' is not one of instagram, tiktok"),
            })
    }
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_rest_period")]
    pub rest_period: u32,
    #[serde(default = "default_true")]
    pub auto_start_timer: bool,
    #[serde(default)]
    pub start_on_scroll: bool,
    #[serde(default)]
    pub platform: Platform,
}

fn default_rest_period() -> u32 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            rest_period: default_rest_period(),
            auto_start_timer: true,
            start_on_scroll: false,
            platform: Platform::default(),
        }
    }
}

impl Preferences {
    /// Get a value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "rest_period" => Some(self.rest_period.to_string()),
            "auto_start_timer" => Some(self.auto_start_timer.to_string()),
            "start_on_scroll" => Some(self.start_on_scroll.to_string()),
            "platform" => Some(self.platform.label().to_lowercase()),
            _ => None,
        }
    }

    /// Parse and assign a value by key. Leaves `self` untouched on error.
    ///
    /// # Errors
    ///
    /// Unknown keys, unparseable values and out-of-range rest periods.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "rest_period" => {
                let secs = value.trim().parse::<u32>().map_err(|e| ValidationError::InvalidValue {
                    field: key.into(),
                    message: e.to_string(),
                })?;
                self.rest_period = validate_rest_period(secs)?;
            }
            "auto_start_timer" => self.auto_start_timer = parse_bool(key, value)?,
            "start_on_scroll" => self.start_on_scroll = parse_bool(key, value)?,
            "platform" => self.platform = value.parse()?,
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
        Ok(())
    }

    /// Pull a hand-edited rest period back onto the stepper grid.
    fn normalized(mut self) -> Self {
        let snapped = snap_rest_period(self.rest_period);
        if snapped != self.rest_period {
            warn!(from = self.rest_period, to = snapped, "rest period out of range, snapped");
            self.rest_period = snapped;
        }
        self
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.trim().parse::<bool>().map_err(|e| {
        ValidationError::InvalidValue {
            field: key.into(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Accept only values the settings stepper could produce.
pub fn validate_rest_period(secs: u32) -> Result<u32, ValidationError> {
    if (REST_PERIOD_MIN..=REST_PERIOD_MAX).contains(&secs) && secs % REST_PERIOD_STEP == 0 {
        Ok(secs)
    } else {
        Err(ValidationError::RestPeriod {
            secs,
            min: REST_PERIOD_MIN,
            max: REST_PERIOD_MAX,
            step: REST_PERIOD_STEP,
        })
    }
}

/// Clamp into range and round to the nearest step.
pub fn snap_rest_period(secs: u32) -> u32 {
    let clamped = secs.clamp(REST_PERIOD_MIN, REST_PERIOD_MAX);
    let rounded = (clamped + REST_PERIOD_STEP / 2) / REST_PERIOD_STEP * REST_PERIOD_STEP;
    rounded.clamp(REST_PERIOD_MIN, REST_PERIOD_MAX)
}

/// Anything that must re-read preferences when they change.
pub trait PreferencesObserver {
    fn preferences_changed(&mut self, prefs: &Preferences);
}

/// File-backed preferences.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferencesStore {
    /// Open the store in the default preferences directory.
    ///
    /// # Errors
    ///
    /// See [`PreferencesStore::open`].
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir()?.join("preferences.toml"))
    }

    /// Load from `path`, writing defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the default file cannot be written.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let prefs: Preferences =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                debug!(path = %path.display(), "preferences loaded");
                Ok(Self {
                    path,
                    prefs: prefs.normalized(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let store = Self {
                    path,
                    prefs: Preferences::default(),
                };
                store.save()?;
                Ok(store)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }
            .into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.prefs.get(key)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        let content = toml::to_string_pretty(&self.prefs).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Set a value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value is invalid, or the
    /// file cannot be written.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&Preferences> {
        let mut next = self.prefs.clone();
        next.set(key, value)?;
        self.prefs = next;
        self.save()?;
        debug!(key, value, "preference updated");
        Ok(&self.prefs)
    }

    /// [`set`](Self::set), then tell `observer` about the new values.
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set); the observer is not called on error.
    pub fn update(
        &mut self,
        key: &str,
        value: &str,
        observer: &mut dyn PreferencesObserver,
    ) -> Result<&Preferences> {
        self.set(key, value)?;
        observer.preferences_changed(&self.prefs);
        Ok(&self.prefs)
    }

    /// Restore defaults and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn reset(&mut self) -> Result<&Preferences> {
        self.prefs = Preferences::default();
        self.save()?;
        Ok(&self.prefs)
    }
}
