use clap::Subcommand;
use setbreaker_core::storage::PREFERENCE_KEYS;
use setbreaker_core::PreferencesStore;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a preference value
    Get {
        /// Preference key (rest_period, auto_start_timer, start_on_scroll, platform)
        key: String,
    },
    /// Set a preference value
    Set {
        /// Preference key
        key: String,
        /// New value
        value: String,
    },
    /// List all preferences
    List,
    /// Print the preferences file location
    Path,
    /// Reset preferences to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = PreferencesStore::open_default()?;
    match action {
        ConfigAction::Get { key } => match store.get(&key) {
            Some(value) => println!("{value}"),
            None => {
                return Err(format!(
                    "unknown key: {key} (expected one of {})",
                    PREFERENCE_KEYS.join(", ")
                )
                .into());
            }
        },
        ConfigAction::Set { key, value } => {
            store.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(store.preferences())?;
            println!("{json}");
        }
        ConfigAction::Path => println!("{}", store.path().display()),
        ConfigAction::Reset => {
            store.reset()?;
            println!("preferences reset to defaults");
        }
    }
    Ok(())
}
