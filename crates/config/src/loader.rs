use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::{
    error::Result,
    schema::{ConfigKey, ConfigValue, Configuration},
    store::ConfigStore,
};

/// Reserved store key holding the schema version.
pub const VERSION_KEY: &str = "nv_version";

/// Current store schema version. A store written under any other version is
/// reset to defaults on load.
pub const STORE_VERSION: &str = "1.0.0";

/// File name of the JSON store inside the data directory.
pub const STORE_FILENAME: &str = "hallmonitor.json";

/// Returns the default JSON store path (`<data dir>/hallmonitor.json`),
/// falling back to the working directory when no home is known.
pub fn default_store_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "hallmonitor")
        .map(|d| d.data_dir().join(STORE_FILENAME))
        .unwrap_or_else(|| PathBuf::from(STORE_FILENAME))
}

/// Load the working configuration from `store`.
///
/// Missing keys are filled with their defaults and written back. When the
/// stored schema version differs from [`STORE_VERSION`], every key is reset.
/// A stored value that does not parse as its declared kind falls back to the
/// default for that key.
pub fn load(store: &dyn ConfigStore) -> Result<Configuration> {
    let stored_version = store.get(VERSION_KEY)?;
    let reset = stored_version.as_deref() != Some(STORE_VERSION);
    if reset {
        info!(
            from = stored_version.as_deref().unwrap_or("none"),
            to = STORE_VERSION,
            "resetting config store to defaults"
        );
        store.set(VERSION_KEY, STORE_VERSION)?;
    }

    let mut config = Configuration::default();
    for key in ConfigKey::ALL {
        let raw = match store.get(key.as_str())? {
            Some(raw) if !reset => raw,
            _ => {
                let raw = key.default_value().to_json()?;
                store.set(key.as_str(), &raw)?;
                raw
            },
        };

        let value = match ConfigValue::from_json(key, &raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(%key, error = %e, "stored config value is malformed, using default");
                key.default_value()
            },
        };
        config.apply(key, value)?;
    }

    debug!(?config, "loaded config");
    Ok(config)
}

/// Write `value` for `key` through to the store.
pub fn persist(store: &dyn ConfigStore, key: ConfigKey, value: &ConfigValue) -> Result<()> {
    store.set(key.as_str(), &value.to_json()?)
}
