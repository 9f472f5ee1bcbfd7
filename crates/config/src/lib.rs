//! Configuration for the hall monitor: the closed key set, typed values,
//! key/value store backends, and operator command parsing.
//!
//! Every value lives in a [`ConfigStore`] as a JSON-serialized scalar or list
//! and is mirrored into an in-memory [`Configuration`] at load time.

pub mod command;
pub mod error;
pub mod loader;
pub mod schema;
pub mod store;

pub use {
    command::{Command, display_value, help_lines, parse_command, parse_value},
    error::{Error, Result},
    loader::{
        STORE_FILENAME, STORE_VERSION, VERSION_KEY, default_store_path, load, persist,
    },
    schema::{ConfigKey, ConfigKind, ConfigValue, Configuration},
    store::{ConfigStore, JsonFileStore, MemoryStore},
};
