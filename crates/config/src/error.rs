use std::error::Error as StdError;

/// Crate-wide result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The key is not part of the closed configuration key set.
    #[error("unknown config key: {key}")]
    UnknownKey { key: String },

    /// A value could not be coerced to the type declared for its key.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// The backing store failed.
    #[error("config store failed: {context}: {source}")]
    Store {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn unknown_key(key: impl std::fmt::Display) -> Self {
        Self::UnknownKey {
            key: key.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_value(key: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn store(context: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Store {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
