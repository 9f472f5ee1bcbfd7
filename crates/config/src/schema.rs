//! Config schema: the closed key set, value types, and the in-memory
//! configuration the policy engine reads.
use std::{fmt, str::FromStr};

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use crate::error::{Error, Result};

/// Value type declared for a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    /// Comma-separated list of strings.
    List,
    /// `on` / `off` toggle.
    Bool,
    /// Single token string.
    Str,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Bool => write!(f, "bool"),
            Self::Str => write!(f, "str"),
        }
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    List(Vec<String>),
    Bool(bool),
    Str(String),
}

impl ConfigValue {
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::List(_) => ConfigKind::List,
            Self::Bool(_) => ConfigKind::Bool,
            Self::Str(_) => ConfigKind::Str,
        }
    }

    /// Serialize for the key/value store.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored value, requiring it to match the kind declared for `key`.
    pub fn from_json(key: ConfigKey, raw: &str) -> Result<Self> {
        let value: Self = serde_json::from_str(raw)?;
        if value.kind() != key.kind() {
            return Err(Error::invalid_value(
                key,
                format!("expected {}, found {}", key.kind(), value.kind()),
            ));
        }
        Ok(value)
    }
}

/// The closed set of configuration keys.
///
/// The string form of each key is what operators type and what the store
/// persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    MonitorChannels,
    TriggerPms,
    TriggerWords,
    Endpoint,
    SnsTopic,
    AwsAccessKey,
    AwsSecretKey,
    AlwaysSendNotifications,
    AutoNotificationsOnDc,
}

impl ConfigKey {
    /// Every key, in the order help output lists them.
    pub const ALL: [Self; 9] = [
        Self::MonitorChannels,
        Self::TriggerPms,
        Self::TriggerWords,
        Self::Endpoint,
        Self::SnsTopic,
        Self::AwsAccessKey,
        Self::AwsSecretKey,
        Self::AlwaysSendNotifications,
        Self::AutoNotificationsOnDc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MonitorChannels => "monitor_channels",
            Self::TriggerPms => "trigger_pms",
            Self::TriggerWords => "trigger_words",
            Self::Endpoint => "endpoint",
            Self::SnsTopic => "sns_topic",
            Self::AwsAccessKey => "aws_access_key",
            Self::AwsSecretKey => "aws_secret_key",
            Self::AlwaysSendNotifications => "always_send_notifications",
            Self::AutoNotificationsOnDc => "auto_notifications_on_dc",
        }
    }

    pub fn kind(self) -> ConfigKind {
        match self {
            Self::MonitorChannels | Self::TriggerWords => ConfigKind::List,
            Self::TriggerPms | Self::AlwaysSendNotifications | Self::AutoNotificationsOnDc => {
                ConfigKind::Bool
            },
            Self::Endpoint | Self::SnsTopic | Self::AwsAccessKey | Self::AwsSecretKey => {
                ConfigKind::Str
            },
        }
    }

    /// Operator-facing description shown in help output.
    pub fn description(self) -> &'static str {
        match self {
            Self::MonitorChannels => {
                "A comma-separated list of channels to notify in. Include the #."
            },
            Self::TriggerPms => "Trigger notifications on PMs. Use \"on\" or \"off\".",
            Self::TriggerWords => "A comma-separated list of words to notify on.",
            Self::Endpoint => {
                "Endpoint to use when communicating with SNS. Hostname only, no scheme or path."
            },
            Self::SnsTopic => "SNS Topic to send notifications to.",
            Self::AwsAccessKey => "AWS Access Key.",
            Self::AwsSecretKey => "AWS Secret Key.",
            Self::AlwaysSendNotifications => {
                "Always send notifications, regardless of client status. Use \"on\" or \"off\"."
            },
            Self::AutoNotificationsOnDc => {
                "Automatically enable notifications when a client disconnects. Use \"on\" or \"off\"."
            },
        }
    }

    pub fn default_value(self) -> ConfigValue {
        match self {
            Self::MonitorChannels | Self::TriggerWords => ConfigValue::List(Vec::new()),
            Self::TriggerPms => ConfigValue::Bool(true),
            Self::AlwaysSendNotifications | Self::AutoNotificationsOnDc => ConfigValue::Bool(false),
            Self::Endpoint => ConfigValue::Str(DEFAULT_ENDPOINT.into()),
            Self::SnsTopic | Self::AwsAccessKey | Self::AwsSecretKey => {
                ConfigValue::Str(String::new())
            },
        }
    }

    /// Whether the value is signing material that must never be echoed.
    pub fn is_secret(self) -> bool {
        matches!(self, Self::AwsSecretKey)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::unknown_key(s))
    }
}

/// Default SNS endpoint hostname.
pub const DEFAULT_ENDPOINT: &str = "sns.us-east-1.amazonaws.com";

/// In-memory working copy of the configuration.
#[derive(Clone)]
pub struct Configuration {
    /// Lower-cased channel names, including the `#`.
    pub monitored_channels: Vec<String>,
    /// Lower-cased trigger substrings.
    pub trigger_words: Vec<String>,
    pub trigger_pms: bool,
    pub always_send_notifications: bool,
    pub auto_notifications_on_dc: bool,
    /// Notification backend hostname (no scheme, no path).
    pub endpoint: String,
    pub topic: String,
    pub access_key: String,
    pub secret_key: Secret<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            monitored_channels: Vec::new(),
            trigger_words: Vec::new(),
            trigger_pms: true,
            always_send_notifications: false,
            auto_notifications_on_dc: false,
            endpoint: DEFAULT_ENDPOINT.into(),
            topic: String::new(),
            access_key: String::new(),
            secret_key: Secret::new(String::new()),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("monitored_channels", &self.monitored_channels)
            .field("trigger_words", &self.trigger_words)
            .field("trigger_pms", &self.trigger_pms)
            .field("always_send_notifications", &self.always_send_notifications)
            .field("auto_notifications_on_dc", &self.auto_notifications_on_dc)
            .field("endpoint", &self.endpoint)
            .field("topic", &self.topic)
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl Configuration {
    /// Current value of `key`.
    pub fn get(&self, key: ConfigKey) -> ConfigValue {
        match key {
            ConfigKey::MonitorChannels => ConfigValue::List(self.monitored_channels.clone()),
            ConfigKey::TriggerWords => ConfigValue::List(self.trigger_words.clone()),
            ConfigKey::TriggerPms => ConfigValue::Bool(self.trigger_pms),
            ConfigKey::AlwaysSendNotifications => {
                ConfigValue::Bool(self.always_send_notifications)
            },
            ConfigKey::AutoNotificationsOnDc => ConfigValue::Bool(self.auto_notifications_on_dc),
            ConfigKey::Endpoint => ConfigValue::Str(self.endpoint.clone()),
            ConfigKey::SnsTopic => ConfigValue::Str(self.topic.clone()),
            ConfigKey::AwsAccessKey => ConfigValue::Str(self.access_key.clone()),
            ConfigKey::AwsSecretKey => ConfigValue::Str(self.secret_key.expose_secret().clone()),
        }
    }

    /// Replace the value of `key`. The value must match the key's declared kind.
    pub fn apply(&mut self, key: ConfigKey, value: ConfigValue) -> Result<()> {
        match (key, value) {
            (ConfigKey::MonitorChannels, ConfigValue::List(v)) => self.monitored_channels = v,
            (ConfigKey::TriggerWords, ConfigValue::List(v)) => self.trigger_words = v,
            (ConfigKey::TriggerPms, ConfigValue::Bool(v)) => self.trigger_pms = v,
            (ConfigKey::AlwaysSendNotifications, ConfigValue::Bool(v)) => {
                self.always_send_notifications = v;
            },
            (ConfigKey::AutoNotificationsOnDc, ConfigValue::Bool(v)) => {
                self.auto_notifications_on_dc = v;
            },
            (ConfigKey::Endpoint, ConfigValue::Str(v)) => self.endpoint = v,
            (ConfigKey::SnsTopic, ConfigValue::Str(v)) => self.topic = v,
            (ConfigKey::AwsAccessKey, ConfigValue::Str(v)) => self.access_key = v,
            (ConfigKey::AwsSecretKey, ConfigValue::Str(v)) => self.secret_key = Secret::new(v),
            (key, value) => {
                return Err(Error::invalid_value(
                    key,
                    format!("expected {}, found {}", key.kind(), value.kind()),
                ));
            },
        }
        Ok(())
    }

    /// `true` when the topic and both credentials are set.
    pub fn is_publish_configured(&self) -> bool {
        !self.access_key.is_empty()
            && !self.secret_key.expose_secret().is_empty()
            && !self.topic.is_empty()
    }

    /// Whether `channel` is monitored, ignoring case.
    pub fn monitors_channel(&self, channel: &str) -> bool {
        let channel = channel.to_lowercase();
        self.monitored_channels.iter().any(|c| *c == channel)
    }
}
