//! Operator command parsing: `key [value...]`.

use crate::{
    error::{Error, Result},
    schema::{ConfigKey, ConfigKind, ConfigValue, Configuration},
};

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show usage and every key. `unknown` carries a key the operator typed
    /// that is not in the key set.
    Help { unknown: Option<String> },
    /// Show the current value of a key.
    Get(ConfigKey),
    /// Replace the value of a key.
    Set(ConfigKey, ConfigValue),
}

/// Parse one operator command line.
///
/// Unknown keys are not an error: they produce [`Command::Help`] so the
/// operator sees the valid keys. A value that cannot be coerced to the key's
/// declared kind is an error.
pub fn parse_command(line: &str) -> Result<Command> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(Command::Help { unknown: None });
    };
    if first == "help" {
        return Ok(Command::Help { unknown: None });
    }
    let Ok(key) = first.parse::<ConfigKey>() else {
        return Ok(Command::Help {
            unknown: Some(first.to_string()),
        });
    };

    let args: Vec<&str> = tokens.collect();
    if args.is_empty() {
        return Ok(Command::Get(key));
    }
    Ok(Command::Set(key, parse_value(key, &args)?))
}

/// Coerce command arguments to the kind declared for `key`.
///
/// - list: arguments are re-joined with a space and split on `,`; entries are
///   trimmed and lower-cased, empty entries dropped.
/// - bool: `on`/`off` (also `true`/`false`, `yes`/`no`, `1`/`0`).
/// - str: the first argument.
pub fn parse_value(key: ConfigKey, args: &[&str]) -> Result<ConfigValue> {
    match key.kind() {
        ConfigKind::List => Ok(ConfigValue::List(
            args.join(" ")
                .split(',')
                .map(|entry| entry.trim().to_lowercase())
                .filter(|entry| !entry.is_empty())
                .collect(),
        )),
        ConfigKind::Bool => {
            let raw = args.first().copied().unwrap_or_default();
            match raw.to_lowercase().as_str() {
                "on" | "true" | "yes" | "1" => Ok(ConfigValue::Bool(true)),
                "off" | "false" | "no" | "0" => Ok(ConfigValue::Bool(false)),
                _ => Err(Error::invalid_value(
                    key,
                    format!("expected \"on\" or \"off\", got \"{raw}\""),
                )),
            }
        },
        ConfigKind::Str => Ok(ConfigValue::Str(
            args.first().copied().unwrap_or_default().to_string(),
        )),
    }
}

/// Render the current value of `key` the way it is stored, with the secret
/// key masked.
pub fn display_value(config: &Configuration, key: ConfigKey) -> String {
    let value = config.get(key);
    if key.is_secret() && value != ConfigValue::Str(String::new()) {
        return "\"[REDACTED]\"".to_string();
    }
    value
        .to_json()
        .unwrap_or_else(|_| "<unserializable>".to_string())
}

/// Usage text followed by every key, its description, and its current value.
pub fn help_lines(config: &Configuration) -> Vec<String> {
    let mut lines = vec![
        "Usage: config-key [config value]. If you do not give a value, I will return the current value.".to_string(),
        "The following config keys are available:".to_string(),
    ];
    for key in ConfigKey::ALL {
        lines.push(format!("- {}: {}", key, key.description()));
        lines.push(format!("-- Value: {}", display_value(config, key)));
    }
    lines
}
