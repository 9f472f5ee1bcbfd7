use serde::{Deserialize, Serialize};

/// Name used as the sender of notifications the monitor raises itself.
pub const MONITOR_NAME: &str = "HallMonitor";

/// Message sent when a client disconnect switches notifications on.
pub const DISCONNECT_MESSAGE: &str = "Detected client disconnect. Enabling notifications.";

/// An inbound chat event, consumed once by the policy engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatEvent {
    PrivateMessage {
        sender: String,
        text: String,
    },
    ChannelMessage {
        channel: String,
        sender: String,
        text: String,
    },
    /// The operator's client dropped off the relay.
    ClientDisconnect,
}

/// A matched event, ready for gating and delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Human-readable origin, e.g. `alice@` or `#ops (alice@)`.
    pub who: String,
    pub message: String,
    /// Bypass presence gating. Credential checks still apply.
    pub force: bool,
}

impl NotificationRequest {
    pub fn new(who: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            who: who.into(),
            message: message.into(),
            force: false,
        }
    }

    #[must_use]
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}
