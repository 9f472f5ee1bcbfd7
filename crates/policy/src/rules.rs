use {hallmonitor_config::Configuration, tracing::debug};

use crate::event::{ChatEvent, DISCONNECT_MESSAGE, MONITOR_NAME, NotificationRequest};

/// Decide whether `event` is a notification candidate.
///
/// Returns `None` when no rule matches. Attachment state is not consulted
/// here; see [`crate::gate`].
pub fn evaluate(event: &ChatEvent, config: &Configuration) -> Option<NotificationRequest> {
    match event {
        ChatEvent::ClientDisconnect => config
            .auto_notifications_on_dc
            .then(|| NotificationRequest::new(MONITOR_NAME, DISCONNECT_MESSAGE).forced()),
        ChatEvent::PrivateMessage { sender, text } => {
            if !config.trigger_pms {
                debug!(%sender, "private message ignored, PM triggers are off");
                return None;
            }
            Some(NotificationRequest::new(format!("{sender}@"), text.as_str()))
        },
        ChatEvent::ChannelMessage {
            channel,
            sender,
            text,
        } => {
            if !config.monitors_channel(channel) {
                return None;
            }
            if !contains_trigger(text, &config.trigger_words) {
                debug!(%channel, %sender, "no trigger word in channel message");
                return None;
            }
            Some(NotificationRequest::new(
                format!("{channel} ({sender}@)"),
                text.as_str(),
            ))
        },
    }
}

/// Case-insensitive substring match of any trigger inside `text`.
fn contains_trigger(text: &str, triggers: &[String]) -> bool {
    let text = text.to_lowercase();
    triggers
        .iter()
        .any(|trigger| text.contains(&trigger.to_lowercase()))
}
