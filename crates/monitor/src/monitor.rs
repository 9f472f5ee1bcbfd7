use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicUsize, Ordering},
};

use {
    hallmonitor_config::{
        self as config, Command, ConfigKey, ConfigStore, ConfigValue, Configuration,
        display_value, help_lines,
    },
    hallmonitor_policy::{ChatEvent, NotificationRequest, Suppressed, evaluate, gate},
    hallmonitor_sns::{SnsPublisher, SnsTarget},
    tracing::{debug, info, warn},
};

use crate::sink::OperatorSink;

/// What happened to one inbound event. Informational only: delivery failures
/// are reported here, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No rule matched.
    Ignored,
    /// A rule matched but gating dropped it.
    Suppressed(Suppressed),
    /// Published.
    Delivered,
    /// Publishing failed; the notification is gone.
    Failed,
}

/// Owns the working configuration, its store, and the publisher.
///
/// Events are expected one at a time. Configuration reads and writes go
/// through a single mutex that is never held across the network call.
pub struct HallMonitor {
    store: Arc<dyn ConfigStore>,
    config: Mutex<Configuration>,
    publisher: SnsPublisher,
    attached_clients: AtomicUsize,
    operator: Option<Arc<dyn OperatorSink>>,
}

impl HallMonitor {
    /// Load configuration from `store` (filling defaults) and build a monitor.
    pub fn new(store: Arc<dyn ConfigStore>, publisher: SnsPublisher) -> config::Result<Self> {
        let loaded = config::load(store.as_ref())?;
        Ok(Self {
            store,
            config: Mutex::new(loaded),
            publisher,
            attached_clients: AtomicUsize::new(0),
            operator: None,
        })
    }

    /// Route delivery diagnostics to `sink`.
    #[must_use]
    pub fn with_operator(mut self, sink: Arc<dyn OperatorSink>) -> Self {
        self.operator = Some(sink);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Configuration> {
        self.config.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the working configuration.
    pub fn config(&self) -> Configuration {
        self.lock().clone()
    }

    pub fn client_attached(&self) {
        let clients = self.attached_clients.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(clients, "client attached");
    }

    pub fn client_detached(&self) {
        let previous = self
            .attached_clients
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_sub(1))
            })
            .unwrap_or_default();
        debug!(clients = previous.saturating_sub(1), "client detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached_clients.load(Ordering::SeqCst) > 0
    }

    /// Replace `key` in the store and the working copy. A value of the wrong
    /// kind is rejected before either is touched.
    pub fn set(&self, key: ConfigKey, value: ConfigValue) -> config::Result<()> {
        let mut cfg = self.lock();
        let mut next = cfg.clone();
        next.apply(key, value.clone())?;
        config::persist(self.store.as_ref(), key, &value)?;
        *cfg = next;
        info!(%key, "config updated");
        Ok(())
    }

    /// Run one operator command and return the reply lines.
    pub fn handle_command(&self, line: &str) -> Vec<String> {
        match config::parse_command(line) {
            Ok(Command::Help { unknown }) => {
                let mut lines = Vec::new();
                if let Some(key) = unknown {
                    lines.push(format!("Unknown command option \"{key}\"."));
                }
                lines.extend(help_lines(&self.config()));
                lines
            },
            Ok(Command::Get(key)) => {
                vec![format!("{key}: {}", display_value(&self.config(), key))]
            },
            Ok(Command::Set(key, value)) => match self.set(key, value) {
                Ok(()) => vec![format!(
                    "{key} has been set to: {}",
                    display_value(&self.config(), key)
                )],
                Err(e) => {
                    warn!(%key, error = %e, "failed to update config");
                    vec![format!("Failed to set {key}: {e}")]
                },
            },
            Err(e) => vec![e.to_string()],
        }
    }

    /// Match, gate, and (maybe) publish one chat event.
    pub async fn handle_event(&self, event: ChatEvent) -> Outcome {
        if event == ChatEvent::ClientDisconnect {
            self.client_detached();
        }
        let attached = self.is_attached();
        let config = self.config();

        let Some(request) = evaluate(&event, &config) else {
            return Outcome::Ignored;
        };
        if let Err(reason) = gate(&request, attached, &config) {
            debug!(who = %request.who, attached, %reason, "notification suppressed");
            return Outcome::Suppressed(reason);
        }
        self.dispatch(&request, &config).await
    }

    async fn dispatch(&self, request: &NotificationRequest, config: &Configuration) -> Outcome {
        let target = SnsTarget::from(config);
        match self
            .publisher
            .publish(&target, &request.who, &request.message)
            .await
        {
            Ok(()) => Outcome::Delivered,
            Err(e) => {
                // Best effort: the error stops here.
                warn!(endpoint = %target.endpoint, error = %e, "failed to publish notification");
                if let Some(ref operator) = self.operator {
                    operator
                        .put(&format!("[DEBUG] Endpoint: {}", target.endpoint))
                        .await;
                    operator.put(&format!("[DEBUG] Exception: {e}")).await;
                }
                Outcome::Failed
            },
        }
    }
}
