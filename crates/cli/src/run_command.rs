//! Event loop for `hallmonitor run`: chat events arrive as JSON lines on
//! stdin, operator replies leave on stdout.

use std::{path::Path, sync::Arc, time::Duration};

use {
    anyhow::Result,
    async_trait::async_trait,
    hallmonitor_config::JsonFileStore,
    hallmonitor_monitor::{HallMonitor, OperatorSink},
    hallmonitor_policy::ChatEvent,
    hallmonitor_sns::SnsPublisher,
    serde::Deserialize,
    tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    tracing::{debug, info, warn},
};

/// One line of input, tagged by `kind`.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum InboundLine {
    PrivateMessage {
        sender: String,
        text: String,
    },
    ChannelMessage {
        channel: String,
        sender: String,
        text: String,
    },
    ClientAttached,
    ClientDisconnect,
    Command {
        line: String,
    },
}

struct StdoutSink;

#[async_trait]
impl OperatorSink for StdoutSink {
    async fn put(&self, line: &str) {
        println!("{line}");
    }
}

pub async fn run(path: &Path, timeout: Duration) -> Result<()> {
    let store = Arc::new(JsonFileStore::open(path)?);
    let sink: Arc<dyn OperatorSink> = Arc::new(StdoutSink);
    let monitor =
        HallMonitor::new(store, SnsPublisher::new(timeout)?)?.with_operator(Arc::clone(&sink));

    let handled = process(&monitor, BufReader::new(tokio::io::stdin()), sink.as_ref()).await?;
    info!(lines = handled, "input closed, shutting down");
    Ok(())
}

/// Feed every line of `reader` to `monitor`, in order. Returns the number of
/// lines handled; blank and malformed lines are skipped. Bytes that are not
/// UTF-8 are replaced, so one bad line cannot stop the loop.
async fn process<R>(monitor: &HallMonitor, reader: R, sink: &dyn OperatorSink) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.split(b'\n');
    let mut handled = 0;
    while let Some(bytes) = lines.next_segment().await? {
        let raw = String::from_utf8_lossy(&bytes);
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let inbound: InboundLine = match serde_json::from_str(raw) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!(error = %e, "skipping malformed input line");
                continue;
            },
        };
        handled += 1;

        let event = match inbound {
            InboundLine::ClientAttached => {
                monitor.client_attached();
                continue;
            },
            InboundLine::Command { line } => {
                for reply in monitor.handle_command(&line) {
                    sink.put(&reply).await;
                }
                continue;
            },
            InboundLine::PrivateMessage { sender, text } => {
                ChatEvent::PrivateMessage { sender, text }
            },
            InboundLine::ChannelMessage {
                channel,
                sender,
                text,
            } => ChatEvent::ChannelMessage {
                channel,
                sender,
                text,
            },
            InboundLine::ClientDisconnect => ChatEvent::ClientDisconnect,
        };
        let outcome = monitor.handle_event(event).await;
        debug!(?outcome, "event handled");
    }
    Ok(handled)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        hallmonitor_config::MemoryStore,
        rstest::rstest,
        std::sync::Mutex,
    };

    #[derive(Default)]
    struct RecordingSink {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl OperatorSink for RecordingSink {
        async fn put(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    fn monitor() -> HallMonitor {
        let publisher = SnsPublisher::new(Duration::from_secs(1)).unwrap();
        HallMonitor::new(Arc::new(MemoryStore::new()), publisher).unwrap()
    }

    #[rstest]
    #[case(
        r#"{"kind":"private_message","sender":"bob","text":"hi"}"#,
        InboundLine::PrivateMessage { sender: "bob".into(), text: "hi".into() }
    )]
    #[case(
        r##"{"kind":"channel_message","channel":"#ops","sender":"alice","text":"down"}"##,
        InboundLine::ChannelMessage {
            channel: "#ops".into(),
            sender: "alice".into(),
            text: "down".into(),
        }
    )]
    #[case(r#"{"kind":"client_attached"}"#, InboundLine::ClientAttached)]
    #[case(r#"{"kind":"client_disconnect"}"#, InboundLine::ClientDisconnect)]
    #[case(
        r#"{"kind":"command","line":"trigger_pms off"}"#,
        InboundLine::Command { line: "trigger_pms off".into() }
    )]
    fn parses_inbound_lines(#[case] raw: &str, #[case] expected: InboundLine) {
        assert_eq!(serde_json::from_str::<InboundLine>(raw).unwrap(), expected);
    }

    #[tokio::test]
    async fn commands_reply_through_sink() {
        let monitor = monitor();
        let sink = RecordingSink::default();
        let input = concat!(
            r#"{"kind":"command","line":"trigger_pms off"}"#,
            "\n",
            r#"{"kind":"command","line":"trigger_pms"}"#,
            "\n",
        );

        let handled = process(&monitor, input.as_bytes(), &sink).await.unwrap();
        assert_eq!(handled, 2);
        assert_eq!(*sink.lines.lock().unwrap(), vec![
            "trigger_pms has been set to: false",
            "trigger_pms: false",
        ]);
        assert!(!monitor.config().trigger_pms);
    }

    #[tokio::test]
    async fn malformed_and_blank_lines_are_skipped() {
        let monitor = monitor();
        let sink = RecordingSink::default();
        let input = concat!(
            "not json\n",
            "\n",
            r#"{"kind":"telepathy"}"#,
            "\n",
            r#"{"kind":"client_attached"}"#,
            "\n",
        );

        let handled = process(&monitor, input.as_bytes(), &sink).await.unwrap();
        assert_eq!(handled, 1);
        assert!(monitor.is_attached());
        assert!(sink.lines.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_stop_the_loop() {
        let monitor = monitor();
        let sink = RecordingSink::default();
        let mut input = br#"{"kind":"private_message","sender":"bob","text":"caf"#.to_vec();
        input.extend_from_slice(b"\xe9\"}\n");
        input.extend_from_slice(br#"{"kind":"client_attached"}"#);
        input.push(b'\n');

        let handled = process(&monitor, input.as_slice(), &sink).await.unwrap();
        assert_eq!(handled, 2);
        assert!(monitor.is_attached());
    }

    #[tokio::test]
    async fn disconnect_line_detaches() {
        let monitor = monitor();
        let sink = RecordingSink::default();
        let input = concat!(
            r#"{"kind":"client_attached"}"#,
            "\n",
            r#"{"kind":"client_disconnect"}"#,
            "\n",
        );

        process(&monitor, input.as_bytes(), &sink).await.unwrap();
        assert!(!monitor.is_attached());
    }
}
