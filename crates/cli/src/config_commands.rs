use std::{path::Path, sync::Arc, time::Duration};

use {
    anyhow::Result,
    hallmonitor_config::JsonFileStore,
    hallmonitor_monitor::HallMonitor,
    hallmonitor_sns::SnsPublisher,
};

/// Run one operator command against the store at `path` and print the reply.
pub fn handle_config(path: &Path, args: &[String], timeout: Duration) -> Result<()> {
    for line in reply(path, args, timeout)? {
        println!("{line}");
    }
    Ok(())
}

fn reply(path: &Path, args: &[String], timeout: Duration) -> Result<Vec<String>> {
    let store = Arc::new(JsonFileStore::open(path)?);
    let monitor = HallMonitor::new(store, SnsPublisher::new(timeout)?)?;
    Ok(monitor.handle_command(&args.join(" ")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, hallmonitor_config::ConfigStore};

    fn run(path: &Path, args: &[&str]) -> Vec<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        reply(path, &args, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn set_then_get_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        assert_eq!(run(&path, &["monitor_channels", "#Ops,", "#dev"]), vec![
            r##"monitor_channels has been set to: ["#ops","#dev"]"##
        ]);
        assert_eq!(run(&path, &["monitor_channels"]), vec![
            r##"monitor_channels: ["#ops","#dev"]"##
        ]);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("monitor_channels").unwrap().as_deref(),
            Some(r##"["#ops","#dev"]"##)
        );
    }

    #[test]
    fn no_args_prints_help() {
        let dir = tempfile::tempdir().unwrap();
        let lines = run(&dir.path().join("store.json"), &[]);
        assert!(lines[0].starts_with("Usage:"));
        assert!(lines.iter().any(|l| l.starts_with("- trigger_pms")));
    }

    #[test]
    fn unknown_key_prints_help() {
        let dir = tempfile::tempdir().unwrap();
        let lines = run(&dir.path().join("store.json"), &["volume", "11"]);
        assert_eq!(lines[0], "Unknown command option \"volume\".");
        assert!(lines.len() > 2);
    }
}
