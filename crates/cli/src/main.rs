mod config_commands;
mod run_command;

use std::{path::PathBuf, time::Duration};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "hallmonitor",
    about = "HallMonitor: IRC mentions to SNS while you are away"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Path of the JSON config store (defaults to the user data dir).
    #[arg(long, global = true, env = "HALLMONITOR_STORE")]
    store: Option<PathBuf>,

    /// Timeout for a single publish request, in seconds.
    #[arg(long, global = true, default_value_t = hallmonitor_sns::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat events as JSON lines from stdin (default).
    Run,
    /// Show help, get, or set a config key.
    Config {
        /// `key [value...]`; empty for help.
        args: Vec<String>,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries operator replies.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(hallmonitor_config::default_store_path);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %store_path.display(),
        "hallmonitor starting"
    );

    let timeout = Duration::from_secs(cli.timeout_secs);
    match cli.command {
        None | Some(Commands::Run) => run_command::run(&store_path, timeout).await,
        Some(Commands::Config { args }) => {
            config_commands::handle_config(&store_path, &args, timeout)
        },
    }
}
