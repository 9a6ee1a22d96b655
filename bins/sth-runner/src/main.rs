use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sth_remote::LocalAccount;
use sth_supervisor::{ProcessSpec, StaticBootstrap, StreamsSupervisor, SupervisorConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Drive a streams test process on the local host.
///
/// Useful for exercising the supervisor outside a full cluster: the local
/// machine stands in for the remote node.
#[derive(Parser, Debug)]
#[command(name = "sth-runner")]
#[command(about = "Local driver for the STH supervisor", long_about = None)]
struct Args {
    /// Launcher script (kafka-run-class.sh equivalent)
    #[arg(long)]
    launcher: String,

    /// Persistent root directory
    #[arg(long, default_value = "/mnt/streams")]
    root: PathBuf,

    /// Bootstrap servers of the cluster under test
    #[arg(long, default_value = "localhost:9092")]
    bootstrap: String,

    /// JSON file with a process spec ({"class_name": ..., "args": [...]});
    /// defaults to the smoke-test driver
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the process and wait for the startup marker
    Start,
    /// Cleanly stop the process
    Stop,
    /// Kill the process without waiting
    Abort,
    /// Stop, then start again
    Restart,
    /// Block until the process exits on its own
    Wait,
    /// Reset the node to a pristine state
    Clean,
    /// Print the currently recorded pids
    Pids,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logging(args.debug);

    let spec = match &args.spec {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read spec file {}", path.display()))?;
            serde_json::from_str::<ProcessSpec>(&contents)
                .with_context(|| format!("failed to parse spec file {}", path.display()))?
        }
        None => ProcessSpec::smoke_test_driver(),
    };
    info!(class = %spec.class_name, args = ?spec.args, "using process spec");

    let config = SupervisorConfig::new(args.launcher.clone()).with_root(&args.root);
    let node = Arc::new(LocalAccount::new("local"));
    let supervisor = StreamsSupervisor::new(
        config,
        spec,
        Arc::new(StaticBootstrap(args.bootstrap.clone())),
        vec![node.clone()],
    );

    match args.command {
        Command::Start => supervisor.start_node(node.as_ref()).await?,
        Command::Stop => supervisor.stop_node(node.as_ref(), true).await?,
        Command::Abort => supervisor.stop_node(node.as_ref(), false).await?,
        Command::Restart => supervisor.restart_node(node.as_ref()).await?,
        Command::Wait => {
            supervisor
                .wait_all(sth_supervisor::config::DEFAULT_WAIT_TIMEOUT)
                .await?
        }
        Command::Clean => supervisor.clean_node(node.as_ref()).await?,
        Command::Pids => {
            for pid in supervisor.pids(node.as_ref()).await {
                println!("{}", pid);
            }
        }
    }
    Ok(())
}

fn initialize_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}
