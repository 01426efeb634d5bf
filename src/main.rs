#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use battleship_client::{
    encode_push_json, init_logging, replay_script, spawn_stdin_reader, AutoPilot, ClientConfig,
    ClientNode, EventRouter, StopReason, TcpTransport, TerminalPresenter, DEFAULT_ADDR,
    DEFAULT_TIMEOUT_SECS, HELP,
};

#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use std::path::PathBuf;
#[cfg(feature = "std")]
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Connect to a game authority and play from the terminal.
    Connect {
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: String,
        #[arg(long, help = "Let the autopilot play instead of reading stdin")]
        auto: bool,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
    /// Feed a JSON-lines event script through the client and print its pushes.
    Replay {
        file: PathBuf,
        #[arg(long, help = "Let the autopilot answer the scripted events")]
        auto: bool,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
fn autopilot(seed: Option<u64>) -> AutoPilot {
    match seed {
        Some(s) => AutoPilot::seeded(s),
        None => AutoPilot::from_entropy(),
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Connect {
            addr,
            auto,
            seed,
            timeout_secs,
        } => {
            let mut config = ClientConfig::default().with_addr(&addr);
            config.timeout_secs = timeout_secs;
            if auto {
                config = config.with_autopilot(seed);
            }
            run_connect(config).await?;
        }
        Commands::Replay { file, auto, seed } => {
            let script = std::fs::read_to_string(&file)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
            let mut router = EventRouter::headless();
            let mut pilot = auto.then(|| autopilot(seed));
            let report = replay_script(&mut router, &script, pilot.as_mut());
            for push in &report.pushes {
                println!("{}", encode_push_json(push)?);
            }
            let summary = serde_json::json!({
                "phase": router.phase(),
                "events": report.events,
                "skipped": report.skipped,
                "pushes": report.pushes.len(),
            });
            println!("{}", serde_json::to_string(&summary)?);
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
async fn run_connect(config: ClientConfig) -> anyhow::Result<()> {
    println!("Connecting to {}...", config.addr);
    if let Some(s) = config.seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
    }
    let transport = TcpTransport::from_config(&config).await?;
    println!("Connected successfully!");

    let router = EventRouter::new(TerminalPresenter::new());
    let mut node = ClientNode::new(router, Box::new(transport));
    if config.autopilot {
        node = node.with_autopilot(autopilot(config.seed));
    } else {
        println!("{}", HELP);
        let (tx, rx) = mpsc::channel(32);
        let _reader = spawn_stdin_reader(tx);
        node = node.with_intents(rx);
    }

    let reason = node
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Session ended with an error: {}", e))?;
    match reason {
        StopReason::Resolved => println!("Game finished."),
        StopReason::IntentsClosed => println!("Bye."),
    }
    Ok(())
}
