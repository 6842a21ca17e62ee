mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{hotlist::HotlistSubcommand, warstack::WarstackSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "door",
    about = "Door flow - hotlist, door wars, warstacks, and hits",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (environment variables override it)
    #[arg(long, global = true, env = "DOOR_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the flow document
    Flow,

    /// Manage the hotlist
    Hotlist {
        #[command(subcommand)]
        subcommand: HotlistSubcommand,
    },

    /// Run a door war: score the hotlist and pick the Domino Door
    Doorwar {
        /// Explicit choice (title or task uuid); omit to auto-select
        #[arg(long)]
        choice: Option<String>,

        /// Why this door
        #[arg(long)]
        reasoning: Option<String>,

        #[arg(long, default_value = "Business")]
        domain: String,
    },

    /// Drive warstacks
    Warstack {
        #[command(subcommand)]
        subcommand: WarstackSubcommand,
    },

    /// Start the JSON API server
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = door_core::config::DoorConfig::load(cli.config.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|config| match cli.command {
            Commands::Flow => cmd::flow::run(&config, cli.json),
            Commands::Hotlist { subcommand } => cmd::hotlist::run(&config, subcommand, cli.json),
            Commands::Doorwar {
                choice,
                reasoning,
                domain,
            } => cmd::doorwar::run(
                &config,
                choice.as_deref(),
                reasoning.as_deref(),
                &domain,
                cli.json,
            ),
            Commands::Warstack { subcommand } => cmd::warstack::run(&config, subcommand, cli.json),
            Commands::Serve { port } => cmd::serve::run(config, port),
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
