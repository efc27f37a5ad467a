//! Mind map CLI - view the shared mind map or host the document store.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{serve, view};

/// Shared mind map viewer.
///
/// Run `mindmap` or `mindmap view` to open the viewer.
#[derive(Parser, Debug)]
#[command(
    name = "mindmap",
    author,
    version,
    about = "Collaborative mind map viewer and document host",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the mind map viewer (default command).
    View(view::ViewArgs),

    /// Host shared documents over HTTP and WebSocket.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = 4300)]
        port: u16,

        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::View(view::ViewArgs::default()));

    match command {
        Commands::View(args) => view::execute(args)?,
        Commands::Serve { port, host } => serve::execute(&host, port).await?,
    }

    Ok(())
}
