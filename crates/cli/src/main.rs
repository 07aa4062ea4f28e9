//! Agen RP CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Initialize config
//! - `chat`   : Interactive or single-message chat over reference documents
//! - `docs`   : Upload to or list the document backend
//! - `config` : Show, locate, or set the cached API key
//! - `doctor` : Diagnose configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "agenrp",
    about = "Agen RP Maya — Semakan Rancangan Pemajuan Pintar",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Ask questions about development-plan documents
    Chat {
        /// Reference document to load (.txt, .md, .pdf); repeatable
        #[arg(short, long = "document")]
        documents: Vec<PathBuf>,

        /// Also load every document stored in the backend
        #[arg(long)]
        remote: bool,

        /// Image to attach to the single message
        #[arg(long)]
        image: Option<PathBuf>,

        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Gemini API key for this run
        #[arg(long, env = "AGENRP_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Manage documents in the storage backend
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[derive(Subcommand)]
enum DocsAction {
    /// Upload a document and record it in the metadata table
    Upload { file: PathBuf },
    /// List stored documents
    List,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets redacted)
    Show,
    /// Print the config file path
    Path,
    /// Cache an API key in the config file
    SetKey { key: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat {
            documents,
            remote,
            image,
            message,
            api_key,
        } => {
            commands::chat::run(commands::chat::ChatArgs {
                documents,
                remote,
                image,
                message,
                api_key,
            })
            .await?
        }
        Commands::Docs { action } => match action {
            DocsAction::Upload { file } => commands::docs::upload(&file).await?,
            DocsAction::List => commands::docs::list().await?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::SetKey { key } => commands::config_cmd::set_key(&key).await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
