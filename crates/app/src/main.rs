//! Courier command-line client.
//!
//! Imports Postman and Insomnia exports, resolves template functions,
//! renders stored responses and sends saved requests.

mod commands;
mod config;
mod context;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CourierConfig;
use crate::context::AppContext;

#[derive(Parser, Debug)]
#[command(name = "courier", version)]
#[command(about = "API client core: import collections, resolve templates, inspect responses")]
struct Cli {
    /// Configuration file read after the default one
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a Postman, Insomnia or exported file into a collection
    Import {
        /// Export file to read
        file: PathBuf,
        /// Format of the file: postMan, insomnia, file or text
        #[arg(long, default_value = "postMan")]
        category: String,
        /// Target collection id
        #[arg(long)]
        collection: String,
    },
    /// Resolve template functions such as {{md5(x)}} in a text
    Resolve {
        /// Collection whose variables are visible
        #[arg(long)]
        collection: String,
        /// Answers for openFile dialogs, in order
        #[arg(long = "pick", value_name = "PATH")]
        picks: Vec<String>,
        /// Resolve relative file paths against this directory
        #[arg(long, value_name = "DIR")]
        base_dir: Option<PathBuf>,
        /// Text to resolve
        text: String,
    },
    /// Classify and print a stored response record
    Inspect {
        /// JSON file holding the response
        file: PathBuf,
    },
    /// List or clear the cached responses of a request
    Cache {
        /// Request (setting) id
        request_id: String,
        /// Remove the cached responses instead of listing them
        #[arg(long)]
        clear: bool,
    },
    /// Send a saved request through the native backend
    Send {
        /// Request (setting) id
        setting_id: String,
        /// Answers for openFile dialogs, in order
        #[arg(long = "pick", value_name = "PATH")]
        picks: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CourierConfig::load(cli.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log.level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("courier v{}", env!("CARGO_PKG_VERSION"));
    let ctx = AppContext::new(&config)?;

    let output = match cli.command {
        Command::Import {
            file,
            category,
            collection,
        } => commands::import(&ctx, &file, &category, &collection).await?,
        Command::Resolve {
            collection,
            picks,
            base_dir,
            text,
        } => commands::resolve(&ctx, &collection, &text, &picks, base_dir.as_deref()).await?,
        Command::Inspect { file } => commands::inspect(&file).await?,
        Command::Cache { request_id, clear } => commands::cache(&ctx, &request_id, clear).await?,
        Command::Send { setting_id, picks } => commands::send(&ctx, &setting_id, &picks).await?,
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
