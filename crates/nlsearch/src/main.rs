// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! nlsearch - natural-language search for Sourcegraph.
//!
//! This is the binary entry point: the HTTP gateway (`serve`), one-shot
//! translation (`query`) and configuration checks (`check-config`).

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod query;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nlsearch_config::NlsearchConfig;
use nlsearch_core::NlsearchError;

/// nlsearch - natural-language search for Sourcegraph.
#[derive(Parser, Debug)]
#[command(name = "nlsearch", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway and frontend.
    Serve,
    /// Translate a natural-language request and print the search query.
    Query {
        /// What to search for, in plain words.
        text: String,
        /// Print the answer and its sources as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration and exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => nlsearch_config::load_and_validate_path(path),
        None => nlsearch_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            nlsearch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("nlsearch: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Query { text, json }) => match query::run_query(&config, &text, json).await {
            Ok(output) => println!("{output}"),
            Err(e) => {
                match &e.error {
                    NlsearchError::InvalidInput(message) => eprintln!("nlsearch: {message}"),
                    _ => eprintln!("nlsearch: {e}"),
                }
                std::process::exit(1);
            }
        },
        Some(Commands::CheckConfig) => print_config_summary(&config),
        None => {
            println!("nlsearch: use --help for available commands");
        }
    }
}

fn print_config_summary(config: &NlsearchConfig) {
    println!("nlsearch: configuration OK");
    println!("  deepsearch.base_url = {}", config.deepsearch.base_url);
    println!("  deepsearch.client_identifier = {}", config.deepsearch.client_identifier);
    println!("  server = {}:{}", config.server.host, config.server.port);
    println!("  server.static_dir = {}", config.server.static_dir);
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so `nlsearch query` output stays pipeable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nlsearch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
