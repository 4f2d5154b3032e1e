mod batch;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod output;
mod password;
mod resource;
mod row;
mod validate;

use clap::Parser;

#[tokio::main]
async fn main() {
    // Must run before parsing: the MAILCOW_* env fallbacks on the flags read
    // whatever the selected .env file provides.
    config::load_env_file();

    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);
    if let Some(name) = &cli.select_env {
        tracing::debug!("environment loaded from .env.{name}");
    }

    match commands::dispatch(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
