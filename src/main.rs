use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod animeworld;
mod cli;
mod config;
mod error;
mod payload;
mod server;

#[cfg(test)]
mod fixtures;

use animeworld::EpisodeRequest;
use cli::{Cli, Command};
use config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.logs_to_stderr());

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            match server::serve(config).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    tracing::error!(error = %err, "server failed");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Fetch {
            title,
            season,
            episode,
            option,
            timeout,
        } => {
            let request = EpisodeRequest::new(title, season, episode).with_language_option(option);
            cli::fetch(config, request, Duration::from_secs(timeout)).await
        }
        Command::Decode { payload } => cli::decode(&payload),
    }
}

fn init_tracing(to_stderr: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(filter);
    if to_stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
}
