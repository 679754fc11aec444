use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use crate::animeworld::{AnimeWorld, DEFAULT_LANGUAGE_OPTION, EpisodeRequest, Settings};
use crate::config::Config;
use crate::error::ExtractError;
use crate::payload;

#[derive(Parser)]
#[command(
    name = "animeworld-link",
    version,
    about = "Find playable AnimeWorld episode links"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the HTTP API and the watch page
    Serve {
        /// Address to listen on, overrides ANIMEWORLD_BIND
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the video link for one episode
    Fetch {
        /// Anime title, e.g. "naruto"
        title: String,
        season: u32,
        episode: u32,

        /// Language option (0=Hindi, 1=Tamil, 2=Malayalam, 3=English, 4=Japanese)
        #[arg(short, long, default_value_t = DEFAULT_LANGUAGE_OPTION)]
        option: usize,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
    },

    /// List the language links of a player `data` payload or player URL
    Decode { payload: String },
}

impl Cli {
    /// Lookup commands keep stdout for results only.
    pub fn logs_to_stderr(&self) -> bool {
        !matches!(self.command, Command::Serve { .. })
    }
}

pub async fn fetch(
    config: Config,
    request: EpisodeRequest,
    timeout: Duration,
) -> ExitCode {
    let animeworld = match AnimeWorld::new(Settings::cli(config.base_url, timeout)) {
        Ok(animeworld) => animeworld,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    match animeworld.video_url(&request).await {
        Some(url) => {
            eprintln!(
                "SUCCESS! Video URL found in {}ms:",
                start.elapsed().as_millis()
            );
            println!("{}", url);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("No video URL found for the specified episode");
            ExitCode::FAILURE
        }
    }
}

pub fn decode(input: &str) -> ExitCode {
    match decode_lines(input) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("ERROR: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn decode_lines(input: &str) -> Result<Vec<String>, ExtractError> {
    let input = input.trim();
    let options = if input.starts_with("http://") || input.starts_with("https://") {
        payload::options_from_player_url(input)?
    } else {
        payload::decode_options(input)?
    };
    Ok(options
        .iter()
        .enumerate()
        .map(|(index, option)| format!("{}\t{}\t{}", index, option.language, option.link))
        .collect())
}
