//! rosterdeck - generate a team-directory deck from a Slack channel.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rosterdeck_cli::pipeline::{self, PipelineOptions, PipelineOutcome};
use rosterdeck_cli::preflight;
use rosterdeck_slack::{SlackClient, SlackConfig};

/// rosterdeck CLI
#[derive(Parser)]
#[command(name = "rosterdeck")]
#[command(about = "Generate a team directory PowerPoint from a Slack channel")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the channel roster and generate the deck (the default)
    Run {
        /// Output path of the generated deck
        #[arg(long, default_value = pipeline::DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Directory for downloaded profile images
        #[arg(long, default_value = pipeline::DEFAULT_IMAGE_DIR)]
        image_dir: PathBuf,
    },
    /// Check configuration, token validity, and channel access
    Preflight,
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_level);

    // Pick up a .env file if one is present.
    let _ = dotenvy::dotenv();

    let config = match SlackConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let client = match SlackClient::new(&config) {
        Ok(client) => client,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let command = args.command.unwrap_or(Command::Run {
        output: PathBuf::from(pipeline::DEFAULT_OUTPUT_PATH),
        image_dir: PathBuf::from(pipeline::DEFAULT_IMAGE_DIR),
    });

    match command {
        Command::Run { output, image_dir } => {
            let options = PipelineOptions {
                output_path: output,
                image_dir,
            };
            match pipeline::run(&config, &client, &options).await {
                Ok(PipelineOutcome::Completed {
                    output_path,
                    slide_count,
                }) => {
                    info!(
                        "Success! Deck created at {} ({} slides)",
                        output_path.display(),
                        slide_count
                    );
                    ExitCode::SUCCESS
                }
                Ok(PipelineOutcome::NoMembers) => ExitCode::SUCCESS,
                Err(err) => {
                    error!("{:#}", err);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Preflight => {
            if preflight::run(&config, &client).await {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
