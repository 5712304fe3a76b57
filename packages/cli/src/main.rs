#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for civic risk summaries and outbreak
//! predictions.
//!
//! Every subcommand prints JSON to stdout. Settings are read from the
//! same environment variables as the API server and may be overridden
//! with flags. Run without a subcommand to pick one interactively.

mod interactive;

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use civic_risk_analytics::{aggregator, features};
use civic_risk_server::{ServerConfig, outbreak};
use civic_risk_store::memory::MemoryStore;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "civic_risk",
    about = "Civic risk aggregation and outbreak prediction"
)]
struct Cli {
    /// JSON record file (overrides `DATA_PATH`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Predictor program (overrides `PREDICTOR_COMMAND`)
    #[arg(long, global = true)]
    predictor: Option<String>,

    /// Predictor argument, repeatable (overrides `PREDICTOR_ARGS`)
    #[arg(long = "predictor-arg", global = true, allow_hyphen_values = true)]
    predictor_args: Vec<String>,

    /// Predictor timeout in seconds, `0` to wait indefinitely (overrides
    /// `PREDICTOR_TIMEOUT_SECS`)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    fn config(&self) -> ServerConfig {
        self.apply(ServerConfig::from_env())
    }

    fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(data) = &self.data {
            config.data_path.clone_from(data);
        }
        if let Some(predictor) = &self.predictor {
            config.predictor_command.clone_from(predictor);
        }
        if !self.predictor_args.is_empty() {
            config.predictor_args.clone_from(&self.predictor_args);
        }
        if let Some(secs) = self.timeout_secs {
            config.predictor_timeout = (secs > 0).then_some(Duration::from_secs(secs));
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Print the per-area risk summary
    Summary,
    /// Print the outbreak feature vector for an area
    Features {
        /// Area name
        #[arg(long)]
        area: String,
    },
    /// Predict outbreak risk for an area over the next seven days
    Predict {
        /// Area name
        #[arg(long)]
        area: String,
    },
    /// Start the API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let config = cli.config();

    let command = match cli.command {
        Some(command) => command,
        None => interactive::prompt()?,
    };

    run(command, config).await
}

async fn run(command: Commands, config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Summary => {
            let store = load_store(&config).await?;
            print_json(&aggregator::fetch_area_summary(&store).await?)?;
        }
        Commands::Features { area } => {
            let area = outbreak::validate_area(Some(area.as_str()))?;
            let store = load_store(&config).await?;
            print_json(&features::build_features(&store, area, Utc::now()).await?)?;
        }
        Commands::Predict { area } => {
            let area = outbreak::validate_area(Some(area.as_str()))?;
            let store = load_store(&config).await?;
            let predictor = config.predictor();
            print_json(&outbreak::assess(&store, &predictor, area, Utc::now()).await?)?;
        }
        Commands::Serve => {
            // actix-web brings its own system runtime; it can't be nested
            // inside this one.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(civic_risk_server::serve(config))
            })
            .await??;
        }
    }

    Ok(())
}

async fn load_store(config: &ServerConfig) -> Result<MemoryStore, Box<dyn std::error::Error>> {
    Ok(MemoryStore::load(&config.data_path).await?)
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["civic_risk", "predict", "--area", "Pimpri"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Predict {
                area: "Pimpri".to_string()
            })
        );

        let cli = Cli::try_parse_from(["civic_risk"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn area_is_required_for_area_commands() {
        assert!(Cli::try_parse_from(["civic_risk", "features"]).is_err());
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::try_parse_from([
            "civic_risk",
            "summary",
            "--data",
            "fixtures/records.json",
            "--predictor",
            "sh",
            "--predictor-arg",
            "-c",
            "--predictor-arg",
            "cat",
            "--timeout-secs",
            "0",
        ])
        .unwrap();

        let config = cli.apply(ServerConfig::default());
        assert_eq!(config.data_path, PathBuf::from("fixtures/records.json"));
        assert_eq!(config.predictor_command, "sh");
        assert_eq!(config.predictor_args, vec!["-c", "cat"]);
        assert_eq!(config.predictor_timeout, None);
    }

    #[test]
    fn absent_flags_keep_environment() {
        let cli = Cli::try_parse_from(["civic_risk", "summary"]).unwrap();
        assert_eq!(cli.apply(ServerConfig::default()), ServerConfig::default());
    }
}
