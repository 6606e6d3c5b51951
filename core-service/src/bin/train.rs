//! Disaster AI - Offline training CLI
//!
//! ```text
//! train sensor --csv demo_data/sensor_demo.csv
//! train text --csv demo_data/tweets_demo.csv
//! train explain -n 10
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use disaster_core::logic::config::CoreConfig;
use disaster_core::logic::model::artifact::load_artifact;
use disaster_core::logic::model::{IsolationForestConfig, TextPipeline};
use disaster_core::logic::training::{self, DEFAULT_SEED};
use disaster_core::constants;

#[derive(Debug, Parser)]
#[command(name = "train", version, about = "Train and inspect Disaster AI models")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fit the sensor isolation forest
    Sensor {
        #[arg(long, default_value = constants::DEMO_SENSOR_CSV)]
        csv: PathBuf,
        /// Artifact path (default: $MODEL_DIR/sensor_iforest.json)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = constants::DEFAULT_WINDOW_SIZE)]
        window_size: usize,
        #[arg(long, default_value_t = 0.02)]
        contamination: f64,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Fit the TF-IDF + logistic regression text model
    Text {
        #[arg(long, default_value = constants::DEMO_POSTS_CSV)]
        csv: PathBuf,
        /// Artifact path (default: $MODEL_DIR/disaster_model.json)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Print the most indicative terms of the text model as JSON
    Explain {
        #[arg(short, default_value_t = 10)]
        n: usize,
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = CoreConfig::load();

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &CoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Sensor { csv, out, window_size, contamination, seed } => {
            let out = out.unwrap_or_else(|| config.sensor_model_path());
            let forest_config = IsolationForestConfig {
                contamination,
                seed,
                ..IsolationForestConfig::default()
            };
            let report = training::train_sensor_model(&csv, &out, window_size, forest_config)?;
            println!(
                "Saved sensor model: {} ({} windows, {} flagged in training)",
                out.display(),
                report.windows,
                report.flagged
            );
        }
        Command::Text { csv, out, seed } => {
            let out = out.unwrap_or_else(|| config.text_model_path());
            let report = training::train_text_model(&csv, &out, seed)?;
            println!("Classification report:");
            println!("{}", report.report);
            println!("Confusion matrix:");
            println!("{}", report.confusion);
            println!("Saved model to {}", out.display());
        }
        Command::Explain { n, model } => {
            let path = model.unwrap_or_else(|| config.text_model_path());
            let pipeline: TextPipeline = load_artifact(&path)?;
            pipeline.validate()?;
            println!("{}", serde_json::to_string_pretty(&pipeline.top_features(n))?);
        }
    }
    Ok(())
}
