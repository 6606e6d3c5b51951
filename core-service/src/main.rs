//! Disaster AI - Orchestrator Entry Point
//!
//! Pulls recent sensor rows and posts, asks the prediction API for
//! verdicts, and fuses them into an alert decision.

use std::time::Duration;

use clap::Parser;

use disaster_core::constants;
use disaster_core::logic::config::CoreConfig;
use disaster_core::logic::fusion::FusionDecision;
use disaster_core::logic::ingest::DataSource;
use disaster_core::logic::orchestrator::{self, PredictClient};

#[derive(Debug, Parser)]
#[command(name = "orchestrator", version, about = "Fuse sensor and social verdicts into alerts")]
struct Cli {
    /// Run once on a built-in demo window and exit
    #[arg(long)]
    demo: bool,

    /// Run a single polling cycle and exit
    #[arg(long)]
    once: bool,

    /// Prediction API base URL (overrides API_URL)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = CoreConfig::load();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    log::info!("Starting {} orchestrator v{}...", constants::APP_NAME, constants::APP_VERSION);

    let client = match PredictClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create prediction client: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Prediction API: {}", client.base_url());

    if cli.demo {
        let (window, posts) = orchestrator::demo_input();
        match orchestrator::fuse_and_decide(&client, &window, &posts).await {
            Ok(decision) => report(&decision),
            Err(e) => {
                log::error!("Demo cycle failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let source = DataSource::from_config(&config);
    log::info!(
        "Data source: {} (window={}, posts={}, every {}s)",
        source.name(),
        config.window_size,
        config.fetch_limit,
        config.poll_interval_secs
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.poll_interval_secs.max(1)));
    loop {
        interval.tick().await;
        run_cycle(&client, &source, &config).await;
        if cli.once {
            break;
        }
    }
}

/// One fetch → predict → fuse cycle; failures are logged and the loop goes on
async fn run_cycle(client: &PredictClient, source: &DataSource, config: &CoreConfig) {
    let window = source.fetch_sensor_data(config.window_size).await;
    let posts = source.fetch_posts(config.fetch_limit).await;

    if window.is_empty() {
        log::info!("No sensor data this cycle; skipping");
        return;
    }

    match orchestrator::fuse_and_decide(client, &window, &posts).await {
        Ok(decision) => report(&decision),
        Err(e) => log::error!("Cycle failed: {}", e),
    }
}

fn report(decision: &FusionDecision) {
    let reasons: Vec<&str> = decision.reasons.iter().map(|r| r.as_str()).collect();
    if decision.alert {
        log::warn!(
            "ALERT reasons={:?} sensor_score={:.3} tweet_alerts={}",
            reasons,
            decision.sensor_score,
            decision.tweet_alert_count
        );
    } else {
        log::info!(
            "No alert: sensor_score={:.3} tweet_alerts={} avg_conf={:.3}",
            decision.sensor_score,
            decision.tweet_alert_count,
            decision.avg_tweet_confidence
        );
    }

    match serde_json::to_string(decision) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize decision: {}", e),
    }
}
