//! Disaster AI Prediction Server
//!
//! Serves the sensor anomaly model and the social post classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  DISASTER AI PREDICTION API                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────────────────────────────────┐  │
//! │  │  Router   │──▶│ AppContext (read-only after boot)     │  │
//! │  │  (Axum)   │   │  - sensor model (isolation forest)    │  │
//! │  └───────────┘   │  - text model (tf-idf + logistic)     │  │
//! │                  │  - inference counters                 │  │
//! │                  └───────────────────────────────────────┘  │
//! │                                 ▲                           │
//! │                       model artifacts (JSON)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use disaster_core::logic::model::{InferenceStats, ModelStore};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "disaster_api=debug,disaster_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Disaster AI Prediction Server starting ({})...", config.environment);
    tracing::info!("Model dir: {}", config.model_dir.display());
    tracing::info!("Sensor model: {}", config.sensor_model_path.display());
    tracing::info!("Text model: {}", config.text_model_path.display());

    // Load models once; missing files leave that model unavailable
    let store = ModelStore::load(&config.sensor_model_path, &config.text_model_path)
        .context("failed to load model artifacts")?;

    if !store.has_sensor() || !store.has_text() {
        tracing::warn!(
            sensor = store.has_sensor(),
            text = store.has_text(),
            "Serving without every model; affected endpoints return 503"
        );
    }

    let state = AppState::new(config.clone(), store);
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Models and counters, built at boot and read-only afterwards
pub struct AppContext {
    pub models: ModelStore,
    pub sensor_stats: InferenceStats,
    pub text_stats: InferenceStats,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<AppContext>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config, models: ModelStore) -> Self {
        Self {
            ctx: Arc::new(AppContext {
                models,
                sensor_stats: InferenceStats::new(),
                text_stats: InferenceStats::new(),
            }),
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);
    cors = if state.config.is_production() {
        cors
    } else {
        cors.allow_origin(Any)
    };

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict/text", post(handlers::predict::text))
        .route("/predict/sensor", post(handlers::predict::sensor))
        .route("/explain/text", get(handlers::explain::text))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod test_support {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use serde_json::Value;

    use disaster_core::logic::features::SensorRecord;
    use disaster_core::logic::ingest::LabelledPost;
    use disaster_core::logic::model::{IsolationForestConfig, ModelStore, SensorModel, TextPipeline};
    use disaster_core::logic::training::{fit_sensor_model, fit_text_model};

    use super::{config::Config, AppState};

    fn test_config() -> Config {
        Config {
            port: 0,
            model_dir: PathBuf::from("models"),
            sensor_model_path: PathBuf::from("models/sensor_iforest.json"),
            text_model_path: PathBuf::from("models/disaster_model.json"),
            environment: "test".to_string(),
        }
    }

    pub fn sensor_model() -> SensorModel {
        let rows: Vec<SensorRecord> = (0..400)
            .map(|i| {
                let t = i as f64;
                SensorRecord::new()
                    .with("vibration", 10.0 + (t * 0.37).sin() * 2.0)
                    .with("flame", ((t * 0.11).cos() * 0.2).abs())
                    .with("water", 30.0 + (t * 0.23).sin() * 2.0)
            })
            .collect();
        fit_sensor_model(&rows, 10, IsolationForestConfig::default())
            .map(|r| r.model)
            .unwrap()
    }

    pub fn text_model() -> TextPipeline {
        let disaster = [
            "Flood water rising near the river bank, evacuate now",
            "Earthquake shook the city, buildings collapsed",
            "Wildfire spreading fast, smoke everywhere, need help",
            "Flash flood warning issued, roads under water",
            "Fire crews battling huge blaze near homes",
            "Earthquake aftershock felt downtown, people trapped",
            "River flood destroyed the bridge, rescue teams deployed",
            "Storm surge flooding coastal homes, evacuation ordered",
        ];
        let calm = [
            "Beautiful sunny day at the park with friends",
            "Just had the best coffee of my life",
            "Watching a movie tonight, any recommendations?",
            "New album from my favourite band is out",
            "Lovely dinner with family this evening",
            "Going for a run along the beach this morning",
            "Reading a great book about history",
            "Weekend plans: gardening and baking bread",
        ];
        let posts: Vec<LabelledPost> = disaster
            .iter()
            .map(|t| LabelledPost { text: t.to_string(), label: Some(1) })
            .chain(calm.iter().map(|t| LabelledPost { text: t.to_string(), label: Some(0) }))
            .collect();
        fit_text_model(&posts, 42).map(|r| r.pipeline).unwrap()
    }

    pub fn state_with(sensor: Option<SensorModel>, text: Option<TextPipeline>) -> AppState {
        AppState::new(test_config(), ModelStore::from_models(sensor, text))
    }

    pub fn trained_state() -> AppState {
        state_with(Some(sensor_model()), Some(text_model()))
    }

    /// Calm window drawn from the same wobble the sensor model was fitted on
    pub fn calm_window() -> Value {
        let rows: Vec<Value> = (200..210)
            .map(|i| {
                let t = i as f64;
                serde_json::json!({
                    "vibration": 10.0 + (t * 0.37).sin() * 2.0,
                    "flame": ((t * 0.11).cos() * 0.2).abs(),
                    "water": 30.0 + (t * 0.23).sin() * 2.0,
                })
            })
            .collect();
        Value::Array(rows)
    }

    pub fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{body_json, request, state_with, trained_state};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_models() {
        let app = super::create_router(trained_state());
        let response = app.oneshot(request("GET", "/health", "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["models"]["sensor"]["loaded"], true);
        assert_eq!(json["models"]["text"]["inference_count"], 0);
    }

    #[tokio::test]
    async fn test_health_degraded_without_models() {
        let app = super::create_router(state_with(None, None));
        let json = body_json(app.oneshot(request("GET", "/health", "")).await.unwrap()).await;

        assert_eq!(json["status"], "degraded");
        assert_eq!(json["models"]["text"]["loaded"], false);
    }
}
