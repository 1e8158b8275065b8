//! Triage proxy server binary.
//!
//! ## Purpose
//! Boots the REST proxy in front of the external diagnosis engine: resolves
//! configuration from the environment, builds the engine client and the
//! triage policy, and serves the axum router until the process is stopped.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use engine_client::config::{DEFAULT_ENGINE_BASE_URL, DEFAULT_ENGINE_MODEL};
use engine_client::{EngineClient, EngineConfig};
use triage_core::policy_from_env_values;

/// Main entry point for the triage proxy
///
/// Starts the REST server on the configured address (default: 0.0.0.0:3001)
/// and proxies `/parse` and `/diagnosis` to the external diagnosis engine.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: Server address (default: "0.0.0.0:3001")
/// - `TRIAGE_CORS_ORIGIN`: Single origin allowed by CORS
///   (default: "http://localhost:5173")
/// - `ENGINE_BASE_URL`: Diagnosis engine base URL
///   (default: "https://api.infermedica.com/v3")
/// - `ENGINE_APP_ID` / `ENGINE_APP_KEY`: Engine credentials (required)
/// - `ENGINE_MODEL`: Engine inference model (default: "infermedica-en")
/// - `TRIAGE_SIGNIFICANT_THRESHOLD` / `TRIAGE_HIGH_THRESHOLD` /
///   `TRIAGE_MIN_EVIDENCE`: Triage policy overrides
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the engine credentials are missing or the policy values are invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("engine_client=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let cors_origin =
        std::env::var("TRIAGE_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".into());

    let engine_base_url =
        std::env::var("ENGINE_BASE_URL").unwrap_or_else(|_| DEFAULT_ENGINE_BASE_URL.into());
    let engine_app_id = std::env::var("ENGINE_APP_ID").context("ENGINE_APP_ID must be set")?;
    let engine_app_key = std::env::var("ENGINE_APP_KEY").context("ENGINE_APP_KEY must be set")?;
    let engine_model =
        std::env::var("ENGINE_MODEL").unwrap_or_else(|_| DEFAULT_ENGINE_MODEL.into());

    let policy = policy_from_env_values(
        std::env::var("TRIAGE_SIGNIFICANT_THRESHOLD").ok(),
        std::env::var("TRIAGE_HIGH_THRESHOLD").ok(),
        std::env::var("TRIAGE_MIN_EVIDENCE").ok(),
    )?;

    let engine = EngineClient::new(EngineConfig::new(
        engine_base_url,
        engine_app_id,
        engine_app_key,
        engine_model,
    )?)?;

    tracing::info!("-- Starting triage proxy REST API on {}", addr);
    tracing::info!(
        "-- Significant threshold {:.0}%, high threshold {:.0}%, minimum evidence {}",
        policy.significant_threshold * 100.0,
        policy.high_threshold * 100.0,
        policy.min_evidence
    );

    let app = api_rest::router(AppState::new(engine, policy), &cors_origin)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
