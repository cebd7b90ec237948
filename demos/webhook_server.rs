//! Example PayMongo webhook receiver using Axum.
//!
//! Verifies the `Paymongo-Signature` header of every notification before
//! trusting its body.
//!
//! Run with:
//! ```bash
//! cargo run --example webhook_server
//! ```
//!
//! Environment variables (a `.env` file is read if present):
//! - PAYMONGO_WEBHOOK_SECRET: Signing secret of the webhook (whsk_...)
//! - PAYMONGO_ENVIRONMENT: `production` or `sandbox` (default: sandbox)
//! - PORT: Server port (default: 3000)

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use paymongo_rs::{Environment, PayMongoConfig, PayMongoError, WebhookVerifier, SIGNATURE_HEADER};
use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

struct AppState {
    verifier: WebhookVerifier,
    webhook_secret: String,
    environment: Environment,
}

/// Receives PayMongo events.
async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::MissingSignature)?;

    let event = state
        .verifier
        .verify(&body, signature, &state.webhook_secret, state.environment)
        .map_err(AppError::Rejected)?;

    let event_type = event["data"]["attributes"]["type"]
        .as_str()
        .unwrap_or("unknown");
    tracing::info!(
        event_id = %event["data"]["id"],
        event_type,
        "Verified PayMongo webhook"
    );

    if event_type == "payment.paid" {
        let payment = &event["data"]["attributes"]["data"];
        tracing::info!(
            payment_id = %payment["id"],
            amount = %payment["attributes"]["amount"],
            "Payment received"
        );
    }

    Ok((StatusCode::OK, Json(json!({ "received": true }))).into_response())
}

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = PayMongoConfig::from_env()?;
    let webhook_secret = config
        .webhook_secret
        .as_ref()
        .map(|secret| secret.expose_secret().clone())
        .ok_or_else(|| anyhow::anyhow!("PAYMONGO_WEBHOOK_SECRET is not set"))?;
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    println!("Starting PayMongo webhook receiver");
    println!("   Environment: {}", config.environment);
    println!("   Port: {}", port);

    let state = Arc::new(AppState {
        verifier: WebhookVerifier::new(),
        webhook_secret,
        environment: config.environment,
    });

    let app = Router::new()
        .route("/webhooks/paymongo", post(webhook_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// Error handling
enum AppError {
    MissingSignature,
    Rejected(PayMongoError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingSignature => (
                StatusCode::BAD_REQUEST,
                format!("missing {} header", SIGNATURE_HEADER),
            ),
            AppError::Rejected(PayMongoError::InvalidSignature) => {
                tracing::warn!("Rejected webhook with invalid signature");
                (StatusCode::UNAUTHORIZED, "invalid signature".to_string())
            }
            AppError::Rejected(err) => {
                tracing::error!(error = %err, "Signed webhook could not be processed");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
