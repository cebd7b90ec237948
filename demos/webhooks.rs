//! Example webhook management.
//!
//! Lists registered webhooks and, when `WEBHOOK_URL` is set, registers a new
//! one for payment events.
//!
//! Run with:
//! ```bash
//! cargo run --example webhooks
//! ```
//!
//! Environment variables (a `.env` file is read if present):
//! - PAYMONGO_SECRET_KEY: Your secret key (sk_test_...)
//! - WEBHOOK_URL: Public URL to receive events (optional)

use paymongo_rs::{PayMongoClient, PayMongoConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = PayMongoConfig::from_env()?;
    config.validate()?;
    let client = PayMongoClient::from_config(&config)?;

    let hooks = client.list_webhooks().await?;
    println!("Registered webhooks:");
    for hook in hooks.as_array().into_iter().flatten() {
        println!(
            "   {} {} [{}]",
            hook["id"].as_str().unwrap_or("?"),
            hook["attributes"]["url"].as_str().unwrap_or("?"),
            hook["attributes"]["status"].as_str().unwrap_or("?"),
        );
    }

    if let Ok(url) = std::env::var("WEBHOOK_URL") {
        let created = client
            .create_webhook(&url, &["payment.paid", "payment.failed", "qrph.expired"])
            .await?;
        println!("\nCreated webhook {}", created["id"]);
        println!(
            "Store its secret as PAYMONGO_WEBHOOK_SECRET: {}",
            created["attributes"]["secret_key"]
        );
    }

    Ok(())
}
