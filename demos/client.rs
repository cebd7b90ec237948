//! Example PayMongo client.
//!
//! Creates a QR Ph payment: a payment intent, a `qrph` payment method, and
//! the attach call that returns the QR code to show the customer.
//!
//! Run with:
//! ```bash
//! cargo run --example client
//! ```
//!
//! Environment variables (a `.env` file is read if present):
//! - PAYMONGO_SECRET_KEY: Your secret key (sk_test_...)
//! - PAYMONGO_BASE_URL: API base URL (optional)
//! - AMOUNT: Amount in PHP (default: 100.00)

use paymongo_rs::utils::to_centavos;
use paymongo_rs::{PayMongoClient, PayMongoConfig, PayMongoError};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = PayMongoConfig::from_env()?;
    let amount: f64 = std::env::var("AMOUNT")
        .unwrap_or_else(|_| "100.00".to_string())
        .parse()?;

    println!("PayMongo Example Client");
    println!("   API: {}", config.base_url);
    println!("   Mode: {}", if config.is_live_mode() { "live" } else { "test" });
    println!();

    let client = PayMongoClient::from_config(&config)?;

    println!("Creating payment intent for {} {:.2}...", config.currency, amount);
    let intent = client
        .create_payment_intent(&json!({
            "amount": to_centavos(amount)?,
            "currency": config.currency,
            "payment_method_allowed": ["qrph"],
            "description": "paymongo-rs example payment",
        }))
        .await?;
    let intent_id = intent["id"].as_str().unwrap_or_default();
    println!("   Intent: {} ({})", intent_id, intent["attributes"]["status"]);

    println!("Creating QR Ph payment method...");
    let method = client
        .create_payment_method(&json!({
            "type": "qrph",
            "billing": {"name": "Juan dela Cruz", "email": "juan@example.com"},
        }))
        .await?;
    let method_id = method["id"].as_str().unwrap_or_default();
    println!("   Method: {}", method_id);

    println!("Attaching payment method...");
    match client
        .attach_payment_method(
            intent_id,
            method_id,
            intent["attributes"]["client_key"].as_str(),
        )
        .await
    {
        Ok(attached) => {
            let next_action = &attached["attributes"]["next_action"];
            println!("   Status: {}", attached["attributes"]["status"]);
            if let Some(image_url) = next_action["code"]["image_url"].as_str() {
                println!("\nScan this QR code to pay:\n{}", image_url);
            }
        }
        Err(PayMongoError::Api(err)) => {
            eprintln!(
                "PayMongo rejected the request (status {:?}, code {:?}): {}",
                err.status(),
                err.error_type(),
                err.message()
            );
            return Err(err.into());
        }
        Err(e) => return Err(e.into()),
    }

    println!("\nDone!");
    Ok(())
}
