//! Tokenizes a test card against the Paysafe test environment.
//!
//! The engine below stands in for a device 3-D Secure SDK and only supports
//! frictionless authentications.
//!
//! # Running this example
//!
//! ```bash
//! export PAYSAFE_API_KEY=<base64 of username:password>
//! export PAYSAFE_ACCOUNT_ID=<card account id>
//! cargo run --example tokenize_card
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use std::{env, sync::Arc};

use paysafe_sdk::{
    Environment, PaymentMethodOptions, PaysafeClient, SdkConfig, TokenizeOptions, Tokenizer,
    models::{BillingDetails, CardDetails, CardExpiry},
    threeds::{AuthenticationEngine, ChallengeCompletion, EngineError, ThreeDsOptions},
};

struct FrictionlessOnly;

impl AuthenticationEngine for FrictionlessOnly {
    async fn setup<'a>(&'a self, _jwt: &'a str) -> Result<String, EngineError> {
        Ok("example-device-session".to_owned())
    }

    fn continue_challenge(&self, _transaction_id: &str, _payload: &str, completion: ChallengeCompletion) {
        completion.fail("this example cannot render challenges");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let api_key = env::var("PAYSAFE_API_KEY")?;
    let account_id = env::var("PAYSAFE_ACCOUNT_ID")?;

    let config =
        SdkConfig::new(api_key, Environment::Test)?.with_merchant_url("https://shop.example.com")?;
    let client = PaysafeClient::from_config(Arc::new(config))?;
    let tokenizer = Tokenizer::new(client, FrictionlessOnly);

    let card = CardDetails {
        card_num: "4000000000001000".to_owned(),
        card_expiry: CardExpiry { month: 12, year: 2030 },
        cvv: Some("111".to_owned()),
        holder_name: Some("Jane Doe".to_owned()),
    };
    let options = TokenizeOptions::new(
        1000,
        "USD",
        format!("example-{}", uuid::Uuid::new_v4()),
        account_id,
        PaymentMethodOptions::Card { card, three_ds: Some(ThreeDsOptions::default()) },
    )
    .with_billing_details(BillingDetails {
        country: "US".to_owned(),
        zip: "10014".to_owned(),
        ..BillingDetails::default()
    });

    match tokenizer.tokenize(options).await {
        Ok(handle) => println!("payment handle token: {}", handle.payment_handle_token),
        Err(err) => eprintln!("tokenization failed ({}): {err}", err.correlation_id),
    }
    Ok(())
}
