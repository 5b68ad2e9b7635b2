//! `paysafe` - headless host for the Paysafe payments client.
//!
//! Lists the payment methods enabled for a merchant and tokenizes cards from
//! the command line. There is no device 3-D Secure SDK here, so only
//! frictionless authentications can complete.

#![allow(
    clippy::multiple_crate_versions,
    reason = "Transitive dependency version conflicts from reqwest and tracing-subscriber"
)]

mod observability;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use paysafe_sdk::{
    PaymentMethodOptions, PaysafeClient, PaysafeError, SdkConfig, TokenizeOptions, Tokenizer,
    currency::to_minor_units,
    models::{BillingDetails, CardDetails, CardExpiry},
    threeds::{
        AuthenticationEngine, ChallengeCompletion, ChallengePreference, EngineError,
        ThreeDsOptions,
    },
};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::observability::{LogFormat, init_observability};

#[derive(Debug, Parser)]
#[command(name = "paysafe", version, about = "Paysafe payments client host")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, short, default_value = "paysafe.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lists the payment methods enabled in a currency.
    PaymentMethods {
        /// ISO 4217 currency code.
        #[arg(long)]
        currency: String,
    },
    /// Tokenizes a card into a single-use payment handle.
    TokenizeCard(TokenizeCardArgs),
}

#[derive(Debug, clap::Args)]
struct TokenizeCardArgs {
    /// Amount in major units, e.g. `10.99`.
    #[arg(long)]
    amount: Decimal,
    /// ISO 4217 currency code.
    #[arg(long)]
    currency: String,
    /// Merchant account id.
    #[arg(long)]
    account_id: String,
    /// Merchant reference, unique per attempt.
    #[arg(long)]
    merchant_ref_num: String,
    /// Card number.
    #[arg(long)]
    card_number: String,
    /// Expiry month, 1-12.
    #[arg(long)]
    expiry_month: u8,
    /// Four-digit expiry year.
    #[arg(long)]
    expiry_year: u16,
    /// Card verification value.
    #[arg(long)]
    cvv: Option<String>,
    /// Cardholder name.
    #[arg(long)]
    holder_name: Option<String>,
    /// Billing country, ISO 3166-1 alpha-2.
    #[arg(long)]
    country: Option<String>,
    /// Billing postal code.
    #[arg(long)]
    zip: Option<String>,
    /// Request a frictionless 3-D Secure authentication.
    #[arg(long)]
    three_ds: bool,
}

/// Engine for hosts without a device SDK.
///
/// Sessions are accepted as-is; every challenge is failed.
#[derive(Debug, Clone, Copy, Default)]
struct FrictionlessEngine;

impl AuthenticationEngine for FrictionlessEngine {
    async fn setup<'a>(&'a self, jwt: &'a str) -> Result<String, EngineError> {
        if jwt.is_empty() {
            return Err(EngineError::new("empty session JWT"));
        }
        Ok(format!("headless-{}", Uuid::new_v4()))
    }

    fn continue_challenge(&self, transaction_id: &str, _payload: &str, completion: ChallengeCompletion) {
        error!(transaction_id, "challenge requested but this host cannot render one");
        completion.fail("challenges are not supported by the command-line host");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_observability(LogFormat::from_env());
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(correlation_id = %err.correlation_id, error = %err, "command failed");
            eprintln!(
                "{:#}",
                json!({
                    "error": err.kind.to_string(),
                    "correlationId": err.correlation_id,
                    "retryable": err.is_retryable(),
                })
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<serde_json::Value, PaysafeError> {
    let config = Arc::new(SdkConfig::from_file(&cli.config)?);
    info!(config = %cli.config.display(), environment = ?config.environment, "configuration loaded");
    let client = PaysafeClient::from_config(config)?;

    match cli.command {
        Command::PaymentMethods { currency } => {
            let correlation_id = Uuid::new_v4().to_string();
            let methods = client.payment_methods(&currency, &correlation_id).await?;
            Ok(json!(methods))
        }
        Command::TokenizeCard(args) => {
            let tokenizer = Tokenizer::new(client, FrictionlessEngine);
            let handle = tokenizer.tokenize(tokenize_options(args)?).await?;
            Ok(json!(handle))
        }
    }
}

fn tokenize_options(args: TokenizeCardArgs) -> Result<TokenizeOptions, PaysafeError> {
    let amount = to_minor_units(args.amount, &args.currency)?;
    let card = CardDetails {
        card_num: args.card_number,
        card_expiry: CardExpiry { month: args.expiry_month, year: args.expiry_year },
        cvv: args.cvv,
        holder_name: args.holder_name,
    };
    let three_ds = args.three_ds.then(|| ThreeDsOptions {
        challenge_preference: ChallengePreference::NoChallengeRequested,
        ..ThreeDsOptions::default()
    });

    let mut options = TokenizeOptions::new(
        amount,
        args.currency,
        args.merchant_ref_num,
        args.account_id,
        PaymentMethodOptions::Card { card, three_ds },
    );
    if let (Some(country), Some(zip)) = (args.country, args.zip) {
        options = options.with_billing_details(BillingDetails {
            country,
            zip,
            ..BillingDetails::default()
        });
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tokenize_card_arguments() {
        let cli = Cli::try_parse_from([
            "paysafe",
            "--config",
            "test.toml",
            "tokenize-card",
            "--amount",
            "10.99",
            "--currency",
            "USD",
            "--account-id",
            "1001456650",
            "--merchant-ref-num",
            "order-1",
            "--card-number",
            "4000000000001091",
            "--expiry-month",
            "12",
            "--expiry-year",
            "2030",
            "--country",
            "US",
            "--zip",
            "10014",
            "--three-ds",
        ])
        .expect("arguments parse");

        let Command::TokenizeCard(args) = cli.command else {
            panic!("expected tokenize-card");
        };
        let options = tokenize_options(args).expect("options build");
        assert_eq!(options.amount, 1099);
        assert_eq!(options.billing_details.as_ref().map(|b| b.zip.as_str()), Some("10014"));
        assert!(matches!(
            options.payment_method,
            PaymentMethodOptions::Card { three_ds: Some(_), .. }
        ));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let args = TokenizeCardArgs {
            amount: Decimal::new(-100, 2),
            currency: "USD".to_owned(),
            account_id: "1001456650".to_owned(),
            merchant_ref_num: "order-1".to_owned(),
            card_number: "4000000000001091".to_owned(),
            expiry_month: 12,
            expiry_year: 2030,
            cvv: None,
            holder_name: None,
            country: None,
            zip: None,
            three_ds: false,
        };
        assert!(tokenize_options(args).is_err());
    }

    #[tokio::test]
    async fn test_engine_fails_challenges() {
        let (completion, receiver) = ChallengeCompletion::channel();
        FrictionlessEngine.continue_challenge("txn-1", "payload", completion);
        assert!(matches!(
            receiver.await.expect("outcome delivered"),
            paysafe_sdk::threeds::ChallengeOutcome::Failed { .. }
        ));
        assert!(FrictionlessEngine.setup("").await.is_err());
    }
}
