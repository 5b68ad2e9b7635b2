//! Wallet tokenize flows and host-facing wallet results.

mod common;

use std::sync::Arc;

use common::{
    ACCOUNT_ID, ChallengeScript, PAYMENT_HANDLES, PAYMENT_METHODS, RecordingEngine,
    RecordingSink, StubTransport, client, handle_body, payment_methods_body,
};
use paysafe_sdk::{
    ErrorKind, PaymentMethodOptions, TokenizeOptions, Tokenizer,
    events::EventType,
    models::{PayPalShippingPreference, PaymentHandleStatus, ReturnLink, ReturnLinkRel},
    wallet::{
        ApplePayAdapter, ApplePayAuthorization, ApplePayContact, ApplePayPaymentMethod,
        ApplePaySheetResult, PayPalAdapter, PayPalOptions, PayPalVendorResult, VenmoAdapter,
        VenmoOptions, VenmoVendorResult, WalletResult,
    },
};
use serde_json::json;

fn build_tokenizer(
    transport: StubTransport,
) -> (Tokenizer<StubTransport, RecordingEngine>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let tokenizer = Tokenizer::with_event_sink(
        client(transport),
        RecordingEngine::new(ChallengeScript::Succeed),
        sink.clone(),
    );
    (tokenizer, sink)
}

fn apple_pay_authorization() -> ApplePayAuthorization {
    ApplePayAuthorization {
        label: "Demo shop".to_owned(),
        request_billing_address: true,
        transaction_identifier: "apple-txn-1".to_owned(),
        payment_data: "eyJ2ZXJzaW9uIjoiRUNfdjEifQ==".to_owned(),
        payment_method: ApplePayPaymentMethod {
            display_name: Some("Visa 1091".to_owned()),
            network: Some("Visa".to_owned()),
            card_type: Some("credit".to_owned()),
        },
        billing_contact: Some(ApplePayContact {
            given_name: Some("Jane".to_owned()),
            family_name: Some("Doe".to_owned()),
            postal_code: Some("10014".to_owned()),
            country_code: Some("US".to_owned()),
            ..ApplePayContact::default()
        }),
    }
}

#[tokio::test]
async fn test_apple_pay_flow() {
    let transport = StubTransport::new()
        .route("GET", PAYMENT_METHODS, 200, payment_methods_body())
        .route("POST", PAYMENT_HANDLES, 201, handle_body("h-apple", "PAYABLE"));
    let (tokenizer, sink) = build_tokenizer(transport);

    let options = TokenizeOptions::new(
        1000,
        "USD",
        "order-apple",
        ACCOUNT_ID,
        PaymentMethodOptions::ApplePay(apple_pay_authorization()),
    )
    .with_correlation_id("corr-apple");
    let handle = tokenizer.tokenize(options).await;

    let requests = tokenizer.client().transport().requests();
    let body = requests[1].body.as_ref().expect("handle request body");
    assert_eq!(body["paymentType"], "CARD");
    assert_eq!(body["applePay"]["label"], "Demo shop");
    assert_eq!(body["applePay"]["applePayPaymentToken"]["transactionIdentifier"], "apple-txn-1");
    assert_eq!(body["billingDetails"]["zip"], "10014");
    assert_eq!(body["profile"]["firstName"], "Jane");
    assert!(body.get("card").is_none());
    assert!(body.get("threeDs").is_none());

    let result =
        tokenizer.wallet_result(&ApplePayAdapter, &handle, ApplePaySheetResult::Authorized, "corr-apple");
    assert_eq!(result, WalletResult::Success { payment_handle_token: "token-h-apple".to_owned() });
    assert_eq!(tokenizer.engine().setup_count(), 0);
    assert_eq!(sink.event_types().last(), Some(&EventType::WalletResult));
}

#[tokio::test]
async fn test_apple_pay_requires_enabled_account() {
    let methods = json!({
        "paymentMethods": [
            {"paymentMethod": "CARD", "currencyCode": "USD", "accountId": ACCOUNT_ID}
        ]
    });
    let transport = StubTransport::new().route("GET", PAYMENT_METHODS, 200, methods);
    let (tokenizer, _sink) = build_tokenizer(transport);

    let err = tokenizer
        .tokenize(TokenizeOptions::new(
            1000,
            "USD",
            "order-apple",
            ACCOUNT_ID,
            PaymentMethodOptions::ApplePay(apple_pay_authorization()),
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::AccountNotConfigured { payment_type, .. } if payment_type == "APPLE_PAY"
    ));
}

#[tokio::test]
async fn test_paypal_flow_returns_initiated_handle() {
    let mut initiated = handle_body("h-paypal", "INITIATED");
    initiated["paymentType"] = json!("PAYPAL");
    initiated["action"] = json!("REDIRECT");
    initiated["gatewayResponse"] = json!({"orderId": "PAYPAL-ORDER-7", "processor": "PAYPAL"});
    initiated["links"] = json!([{"rel": "redirect_payment", "href": "https://www.sandbox.paypal.com/checkout"}]);
    let transport = StubTransport::new()
        .route("GET", PAYMENT_METHODS, 200, payment_methods_body())
        .route("POST", PAYMENT_HANDLES, 201, initiated);
    let (tokenizer, _sink) = build_tokenizer(transport);

    let mut options = TokenizeOptions::new(
        1000,
        "USD",
        "order-paypal",
        ACCOUNT_ID,
        PaymentMethodOptions::PayPal(PayPalOptions {
            consumer_id: Some("payer@example.com".to_owned()),
            shipping_preference: Some(PayPalShippingPreference::NoShipping),
            ..PayPalOptions::default()
        }),
    );
    options.return_links = vec![ReturnLink {
        rel: ReturnLinkRel::Default,
        href: "https://shop.example.com/return".to_owned(),
        method: Some("GET".to_owned()),
    }];
    let handle = tokenizer.tokenize(options).await;

    let handle_ref = handle.as_ref().expect("flow succeeds");
    assert_eq!(handle_ref.status, PaymentHandleStatus::Initiated);
    assert_eq!(handle_ref.link("redirect_payment"), Some("https://www.sandbox.paypal.com/checkout"));
    assert_eq!(tokenizer.engine().setup_count(), 0);

    let requests = tokenizer.client().transport().requests();
    let body = requests[1].body.as_ref().expect("handle request body");
    assert_eq!(body["paymentType"], "PAYPAL");
    assert_eq!(body["paypal"]["consumerId"], "payer@example.com");
    assert_eq!(body["returnLinks"][0]["rel"], "default");

    let approved = tokenizer.wallet_result(
        &PayPalAdapter,
        &handle,
        PayPalVendorResult::Approved { order_id: "PAYPAL-ORDER-7".to_owned() },
        "corr-paypal",
    );
    assert_eq!(approved, WalletResult::Success { payment_handle_token: "token-h-paypal".to_owned() });

    let mismatched = tokenizer.wallet_result(
        &PayPalAdapter,
        &handle,
        PayPalVendorResult::Approved { order_id: "OTHER".to_owned() },
        "corr-paypal",
    );
    assert!(matches!(mismatched, WalletResult::Failed(_)));
}

#[tokio::test]
async fn test_venmo_cancel_and_gateway_failure() {
    let transport = StubTransport::new().route(
        "GET",
        PAYMENT_METHODS,
        400,
        json!({"error": {"code": "5001", "message": "Invalid currency"}}),
    );
    let (tokenizer, sink) = build_tokenizer(transport);

    let handle = tokenizer
        .tokenize(
            TokenizeOptions::new(
                1000,
                "USD",
                "order-venmo",
                ACCOUNT_ID,
                PaymentMethodOptions::Venmo(VenmoOptions::default()),
            )
            .with_correlation_id("corr-venmo"),
        )
        .await;

    let cancelled =
        tokenizer.wallet_result(&VenmoAdapter, &handle, VenmoVendorResult::Cancelled, "corr-venmo");
    assert_eq!(cancelled, WalletResult::Cancelled);

    let WalletResult::Failed(err) = tokenizer.wallet_result(
        &VenmoAdapter,
        &handle,
        VenmoVendorResult::Authorized { nonce: "fake-venmo-nonce".to_owned() },
        "corr-venmo",
    ) else {
        panic!("gateway failure must surface");
    };
    assert_eq!(err.kind, ErrorKind::InvalidCurrencyCode);
    assert_eq!(err.correlation_id, "corr-venmo");

    let wallet_events =
        sink.event_types().into_iter().filter(|t| *t == EventType::WalletResult).count();
    assert_eq!(wallet_events, 2);
}
