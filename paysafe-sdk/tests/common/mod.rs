//! Shared fixtures for integration tests: a routing stub transport, a
//! scripted 3-D Secure engine and a recording event sink.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use base64::{Engine, engine::general_purpose::STANDARD};
use paysafe_sdk::{
    PaysafeClient, SdkConfig,
    config::Environment,
    events::{EventSink, EventType, SdkEvent},
    threeds::{AuthenticationEngine, ChallengeCompletion, EngineError},
    transport::{RequestContext, Transport, TransportError, TransportResponse},
};
use serde_json::Value;
use tokio::sync::Semaphore;

/// Base64 of `username:password`.
pub const API_KEY: &str = "dXNlcm5hbWU6cGFzc3dvcmQ=";
pub const ACCOUNT_ID: &str = "1001456650";
pub const MERCHANT_URL: &str = "https://shop.example.com";

pub const PAYMENT_METHODS: &str = "/paymenthub/v1/paymentmethods";
pub const PAYMENT_HANDLES: &str = "/paymenthub/v1/singleusepaymenthandles";

pub fn jwt_path(account_id: &str) -> String {
    format!("/threedsecure/v2/accounts/{account_id}/jwts")
}

pub fn authentications_path(account_id: &str) -> String {
    format!("/threedsecure/v2/accounts/{account_id}/authentications")
}

pub fn finalize_path(account_id: &str, authentication_id: &str) -> String {
    format!("/threedsecure/v2/accounts/{account_id}/authentications/{authentication_id}/finalize")
}

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub base_url: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

type Canned = Result<TransportResponse, TransportError>;

/// Transport answering from canned responses keyed by method and path.
///
/// Each route holds a queue; the last response of a queue is repeated.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(&'static str, String), VecDeque<Canned>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds every request until the gate hands out a permit for it.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self { gate: Some(gate), ..Self::default() }
    }

    pub fn route(self, method: &'static str, path: impl Into<String>, status: u16, body: Value) -> Self {
        self.push(method, path.into(), Ok(json_response(status, &body)));
        self
    }

    pub fn route_error(self, method: &'static str, path: impl Into<String>, error: TransportError) -> Self {
        self.push(method, path.into(), Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| format!("{} {}", r.method, r.path)).collect()
    }

    fn push(&self, method: &'static str, path: String, canned: Canned) {
        self.routes.lock().unwrap().entry((method, path)).or_default().push_back(canned);
    }

    async fn respond(
        &self,
        method: &'static str,
        ctx: RequestContext<'_>,
        body: Option<&[u8]>,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            base_url: ctx.base_url.to_owned(),
            path: ctx.path.to_owned(),
            query: ctx.query.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
            headers: ctx.headers.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
            body: body.map(|b| serde_json::from_slice(b).expect("request body is JSON")),
        });

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate is never closed").forget();
        }

        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&(method, ctx.path.to_owned())) else {
            return Ok(json_response(404, &serde_json::json!({
                "error": {"code": "5404", "message": format!("no stub for {method} {}", ctx.path)}
            })));
        };
        if queue.len() > 1 {
            queue.pop_front().expect("queue is not empty")
        } else {
            queue.front().cloned().expect("route has a response")
        }
    }
}

impl Transport for StubTransport {
    async fn get<'a>(&'a self, ctx: RequestContext<'a>) -> Result<TransportResponse, TransportError> {
        self.respond("GET", ctx, None).await
    }

    async fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> Result<TransportResponse, TransportError> {
        self.respond("POST", ctx, Some(body)).await
    }

    fn protocol_name(&self) -> &'static str {
        "stub"
    }
}

pub fn json_response(status: u16, body: &Value) -> TransportResponse {
    TransportResponse {
        status,
        body: serde_json::to_vec(body).expect("fixture serializes"),
        headers: vec![("Content-Type".to_owned(), "application/json".to_owned())],
    }
}

/// What [`RecordingEngine`] does with a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeScript {
    Succeed,
    Fail,
    Cancel,
}

/// Engine that counts challenges and answers them per script.
#[derive(Debug)]
pub struct RecordingEngine {
    script: ChallengeScript,
    pub setups: AtomicUsize,
    pub challenges: Mutex<Vec<(String, String)>>,
}

impl RecordingEngine {
    pub fn new(script: ChallengeScript) -> Self {
        Self { script, setups: AtomicUsize::new(0), challenges: Mutex::new(Vec::new()) }
    }

    pub fn setup_count(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }

    pub fn challenge_count(&self) -> usize {
        self.challenges.lock().unwrap().len()
    }
}

impl AuthenticationEngine for RecordingEngine {
    async fn setup<'a>(&'a self, jwt: &'a str) -> Result<String, EngineError> {
        self.setups.fetch_add(1, Ordering::SeqCst);
        Ok(format!("session-{jwt}"))
    }

    fn continue_challenge(&self, transaction_id: &str, payload: &str, completion: ChallengeCompletion) {
        self.challenges.lock().unwrap().push((transaction_id.to_owned(), payload.to_owned()));
        match self.script {
            ChallengeScript::Succeed => completion.succeed("challenge-server-jwt"),
            ChallengeScript::Fail => completion.fail("issuer declined"),
            ChallengeScript::Cancel => completion.cancel(),
        }
    }
}

/// Sink keeping every event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SdkEvent>>,
}

impl RecordingSink {
    pub fn event_types(&self) -> Vec<EventType> {
        self.events.lock().unwrap().iter().map(|e| e.event_type).collect()
    }

    pub fn events(&self) -> Vec<SdkEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &SdkEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn config() -> Arc<SdkConfig> {
    Arc::new(
        SdkConfig::new(API_KEY, Environment::Test)
            .expect("valid test key")
            .with_merchant_url(MERCHANT_URL)
            .expect("valid merchant URL"),
    )
}

pub fn client(transport: StubTransport) -> PaysafeClient<StubTransport> {
    PaysafeClient::new(transport, config())
}

pub fn payment_methods_body() -> Value {
    serde_json::json!({
        "paymentMethods": [
            {
                "paymentMethod": "CARD",
                "currencyCode": "USD",
                "accountId": ACCOUNT_ID,
                "accountConfiguration": {"isApplePay": true}
            },
            {"paymentMethod": "PAYPAL", "currencyCode": "USD", "accountId": ACCOUNT_ID},
            {"paymentMethod": "VENMO", "currencyCode": "USD", "accountId": ACCOUNT_ID}
        ]
    })
}

pub fn handle_body(id: &str, status: &str) -> Value {
    serde_json::json!({
        "id": id,
        "accountId": ACCOUNT_ID,
        "status": status,
        "merchantRefNum": "order-1",
        "paymentHandleToken": format!("token-{id}"),
        "paymentType": "CARD",
        "action": "NONE",
        "usage": "SINGLE_USE",
        "amount": 1000,
        "currencyCode": "USD",
        "timeToLiveSeconds": 899
    })
}

pub fn challenge_payload() -> String {
    STANDARD.encode(
        serde_json::json!({
            "transactionId": "txn-42",
            "payload": "acs-payload",
            "accountId": ACCOUNT_ID
        })
        .to_string(),
    )
}
