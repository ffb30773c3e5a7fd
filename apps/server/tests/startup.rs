use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use ratecast_core::errors::{Error, Result};
use ratecast_core::notifications::{Message, NotifierTrait};
use ratecast_core::RequestContext;
use ratecast_market_data::{MarketDataError, ProviderRegistry, RateProvider};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ratecast_server::{
    api::app_router, build_registry, build_resolver, build_state_with, config::Config,
};

// --- Fake provider standing in for an upstream API ---
struct FakeProvider {
    id: &'static str,
    rate: Option<f64>,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn answering(id: &'static str, rate: f64) -> Arc<Self> {
        Arc::new(Self {
            id,
            rate: Some(rate),
            calls: AtomicUsize::new(0),
        })
    }

    fn down(id: &'static str) -> Arc<Self> {
        Arc::new(Self {
            id,
            rate: None,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl RateProvider for FakeProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    async fn get_rate(
        &self,
        _ctx: &RequestContext,
        _from: &str,
        _to: &str,
    ) -> std::result::Result<f64, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate.ok_or_else(|| MarketDataError::ProviderError {
            provider: self.id.to_string(),
            message: "upstream unavailable".to_string(),
        })
    }
}

// --- Recording notifier ---
#[derive(Default)]
struct RecordingNotifier {
    bounce: Vec<String>,
    sent: Mutex<Vec<Message>>,
}

#[async_trait]
impl NotifierTrait for RecordingNotifier {
    async fn send(&self, _ctx: &RequestContext, message: &Message) -> Result<()> {
        if self.bounce.contains(&message.to) {
            return Err(Error::Notifier(format!("{} bounced", message.to)));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().join("data"),
        ..Config::default()
    }
}

fn registry_of(providers: &[Arc<FakeProvider>]) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for provider in providers {
        registry
            .register(Arc::clone(provider) as Arc<dyn RateProvider>)
            .unwrap();
    }
    registry
}

async fn app(
    config: &Config,
    registry: &ProviderRegistry,
    notifier: Arc<RecordingNotifier>,
) -> Router {
    let state = build_state_with(config, registry, notifier).await.unwrap();
    app_router(state, config)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn subscribe(email: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/subscribe")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("email={}", email.replace('@', "%40"))))
        .unwrap()
}

fn send_emails() -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/sendEmails")
        .body(Body::empty())
        .unwrap()
}

#[test]
fn registry_without_coinapi_key_skips_coinapi() {
    let registry = build_registry(&Config::default()).unwrap();
    assert_eq!(registry.ids(), vec!["coingecko", "coinbase"]);

    let resolver = build_resolver(&Config::default(), &registry).unwrap();
    assert_eq!(resolver.provider_ids(), vec!["coingecko", "coinbase"]);
}

#[test]
fn registry_with_coinapi_key_uses_full_default_order() {
    let config = Config {
        coinapi_key: Some("test-key".to_string()),
        ..Config::default()
    };
    let registry = build_registry(&config).unwrap();
    let resolver = build_resolver(&config, &registry).unwrap();
    assert_eq!(
        resolver.provider_ids(),
        vec!["coinapi", "coingecko", "coinbase"]
    );
    assert_eq!(resolver.attempt_timeout(), config.provider_timeout);
}

#[test]
fn explicit_order_naming_unregistered_provider_fails_startup() {
    let config = Config {
        provider_order: vec!["coinbase".to_string(), "coinapi".to_string()],
        ..Config::default()
    };
    let registry = build_registry(&config).unwrap();
    let err = build_resolver(&config, &registry).unwrap_err();

    let cause = err.downcast_ref::<MarketDataError>().unwrap();
    assert!(matches!(cause, MarketDataError::UnknownProvider(id) if id == "coinapi"));
}

#[test]
fn explicit_order_is_kept() {
    let config = Config {
        provider_order: vec!["coinbase".to_string(), "coingecko".to_string()],
        ..Config::default()
    };
    let registry = build_registry(&config).unwrap();
    let resolver = build_resolver(&config, &registry).unwrap();
    assert_eq!(resolver.provider_ids(), vec!["coinbase", "coingecko"]);
}

#[tokio::test]
async fn rate_falls_back_through_real_services() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let coingecko = FakeProvider::down("coingecko");
    let coinbase = FakeProvider::answering("coinbase", 27000.5);
    let registry = registry_of(&[coingecko.clone(), coinbase.clone()]);
    let router = app(&config, &registry, Arc::new(RecordingNotifier::default())).await;

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/rate?crypto_currency=BTC&fiat_currency=USD")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(27000.5));
    assert_eq!(coingecko.calls.load(Ordering::SeqCst), 1);
    assert_eq!(coinbase.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn subscribe_persists_and_broadcast_reaches_subscribers() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let registry = registry_of(&[FakeProvider::answering("coinbase", 27000.5)]);
    let notifier = Arc::new(RecordingNotifier {
        bounce: vec!["bob@example.com".to_string()],
        ..Default::default()
    });
    let router = app(&config, &registry, notifier.clone()).await;

    for email in ["alice@example.com", "bob@example.com", "carol@example.com"] {
        let (status, _) = send(&router, subscribe(email)).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(&router, subscribe("alice@example.com")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let stored = std::fs::read_to_string(config.data_dir.join(&config.subscribers_file)).unwrap();
    assert_eq!(
        stored,
        "alice@example.com\nbob@example.com\ncarol@example.com\n"
    );

    let (status, body) = send(&router, send_emails()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "failedEmails": ["bob@example.com"] }));

    let sent = notifier.sent.lock().unwrap();
    let recipients: Vec<&str> = sent.iter().map(|m| m.to.as_str()).collect();
    assert_eq!(recipients, vec!["alice@example.com", "carol@example.com"]);
    assert!(sent
        .iter()
        .all(|m| m.subject == "Rate info" && m.body == "Current rate is 27000.500000"));
}

#[tokio::test]
async fn broadcast_with_every_delivery_failing_reports_all_recipients() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let registry = registry_of(&[FakeProvider::answering("coinbase", 1.0)]);
    let notifier = Arc::new(RecordingNotifier {
        bounce: vec!["a@example.com".to_string(), "b@example.com".to_string()],
        ..Default::default()
    });
    let router = app(&config, &registry, notifier).await;

    send(&router, subscribe("a@example.com")).await;
    send(&router, subscribe("b@example.com")).await;

    let (status, body) = send(&router, send_emails()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["details"]["failedEmails"],
        serde_json::json!(["a@example.com", "b@example.com"])
    );
}

#[tokio::test]
async fn broadcast_fails_when_no_provider_answers() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let registry = registry_of(&[FakeProvider::down("coinbase")]);
    let notifier = Arc::new(RecordingNotifier::default());
    let router = app(&config, &registry, notifier.clone()).await;

    send(&router, subscribe("a@example.com")).await;

    let (status, body) = send(&router, send_emails()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("upstream unavailable"));
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn readiness_reflects_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let registry = registry_of(&[FakeProvider::answering("coinbase", 1.0)]);
    let router = app(&config, &registry, Arc::new(RecordingNotifier::default())).await;

    let ready = || {
        Request::builder()
            .uri("/api/readyz")
            .body(Body::empty())
            .unwrap()
    };
    let (status, _) = send(&router, ready()).await;
    assert_eq!(status, StatusCode::OK);

    std::fs::remove_dir_all(&config.data_dir).unwrap();
    let (status, _) = send(&router, ready()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
