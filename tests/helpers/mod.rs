//! Test helper utilities: an in-process stand-in for the classifier service
//! and scripted backends for driving the pipeline directly.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use tokio::time::sleep;

use fake_news_verify::{
    app_state::AppState,
    config::AppConfig,
    controller::PageController,
    models::verification::{VerificationRequest, VerificationResult},
    services::api_client::{ApiError, ClassifierClient, VerificationBackend},
};

/// Canned HTTP response served by the mock classifier.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn html(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.to_string(),
        }
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        (self.status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// What the mock classifier saw.
#[derive(Default)]
pub struct Recorded {
    pub verify_bodies: Vec<serde_json::Value>,
    pub verify_content_types: Vec<String>,
    pub sample_types: Vec<String>,
    pub detect_forms: Vec<HashMap<String, String>>,
}

struct MockState {
    verify: MockResponse,
    sample: MockResponse,
    detect: MockResponse,
    verify_calls: AtomicUsize,
    recorded: Mutex<Recorded>,
}

pub struct MockClassifier {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockClassifier {
    pub fn verify_calls(&self) -> usize {
        self.state.verify_calls.load(Ordering::SeqCst)
    }

    pub fn recorded<T>(&self, f: impl FnOnce(&Recorded) -> T) -> T {
        f(&self.state.recorded.lock().unwrap())
    }
}

pub struct MockClassifierBuilder {
    verify: MockResponse,
    sample: MockResponse,
    detect: MockResponse,
}

impl Default for MockClassifierBuilder {
    fn default() -> Self {
        Self {
            verify: MockResponse::json(StatusCode::OK, crate::fixtures::fake_verdict()),
            sample: MockResponse::json(
                StatusCode::OK,
                serde_json::json!({ "success": true, "news": crate::fixtures::SERVER_FAKE_SAMPLE, "type": "fake" }),
            ),
            detect: MockResponse::html(StatusCode::OK, "<html><body>Fake News Detected</body></html>"),
        }
    }
}

impl MockClassifierBuilder {
    pub fn verify(mut self, response: MockResponse) -> Self {
        self.verify = response;
        self
    }

    pub fn sample(mut self, response: MockResponse) -> Self {
        self.sample = response;
        self
    }

    pub fn detect(mut self, response: MockResponse) -> Self {
        self.detect = response;
        self
    }

    /// Bind to an ephemeral port and serve in the background.
    pub async fn spawn(self) -> MockClassifier {
        let state = Arc::new(MockState {
            verify: self.verify,
            sample: self.sample,
            detect: self.detect,
            verify_calls: AtomicUsize::new(0),
            recorded: Mutex::new(Recorded::default()),
        });

        let app = Router::new()
            .route("/api/social-verify", post(social_verify))
            .route("/api/sample", get(sample))
            .route("/predict", post(predict))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock classifier");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockClassifier {
            base_url: format!("http://{addr}"),
            state,
        }
    }
}

async fn social_verify(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> MockResponse {
    state.verify_calls.fetch_add(1, Ordering::SeqCst);
    {
        let mut recorded = state.recorded.lock().unwrap();
        recorded
            .verify_bodies
            .push(serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null));
        recorded.verify_content_types.push(
            headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string(),
        );
    }
    state.verify.clone()
}

async fn sample(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> MockResponse {
    state
        .recorded
        .lock()
        .unwrap()
        .sample_types
        .push(params.get("type").cloned().unwrap_or_default());
    state.sample.clone()
}

async fn predict(
    State(state): State<Arc<MockState>>,
    Form(params): Form<HashMap<String, String>>,
) -> MockResponse {
    state.recorded.lock().unwrap().detect_forms.push(params);
    state.detect.clone()
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Page controller wired to a real HTTP client pointed at `base_url`.
pub fn page_for(base_url: &str) -> PageController {
    let config = AppConfig {
        api_base_url: base_url.to_string(),
        ..AppConfig::default()
    };
    let client = ClassifierClient::from_config(&config).expect("Failed to build client");
    let mut page = PageController::new(AppState::new(&config, Arc::new(client)));
    page.init();
    page
}

/// Page controller wired to an in-memory backend.
pub fn page_with_backend(backend: Arc<dyn VerificationBackend>) -> PageController {
    let mut page = PageController::new(AppState::new(&AppConfig::default(), backend));
    page.init();
    page
}

/// Backend answering each verification from a script of (delay, payload)
/// pairs, consumed in call order.
pub struct DelayedBackend {
    script: Mutex<Vec<(Duration, serde_json::Value)>>,
    pub calls: AtomicUsize,
}

impl DelayedBackend {
    pub fn new(script: Vec<(Duration, serde_json::Value)>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().rev().collect()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl VerificationBackend for DelayedBackend {
    async fn verify(&self, _request: &VerificationRequest) -> Result<VerificationResult, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, payload) = self
            .script
            .lock()
            .unwrap()
            .pop()
            .expect("DelayedBackend script exhausted");

        if delay > Duration::ZERO {
            sleep(delay).await;
        }

        let result: VerificationResult = serde_json::from_value(payload)?;
        if !result.is_success() {
            return Err(ApiError::Rejected {
                status: reqwest::StatusCode::OK,
                message: result.error_message().map(str::to_string),
            });
        }
        Ok(result)
    }

    async fn fetch_sample(&self, _tag: &str) -> Result<String, ApiError> {
        Err(ApiError::MissingSample)
    }

    async fn submit_detection(&self, _news: &str) -> Result<String, ApiError> {
        Err(ApiError::MissingSample)
    }
}
