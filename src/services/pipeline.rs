use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::models::verification::Platform;
use crate::services::api_client::{ApiError, VerificationBackend};
use crate::services::chrome::{self, CharacterCounter};
use crate::services::notifications::NotificationCenter;
use crate::services::render::ResultCard;
use crate::services::validation::{self, ValidationError};

pub const TRANSPORT_FAILURE_MESSAGE: &str = "Something went wrong. Please retry.";
pub const APPLICATION_FAILURE_MESSAGE: &str = "Verification failed. Please try again.";
pub const VERIFICATION_COMPLETE_MESSAGE: &str = "Verification complete";

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Transport failure: {0}")]
    Transport(#[source] ApiError),

    #[error("Classifier reported a failure")]
    Application { message: Option<String> },
}

impl From<ApiError> for VerifyError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { message, .. } => VerifyError::Application { message },
            other => VerifyError::Transport(other),
        }
    }
}

impl VerifyError {
    /// Message shown in the error notification.
    pub fn user_message(&self) -> String {
        match self {
            VerifyError::Validation(err) => err.to_string(),
            VerifyError::Transport(_) => TRANSPORT_FAILURE_MESSAGE.to_string(),
            VerifyError::Application { message } => message
                .clone()
                .unwrap_or_else(|| APPLICATION_FAILURE_MESSAGE.to_string()),
        }
    }

    fn metric_kind(&self) -> &'static str {
        match self {
            VerifyError::Validation(_) => "validation",
            VerifyError::Transport(_) => "transport",
            VerifyError::Application { .. } => "application",
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Rendered(ResultCard),
    Failed(VerifyError),
    /// The submit control was disabled; nothing happened.
    Ignored,
    /// A newer submission was issued while this one was in flight; its
    /// response was discarded.
    Superseded,
}

/// Observable state of the social verification form.
#[derive(Debug, Clone, Default)]
pub struct SocialFormState {
    pub platform: Option<String>,
    pub input: String,
    pub input_focused: bool,
    pub loading: bool,
    pub result: Option<ResultCard>,
    pub result_in_view: bool,
}

/// Drives the social verification form: validate, send, render or report.
///
/// Every submission gets a sequence number. Only the submission that owns
/// the form (normally the most recently issued one) may touch the result
/// container, notifications or the loading state, so a slow earlier response
/// can never overwrite a newer one. If the owner is cancelled before its
/// response arrives, ownership falls back to the newest submission still in
/// flight.
pub struct SocialVerifier {
    backend: Arc<dyn VerificationBackend>,
    notifications: Arc<NotificationCenter>,
    max_input_length: usize,
    state: Mutex<SocialFormState>,
    issued: AtomicU64,
    fence: Mutex<Fence>,
}

#[derive(Debug, Default)]
struct Fence {
    owner: u64,
    in_flight: BTreeSet<u64>,
}

impl SocialVerifier {
    pub fn new(
        backend: Arc<dyn VerificationBackend>,
        notifications: Arc<NotificationCenter>,
        max_input_length: usize,
    ) -> Self {
        Self {
            backend,
            notifications,
            max_input_length,
            state: Mutex::new(SocialFormState::default()),
            issued: AtomicU64::new(0),
            fence: Mutex::new(Fence::default()),
        }
    }

    pub fn snapshot(&self) -> SocialFormState {
        self.lock().clone()
    }

    pub fn select_platform(&self, platform: Option<&str>) {
        self.lock().platform = platform.map(str::to_string);
    }

    pub fn platform_hint(&self) -> &'static str {
        chrome::platform_hint(self.lock().platform.as_deref())
    }

    pub fn set_input(&self, text: &str) {
        self.lock().input = text.to_string();
    }

    pub fn counter(&self) -> CharacterCounter {
        CharacterCounter::for_input(&self.lock().input, self.max_input_length)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.input.clear();
        state.input_focused = true;
    }

    pub fn is_submit_enabled(&self) -> bool {
        !self.lock().loading
    }

    /// Click on the submit control. Ignored while a submission is loading.
    pub async fn submit(&self) -> SubmitOutcome {
        if !self.is_submit_enabled() {
            debug!("Submit control disabled, ignoring click");
            return SubmitOutcome::Ignored;
        }
        self.request_submit().await
    }

    /// Submit the form regardless of the submit control's state, as a
    /// programmatic form submission would.
    pub async fn request_submit(&self) -> SubmitOutcome {
        let (platform, content) = {
            let state = self.lock();
            (state.platform.clone(), state.input.clone())
        };

        let request = match validation::validate_social_input(platform.as_deref(), &content) {
            Ok(request) => request,
            Err(err) => {
                self.lock().input_focused = true;
                self.notifications.error(err.to_string());
                metrics::counter!("verification_failures_total", "kind" => "validation")
                    .increment(1);
                return SubmitOutcome::Failed(err.into());
            }
        };

        let request_id = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let mut loading = LoadingGuard::engage(self, request_id);

        metrics::counter!("verification_requests_total").increment(1);
        info!(
            request_id,
            platform = %request.platform,
            content_chars = request.content.chars().count(),
            "Submitting content for verification"
        );

        let started = Instant::now();
        let response = self.backend.verify(&request).await;
        loading.settle();
        metrics::histogram!("verification_roundtrip_seconds")
            .record(started.elapsed().as_secs_f64());

        if !self.is_latest(request_id) {
            warn!(request_id, "Discarding response of a superseded verification");
            metrics::counter!("verification_stale_total").increment(1);
            return SubmitOutcome::Superseded;
        }

        match response {
            Ok(result) => {
                let card = ResultCard::from_result(&result);
                info!(
                    request_id,
                    label = %card.badge,
                    confidence = card.confidence,
                    reasons = card.reasons.len(),
                    "Verification complete"
                );
                {
                    let mut state = self.lock();
                    state.result = Some(card.clone());
                    state.result_in_view = true;
                }
                self.notifications.success(VERIFICATION_COMPLETE_MESSAGE);
                SubmitOutcome::Rendered(card)
            }
            Err(err) => {
                let err = VerifyError::from(err);
                error!(request_id, error = %err, "Verification failed");
                metrics::counter!("verification_failures_total", "kind" => err.metric_kind())
                    .increment(1);
                {
                    let mut state = self.lock();
                    state.result = None;
                    state.result_in_view = false;
                }
                self.notifications.error(err.user_message());
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Platform the next submission will be sent with.
    pub fn effective_platform(&self) -> Platform {
        Platform::from_selector(self.lock().platform.as_deref())
    }

    fn is_latest(&self, request_id: u64) -> bool {
        self.fence().owner == request_id
    }

    fn lock(&self) -> MutexGuard<'_, SocialFormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Lock order: fence before state.
    fn fence(&self) -> MutexGuard<'_, Fence> {
        self.fence.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the loading state for one submission. Released on every exit path,
/// including cancellation of the submitting future.
struct LoadingGuard<'a> {
    verifier: &'a SocialVerifier,
    request_id: u64,
    settled: bool,
}

impl<'a> LoadingGuard<'a> {
    fn engage(verifier: &'a SocialVerifier, request_id: u64) -> Self {
        let mut fence = verifier.fence();
        fence.owner = fence.owner.max(request_id);
        fence.in_flight.insert(request_id);
        verifier.lock().loading = true;
        Self {
            verifier,
            request_id,
            settled: false,
        }
    }

    /// The backend answered; the submission can no longer be cancelled
    /// mid-request.
    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut fence = self.verifier.fence();
        fence.in_flight.remove(&self.request_id);

        // A newer submission owns the loading state now.
        if fence.owner != self.request_id {
            return;
        }

        if !self.settled {
            if let Some(&older) = fence.in_flight.last() {
                debug!(
                    request_id = self.request_id,
                    owner = older,
                    "Cancelled verification hands the form back to an older request"
                );
                fence.owner = older;
                return;
            }
        }

        self.verifier.lock().loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationKind;
    use crate::models::verification::{Label, VerificationRequest, VerificationResult};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct ScriptedBackend {
        calls: AtomicUsize,
        respond: Box<dyn Fn(&VerificationRequest) -> Result<VerificationResult, ApiError> + Send + Sync>,
    }

    impl ScriptedBackend {
        fn new(
            respond: impl Fn(&VerificationRequest) -> Result<VerificationResult, ApiError>
                + Send
                + Sync
                + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                respond: Box::new(respond),
            })
        }
    }

    #[async_trait]
    impl VerificationBackend for ScriptedBackend {
        async fn verify(
            &self,
            request: &VerificationRequest,
        ) -> Result<VerificationResult, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)(request)
        }

        async fn fetch_sample(&self, _tag: &str) -> Result<String, ApiError> {
            Err(ApiError::MissingSample)
        }

        async fn submit_detection(&self, _news: &str) -> Result<String, ApiError> {
            Ok(String::new())
        }
    }

    fn verifier(backend: Arc<ScriptedBackend>) -> (SocialVerifier, Arc<NotificationCenter>) {
        let notifications = Arc::new(NotificationCenter::new(Duration::from_secs(3)));
        (
            SocialVerifier::new(backend, notifications.clone(), 5000),
            notifications,
        )
    }

    fn success(label: &str) -> VerificationResult {
        serde_json::from_value(serde_json::json!({
            "success": true,
            "label": label,
            "confidence": 88,
            "reasons": ["clickbait", "unverified source"]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_blank_content_never_reaches_backend() {
        let backend = ScriptedBackend::new(|_| Ok(success("fake")));
        let (verifier, notifications) = verifier(backend.clone());
        verifier.set_input("   \n ");

        let outcome = verifier.submit().await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(VerifyError::Validation(ValidationError::EmptySocialContent))
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        let shown = notifications.current().unwrap();
        assert_eq!(shown.kind, NotificationKind::Error);
        assert_eq!(shown.message, "Please paste some content or a URL to verify.");
        let state = verifier.snapshot();
        assert!(state.input_focused);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_success_renders_and_clears_loading() {
        let backend = ScriptedBackend::new(|req| {
            assert_eq!(req.platform, Platform::Twitter);
            assert_eq!(req.content, "Aliens built the pyramids");
            Ok(success("fake"))
        });
        let (verifier, notifications) = verifier(backend);
        verifier.select_platform(Some("twitter"));
        verifier.set_input("  Aliens built the pyramids ");

        let SubmitOutcome::Rendered(card) = verifier.submit().await else {
            panic!("expected a rendered result");
        };

        assert_eq!(card.badge, Label::Fake);
        assert_eq!(card.reasons, vec!["clickbait", "unverified source"]);
        let state = verifier.snapshot();
        assert!(!state.loading);
        assert!(state.result_in_view);
        assert_eq!(state.result, Some(card));
        assert_eq!(notifications.current().unwrap().message, VERIFICATION_COMPLETE_MESSAGE);
    }

    #[tokio::test]
    async fn test_application_failure_uses_server_message_and_clears_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let backend = ScriptedBackend::new(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(success("real"))
            } else {
                Err(ApiError::Rejected {
                    status: StatusCode::OK,
                    message: Some("rate limited".to_string()),
                })
            }
        });
        let (verifier, notifications) = verifier(backend);
        verifier.set_input("some claim worth checking");

        assert!(matches!(verifier.submit().await, SubmitOutcome::Rendered(_)));
        let outcome = verifier.submit().await;

        let SubmitOutcome::Failed(err) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(err.user_message(), "rate limited");
        assert_eq!(notifications.current().unwrap().message, "rate limited");
        let state = verifier.snapshot();
        assert!(state.result.is_none());
        assert!(!state.loading);
    }

    #[test]
    fn test_failure_messages_fall_back() {
        let rejected = VerifyError::from(ApiError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        });
        assert_eq!(rejected.user_message(), APPLICATION_FAILURE_MESSAGE);

        let decode = serde_json::from_str::<VerificationResult>("<html>").unwrap_err();
        let transport = VerifyError::from(ApiError::Decode(decode));
        assert_eq!(transport.user_message(), TRANSPORT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_cancelled_submission_releases_loading() {
        struct Hanging;

        #[async_trait]
        impl VerificationBackend for Hanging {
            async fn verify(
                &self,
                _request: &VerificationRequest,
            ) -> Result<VerificationResult, ApiError> {
                std::future::pending().await
            }

            async fn fetch_sample(&self, _tag: &str) -> Result<String, ApiError> {
                Err(ApiError::MissingSample)
            }

            async fn submit_detection(&self, _news: &str) -> Result<String, ApiError> {
                Ok(String::new())
            }
        }

        let notifications = Arc::new(NotificationCenter::new(Duration::from_secs(3)));
        let verifier = SocialVerifier::new(Arc::new(Hanging), notifications, 5000);
        verifier.set_input("never answered");

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), verifier.submit()).await;

        assert!(timed_out.is_err());
        assert!(!verifier.snapshot().loading);
        assert!(verifier.is_submit_enabled());
    }
}
