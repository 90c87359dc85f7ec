use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};

use crate::services::api_client::{ApiError, VerificationBackend};
use crate::services::chrome::CharacterCounter;
use crate::services::notifications::NotificationCenter;
use crate::services::pipeline::TRANSPORT_FAILURE_MESSAGE;
use crate::services::samples::{self, SampleSource};
use crate::services::validation::{self, DetectionSubmission, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionFormState {
    pub input: String,
    pub input_focused: bool,
    pub input_disabled: bool,
    /// Engaged by a valid submission. Stays on until the page is replaced,
    /// or is released when sending fails.
    pub loading: bool,
}

/// Why the detection form produced no submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    /// The submit control is disabled while a submission is loading.
    #[error("A submission is already in progress")]
    InFlight,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Primary detection form: a client-side gate in front of a traditional
/// form submission, plus sample loading into its text area.
pub struct DetectionForm {
    backend: Arc<dyn VerificationBackend>,
    notifications: Arc<NotificationCenter>,
    max_input_length: usize,
    state: Mutex<DetectionFormState>,
}

impl DetectionForm {
    pub fn new(
        backend: Arc<dyn VerificationBackend>,
        notifications: Arc<NotificationCenter>,
        max_input_length: usize,
    ) -> Self {
        Self {
            backend,
            notifications,
            max_input_length,
            state: Mutex::new(DetectionFormState::default()),
        }
    }

    pub fn snapshot(&self) -> DetectionFormState {
        self.lock().clone()
    }

    pub fn set_input(&self, text: &str) {
        self.lock().input = text.to_string();
    }

    pub fn focus(&self) {
        self.lock().input_focused = true;
    }

    pub fn blur(&self) {
        self.lock().input_focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.lock().input_focused
    }

    pub fn counter(&self) -> CharacterCounter {
        CharacterCounter::for_input(&self.lock().input, self.max_input_length)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.input.clear();
        state.input_focused = true;
    }

    /// Run the client-side gate. On success the form enters its loading
    /// state and the submission to send is returned.
    pub fn submit(&self) -> Result<DetectionSubmission, SubmitBlocked> {
        let input = {
            let state = self.lock();
            if state.loading {
                debug!("Detection submit disabled, ignoring");
                return Err(SubmitBlocked::InFlight);
            }
            state.input.clone()
        };

        match validation::validate_detection_input(&input, self.max_input_length) {
            Ok(submission) => {
                self.lock().loading = true;
                Ok(submission)
            }
            Err(err) => {
                if err == ValidationError::EmptyDetectionText {
                    self.lock().input_focused = true;
                }
                self.notifications.error(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Post a validated submission to the detection endpoint.
    pub async fn send(&self, submission: &DetectionSubmission) -> Result<String, ApiError> {
        info!(news_chars = submission.news.chars().count(), "Submitting detection form");

        let response = self.backend.submit_detection(&submission.news).await;
        if let Err(err) = &response {
            error!(error = %err, "Detection form submission failed");
            self.lock().loading = false;
            self.notifications.error(TRANSPORT_FAILURE_MESSAGE);
        }
        response
    }

    /// Replace the input with a sample. The input is disabled while the
    /// sample is fetched and re-enabled and focused afterwards.
    pub async fn load_sample(&self, tag: &str) -> SampleSource {
        self.lock().input_disabled = true;

        let sample = samples::load_sample(self.backend.as_ref(), tag).await;

        {
            let mut state = self.lock();
            state.input = sample.text;
            state.input_disabled = false;
            state.input_focused = true;
        }

        if sample.source == SampleSource::Remote {
            self.notifications.success(format!("Sample {tag} news loaded"));
        }
        sample.source
    }

    fn lock(&self) -> MutexGuard<'_, DetectionFormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
