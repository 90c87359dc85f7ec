//! Top-level page controller.
//!
//! Owns the [`AppState`] and both forms, and routes page events to them.

use std::sync::Arc;

use tracing::{debug, info};

use crate::app_state::AppState;
use crate::services::{
    api_client::ApiError,
    chrome::{self, KeyPress, ScrollEffects, ShortcutAction},
    detection::{DetectionForm, SubmitBlocked},
    notifications::NotificationCenter,
    pipeline::SocialVerifier,
    samples::SampleSource,
    validation::DetectionSubmission,
};

/// What a key press did.
#[derive(Debug, PartialEq)]
pub enum KeyOutcome {
    Unhandled,
    Cleared,
    Submitted(DetectionSubmission),
    Rejected(SubmitBlocked),
}

pub struct PageController {
    state: AppState,
    social: SocialVerifier,
    detection: DetectionForm,
}

impl PageController {
    pub fn new(state: AppState) -> Self {
        let social = SocialVerifier::new(
            state.backend.clone(),
            state.notifications.clone(),
            state.max_input_length,
        );
        let detection = DetectionForm::new(
            state.backend.clone(),
            state.notifications.clone(),
            state.max_input_length,
        );

        Self {
            state,
            social,
            detection,
        }
    }

    /// Wire up the page. Returns `false` if it was already initialized.
    pub fn init(&mut self) -> bool {
        if self.state.initialized {
            return false;
        }

        self.detection.focus();
        self.state.initialized = true;
        info!(
            scroll_threshold = self.state.scroll_threshold,
            max_input_length = self.state.max_input_length,
            "Fake news detector initialized"
        );
        true
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn social(&self) -> &SocialVerifier {
        &self.social
    }

    pub fn detection(&self) -> &DetectionForm {
        &self.detection
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.state.notifications
    }

    /// Flip the mobile navigation menu. Returns the new state.
    pub fn toggle_nav(&mut self) -> bool {
        self.state.nav_active = !self.state.nav_active;
        self.state.nav_active
    }

    /// Follow an in-page anchor, closing the mobile menu if it is open.
    pub fn follow_anchor<'a>(&mut self, href: &'a str) -> Option<&'a str> {
        let target = chrome::anchor_target(href)?;
        if self.state.nav_active {
            self.toggle_nav();
        }
        debug!(target, "Scrolling to anchor");
        Some(target)
    }

    pub fn on_scroll(&self, offset: u32) -> ScrollEffects {
        ScrollEffects::at_offset(offset, self.state.scroll_threshold)
    }

    pub fn on_key(&self, press: KeyPress) -> KeyOutcome {
        match chrome::shortcut_for(press, self.detection.is_focused()) {
            Some(ShortcutAction::SubmitDetection) => match self.detection.submit() {
                Ok(submission) => KeyOutcome::Submitted(submission),
                Err(err) => KeyOutcome::Rejected(err),
            },
            Some(ShortcutAction::ClearDetection) => {
                self.detection.clear();
                KeyOutcome::Cleared
            }
            None => KeyOutcome::Unhandled,
        }
    }

    pub async fn load_sample(&self, tag: &str) -> SampleSource {
        self.detection.load_sample(tag).await
    }

    pub async fn send_detection(&self, submission: &DetectionSubmission) -> Result<String, ApiError> {
        self.detection.send(submission).await
    }
}
