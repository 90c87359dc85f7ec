use garde::Validate;
use tracing::debug;

use crate::models::verification::{Platform, VerificationRequest};

/// Minimum trimmed length accepted by the detection form.
pub const MIN_DETECTION_LENGTH: usize = 10;

/// Local, pre-flight input errors. None of these ever reach the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please paste some content or a URL to verify.")]
    EmptySocialContent,

    #[error("Please enter some text to analyze")]
    EmptyDetectionText,

    #[error("Please enter at least 10 characters")]
    DetectionTextTooShort,
}

/// Form data posted to the detection endpoint.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct DetectionSubmission {
    #[garde(length(chars, min = 10))]
    pub news: String,
}

/// Gate for the social verification form.
pub fn validate_social_input(
    platform: Option<&str>,
    content: &str,
) -> Result<VerificationRequest, ValidationError> {
    let request = VerificationRequest::new(Platform::from_selector(platform), content);

    request.validate().map_err(|report| {
        debug!(%report, "Rejected social verification input");
        ValidationError::EmptySocialContent
    })?;

    Ok(request)
}

/// Gate for the primary detection form: non-empty, then at least
/// [`MIN_DETECTION_LENGTH`] characters after trimming. Text longer than
/// `max_length` characters is cut to `max_length`.
pub fn validate_detection_input(
    text: &str,
    max_length: usize,
) -> Result<DetectionSubmission, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDetectionText);
    }

    let submission = DetectionSubmission {
        news: truncate_chars(trimmed, max_length).to_string(),
    };

    submission.validate().map_err(|report| {
        debug!(%report, "Rejected detection input");
        ValidationError::DetectionTextTooShort
    })?;

    Ok(submission)
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
