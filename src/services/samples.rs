use tracing::{info, warn};

use crate::models::sample::SampleKind;
use crate::services::api_client::VerificationBackend;

/// Where a loaded sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSample {
    pub text: String,
    pub source: SampleSource,
}

/// Fetch the sample for `tag`, falling back to the built-in text on any
/// failure. Never fails and never returns empty text.
pub async fn load_sample(backend: &dyn VerificationBackend, tag: &str) -> LoadedSample {
    match backend.fetch_sample(tag).await {
        Ok(text) => {
            info!(sample_type = tag, "Loaded sample from classifier");
            LoadedSample {
                text,
                source: SampleSource::Remote,
            }
        }
        Err(e) => {
            let kind = SampleKind::from_tag(tag);
            warn!(sample_type = tag, fallback = %kind, error = %e, "Sample fetch failed, using built-in text");
            metrics::counter!("sample_fallbacks_total").increment(1);
            LoadedSample {
                text: kind.fallback_text().to_string(),
                source: SampleSource::Fallback,
            }
        }
    }
}
