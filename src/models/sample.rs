use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};

/// Built-in fallback used when the fake sample cannot be fetched.
pub const FALLBACK_FAKE_SAMPLE: &str = "BREAKING: Scientists discover that chocolate cures all diseases! Doctors hate this one simple trick that Big Pharma doesn't want you to know about.";

/// Built-in fallback used when the real sample cannot be fetched.
pub const FALLBACK_REAL_SAMPLE: &str = "Researchers at a major university have published a peer-reviewed study in a scientific journal showing promising results in early-stage cancer treatment trials.";

/// Which canned example to load into the detection input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SampleKind {
    Fake,
    Real,
}

impl SampleKind {
    /// Unrecognized tags resolve to [`SampleKind::Real`].
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(SampleKind::Real)
    }

    pub fn fallback_text(self) -> &'static str {
        match self {
            SampleKind::Fake => FALLBACK_FAKE_SAMPLE,
            SampleKind::Real => FALLBACK_REAL_SAMPLE,
        }
    }
}

/// Response payload of `GET /api/sample`.
#[derive(Debug, Deserialize)]
pub struct SampleResponse {
    #[serde(default)]
    pub news: Option<String>,
}
