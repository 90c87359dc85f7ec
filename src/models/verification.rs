use garde::Validate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

pub const DEFAULT_PREDICTION: &str = "Result unavailable";
pub const DEFAULT_LABEL: &str = "neutral";
pub const DEFAULT_PROCESSING_TIME: &str = "-";
pub const DEFAULT_RESULT_PLATFORM: &str = "social";

/// Declared source of the content being verified.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    Twitter,
    Facebook,
    Instagram,
    Youtube,
    #[serde(rename = "news url")]
    #[strum(serialize = "news url")]
    NewsUrl,
    #[default]
    News,
}

impl Platform {
    /// Resolve the value of the platform selector. Missing or blank values
    /// fall back to [`Platform::News`]; so do values outside the known set.
    pub fn from_selector(value: Option<&str>) -> Self {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::default();
        };

        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(platform = raw, "Unknown platform selected, using news");
            Self::default()
        })
    }
}

/// Body of `POST /api/social-verify`.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct VerificationRequest {
    #[garde(skip)]
    pub platform: Platform,

    #[garde(length(min = 1))]
    pub content: String,
}

impl VerificationRequest {
    /// Build a request; content is trimmed on the way in.
    pub fn new(platform: Platform, content: &str) -> Self {
        Self {
            platform,
            content: content.trim().to_string(),
        }
    }
}

/// Classification outcome, also used as the badge class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Label {
    Fake,
    Real,
    #[default]
    Neutral,
}

impl Label {
    /// Only the exact strings "fake" and "real" are recognized.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "fake" => Label::Fake,
            "real" => Label::Real,
            _ => Label::Neutral,
        }
    }
}

/// Response payload of `POST /api/social-verify`.
///
/// The classifier is an external service, so every field is optional and
/// decoding never fails on a single badly-typed field: it is dropped and the
/// accessor returns the documented default instead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VerificationResult {
    /// Human-readable verdict. Default: "Result unavailable".
    #[serde(default, deserialize_with = "lenient::string")]
    pub prediction: Option<String>,

    /// Raw classifier label. Default: "neutral".
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: Option<String>,

    /// Score, nominally 0-100. Numeric strings are accepted; anything
    /// non-finite is dropped. Default: 0.
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: Option<f64>,

    /// Default: empty.
    #[serde(default, deserialize_with = "lenient::string")]
    pub reason_summary: Option<String>,

    /// Indicator strings in display order. Default: empty.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub reasons: Vec<String>,

    /// Default: "-".
    #[serde(default, deserialize_with = "lenient::string")]
    pub processing_time: Option<String>,

    /// Echo of the requesting platform. Default: "social".
    #[serde(default, deserialize_with = "lenient::string")]
    pub platform: Option<String>,

    /// Only a literal `true` counts.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub success: bool,

    #[serde(default, deserialize_with = "lenient::string")]
    pub error: Option<String>,
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn prediction(&self) -> &str {
        self.prediction.as_deref().unwrap_or(DEFAULT_PREDICTION)
    }

    pub fn raw_label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn label(&self) -> Label {
        Label::from_raw(self.raw_label())
    }

    /// Confidence as reported, with missing values read as 0.
    pub fn confidence(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }

    /// Confidence bounded to `[0, 100]` for sizing the indicator.
    pub fn clamped_confidence(&self) -> f64 {
        clamp_confidence(self.confidence)
    }

    pub fn reason_summary(&self) -> &str {
        self.reason_summary.as_deref().unwrap_or_default()
    }

    pub fn processing_time(&self) -> &str {
        self.processing_time
            .as_deref()
            .unwrap_or(DEFAULT_PROCESSING_TIME)
    }

    pub fn platform(&self) -> &str {
        self.platform.as_deref().unwrap_or(DEFAULT_RESULT_PLATFORM)
    }

    /// Server-supplied failure message, ignoring blank strings.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// Clamp a confidence score to `[0, 100]`. Missing or non-finite scores are 0.
pub fn clamp_confidence(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

mod lenient {
    use super::*;

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(parsed.filter(|v| v.is_finite()))
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Array(items) = Value::deserialize(deserializer)? else {
            return Ok(Vec::new());
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect())
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
    }
}
