use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::AppConfig;
use crate::models::sample::SampleResponse;
use crate::models::verification::{VerificationRequest, VerificationResult};

const VERIFY_PATH: &str = "/api/social-verify";
const SAMPLE_PATH: &str = "/api/sample";
const DETECT_PATH: &str = "/predict";

/// Remote classification service as seen from the page.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    /// Submit content for classification. Only a well-formed payload with
    /// `success: true` and a 2xx status is returned as `Ok`.
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationResult, ApiError>;

    /// Fetch the canned sample text for a sample tag.
    async fn fetch_sample(&self, tag: &str) -> Result<String, ApiError>;

    /// Traditional form submission of the detection text. Returns the
    /// page body the server answers with.
    async fn submit_detection(&self, news: &str) -> Result<String, ApiError>;
}

/// HTTP client for the fake news classification service.
pub struct ClassifierClient {
    http: Client,
    base_url: String,
}

impl ClassifierClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::from_config(&AppConfig {
            api_base_url: base_url.to_string(),
            ..AppConfig::default()
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder.build().map_err(ApiError::Http)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl VerificationBackend for ClassifierClient {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationResult, ApiError> {
        let response = self
            .http
            .post(self.endpoint(VERIFY_PATH))
            .json(request)
            .send()
            .await
            .map_err(ApiError::Http)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::Http)?;

        // The body decides success; a 200 can still carry `success: false`.
        let result: VerificationResult = serde_json::from_slice(&body).map_err(ApiError::Decode)?;

        if !status.is_success() || !result.is_success() {
            return Err(ApiError::Rejected {
                status,
                message: result.error_message().map(str::to_string),
            });
        }

        Ok(result)
    }

    async fn fetch_sample(&self, tag: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .get(self.endpoint(SAMPLE_PATH))
            .query(&[("type", tag)])
            .send()
            .await
            .map_err(ApiError::Http)?
            .error_for_status()
            .map_err(ApiError::Http)?;

        let payload: SampleResponse = response.json().await.map_err(ApiError::Http)?;

        payload
            .news
            .filter(|news| !news.is_empty())
            .ok_or(ApiError::MissingSample)
    }

    async fn submit_detection(&self, news: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.endpoint(DETECT_PATH))
            .form(&[("news", news)])
            .send()
            .await
            .map_err(ApiError::Http)?
            .error_for_status()
            .map_err(ApiError::Http)?;

        response.text().await.map_err(ApiError::Http)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode classifier response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Classifier rejected the request with status {status}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Sample response did not contain any text")]
    MissingSample,
}
