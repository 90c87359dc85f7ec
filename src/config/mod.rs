use serde::Deserialize;

/// Prefix for every environment variable read by [`AppConfig::from_env`].
const ENV_PREFIX: &str = "FNV_";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the classification service (e.g., "http://127.0.0.1:5000")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Maximum characters accepted by the text inputs
    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,

    /// How long a notification stays visible, in milliseconds
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,

    /// Optional request timeout. Unset means the transport default applies.
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    /// User-Agent header sent to the classification service
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_max_input_length() -> usize {
    5000
}

fn default_notification_ttl_ms() -> u64 {
    3000
}

fn default_user_agent() -> String {
    format!("fake-news-verify/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            max_input_length: default_max_input_length(),
            notification_ttl_ms: default_notification_ttl_ms(),
            http_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX).from_env()
    }

    pub fn notification_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.notification_ttl_ms)
    }
}
