use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{
    api_client::VerificationBackend, chrome::DEFAULT_SCROLL_THRESHOLD,
    notifications::NotificationCenter,
};

/// Application context owned by the page controller.
pub struct AppState {
    pub initialized: bool,
    pub scroll_threshold: u32,
    pub nav_active: bool,
    pub max_input_length: usize,
    pub backend: Arc<dyn VerificationBackend>,
    pub notifications: Arc<NotificationCenter>,
}

impl AppState {
    pub fn new(config: &AppConfig, backend: Arc<dyn VerificationBackend>) -> Self {
        Self {
            initialized: false,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            nav_active: false,
            max_input_length: config.max_input_length,
            backend,
            notifications: Arc::new(NotificationCenter::new(config.notification_ttl())),
        }
    }
}
