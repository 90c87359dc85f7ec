pub mod api_client;
pub mod chrome;
pub mod detection;
pub mod notifications;
pub mod pipeline;
pub mod render;
pub mod samples;
pub mod validation;
