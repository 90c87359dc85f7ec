//! Fake News Verification Client
//!
//! This library provides the client side of the fake-news-verify system:
//! input validation, the request pipeline to the remote classification
//! service, rendering of returned verdicts and the page state that drives
//! them.

pub mod app_state;
pub mod config;
pub mod controller;
pub mod models;
pub mod services;
