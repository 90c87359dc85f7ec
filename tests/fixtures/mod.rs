//! Canned classifier payloads.

#![allow(dead_code)]

use serde_json::{json, Value};

pub const SERVER_FAKE_SAMPLE: &str = "The President announced today that the Earth is flat and space doesn't exist. Scientists have been lying to us for centuries about this.";

pub const SERVER_REAL_SAMPLE: &str = "The World Health Organization (WHO) announced new guidelines for public health management and disease prevention strategies in collaboration with global health experts.";

pub fn fake_verdict() -> Value {
    json!({
        "success": true,
        "label": "fake",
        "prediction": "Likely Fake News (83.33% confidence)",
        "confidence": 83.33,
        "reason_summary": "clickbait, unverified source",
        "reasons": ["clickbait", "unverified source"],
        "processing_time": "0.012s",
        "platform": "twitter"
    })
}

pub fn real_verdict() -> Value {
    json!({
        "success": true,
        "label": "real",
        "prediction": "Likely Real News (75.0% confidence)",
        "confidence": 75.0,
        "reason_summary": "research, study",
        "reasons": ["research", "study", "official"],
        "processing_time": "0.009s",
        "platform": "news"
    })
}

pub fn verdict_with_confidence(confidence: Value) -> Value {
    json!({
        "success": true,
        "label": "neutral",
        "prediction": "Unclear",
        "confidence": confidence
    })
}

pub fn rate_limited() -> Value {
    json!({ "success": false, "error": "rate limited" })
}
