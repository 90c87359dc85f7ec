use std::fmt;

use serde::Serialize;

use crate::models::verification::{Label, VerificationResult};

/// Display-ready form of a successful verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub badge: Label,
    pub badge_text: String,
    pub title: String,
    /// Score as reported by the classifier (missing reads as 0).
    pub confidence: f64,
    /// Width of the confidence indicator, always within `[0, 100]`.
    pub indicator_width: f64,
    pub platform: String,
    pub processing_time: String,
    pub summary: String,
    pub reasons: Vec<String>,
}

impl ResultCard {
    pub fn from_result(result: &VerificationResult) -> Self {
        Self {
            badge: result.label(),
            badge_text: result.raw_label().to_uppercase(),
            title: result.prediction().to_string(),
            confidence: result.confidence(),
            indicator_width: result.clamped_confidence(),
            platform: result.platform().to_string(),
            processing_time: result.processing_time().to_string(),
            summary: result.reason_summary().to_string(),
            reasons: result.reasons.clone(),
        }
    }

    pub fn confidence_text(&self) -> String {
        format!("Confidence: {}%", self.confidence)
    }

    pub fn source_line(&self) -> String {
        format!("Source: {} • {}", self.platform, self.processing_time)
    }

    /// Markup for the result container. All text is escaped.
    pub fn to_html(&self) -> String {
        let reason_tags: String = self
            .reasons
            .iter()
            .map(|reason| format!(r#"<span class="reason-tag">{}</span>"#, escape_html(reason)))
            .collect();

        format!(
            r#"<div class="social-result-card">
    <div>
        <div class="result-badge {badge}">{badge_text}</div>
        <h3 class="result-title">{title}</h3>
        <p class="confidence-text">{confidence}</p>
        <p class="processing-time">{source}</p>
        <p class="about-description">{summary}</p>
        <div class="reason-tags">{reason_tags}</div>
    </div>
    <div>
        <div class="confidence-bar">
            <div class="confidence-fill" data-confidence="{width}" style="width: {width}%"></div>
        </div>
        <p class="processing-time">Top indicators drive the bar width.</p>
    </div>
</div>"#,
            badge = self.badge.as_ref(),
            badge_text = escape_html(&self.badge_text),
            title = escape_html(&self.title),
            confidence = escape_html(&self.confidence_text()),
            source = escape_html(&self.source_line()),
            summary = escape_html(&self.summary),
            reason_tags = reason_tags,
            width = self.indicator_width,
        )
    }
}

impl fmt::Display for ResultCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.badge_text, self.title)?;
        writeln!(f, "{}", self.confidence_text())?;
        writeln!(f, "{}", confidence_bar(self.indicator_width, 20))?;
        writeln!(f, "{}", self.source_line())?;
        if !self.summary.is_empty() {
            writeln!(f, "{}", self.summary)?;
        }
        if !self.reasons.is_empty() {
            let tags: Vec<String> = self.reasons.iter().map(|r| format!("#{r}")).collect();
            writeln!(f, "{}", tags.join(" "))?;
        }
        Ok(())
    }
}

fn confidence_bar(width: f64, cells: usize) -> String {
    let filled = ((width / 100.0) * cells as f64).round() as usize;
    let filled = filled.min(cells);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(cells - filled))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
