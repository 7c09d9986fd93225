//! Gemini text-classification client
//!
//! Thin wrapper around the Generative Language REST API, used only as a
//! fallback by the frequency analyzer. Every request carries a bounded
//! timeout; callers treat any error as "no AI answer" and never depend on
//! this client for correctness.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini client errors
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Classification answer expected from the model
#[derive(Debug, Deserialize)]
struct ClassifyAnswer {
    label: String,
    confidence: f64,
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client with a bounded request timeout
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, GeminiError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }

    /// Classify `text` into one of `candidate_labels`.
    ///
    /// Returns the chosen label and the model's confidence. The label is
    /// validated against the candidate set; anything else is a parse error.
    pub async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<(String, f64), GeminiError> {
        let prompt = format!(
            "Classify the following text into exactly one of these labels: {labels}.\n\
             \n\
             Text: {text}\n\
             \n\
             Respond with a JSON object in this exact format:\n\
             {{\"label\": \"<one of the labels>\", \"confidence\": <0.0 to 1.0>}}",
            labels = candidate_labels.join(", "),
            text = text,
        );

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api(status.as_u16(), body));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        let answer_text = body
            .candidates
            .and_then(|mut c| c.pop())
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GeminiError::Parse("Empty response".to_string()))?;

        let answer: ClassifyAnswer = serde_json::from_str(strip_markdown_fences(&answer_text))
            .map_err(|e| GeminiError::Parse(format!("Bad classification JSON: {}", e)))?;

        if !candidate_labels.iter().any(|l| *l == answer.label) {
            return Err(GeminiError::Parse(format!(
                "Label '{}' not in candidate set",
                answer.label
            )));
        }

        Ok((answer.label, answer.confidence.clamp(0.0, 1.0)))
    }
}

/// Strip a markdown code fence if the model wrapped its JSON in one
fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}
