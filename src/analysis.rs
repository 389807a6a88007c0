use crate::conversation::Answers;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are Clarity, an empathetic AI companion. Your goal is to help users understand their emotions without being clinical. Analyze the user's input: their mood (1-5), the reason they gave, and a summary of their day. Provide a short, insightful, and supportive paragraph (2-4 sentences). Validate their feelings and gently highlight connections between their day and their mood. Do NOT give medical advice. Your tone should be warm and encouraging, not clinical.";

pub const TRANSPORT_FALLBACK: &str =
    "I'm having a little trouble connecting right now. Please check your connection and try again.";
pub const STATUS_FALLBACK: &str =
    "I'm having a little trouble gathering my thoughts right now. Please try again later.";
pub const MALFORMED_FALLBACK: &str =
    "I've reflected on what you said. It's really valuable that you're taking this time for yourself.";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("analysis response had no usable text")]
    Malformed,
}

impl AnalysisError {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            AnalysisError::Transport(_) => TRANSPORT_FALLBACK,
            AnalysisError::Status { .. } => STATUS_FALLBACK,
            AnalysisError::Malformed => MALFORMED_FALLBACK,
        }
    }
}

/// Produces a short supportive reflection for one finished check-in.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, answers: &Answers) -> Result<String, AnalysisError>;
}

/// Runs the analyzer and swaps any failure for its fixed fallback text.
pub async fn analyze_or_fallback(analyzer: &dyn Analyzer, answers: &Answers) -> String {
    match analyzer.analyze(answers).await {
        Ok(text) => text,
        Err(err) => {
            warn!("analysis failed: {err}");
            err.fallback_message().to_string()
        }
    }
}

pub fn user_query(answers: &Answers) -> String {
    format!(
        "My mood is {}/5. The reason is: \"{}\". My day was about: \"{}\".",
        answers.mood, answers.reason, answers.day_summary
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
fn extract_text(body: &[u8]) -> Result<String, AnalysisError> {
    let response: GenerateResponse =
        serde_json::from_slice(body).map_err(|_| AnalysisError::Malformed)?;
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(AnalysisError::Malformed)
}

#[derive(Clone)]
pub struct GenerativeClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GenerativeClient {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            base_url,
            model,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Analyzer for GenerativeClient {
    async fn analyze(&self, answers: &Answers) -> Result<String, AnalysisError> {
        let request = GenerateRequest {
            contents: vec![Content::text(user_query(answers))],
            system_instruction: Content::text(SYSTEM_PROMPT),
        };

        debug!(mood = answers.mood.value(), "requesting analysis");
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        extract_text(&body)
    }
}
