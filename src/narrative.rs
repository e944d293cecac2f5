//! Client for the external generative-language narrative service.
//!
//! The service is untrusted, possibly slow and possibly down: every call
//! carries a bounded timeout and callers are expected to degrade to
//! placeholder text on failure rather than abort. A trait seam keeps the
//! report assembler testable without a live upstream.

use crate::cli::CommandLineArgs;
use crate::error::HydroscopeError;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// A source of generated narrative text.
#[async_trait]
pub trait NarrativeSource: Send + Sync {
    /// Forward a free-text prompt and return the raw upstream response body.
    async fn query(&self, prompt: &str) -> Result<Value, HydroscopeError>;

    /// Forward a free-text prompt and return the first candidate's text.
    async fn generate(&self, prompt: &str) -> Result<String, HydroscopeError>;
}

/// Response shape of the generative-language API. Only the fields we consume
/// are modelled.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for a Gemini-style generative-language REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiClient {
    /// Return a new GeminiClient
    ///
    /// # Arguments
    ///
    /// * `args`: Command line arguments
    pub fn new(args: &CommandLineArgs) -> Result<Self, HydroscopeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(args.narrative_timeout))
            .build()?;
        Ok(GeminiClient {
            http,
            endpoint: args.narrative_url.clone(),
            api_key: args.narrative_api_key.clone(),
        })
    }
}

#[async_trait]
impl NarrativeSource for GeminiClient {
    async fn query(&self, prompt: &str) -> Result<Value, HydroscopeError> {
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });
        let response = self
            .http
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HydroscopeError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn generate(&self, prompt: &str) -> Result<String, HydroscopeError> {
        let response = self.query(prompt).await?;
        extract_candidate_text(response)
    }
}

/// Pull the first candidate's concatenated part text out of an upstream
/// response body.
fn extract_candidate_text(response: Value) -> Result<String, HydroscopeError> {
    let response: GenerateResponse =
        serde_json::from_value(response).map_err(|_| HydroscopeError::UpstreamEmpty)?;
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(HydroscopeError::UpstreamEmpty)?;
    let text = candidate
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");
    if text.trim().is_empty() {
        Err(HydroscopeError::UpstreamEmpty)
    } else {
        Ok(text)
    }
}

/// A narrative split into its expected sections.
///
/// Sections the upstream did not provide hold [NOT_PROVIDED].
#[derive(Debug, PartialEq)]
pub struct NarrativeSections {
    pub pollution_reason: String,
    pub causes: String,
    pub consequences: String,
    pub solutions: String,
}

/// Placeholder for a section the narrative text did not contain.
pub const NOT_PROVIDED: &str = "Not provided.";

impl NarrativeSections {
    /// Build a set of sections all holding the same placeholder text. Used
    /// when the upstream call failed entirely.
    pub fn placeholder(text: &str) -> Self {
        NarrativeSections {
            pollution_reason: text.to_string(),
            causes: text.to_string(),
            consequences: text.to_string(),
            solutions: text.to_string(),
        }
    }
}

/// Best-effort split of narrative text into sections by heading markers.
///
/// The contract: a line consisting of one of the markers POLLUTION REASON,
/// CAUSES, CONSEQUENCES or SOLUTIONS (any case, optionally decorated with
/// `#`, `*` or a trailing colon) starts that section; text before the first
/// marker belongs to the pollution reason section. Text that contains no
/// marker at all therefore lands in the pollution reason section whole.
pub fn split_sections(text: &str) -> NarrativeSections {
    #[derive(Clone, Copy, PartialEq)]
    enum Section {
        PollutionReason,
        Causes,
        Consequences,
        Solutions,
    }

    fn marker(line: &str) -> Option<Section> {
        let stripped: String = line
            .trim()
            .trim_matches(|c: char| c == '#' || c == '*' || c == ':' || c.is_whitespace())
            .to_uppercase();
        match stripped.as_str() {
            "POLLUTION REASON" | "POLLUTION REASONS" | "REASON" => Some(Section::PollutionReason),
            "CAUSES" | "CAUSE" => Some(Section::Causes),
            "CONSEQUENCES" | "CONSEQUENCE" => Some(Section::Consequences),
            "SOLUTIONS" | "SOLUTION" => Some(Section::Solutions),
            _ => None,
        }
    }

    let mut pollution_reason = Vec::new();
    let mut causes = Vec::new();
    let mut consequences = Vec::new();
    let mut solutions = Vec::new();
    let mut current = Section::PollutionReason;
    for line in text.lines() {
        if let Some(section) = marker(line) {
            current = section;
            continue;
        }
        let buffer = match current {
            Section::PollutionReason => &mut pollution_reason,
            Section::Causes => &mut causes,
            Section::Consequences => &mut consequences,
            Section::Solutions => &mut solutions,
        };
        buffer.push(line.trim());
    }

    fn collect(lines: Vec<&str>) -> String {
        let joined = lines.join("\n");
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            NOT_PROVIDED.to_string()
        } else {
            trimmed.to_string()
        }
    }

    NarrativeSections {
        pollution_reason: collect(pollution_reason),
        causes: collect(causes),
        consequences: collect(consequences),
        solutions: collect(solutions),
    }
}
