//! Gemini-backed intent classifier.
//!
//! Calls the `generateContent` endpoint with the recent turn window and the
//! already-known fields, asking for the JSON wire schema the routing layer
//! parses. Everything that can go wrong here maps to a `ClassifierError`,
//! which the orchestrator recovers from with the deterministic fallback.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::chart::ChartRequest;
use crate::domain::intent::Classification;
use crate::domain::routing;
use crate::domain::session::{Turn, TurnRole};
use crate::ports::classifier::{ClassifierError, IntentClassifier};

const SYSTEM_PROMPT: &str = r#"You route requests for a chart-generation agent.
Given the recent conversation and the fields already known for the current
chart request, respond with ONLY a JSON object in this schema:

{
  "intent": "create_chart" | "modify_chart" | "set_preference" | "off_topic",
  "chart_type": "bar" | "line",
  "style": "fd" | "bnr",
  "format": "raster" | "vector",
  "filename": "<name the user asked to save as>",
  "data": [{"label": "<label>", "value": <number>}],
  "source_file": "<path of a data file the user referenced>",
  "preference_target": "style" | "format",
  "preference_value": "<value>",
  "data_operation": "keep" | "replace" | "append"
}

Omit every field you are not sure about except "intent". Use "modify_chart"
only when the user refers to the chart created earlier in the conversation.
Use "set_preference" when the user asks to change a default. Anything not
about charts is "off_topic". No prose, no code fences."#;

/// Configuration for the Gemini classifier.
#[derive(Debug, Clone)]
pub struct GeminiClassifierConfig {
    /// API key; absent means the classifier reports itself unavailable.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for GeminiClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Intent classifier backed by the Gemini API.
pub struct GeminiClassifier {
    client: reqwest::Client,
    config: GeminiClassifierConfig,
}

impl GeminiClassifier {
    pub fn new(config: GeminiClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn build_url(&self, key: &SecretString) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint,
            self.config.model,
            key.expose_secret()
        )
    }

    fn build_user_prompt(recent_turns: &[Turn], known_fields: &ChartRequest) -> String {
        let mut prompt = String::from("Conversation (oldest first):\n");
        for turn in recent_turns {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "assistant",
            };
            prompt.push_str(&format!("{role}: {}\n", turn.text));
        }
        let known = serde_json::to_string(known_fields).unwrap_or_else(|_| "{}".into());
        prompt.push_str(&format!("\nKnown fields for the current request: {known}\n"));
        prompt
    }
}

// Gemini API request/response structures.

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiSystemInstruction,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[async_trait]
impl IntentClassifier for GeminiClassifier {
    async fn classify(
        &self,
        recent_turns: &[Turn],
        known_fields: &ChartRequest,
    ) -> Result<Classification, ClassifierError> {
        let Some(key) = &self.config.api_key else {
            return Err(ClassifierError::Unavailable(
                "no API key configured".into(),
            ));
        };

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: Self::build_user_prompt(recent_turns, known_fields),
                }],
            }],
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
            generation_config: GeminiGenerationConfig { temperature: 0.0 },
        };

        let response = self
            .client
            .post(self.build_url(key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    ClassifierError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ClassifierError::Transport(format!(
                "classifier endpoint returned {status}"
            )));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        if let Some(error) = payload.error {
            return Err(ClassifierError::Transport(error.message));
        }

        let text = payload
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| ClassifierError::Parse("empty candidate list".into()))?;

        routing::parse_classifier_payload(&text)
            .map_err(|e| ClassifierError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::ChartType;

    #[test]
    fn test_user_prompt_includes_window_and_known_fields() {
        let turns = vec![Turn::user("A=10, B=20"), Turn::assistant("Which style?")];
        let known = ChartRequest::new().with_chart_type(ChartType::Bar);

        let prompt = GeminiClassifier::build_user_prompt(&turns, &known);

        assert!(prompt.contains("user: A=10, B=20"));
        assert!(prompt.contains("assistant: Which style?"));
        assert!(prompt.contains("\"chart_type\":\"bar\""));
    }

    #[tokio::test]
    async fn test_missing_api_key_reports_unavailable() {
        let classifier = GeminiClassifier::new(GeminiClassifierConfig::default()).unwrap();

        let result = classifier.classify(&[], &ChartRequest::new()).await;

        assert!(matches!(result, Err(ClassifierError::Unavailable(_))));
    }
}
