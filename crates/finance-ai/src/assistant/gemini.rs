use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AdvisorClient, AssistantError, ChatRole, ChatTurn, GenerationRequest};
use crate::config::AssistantConfig;

const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_API_KEY";

/// Gemini `generateContent` over REST.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'static str>, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

impl GeminiClient {
    pub fn new(config: &AssistantConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &AssistantConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// True when a usable key is present.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    fn api_key(&self) -> Result<&str, AssistantError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(AssistantError::MissingApiKey),
        }
    }

    async fn generate_content(
        &self,
        body: &GenerateContentBody<'_>,
    ) -> Result<String, AssistantError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(model = %self.model, turns = body.contents.len(), "calling text service");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| AssistantError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::MalformedResponse(err.to_string()))?;

        Ok(first_candidate_text(parsed))
    }
}

fn first_candidate_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

#[async_trait]
impl AdvisorClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
        let body = GenerateContentBody {
            contents: vec![Content::text(Some("user"), &request.prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            }),
        };
        self.generate_content(&body).await
    }

    async fn chat(
        &self,
        system_instruction: &str,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, AssistantError> {
        let mut contents: Vec<Content<'_>> = history
            .iter()
            .map(|turn| Content::text(Some(role_name(turn.role)), &turn.text))
            .collect();
        contents.push(Content::text(Some("user"), message));

        let body = GenerateContentBody {
            contents,
            system_instruction: Some(Content::text(None, system_instruction)),
            generation_config: None,
        };
        self.generate_content(&body).await
    }
}
