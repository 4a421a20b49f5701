//! AI advisor boundary.
//!
//! The text model is a black box behind [`AdvisorClient`]: it takes a prompt
//! and returns text or an [`AssistantError`]. [`Advisor`] decides what a
//! failure means for the caller. A missing API key is surfaced, since nothing
//! useful can happen until it is configured; every other failure degrades to
//! a canned reply.

mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::health::HealthReport;

pub const FALLBACK_INSIGHT: &str =
    "AI Insight: ลองตรวจสอบค่าใช้จ่ายในหมวดอาหารที่ดูเหมือนจะสูงขึ้นในสัปดาห์นี้";
pub const FALLBACK_ANALYSIS: &str =
    "ขออภัยครับ ขณะนี้ไม่สามารถวิเคราะห์ข้อมูลการเงินด้วย AI ได้ โปรดลองอีกครั้งภายหลัง";
pub const FALLBACK_CHAT: &str =
    "ขออภัยครับ เกิดข้อผิดพลาดในการเชื่อมต่อกับระบบ AI โปรดลองอีกครั้งภายหลัง";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

/// One earlier message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Single-shot generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Text generation service.
#[async_trait]
pub trait AdvisorClient: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError>;
    async fn chat(
        &self,
        system_instruction: &str,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, AssistantError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("GEMINI_API_KEY is not set or invalid")]
    MissingApiKey,
    #[error("text service unreachable: {0}")]
    Transport(String),
    #[error("text service responded with status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("text service returned an unreadable response: {0}")]
    MalformedResponse(String),
}

/// Whether a reply came from the model or from a canned fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorReply {
    pub text: String,
    pub source: ReplySource,
}

impl AdvisorReply {
    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source: ReplySource::Fallback,
        }
    }
}

/// Turns health reports and chat messages into advisor replies.
pub struct Advisor<C> {
    client: Arc<C>,
}

impl<C> Advisor<C>
where
    C: AdvisorClient + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// One short, actionable tip for the dashboard.
    pub async fn insight(&self, report: &HealthReport) -> Result<AdvisorReply, AssistantError> {
        let request = GenerationRequest {
            prompt: prompt::insight_prompt(report),
            temperature: 0.7,
            max_output_tokens: 150,
        };
        let outcome = self.client.generate(&request).await;
        settle("insight", outcome, FALLBACK_INSIGHT)
    }

    /// A longer reading of every metric for the analysis view.
    pub async fn analysis(&self, report: &HealthReport) -> Result<AdvisorReply, AssistantError> {
        let request = GenerationRequest {
            prompt: prompt::analysis_prompt(report),
            temperature: 0.7,
            max_output_tokens: 800,
        };
        let outcome = self.client.generate(&request).await;
        settle("analysis", outcome, FALLBACK_ANALYSIS)
    }

    pub async fn chat(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<AdvisorReply, AssistantError> {
        let outcome = self
            .client
            .chat(prompt::CHAT_SYSTEM_INSTRUCTION, message, history)
            .await;
        settle("chat", outcome, FALLBACK_CHAT)
    }
}

fn settle(
    purpose: &'static str,
    outcome: Result<String, AssistantError>,
    fallback: &str,
) -> Result<AdvisorReply, AssistantError> {
    match outcome {
        Ok(text) => match normalize_reply(&text) {
            Some(text) => Ok(AdvisorReply {
                text,
                source: ReplySource::Model,
            }),
            None => {
                warn!(purpose, "text service returned an empty reply");
                Ok(AdvisorReply::fallback(fallback))
            }
        },
        Err(AssistantError::MissingApiKey) => Err(AssistantError::MissingApiKey),
        Err(err) => {
            warn!(purpose, error = %err, "text service failed, using fallback");
            Ok(AdvisorReply::fallback(fallback))
        }
    }
}

fn normalize_reply(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
