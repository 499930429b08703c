//! GURU, the business advisor chat.
//!
//! The whole conversation is flattened into one text prompt behind a
//! fixed system instruction and sent to a text-completion backend.
//! A failed call is attempted once and its error becomes the reply.

use crate::{
    config::AdvisorConfig,
    error::{DashError, DashResult},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SYSTEM_PROMPT: &str = "You are GURU, an AI business advisor focused on an online + retail \
soda business. You give concise, actionable advice using short paragraphs and bullet points. \
Prioritize insights about inventory risk, restocking, sales trends, pricing, and promotions. \
If you need more context, ask a brief, specific follow-up question.";

pub const GREETING: &str = "Hi, I'm GURU, your AI business advisor for this soda business.\n\n\
Ask me about inventory, sales performance, pricing strategies, or promotions, \
and I'll give you practical, data-minded suggestions.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn speaker(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "GURU",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Transcript of one session's chat, oldest turn first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// A new conversation opens with the advisor's greeting.
    pub fn new() -> Self {
        Self {
            turns: vec![ChatTurn {
                role: ChatRole::Assistant,
                content: GREETING.to_string(),
            }],
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role,
            content: content.into(),
        });
    }

    /// System instruction followed by every turn as `Speaker: text`.
    pub fn compose_prompt(&self) -> String {
        let mut prompt = String::from(SYSTEM_PROMPT);
        prompt.push_str("\n\nConversation so far:\n");
        for turn in &self.turns {
            prompt.push_str(turn.role.speaker());
            prompt.push_str(": ");
            prompt.push_str(&turn.content);
            prompt.push_str("\n\n");
        }
        prompt
    }
}

/// A backend that turns one prompt into one completion.
pub trait TextCompletion: Send {
    fn complete(&self, prompt: &str) -> DashResult<String>;
}

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
    api_base: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<PartOut<'a>>,
}

#[derive(Serialize)]
struct PartOut<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
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
    parts: Vec<PartIn>,
}

#[derive(Deserialize)]
struct PartIn {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &AdvisorConfig) -> DashResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

impl TextCompletion for GeminiClient {
    fn complete(&self, prompt: &str) -> DashResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![PartOut { text: prompt }],
            }],
        };
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(DashError::Completion(format!("{status}: {text}")));
        }

        let parsed: GenerateResponse = response.json()?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(DashError::Completion("empty completion".into()));
        }
        Ok(text)
    }
}

/// Reply text shown in place of a completion when the call fails.
pub fn failure_reply(err: &DashError) -> String {
    format!(
        "I ran into an error talking to the Gemini API:\n\n`{err}`\n\n\
         Double-check your API key and billing/project settings in Google AI Studio."
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorReply {
    pub text: String,
    /// False when `text` reports a failed completion call.
    pub ok: bool,
}

/// Record the question, ask the backend once, record and return the reply.
pub fn ask(client: &dyn TextCompletion, conversation: &mut Conversation, question: &str) -> AdvisorReply {
    conversation.push(ChatRole::User, question);
    let prompt = conversation.compose_prompt();
    let reply = match client.complete(&prompt) {
        Ok(text) => AdvisorReply { text, ok: true },
        Err(e) => {
            log::warn!("advisor completion failed: {e}");
            AdvisorReply {
                text: failure_reply(&e),
                ok: false,
            }
        }
    };
    conversation.push(ChatRole::Assistant, reply.text.clone());
    reply
}
