//! Reply generation backends
//!
//! The session never talks to a model directly. It issues a request and waits
//! for a [`ReplyGenerator`] to answer; the placeholder answers after a fixed
//! delay, the HTTP backend calls an OpenAI-compatible chat completions API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::message::{Message, Role};
use crate::catalog::{AgentDescriptor, builtin};
use crate::config::{ReplyBackend, ReplyConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyFailure {
    #[error("reply service unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected reply from service: {0}")]
    InvalidResponse(String),
    #[error("reply was cancelled")]
    Cancelled,
}

#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Produce the assistant's answer to the last user message in `transcript`
    async fn generate_reply(&self, transcript: &[Message], agent: &AgentDescriptor) -> Result<String, ReplyFailure>;
}

/// Canned answer after a simulated think time
pub struct PlaceholderReplies {
    delay: Duration,
}

impl PlaceholderReplies {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReplyGenerator for PlaceholderReplies {
    async fn generate_reply(&self, transcript: &[Message], agent: &AgentDescriptor) -> Result<String, ReplyFailure> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let prompt = last_user_text(transcript);
        Ok(format!(
            "I'm the {} AI. Here's a response to your query: \"{}\".",
            agent.name, prompt
        ))
    }
}

fn last_user_text(transcript: &[Message]) -> &str {
    transcript
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client
pub struct HttpReplies {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpReplies {
    pub fn new(endpoint: String, model: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint,
            model,
            api_key,
            timeout,
        }
    }

    fn request_body(&self, transcript: &[Message], system: &str) -> Result<String, ReplyFailure> {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: system,
        }];
        // The first message is our own greeting, not something the model said
        for message in transcript.iter().skip(1) {
            messages.push(ChatMessage {
                role: match message.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &message.content,
            });
        }

        let request = ChatRequest {
            model: &self.model,
            messages,
        };
        serde_json::to_string(&request).map_err(|e| ReplyFailure::InvalidResponse(e.to_string()))
    }

    fn post(endpoint: &str, api_key: Option<&str>, timeout: Duration, body: &str) -> Result<String, ReplyFailure> {
        let config = ureq::Agent::config_builder().timeout_global(Some(timeout)).build();
        let agent = ureq::Agent::new_with_config(config);

        let mut request = agent.post(endpoint).header("Content-Type", "application/json");
        if let Some(key) = api_key {
            request = request.header("Authorization", &format!("Bearer {}", key));
        }

        let mut response = request
            .send(body.as_bytes())
            .map_err(|e| ReplyFailure::Unavailable(e.to_string()))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ReplyFailure::Unavailable(e.to_string()))?;

        parse_reply(&text)
    }
}

fn parse_reply(body: &str) -> Result<String, ReplyFailure> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ReplyFailure::InvalidResponse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ReplyFailure::InvalidResponse("no content in response".to_string()))
}

#[async_trait]
impl ReplyGenerator for HttpReplies {
    async fn generate_reply(&self, transcript: &[Message], agent: &AgentDescriptor) -> Result<String, ReplyFailure> {
        let system = builtin::system_prompt(agent);
        let body = self.request_body(transcript, &system)?;
        log::debug!("Sending {} bytes to {}", body.len(), self.endpoint);

        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        let timeout = self.timeout;
        // ureq blocks
        tokio::task::spawn_blocking(move || Self::post(&endpoint, api_key.as_deref(), timeout, &body))
            .await
            .map_err(|_| ReplyFailure::Cancelled)?
    }
}

/// Build the configured backend
pub fn from_config(config: &ReplyConfig) -> eyre::Result<Box<dyn ReplyGenerator>> {
    match config.backend {
        ReplyBackend::Placeholder => Ok(Box::new(PlaceholderReplies::new(Duration::from_millis(config.delay_ms)))),
        ReplyBackend::Http => {
            let endpoint = config
                .endpoint
                .clone()
                .ok_or_else(|| eyre::eyre!("reply.endpoint must be set for the http backend"))?;
            let api_key = config.api_key_env.as_ref().and_then(|var| std::env::var(var).ok());
            if api_key.is_none() {
                log::warn!("No API key found for http reply backend, sending unauthenticated requests");
            }
            Ok(Box::new(HttpReplies::new(
                endpoint,
                config.model.clone(),
                api_key,
                Duration::from_secs(config.timeout_secs),
            )))
        }
    }
}
