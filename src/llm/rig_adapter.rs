//! Bridges rig's `CompletionModel` to our `LlmProvider` trait.

use async_trait::async_trait;
use rig::agent::AgentBuilder;
use rig::completion::{CompletionModel, Prompt};

use crate::error::LlmError;

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider, Role};

/// Wraps a rig completion model.
///
/// Each request builds a one-shot agent: system messages become the preamble,
/// the last user message becomes the prompt, and any earlier turns are folded
/// into the preamble as a transcript.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    provider: &'static str,
}

impl<M> RigAdapter<M>
where
    M: CompletionModel + Clone + Send + Sync + 'static,
{
    pub fn new(model: M, model_name: &str, provider: &'static str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            provider,
        }
    }
}

/// Split a request into (preamble, prompt).
fn split_request(request: &CompletionRequest) -> Option<(String, String)> {
    let last_user = request
        .messages
        .iter()
        .rposition(|m| m.role == Role::User)?;

    let mut preamble = request.system_prompt().unwrap_or_default();
    let history: Vec<String> = request.messages[..last_user]
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| match m.role {
            Role::User => format!("User: {}", m.content),
            _ => format!("Assistant: {}", m.content),
        })
        .collect();
    if !history.is_empty() {
        if !preamble.is_empty() {
            preamble.push_str("\n\n");
        }
        preamble.push_str("Conversation so far:\n");
        preamble.push_str(&history.join("\n"));
    }

    Some((preamble, request.messages[last_user].content.clone()))
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Clone + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let (preamble, prompt) =
            split_request(&request).ok_or_else(|| LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                reason: "request has no user message".to_string(),
            })?;

        let mut builder = AgentBuilder::new(self.model.clone()).preamble(&preamble);
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        if let Some(max_tokens) = request.max_tokens {
            builder = builder.max_tokens(u64::from(max_tokens));
        }
        let agent = builder.build();

        let content: String =
            agent
                .prompt(prompt.as_str())
                .await
                .map_err(|e| LlmError::RequestFailed {
                    provider: self.provider.to_string(),
                    reason: e.to_string(),
                })?;

        tracing::debug!(
            provider = self.provider,
            model = %self.model_name,
            chars = content.len(),
            "Completion received"
        );

        Ok(CompletionResponse { content })
    }
}
