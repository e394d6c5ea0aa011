//! services/api/src/adapters/completion_llm.rs
//!
//! This module contains the adapter for the lesson-generating LLM.
//! It implements the `CompletionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use teachwave_core::{
    ports::{CompletionService, PortError, PortResult},
    templates::system_instruction,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible chat model.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, max_tokens: u32, temperature: f32) -> Self {
        Self {
            client,
            model,
            max_tokens,
            temperature,
        }
    }
}

/// Splits client failures into "could not reach / refused" and "answered with junk".
fn map_openai_error(err: OpenAIError) -> PortError {
    match err {
        OpenAIError::JSONDeserialize(e) => PortError::Malformed(e.to_string()),
        OpenAIError::InvalidArgument(msg) => PortError::Unexpected(msg),
        other => PortError::Unavailable(other.to_string()),
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    async fn complete(&self, prompt: &str, language: &str) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_instruction(language))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Sending completion request to model {}", self.model);
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        // An empty message is a valid success; the caller substitutes its own fallback.
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            PortError::Malformed("Completion response returned no choices.".to_string())
        })?;
        Ok(choice.message.content.unwrap_or_default())
    }
}
