//! crates/teachwave_core/src/generation.rs
//!
//! The lesson generation use case: validate, render, call the completion port.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{GeneratedLesson, LessonRequest};
use crate::ports::{CompletionService, PortError};
use crate::templates;

/// Substituted when the completion service succeeds with empty text.
pub const NO_CONTENT_FALLBACK: &str = "No AI content returned.";

/// Everything that can stop a generation request.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The caller exceeded its request quota for the current window.
    #[error("Rate limit exceeded")]
    AdmissionRejected,
    #[error("AI Error: {0}")]
    UpstreamUnavailable(String),
    #[error("AI Error: unusable response ({0})")]
    MalformedUpstreamResponse(String),
    #[error("{0}")]
    EmptyInput(String),
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl From<PortError> for GenerationError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Malformed(msg) => GenerationError::MalformedUpstreamResponse(msg),
            PortError::Unavailable(msg) | PortError::NotFound(msg) | PortError::Unexpected(msg) => {
                GenerationError::UpstreamUnavailable(msg)
            }
        }
    }
}

/// Drives the completion port for prompt, lesson-plan and simplify requests.
#[derive(Clone)]
pub struct LessonGenerator {
    completion: Arc<dyn CompletionService>,
}

impl LessonGenerator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Sends an already assembled prompt.
    ///
    /// A blank prompt is rejected before the completion service is contacted.
    pub async fn complete(&self, prompt: &str, language: &str) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyInput("Missing prompt".to_string()));
        }

        let output = self.completion.complete(prompt, language).await.map_err(|e| {
            warn!("Completion request failed: {}", e);
            GenerationError::from(e)
        })?;

        if output.trim().is_empty() {
            info!("Completion returned no content, substituting fallback");
            return Ok(NO_CONTENT_FALLBACK.to_string());
        }
        Ok(output)
    }

    /// Renders the persona template and generates the lesson.
    pub async fn generate_plan(
        &self,
        request: &LessonRequest,
    ) -> Result<GeneratedLesson, GenerationError> {
        let rendered = templates::render(request);
        info!(
            "Generating {} lesson on '{}' in {}",
            request.persona, request.topic, rendered.language
        );
        let output = self
            .complete(&rendered.text, rendered.language.name())
            .await?;

        Ok(GeneratedLesson {
            prompt: rendered.text,
            language: rendered.language,
            output,
        })
    }

    /// Rewrites existing content for a simpler audience.
    pub async fn simplify(
        &self,
        audience: &str,
        text: &str,
        language: &str,
    ) -> Result<String, GenerationError> {
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput(
                "No content to simplify.".to_string(),
            ));
        }
        let prompt = templates::simplify_prompt(audience, text);
        self.complete(&prompt, language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Language, MagicSettings, Persona};
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a canned result and records every prompt it receives.
    struct ScriptedCompletion {
        reply: fn() -> PortResult<String>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedCompletion {
        fn new(reply: fn() -> PortResult<String>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(&self, prompt: &str, language: &str) -> PortResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), language.to_string()));
            (self.reply)()
        }
    }

    fn request() -> LessonRequest {
        LessonRequest {
            persona: Persona::Student,
            subject: "Science".into(),
            topic: "Photosynthesis".into(),
            grade: "7".into(),
            duration: "30 min".into(),
            teaching_style: "visual".into(),
            preset: "standard".into(),
            language: Language::Spanish,
            magic: MagicSettings::default(),
        }
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected_without_calling_upstream() {
        let completion = ScriptedCompletion::new(|| Ok("never".into()));
        let generator = LessonGenerator::new(completion.clone());

        let err = generator.complete("   ", "English").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyInput(ref m) if m == "Missing prompt"));
        assert!(completion.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_completion_is_replaced_by_fallback() {
        let completion = ScriptedCompletion::new(|| Ok(String::new()));
        let generator = LessonGenerator::new(completion);

        let output = generator.complete("Explain fractions", "English").await.unwrap();
        assert_eq!(output, NO_CONTENT_FALLBACK);
    }

    #[tokio::test]
    async fn upstream_errors_become_readable_messages() {
        let generator = LessonGenerator::new(ScriptedCompletion::new(|| {
            Err(PortError::Unavailable("status 503".into()))
        }));
        let err = generator.complete("hi", "English").await.unwrap_err();
        assert_eq!(err.to_string(), "AI Error: status 503");

        let generator = LessonGenerator::new(ScriptedCompletion::new(|| {
            Err(PortError::Malformed("no choices".into()))
        }));
        let err = generator.complete("hi", "English").await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedUpstreamResponse(_)));
    }

    #[tokio::test]
    async fn plan_sends_rendered_prompt_and_language() {
        let completion = ScriptedCompletion::new(|| Ok("# Plan".into()));
        let generator = LessonGenerator::new(completion.clone());

        let lesson = generator.generate_plan(&request()).await.unwrap();
        assert_eq!(lesson.output, "# Plan");
        assert_eq!(lesson.language, Language::Spanish);

        let calls = completion.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, lesson.prompt);
        assert_eq!(calls[0].1, "Spanish");
        assert!(lesson.prompt.ends_with("Respond ONLY in Spanish."));
    }

    #[tokio::test]
    async fn simplify_requires_text() {
        let completion = ScriptedCompletion::new(|| Ok("short".into()));
        let generator = LessonGenerator::new(completion.clone());

        assert!(matches!(
            generator.simplify("Parent", " ", "English").await,
            Err(GenerationError::EmptyInput(_))
        ));
        assert_eq!(generator.simplify("", "long text", "English").await.unwrap(), "short");
        assert!(completion.calls()[0].0.contains("for a Student"));
    }

    #[test]
    fn rejection_message_matches_wire_contract() {
        assert_eq!(GenerationError::AdmissionRejected.to_string(), "Rate limit exceeded");
    }
}
