//! services/api/src/adapters/mock_llm.rs
//!
//! A canned `CompletionService` for offline development and tests.

use async_trait::async_trait;
use teachwave_core::ports::{CompletionService, PortResult};

#[derive(Clone, Default)]
pub struct MockCompletionAdapter;

impl MockCompletionAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionService for MockCompletionAdapter {
    async fn complete(&self, prompt: &str, language: &str) -> PortResult<String> {
        let heading = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Topic: "))
            .unwrap_or("Lesson");
        Ok(format!(
            "### MOCK Lesson — {}\nThis is mock content ({}). Set USE_MOCK_COMPLETION=false to use the live model.",
            heading, language
        ))
    }
}
