//! crates/teachwave_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the completion API, the cover renderer and the lesson store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CoverRequest, NewLesson, SavedLesson};

/// The most lessons returned by a single owner listing.
pub const SAVED_LESSON_LIST_LIMIT: usize = 50;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The collaborator could not be reached or answered with a failure status.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    /// The collaborator answered successfully but the body was unusable.
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends a fully rendered prompt and returns the raw generated text.
    async fn complete(&self, prompt: &str, language: &str) -> PortResult<String>;
}

#[async_trait]
pub trait CoverService: Send + Sync {
    /// Produces a self-contained image reference (a data URL) for a lesson cover.
    async fn generate_cover(&self, request: &CoverRequest) -> PortResult<String>;
}

#[async_trait]
pub trait LessonStore: Send + Sync {
    async fn create_lesson(&self, lesson: NewLesson) -> PortResult<Uuid>;

    /// Lists an owner's lessons, newest first, at most `SAVED_LESSON_LIST_LIMIT` entries.
    async fn list_lessons_by_owner(&self, owner: &str) -> PortResult<Vec<SavedLesson>>;

    async fn get_lesson(&self, id: Uuid) -> PortResult<SavedLesson>;

    async fn delete_lesson(&self, id: Uuid) -> PortResult<()>;
}
