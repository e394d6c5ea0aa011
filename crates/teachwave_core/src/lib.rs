pub mod admission;
pub mod domain;
pub mod generation;
pub mod ports;
pub mod templates;

pub use admission::{AdmissionGate, AdmissionPolicy, RateWindow};
pub use domain::{
    CoverRequest, DetailLevel, GeneratedLesson, Language, LessonRequest, MagicSettings,
    NewLesson, Persona, RenderedPrompt, SavedLesson,
};
pub use generation::{GenerationError, LessonGenerator, NO_CONTENT_FALLBACK};
pub use ports::{
    CompletionService, CoverService, LessonStore, PortError, PortResult,
    SAVED_LESSON_LIST_LIMIT,
};
