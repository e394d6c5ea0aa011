//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use teachwave_core::{
    ports::{CompletionService, CoverService, LessonStore},
    AdmissionGate, LessonGenerator,
};

/// Callers are identified by their network address.
pub type CallerId = String;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub lessons: Arc<dyn LessonStore>,
    pub cover_adapter: Arc<dyn CoverService>,
    pub generator: LessonGenerator,
    pub gate: Arc<AdmissionGate<CallerId>>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        lessons: Arc<dyn LessonStore>,
        completion_adapter: Arc<dyn CompletionService>,
        cover_adapter: Arc<dyn CoverService>,
    ) -> Self {
        let gate = Arc::new(AdmissionGate::new(config.admission_policy()));
        Self {
            config,
            lessons,
            cover_adapter,
            generator: LessonGenerator::new(completion_adapter),
            gate,
        }
    }
}
