//! services/api/src/adapters/memory_store.rs
//!
//! A process-local `LessonStore`, used when no database is configured.

use async_trait::async_trait;
use chrono::Utc;
use teachwave_core::{
    domain::{NewLesson, SavedLesson},
    ports::{LessonStore, PortError, PortResult, SAVED_LESSON_LIST_LIMIT},
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Lessons are kept in insertion order, so the newest lesson is always last.
#[derive(Default)]
pub struct InMemoryLessonStore {
    lessons: RwLock<Vec<SavedLesson>>,
}

impl InMemoryLessonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LessonStore for InMemoryLessonStore {
    async fn create_lesson(&self, lesson: NewLesson) -> PortResult<Uuid> {
        let id = Uuid::new_v4();
        let saved = SavedLesson::from_new(id, Utc::now(), lesson);
        self.lessons.write().await.push(saved);
        Ok(id)
    }

    async fn list_lessons_by_owner(&self, owner: &str) -> PortResult<Vec<SavedLesson>> {
        let lessons = self.lessons.read().await;
        Ok(lessons
            .iter()
            .rev()
            .filter(|lesson| lesson.owner == owner)
            .take(SAVED_LESSON_LIST_LIMIT)
            .cloned()
            .collect())
    }

    async fn get_lesson(&self, id: Uuid) -> PortResult<SavedLesson> {
        self.lessons
            .read()
            .await
            .iter()
            .find(|lesson| lesson.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Lesson {} not found", id)))
    }

    async fn delete_lesson(&self, id: Uuid) -> PortResult<()> {
        let mut lessons = self.lessons.write().await;
        let before = lessons.len();
        lessons.retain(|lesson| lesson.id != id);
        if lessons.len() == before {
            return Err(PortError::NotFound(format!("Lesson {} not found", id)));
        }
        Ok(())
    }
}
