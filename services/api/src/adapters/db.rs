//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `LessonStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use teachwave_core::domain::{NewLesson, SavedLesson};
use teachwave_core::ports::{LessonStore, PortError, PortResult, SAVED_LESSON_LIST_LIMIT};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `LessonStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct LessonRecord {
    id: Uuid,
    owner: String,
    persona: String,
    subject: String,
    topic: String,
    grade: String,
    language: String,
    created_at: DateTime<Utc>,
    html: String,
    plain_text: String,
    cover: String,
}
impl LessonRecord {
    fn to_domain(self) -> SavedLesson {
        SavedLesson {
            id: self.id,
            owner: self.owner,
            persona: self.persona,
            subject: self.subject,
            topic: self.topic,
            grade: self.grade,
            language: self.language,
            created_at: self.created_at,
            html: self.html,
            plain_text: self.plain_text,
            cover: self.cover,
        }
    }
}

const LESSON_COLUMNS: &str =
    "id, owner, persona, subject, topic, grade, language, created_at, html, plain_text, cover";

//=========================================================================================
// `LessonStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl LessonStore for DbAdapter {
    async fn create_lesson(&self, lesson: NewLesson) -> PortResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO saved_lessons (id, owner, persona, subject, topic, grade, language, html, plain_text, cover) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(id)
        .bind(&lesson.owner)
        .bind(&lesson.persona)
        .bind(&lesson.subject)
        .bind(&lesson.topic)
        .bind(&lesson.grade)
        .bind(&lesson.language)
        .bind(&lesson.html)
        .bind(&lesson.plain_text)
        .bind(&lesson.cover)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(id)
    }

    async fn list_lessons_by_owner(&self, owner: &str) -> PortResult<Vec<SavedLesson>> {
        let records = sqlx::query_as::<_, LessonRecord>(&format!(
            "SELECT {} FROM saved_lessons WHERE owner = $1 ORDER BY created_at DESC LIMIT $2",
            LESSON_COLUMNS
        ))
        .bind(owner)
        .bind(SAVED_LESSON_LIST_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let lessons = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(lessons)
    }

    async fn get_lesson(&self, id: Uuid) -> PortResult<SavedLesson> {
        let record = sqlx::query_as::<_, LessonRecord>(&format!(
            "SELECT {} FROM saved_lessons WHERE id = $1",
            LESSON_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Lesson {} not found", id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn delete_lesson(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM saved_lessons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Lesson {} not found", id)));
        }
        Ok(())
    }
}
