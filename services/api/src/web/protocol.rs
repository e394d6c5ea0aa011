//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.

use serde::{Deserialize, Serialize};
use teachwave_core::{
    domain::{CoverRequest, DetailLevel, LessonRequest, MagicSettings, Persona, SavedLesson},
    GenerationError, Language,
};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Requests Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// A pre-assembled prompt to forward to the completion service.
#[derive(Deserialize, ToSchema, Debug)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// The "magic" toggles as sent by the form.
#[derive(Serialize, Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct MagicForm {
    pub deep: bool,
    pub creative: bool,
    pub detail: String,
}

/// The lesson form. Free-text fields are passed to the template verbatim.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LessonForm {
    pub persona: String,
    pub subject: String,
    pub topic: String,
    pub grade: String,
    pub duration: String,
    pub teaching_style: String,
    pub preset: String,
    pub language: String,
    pub magic: MagicForm,
}

impl TryFrom<LessonForm> for LessonRequest {
    type Error = GenerationError;

    fn try_from(form: LessonForm) -> Result<Self, Self::Error> {
        let language = if form.language.trim().is_empty() {
            Language::English
        } else {
            Language::from_key(&form.language)
                .ok_or_else(|| GenerationError::UnsupportedLanguage(form.language.clone()))?
        };
        Ok(LessonRequest {
            persona: Persona::from_label(&form.persona),
            subject: form.subject,
            topic: form.topic,
            grade: form.grade,
            duration: form.duration,
            teaching_style: form.teaching_style,
            preset: form.preset,
            language,
            magic: MagicSettings {
                deep: form.magic.deep,
                creative: form.magic.creative,
                detail: DetailLevel::from_label(&form.magic.detail),
            },
        })
    }
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct SimplifyRequest {
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct CoverRequestBody {
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub style: Option<String>,
}

impl From<CoverRequestBody> for CoverRequest {
    fn from(body: CoverRequestBody) -> Self {
        let defaults = CoverRequest::default();
        CoverRequest {
            subject: body.subject.unwrap_or(defaults.subject),
            topic: body.topic.unwrap_or(defaults.topic),
            style: body.style.unwrap_or(defaults.style),
        }
    }
}

/// A generated lesson submitted for saving.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct SaveLessonRequest {
    pub persona: String,
    pub subject: String,
    pub topic: String,
    pub grade: String,
    pub language: String,
    pub html: String,
    pub text: String,
    /// When omitted the server renders a cover itself.
    pub cover: Option<String>,
}

/// Ad-hoc content to export as a Word document.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct DocExportRequest {
    pub topic: String,
    pub subject: String,
    pub grade: String,
    pub html: String,
}

/// Ad-hoc content to lay out as a printable page.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct PrintExportRequest {
    pub topic: String,
    pub subject: String,
    pub grade: String,
    pub duration: String,
    pub html: String,
    /// When omitted the server renders a cover itself.
    pub cover: Option<String>,
}

//=========================================================================================
// Responses Sent FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct GenerateResponse {
    pub output: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LessonPlanResponse {
    pub output: String,
    /// The output rendered from markdown.
    pub html: String,
    pub prompt: String,
    pub language: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct SimplifyResponse {
    pub output: String,
    pub html: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CoverResponse {
    pub data_url: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct CreateLessonResponse {
    pub id: Uuid,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: Uuid,
    pub title: String,
    pub persona: String,
    pub subject: String,
    pub topic: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&SavedLesson> for LessonSummary {
    fn from(lesson: &SavedLesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title(),
            persona: lesson.persona.clone(),
            subject: lesson.subject.clone(),
            topic: lesson.topic.clone(),
            created_at: lesson.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SavedLessonResponse {
    pub id: Uuid,
    pub persona: String,
    pub subject: String,
    pub topic: String,
    pub grade: String,
    pub language: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub html: String,
    pub text: String,
    pub cover: String,
}

impl From<SavedLesson> for SavedLessonResponse {
    fn from(lesson: SavedLesson) -> Self {
        Self {
            id: lesson.id,
            persona: lesson.persona,
            subject: lesson.subject,
            topic: lesson.topic,
            grade: lesson.grade,
            language: lesson.language,
            created_at: lesson.created_at,
            html: lesson.html,
            text: lesson.plain_text,
            cover: lesson.cover,
        }
    }
}

/// The body of every error response.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_form_converts_with_fallbacks() {
        let form: LessonForm = serde_json::from_str(
            r#"{
                "persona": "Administrator",
                "subject": "Math",
                "topic": "Fractions",
                "teachingStyle": "interactive",
                "language": "French",
                "magic": {"deep": true, "detail": "concise"}
            }"#,
        )
        .unwrap();
        let request = LessonRequest::try_from(form).unwrap();

        assert_eq!(request.persona, Persona::Parent);
        assert_eq!(request.teaching_style, "interactive");
        assert_eq!(request.language, Language::French);
        assert!(request.magic.deep);
        assert!(!request.magic.creative);
        assert_eq!(request.magic.detail, DetailLevel::Concise);
        assert_eq!(request.grade, "");
    }

    #[test]
    fn unknown_language_is_rejected() {
        let form = LessonForm {
            language: "Klingon".into(),
            ..Default::default()
        };
        assert!(matches!(
            LessonRequest::try_from(form),
            Err(GenerationError::UnsupportedLanguage(lang)) if lang == "Klingon"
        ));

        let blank = LessonRequest::try_from(LessonForm::default()).unwrap();
        assert_eq!(blank.language, Language::English);
    }

    #[test]
    fn cover_body_defaults() {
        let body: CoverRequestBody = serde_json::from_str(r#"{"topic": "Volcanoes"}"#).unwrap();
        let request = CoverRequest::from(body);
        assert_eq!(request.subject, "Subject");
        assert_eq!(request.topic, "Volcanoes");
        assert_eq!(request.style, "modern");
    }
}
