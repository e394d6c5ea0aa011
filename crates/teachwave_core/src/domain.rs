//! crates/teachwave_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// The role a lesson is written for. Selects the prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Teacher,
    Student,
    Parent,
}

impl Persona {
    /// Resolves a form label into a persona.
    ///
    /// Anything that is not exactly "Teacher" or "Student" is treated as a parent.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Teacher" => Persona::Teacher,
            "Student" => Persona::Student,
            _ => Persona::Parent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Persona::Teacher => "Teacher",
            Persona::Student => "Student",
            Persona::Parent => "Parent",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    #[default]
    Standard,
    Detailed,
    Concise,
}

impl DetailLevel {
    /// Unknown or blank labels fall back to `Standard`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "detailed" => DetailLevel::Detailed,
            "concise" => DetailLevel::Concise,
            _ => DetailLevel::Standard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DetailLevel::Standard => "standard",
            DetailLevel::Detailed => "detailed",
            DetailLevel::Concise => "concise",
        }
    }
}

/// The optional instruction modifiers applied while rendering a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MagicSettings {
    pub deep: bool,
    pub creative: bool,
    pub detail: DetailLevel,
}

/// The languages a lesson can be generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    French,
    Spanish,
    Arabic,
    German,
    Chinese,
    Yoruba,
    Igbo,
    Hausa,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::English,
        Language::French,
        Language::Spanish,
        Language::Arabic,
        Language::German,
        Language::Chinese,
        Language::Yoruba,
        Language::Igbo,
        Language::Hausa,
    ];

    /// Looks up a language by its form key. Returns `None` for unsupported keys.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(key))
    }

    /// The display name used in prompt directives.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::Arabic => "Arabic",
            Language::German => "German",
            Language::Chinese => "Chinese",
            Language::Yoruba => "Yoruba",
            Language::Igbo => "Igbo",
            Language::Hausa => "Hausa",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lesson generation request, built from the user's form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRequest {
    pub persona: Persona,
    pub subject: String,
    pub topic: String,
    pub grade: String,
    pub duration: String,
    pub teaching_style: String,
    pub preset: String,
    pub language: Language,
    pub magic: MagicSettings,
}

/// The instruction text sent to the completion service, plus its target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub text: String,
    pub language: Language,
}

/// The result of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedLesson {
    pub prompt: String,
    pub language: Language,
    pub output: String,
}

/// Parameters for a lesson cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverRequest {
    pub subject: String,
    pub topic: String,
    pub style: String,
}

impl Default for CoverRequest {
    fn default() -> Self {
        Self {
            subject: "Subject".to_string(),
            topic: "Topic".to_string(),
            style: "modern".to_string(),
        }
    }
}

/// A lesson as submitted for persistence.
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub owner: String,
    pub persona: String,
    pub subject: String,
    pub topic: String,
    pub grade: String,
    pub language: String,
    pub html: String,
    pub plain_text: String,
    pub cover: String,
}

/// A lesson that has been persisted by a `LessonStore`.
#[derive(Debug, Clone)]
pub struct SavedLesson {
    pub id: Uuid,
    pub owner: String,
    pub persona: String,
    pub subject: String,
    pub topic: String,
    pub grade: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub html: String,
    pub plain_text: String,
    pub cover: String,
}

impl SavedLesson {
    /// Builds the stored form of a new lesson.
    pub fn from_new(id: Uuid, created_at: DateTime<Utc>, lesson: NewLesson) -> Self {
        Self {
            id,
            owner: lesson.owner,
            persona: lesson.persona,
            subject: lesson.subject,
            topic: lesson.topic,
            grade: lesson.grade,
            language: lesson.language,
            created_at,
            html: lesson.html,
            plain_text: lesson.plain_text,
            cover: lesson.cover,
        }
    }

    /// The label shown in saved-lesson listings.
    pub fn title(&self) -> String {
        if self.topic.trim().is_empty() {
            "Saved Lesson".to_string()
        } else {
            format!("{} — {}", self.topic, self.subject)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_falls_back_to_parent() {
        assert_eq!(Persona::from_label("Teacher"), Persona::Teacher);
        assert_eq!(Persona::from_label("Student"), Persona::Student);
        assert_eq!(Persona::from_label("Parent"), Persona::Parent);
        assert_eq!(Persona::from_label("Administrator"), Persona::Parent);
        assert_eq!(Persona::from_label(""), Persona::Parent);
        assert_eq!(Persona::from_label("teacher"), Persona::Parent);
        assert_eq!(Persona::from_label("Teacher "), Persona::Parent);
        assert_eq!(Persona::from_label(" Student"), Persona::Parent);
    }

    #[test]
    fn detail_level_defaults_to_standard() {
        assert_eq!(DetailLevel::from_label("detailed"), DetailLevel::Detailed);
        assert_eq!(DetailLevel::from_label("Concise"), DetailLevel::Concise);
        assert_eq!(DetailLevel::from_label("verbose"), DetailLevel::Standard);
        assert_eq!(DetailLevel::default().as_str(), "standard");
    }

    #[test]
    fn language_lookup() {
        assert_eq!(Language::from_key("French"), Some(Language::French));
        assert_eq!(Language::from_key(" yoruba "), Some(Language::Yoruba));
        assert_eq!(Language::from_key("Klingon"), None);
        assert_eq!(Language::from_key(""), None);
        for lang in Language::ALL {
            assert_eq!(Language::from_key(lang.name()), Some(lang));
        }
    }

    #[test]
    fn saved_lesson_title() {
        let mut lesson = SavedLesson::from_new(
            Uuid::new_v4(),
            Utc::now(),
            NewLesson {
                owner: "u1".into(),
                persona: "Teacher".into(),
                subject: "Math".into(),
                topic: "Fractions".into(),
                grade: "5".into(),
                language: "English".into(),
                html: "<p>x</p>".into(),
                plain_text: "x".into(),
                cover: String::new(),
            },
        );
        assert_eq!(lesson.title(), "Fractions — Math");
        lesson.topic = "  ".into();
        assert_eq!(lesson.title(), "Saved Lesson");
    }
}
