//! crates/teachwave_core/src/templates.rs
//!
//! Persona-specific prompt templates.
//!
//! Rendering is a pure function of the request. Field values are interpolated
//! verbatim; escaping belongs to whatever renders the model's output.

use crate::domain::{LessonRequest, MagicSettings, Persona, RenderedPrompt};

/// A form field that a template may list in its parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Topic,
    Subject,
    Grade,
    Duration,
    Style,
    Preset,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Topic => "Topic",
            Field::Subject => "Subject",
            Field::Grade => "Grade",
            Field::Duration => "Duration",
            Field::Style => "Style",
            Field::Preset => "Preset",
        }
    }

    fn value(self, request: &LessonRequest) -> &str {
        match self {
            Field::Topic => &request.topic,
            Field::Subject => &request.subject,
            Field::Grade => &request.grade,
            Field::Duration => &request.duration,
            Field::Style => &request.teaching_style,
            Field::Preset => &request.preset,
        }
    }
}

/// An instruction line that is only emitted when its toggle is on.
struct MagicClause {
    enabled: fn(&MagicSettings) -> bool,
    text: &'static str,
}

fn deep(magic: &MagicSettings) -> bool {
    magic.deep
}

fn creative(magic: &MagicSettings) -> bool {
    magic.creative
}

pub const TEACHER_DEEP_CLAUSE: &str =
    "When appropriate, show step-by-step reasoning and explain WHY each activity supports the objectives.";
pub const TEACHER_CREATIVE_CLAUSE: &str =
    "Use creative metaphors, classroom games, and cross-curricular links.";
pub const STUDENT_DEEP_CLAUSE: &str = "Show how you'd reason through one example, thinking aloud.";
pub const PARENT_DEEP_CLAUSE: &str =
    "If needed, show the simple reasoning steps so the parent can follow.";

struct PersonaTemplate {
    role: &'static str,
    task: &'static str,
    fields: &'static [Field],
    body: &'static str,
    /// Applied in order, deep before creative.
    clauses: &'static [MagicClause],
}

static TEACHER_TEMPLATE: PersonaTemplate = PersonaTemplate {
    role: "You are a master classroom teacher and curriculum designer.",
    task: "Write a professional, curriculum-aligned lesson plan for:",
    fields: &[
        Field::Topic,
        Field::Subject,
        Field::Grade,
        Field::Duration,
        Field::Style,
        Field::Preset,
    ],
    body: "Include:
1) Title
2) 3-5 Learning objectives (measurable)
3) Prerequisites
4) Warm-up (5-10 mins)
5) Step-by-step teaching guide (with estimated minutes)
6) Differentiation strategies (support & enrichment)
7) Assessment (rubrics / success criteria)
8) Materials & resources
9) Student activities & extension
10) Suggested homework
11) Brief teacher tips and safety notes

Also provide:
- Estimated time per step
- Suggested modifications for low-resource settings
- \"Magic Actions\": 3 short creative hooks or formulas to spice the lesson",
    clauses: &[
        MagicClause {
            enabled: deep,
            text: TEACHER_DEEP_CLAUSE,
        },
        MagicClause {
            enabled: creative,
            text: TEACHER_CREATIVE_CLAUSE,
        },
    ],
};

static STUDENT_TEMPLATE: PersonaTemplate = PersonaTemplate {
    role: "You are a friendly, clever peer in the same grade as the learner.",
    task: "Explain the lesson content for:",
    fields: &[
        Field::Topic,
        Field::Subject,
        Field::Grade,
        Field::Duration,
        Field::Style,
    ],
    body: "Include:
- A short, exciting title
- 3 simple learning objectives (I can understand)
- A short warm-up or hook that gets me curious
- Step-by-step guide to understand the main idea (use simple language)
- Highlight 3 things students usually find difficult and how to tackle each (with micro-tasks)
- \"Magic Actions\": quick tricks, memory mnemonics, or a tiny hands-on challenge
- 2 practice questions with simple solutions

Make it encouraging, creative and practical.",
    clauses: &[MagicClause {
        enabled: deep,
        text: STUDENT_DEEP_CLAUSE,
    }],
};

static PARENT_TEMPLATE: PersonaTemplate = PersonaTemplate {
    role: "You are a helpful parent coach who assumes the parent has little to no knowledge of the topic.",
    task: "Explain:",
    fields: &[Field::Topic, Field::Subject, Field::Grade, Field::Duration],
    body: "Include:
- A clear, plain-language explanation of the main idea (start from basics)
- Simple analogies and home examples
- What the parent can do to help at home (step-by-step)
- 3 likely questions a child may ask and suggested ways to respond
- \"Magic Actions\": easy demonstrations or gestures parents can use to make the idea click
- Short practice tasks parents can do with the child (5–10 minutes)

Use the simplest language and assume no prior subject knowledge.",
    clauses: &[MagicClause {
        enabled: deep,
        text: PARENT_DEEP_CLAUSE,
    }],
};

impl Persona {
    fn template(self) -> &'static PersonaTemplate {
        match self {
            Persona::Teacher => &TEACHER_TEMPLATE,
            Persona::Student => &STUDENT_TEMPLATE,
            Persona::Parent => &PARENT_TEMPLATE,
        }
    }
}

/// Renders the persona template for `request` into the final instruction string.
pub fn render(request: &LessonRequest) -> RenderedPrompt {
    let template = request.persona.template();
    let language = request.language.name();
    let magic = &request.magic;

    let mut lines: Vec<String> = vec![
        template.role.to_string(),
        format!("Language: {}", language),
        format!("Detail level: {}", magic.detail.as_str()),
        String::new(),
        template.task.to_string(),
    ];
    lines.extend(
        template
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.label(), field.value(request))),
    );
    lines.push(String::new());
    lines.push(template.body.to_string());
    lines.push(String::new());
    lines.extend(
        template
            .clauses
            .iter()
            .filter(|clause| (clause.enabled)(magic))
            .map(|clause| clause.text.to_string()),
    );
    lines.push(format!("Respond ONLY in {}.", language));

    RenderedPrompt {
        text: lines.join("\n"),
        language: request.language,
    }
}

/// Builds the follow-up prompt that rewrites existing content for a simpler audience.
pub fn simplify_prompt(audience: &str, text: &str) -> String {
    let audience = match audience.trim() {
        "" => "Student",
        other => other,
    };
    format!(
        "Please simplify the following for a {} but keep headings and bullets. Make it clear and short:\n\n{}",
        audience, text
    )
}

/// The system message that accompanies every completion request.
pub fn system_instruction(language: &str) -> String {
    format!(
        "You are an expert educator. Respond only in {}. Keep headings and bullet lists when possible.",
        language
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetailLevel, Language};

    fn fractions_request() -> LessonRequest {
        LessonRequest {
            persona: Persona::Teacher,
            subject: "Math".into(),
            topic: "Fractions".into(),
            grade: "5".into(),
            duration: "45 min".into(),
            teaching_style: "interactive".into(),
            preset: "standard".into(),
            language: Language::French,
            magic: MagicSettings {
                deep: true,
                creative: false,
                detail: DetailLevel::Detailed,
            },
        }
    }

    #[test]
    fn teacher_example_renders_expected_prompt() {
        let rendered = render(&fractions_request());

        assert_eq!(rendered.language, Language::French);
        assert!(rendered.text.ends_with("Respond ONLY in French."));
        assert!(rendered.text.contains("Language: French"));
        assert!(rendered.text.contains("Detail level: detailed"));
        assert!(rendered.text.contains(TEACHER_DEEP_CLAUSE));
        assert!(!rendered.text.contains(TEACHER_CREATIVE_CLAUSE));
        for literal in ["Fractions", "Math", "Grade: 5", "45 min", "Style: interactive", "Preset: standard"] {
            assert!(rendered.text.contains(literal), "missing {literal}");
        }
    }

    #[test]
    fn persona_dispatch_selects_template() {
        let mut request = fractions_request();

        request.persona = Persona::Teacher;
        assert!(render(&request).text.contains("curriculum designer"));

        request.persona = Persona::Student;
        let student = render(&request).text;
        assert!(student.contains("friendly, clever peer"));
        assert!(!student.contains("Preset:"));

        request.persona = Persona::Parent;
        let parent = render(&request).text;
        assert!(parent.contains("parent coach"));
        assert!(!parent.contains("Style:"));

        request.persona = Persona::from_label("Administrator");
        assert_eq!(render(&request).text, parent);
    }

    #[test]
    fn render_is_deterministic() {
        let request = fractions_request();
        assert_eq!(render(&request), render(&request));
    }

    #[test]
    fn deep_toggle_changes_only_its_clause() {
        for persona in [Persona::Teacher, Persona::Student, Persona::Parent] {
            let mut request = fractions_request();
            request.persona = persona;
            request.magic.deep = true;
            let with_deep = render(&request).text;
            request.magic.deep = false;
            let without_deep = render(&request).text;

            let clause = match persona {
                Persona::Teacher => TEACHER_DEEP_CLAUSE,
                Persona::Student => STUDENT_DEEP_CLAUSE,
                Persona::Parent => PARENT_DEEP_CLAUSE,
            };
            assert!(with_deep.contains(clause));
            assert!(!without_deep.contains(clause));
            assert_eq!(with_deep.replace(&format!("{}\n", clause), ""), without_deep);
        }
    }

    #[test]
    fn deep_clause_precedes_creative_clause() {
        let mut request = fractions_request();
        request.magic.creative = true;
        let text = render(&request).text;

        let deep_at = text.find(TEACHER_DEEP_CLAUSE).expect("deep clause");
        let creative_at = text.find(TEACHER_CREATIVE_CLAUSE).expect("creative clause");
        assert!(deep_at < creative_at);
        assert!(creative_at < text.find("Respond ONLY in").expect("directive"));
    }

    #[test]
    fn creative_only_teacher_prompt() {
        let mut request = fractions_request();
        request.magic.deep = false;
        request.magic.creative = true;
        let text = render(&request).text;
        assert!(text.contains(TEACHER_CREATIVE_CLAUSE));
        assert!(!text.contains(TEACHER_DEEP_CLAUSE));
    }

    #[test]
    fn creative_toggle_is_ignored_by_student_and_parent() {
        for persona in [Persona::Student, Persona::Parent] {
            let mut request = fractions_request();
            request.persona = persona;
            request.magic.creative = false;
            let plain = render(&request).text;
            request.magic.creative = true;
            assert_eq!(render(&request).text, plain);
        }
    }

    #[test]
    fn field_values_are_not_escaped() {
        let mut request = fractions_request();
        request.topic = "<b>Ratios & \"Rates\"</b>".into();
        assert!(render(&request).text.contains("Topic: <b>Ratios & \"Rates\"</b>"));
    }

    #[test]
    fn simplify_defaults_audience_to_student() {
        let prompt = simplify_prompt("  ", "## Heading\n- point");
        assert!(prompt.starts_with("Please simplify the following for a Student"));
        assert!(prompt.ends_with("\n\n## Heading\n- point"));
        assert!(simplify_prompt("Parent", "x").contains("for a Parent but"));
    }

    #[test]
    fn system_instruction_names_language() {
        assert_eq!(
            system_instruction("Hausa"),
            "You are an expert educator. Respond only in Hausa. Keep headings and bullet lists when possible."
        );
    }
}
