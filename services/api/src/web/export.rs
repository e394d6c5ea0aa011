//! services/api/src/web/export.rs
//!
//! Turns generated lessons into displayable HTML and downloadable Word documents.

use markdown::{to_html_with_options, Options as MarkdownOptions};
use regex::Regex;
use std::sync::OnceLock;

pub const DOC_CONTENT_TYPE: &str = "application/msword";

/// Renders model output (markdown) to HTML. Raw HTML in the input is escaped.
pub fn render_markdown(text: &str) -> String {
    let options = MarkdownOptions::gfm();
    to_html_with_options(text, &options).unwrap_or_else(|_| format!("<pre>{}</pre>", escape_html(text)))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

struct CleanPatterns {
    script: Regex,
    style: Regex,
    class_attr: Regex,
    style_attr: Regex,
}

fn clean_patterns() -> &'static CleanPatterns {
    static PATTERNS: OnceLock<CleanPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CleanPatterns {
        script: Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex"),
        style: Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"),
        class_attr: Regex::new(r#" class="[^"]*""#).expect("valid regex"),
        style_attr: Regex::new(r#" style="[^"]*""#).expect("valid regex"),
    })
}

/// Strips script/style blocks and inline class/style attributes.
pub fn clean_html(html: &str) -> String {
    let patterns = clean_patterns();
    let html = patterns.script.replace_all(html, "");
    let html = patterns.style.replace_all(&html, "");
    let html = patterns.class_attr.replace_all(&html, "");
    patterns.style_attr.replace_all(&html, "").into_owned()
}

/// Wraps lesson HTML into a document Word opens directly. Starts with a UTF-8 BOM.
pub fn doc_document(title: &str, subject: &str, grade: &str, body_html: &str) -> String {
    let title = if title.trim().is_empty() { "Lesson" } else { title };
    format!(
        "\u{feff}<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head><body>\
<div style=\"text-align:center;margin-bottom:12px;\">\
<h1 style=\"color:#4b00ff;\">{title}</h1>\
<div style=\"color:#444;\">{subject} • {grade}</div>\
<hr style=\"margin:12px 0 18px 0;\"/>\
</div>{body}</body></html>",
        title = escape_html(title),
        subject = escape_html(subject),
        grade = escape_html(grade),
        body = clean_html(body_html),
    )
}

/// Header and footer details of a printable lesson page.
pub struct PrintLayout<'a> {
    pub heading: &'a str,
    /// Joined with " • " under the heading. Blank entries are skipped.
    pub details: &'a [&'a str],
    /// An image URL (usually a cover data URL) shown above the heading.
    pub cover: Option<&'a str>,
    pub generated_at: &'a str,
}

/// Wraps lesson HTML into a standalone page the browser prints to PDF.
pub fn print_document(layout: &PrintLayout<'_>, body_html: &str) -> String {
    let heading = match layout.heading.trim() {
        "" => "Lesson Plan",
        other => other,
    };
    let details = layout
        .details
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(escape_html)
        .collect::<Vec<_>>()
        .join(" • ");
    let cover = layout
        .cover
        .filter(|c| !c.trim().is_empty())
        .map(|c| {
            format!(
                "<img src=\"{}\" style=\"width:100%;max-height:220px;object-fit:cover;border-radius:10px;margin-bottom:18px;\" />",
                escape_html(c)
            )
        })
        .unwrap_or_default();

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{heading}</title></head>\
<body style=\"font-family:Inter, sans-serif;padding:28px;color:#111;\">\
<div style=\"max-width:800px;margin:0 auto;\">{cover}\
<h1 style=\"text-align:center;color:#4b00ff;margin-bottom:6px;\">{heading}</h1>\
<div style=\"text-align:center;color:#444;margin-bottom:12px;\">{details}</div>\
<div>{body}</div>\
<div style=\"font-size:11px;color:#777;text-align:center;margin-top:18px;\">Generated with TeachWave AI • {generated_at}</div>\
</div></body></html>",
        heading = escape_html(heading),
        cover = cover,
        details = details,
        body = clean_html(body_html),
        generated_at = escape_html(layout.generated_at),
    )
}

/// Builds a download file name from a lesson topic.
pub fn export_file_name(topic: &str, extension: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r"[^\w\- ]+").expect("valid regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let kept = unsafe_chars.replace_all(topic, "");
    let title = match kept.trim() {
        "" => "Lesson",
        other => other,
    };
    format!("{}.{}", spaces.replace_all(title, "_"), extension)
}

/// The `Content-Disposition` value for a downloaded file.
pub fn attachment_header(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_renders_headings_and_escapes_html() {
        let html = render_markdown("### Plan\n- step <b>one</b>");
        assert!(html.contains("<h3>Plan</h3>"));
        assert!(html.contains("<li>"));
        assert!(html.contains("&lt;b&gt;one&lt;/b&gt;"));
    }

    #[test]
    fn clean_html_strips_scripts_styles_and_attributes() {
        let html = r#"<style>p{color:red}</style><p class="x" style="color:red">Hi</p><SCRIPT type="a">alert(1)
</SCRIPT><em>there</em>"#;
        assert_eq!(clean_html(html), "<p>Hi</p><em>there</em>");
    }

    #[test]
    fn doc_document_has_bom_and_header() {
        let doc = doc_document("Fractions", "Math", "5", "<p style=\"x\">Body</p>");
        assert!(doc.starts_with('\u{feff}'));
        assert!(doc.contains("<h1 style=\"color:#4b00ff;\">Fractions</h1>"));
        assert!(doc.contains("Math • 5"));
        assert!(doc.ends_with("<p>Body</p></body></html>"));

        let untitled = doc_document("  ", "Math", "5", "");
        assert!(untitled.contains(">Lesson</h1>"));
    }

    #[test]
    fn print_document_embeds_cover_and_footer() {
        let layout = PrintLayout {
            heading: "Fractions",
            details: &["Math", "5", "45 min"],
            cover: Some("data:image/svg+xml;charset=utf-8,%3Csvg%3E"),
            generated_at: "2026-10-14 09:30 UTC",
        };
        let page = print_document(&layout, "<p class=\"x\">Body</p><script>x()</script>");

        assert!(page.contains("<img src=\"data:image/svg+xml;charset=utf-8,%3Csvg%3E\""));
        assert!(page.contains(">Fractions</h1>"));
        assert!(page.contains(">Math • 5 • 45 min</div>"));
        assert!(page.contains("<div><p>Body</p></div>"));
        assert!(page.contains("Generated with TeachWave AI • 2026-10-14 09:30 UTC"));
        assert!(page.find("<img").unwrap() < page.find("<h1").unwrap());
    }

    #[test]
    fn print_document_without_cover_or_heading() {
        let layout = PrintLayout {
            heading: " ",
            details: &["Science", "", "30 min"],
            cover: None,
            generated_at: "now",
        };
        let page = print_document(&layout, "<p>Lava</p>");

        assert!(!page.contains("<img"));
        assert!(page.contains(">Lesson Plan</h1>"));
        assert!(page.contains(">Science • 30 min</div>"));
    }

    #[test]
    fn print_document_escapes_cover_attribute() {
        let layout = PrintLayout {
            heading: "Cells",
            details: &[],
            cover: Some("x\" onerror=\"alert(1)"),
            generated_at: "now",
        };
        let page = print_document(&layout, "");
        assert!(page.contains("<img src=\"x&quot; onerror=&quot;alert(1)\""));
    }

    #[test]
    fn file_names_are_sanitised() {
        assert_eq!(export_file_name("Adding   Fractions!", "doc"), "Adding_Fractions.doc");
        assert_eq!(export_file_name("  ", "doc"), "Lesson.doc");
        assert_eq!(export_file_name("\"quoted\"/path", "doc"), "quotedpath.doc");
        assert_eq!(export_file_name("half-term_plan", "pdf"), "half-term_plan.pdf");
    }
}
