//! Injection of a static structured-data block into an HTML shell
//!
//! The block is a marker comment followed by a pretty-printed JSON-LD
//! script. An existing marked block is replaced as a whole; otherwise the
//! block goes right before `</head>`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use serde_json::Value;

use crate::error::SeoError;
use crate::ssr::escape_json_for_script;
use crate::vocab::{JSON_LD_TYPE, STRUCTURED_DATA_MARKER};

const BLOCK_INDENT: &str = "    ";

/// Whether the block was newly inserted or replaced an earlier one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    Added,
    Updated,
}

/// Result of injecting a schema into an HTML document
#[derive(Debug, Clone)]
pub struct Injection {
    pub html: String,
    pub outcome: InjectOutcome,
}

fn existing_block_re() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        let pattern = format!(
            r#"(?s)[ \t]*{}\s*<script type="{}">.*?</script>"#,
            regex::escape(STRUCTURED_DATA_MARKER),
            regex::escape(JSON_LD_TYPE)
        );
        Regex::new(&pattern).expect("structured data block pattern is valid")
    })
}

fn head_end_re() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"</head>").expect("head close pattern is valid"))
}

/// Render the marked structured-data block
pub fn render_schema_block(schema: &Value) -> Result<String, SeoError> {
    let json = escape_json_for_script(&serde_json::to_string_pretty(schema)?);
    let indented: Vec<String> = json
        .lines()
        .map(|line| format!("{}{}", BLOCK_INDENT, line))
        .collect();

    Ok(format!(
        "{indent}{marker}\n{indent}<script type=\"{mime}\">\n{body}\n{indent}</script>",
        indent = BLOCK_INDENT,
        marker = STRUCTURED_DATA_MARKER,
        mime = JSON_LD_TYPE,
        body = indented.join("\n")
    ))
}

/// Replace or insert the structured-data block in `html`
///
/// `document_name` only appears in the error for a missing `</head>`.
pub fn inject_schema(html: &str, schema: &Value, document_name: &str) -> Result<Injection, SeoError> {
    let block = render_schema_block(schema)?;

    if existing_block_re().is_match(html) {
        let html = existing_block_re()
            .replacen(html, 1, NoExpand(&block))
            .into_owned();
        return Ok(Injection {
            html,
            outcome: InjectOutcome::Updated,
        });
    }

    if !head_end_re().is_match(html) {
        return Err(SeoError::MissingHeadTag(document_name.to_string()));
    }

    let replacement = format!("{}\n  </head>", block);
    let html = head_end_re()
        .replacen(html, 1, NoExpand(&replacement))
        .into_owned();
    Ok(Injection {
        html,
        outcome: InjectOutcome::Added,
    })
}

/// Find the nearest ancestor of `start` (inclusive) containing `index.html`
///
/// Falls back to `start` itself when no ancestor has one.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join("index.html").is_file())
        .unwrap_or(start)
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SHELL: &str = "<!DOCTYPE html>\n<html>\n<head>\n  <title>Test</title>\n</head>\n<body>\n  <h1>Test</h1>\n</body>\n</html>";

    fn org(name: &str) -> Value {
        json!({"@context": "https://schema.org", "@type": "Organization", "name": name})
    }

    #[test]
    fn test_render_schema_block() {
        let block = render_schema_block(&json!({"name": "A"})).unwrap();
        assert_eq!(
            block,
            "    <!-- Structured Data for Search Engines -->\n    <script type=\"application/ld+json\">\n    {\n      \"name\": \"A\"\n    }\n    </script>"
        );
    }

    #[test]
    fn test_inject_before_head_close() {
        let result = inject_schema(SHELL, &org("Test Organization"), "index.html").unwrap();
        assert_eq!(result.outcome, InjectOutcome::Added);

        let marker_at = result.html.find(STRUCTURED_DATA_MARKER).unwrap();
        let head_close_at = result.html.find("</head>").unwrap();
        assert!(marker_at < head_close_at);
        assert!(result.html.contains("\"name\": \"Test Organization\""));
        assert!(result.html.contains("    </script>\n  </head>"));
    }

    #[test]
    fn test_inject_replaces_existing_block() {
        let first = inject_schema(SHELL, &org("Old Organization"), "index.html").unwrap();
        let second = inject_schema(&first.html, &org("Updated Organization"), "index.html").unwrap();

        assert_eq!(second.outcome, InjectOutcome::Updated);
        assert!(second.html.contains("Updated Organization"));
        assert!(!second.html.contains("Old Organization"));
        assert_eq!(second.html.matches(STRUCTURED_DATA_MARKER).count(), 1);
    }

    #[test]
    fn test_inject_replacement_is_literal() {
        let result = inject_schema(SHELL, &org("Price $1 and $name"), "index.html").unwrap();
        assert!(result.html.contains("Price $1 and $name"));
    }

    #[test]
    fn test_reinject_over_script_close_in_value() {
        let first = inject_schema(SHELL, &org("A</script>TAIL"), "index.html").unwrap();
        assert_eq!(first.html.matches("</script>").count(), 1);
        assert!(first.html.contains("A\\u003c/script\\u003eTAIL"));

        let second = inject_schema(&first.html, &org("B"), "index.html").unwrap();
        assert_eq!(second.outcome, InjectOutcome::Updated);
        assert!(!second.html.contains("TAIL"));
        assert_eq!(second.html.matches("</script>").count(), 1);
        assert!(second.html.contains("    </script>\n  </head>"));
    }

    #[test]
    fn test_inject_requires_head_close() {
        let err = inject_schema("<html><body></body></html>", &org("A"), "index.html").unwrap_err();
        assert_eq!(err.to_string(), "Could not find </head> tag in index.html");
    }

    #[test]
    fn test_find_project_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src").join("pages");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), nested);

        std::fs::write(dir.path().join("index.html"), SHELL).unwrap();
        assert_eq!(find_project_root(&nested), dir.path());
    }
}
