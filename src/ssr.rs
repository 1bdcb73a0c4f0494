//! Server-side rendering of head tags
//!
//! Stateless: always renders the full tag set for the resolved snapshot,
//! one tag per line.

use tracing::error;

use crate::snapshot::{MetadataSnapshot, SeoProps};
use crate::vocab::JSON_LD_TYPE;

/// Escape a value for use in HTML text or a quoted attribute
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make serialized JSON safe to embed in a `<script>` element
///
/// `<`, `>` and `&` only occur inside JSON strings, where their `\uXXXX`
/// forms decode to the same value, so the result is still the same JSON
/// but can never close the script element.
pub fn escape_json_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the head tags for a set of props
pub fn render_seo_tags(props: &SeoProps) -> String {
    render_snapshot(&MetadataSnapshot::resolve(props))
}

/// Render the head tags for an already resolved snapshot
pub fn render_snapshot(snapshot: &MetadataSnapshot) -> String {
    let mut tags: Vec<String> = Vec::new();

    let meta = |tags: &mut Vec<String>, attr: &str, key: &str, value: Option<&String>| {
        if let Some(v) = value {
            tags.push(format!(
                "<meta {}=\"{}\" content=\"{}\">",
                attr,
                escape_html(key),
                escape_html(v)
            ));
        }
    };
    let s = snapshot;

    if let Some(lang) = &s.html_lang {
        tags.push(format!("<html lang=\"{}\">", escape_html(lang)));
    }
    if let Some(charset) = &s.charset {
        tags.push(format!("<meta charset=\"{}\">", escape_html(charset)));
    }
    meta(&mut tags, "name", "viewport", s.viewport.as_ref());
    meta(&mut tags, "name", "theme-color", s.theme_color.as_ref());
    if let Some(title) = &s.title {
        tags.push(format!("<title>{}</title>", escape_html(title)));
    }
    meta(&mut tags, "name", "description", s.description.as_ref());
    meta(&mut tags, "name", "keywords", s.keywords.as_ref());
    if let Some(canonical) = &s.canonical {
        tags.push(format!(
            "<link rel=\"canonical\" href=\"{}\">",
            escape_html(canonical)
        ));
    }
    meta(&mut tags, "name", "robots", s.robots.as_ref());
    meta(&mut tags, "name", "author", s.author.as_ref());

    meta(&mut tags, "property", "og:title", s.og_title.as_ref());
    meta(&mut tags, "property", "og:description", s.og_description.as_ref());
    meta(&mut tags, "property", "og:url", s.og_url.as_ref());
    meta(&mut tags, "property", "og:type", s.og_type.as_ref());
    meta(&mut tags, "property", "og:image", s.og_image.as_ref());
    meta(&mut tags, "property", "og:image:secure_url", s.og_image_secure_url.as_ref());
    meta(&mut tags, "property", "og:image:width", s.og_image_width.as_ref());
    meta(&mut tags, "property", "og:image:height", s.og_image_height.as_ref());
    meta(&mut tags, "property", "og:image:alt", s.og_image_alt.as_ref());
    meta(&mut tags, "property", "og:site_name", s.og_site_name.as_ref());
    meta(&mut tags, "property", "og:locale", s.og_locale.as_ref());

    if s.is_article() {
        meta(&mut tags, "property", "article:published_time", s.article_published_time.as_ref());
        meta(&mut tags, "property", "article:modified_time", s.article_modified_time.as_ref());
        meta(&mut tags, "property", "article:author", s.article_author.as_ref());
        meta(&mut tags, "property", "article:section", s.article_section.as_ref());
        for tag in &s.article_tags {
            meta(&mut tags, "property", "article:tag", Some(tag));
        }
    }

    meta(&mut tags, "name", "twitter:card", s.twitter_card.as_ref());
    meta(&mut tags, "name", "twitter:site", s.twitter_site.as_ref());
    meta(&mut tags, "name", "twitter:creator", s.twitter_creator.as_ref());
    meta(&mut tags, "name", "twitter:title", s.twitter_title.as_ref());
    meta(&mut tags, "name", "twitter:description", s.twitter_description.as_ref());
    meta(&mut tags, "name", "twitter:url", s.og_url.as_ref());
    meta(&mut tags, "name", "twitter:image", s.twitter_image.as_ref());
    meta(&mut tags, "name", "twitter:image:alt", s.twitter_image_alt.as_ref());

    if let Some(schema) = &s.structured_data {
        match serde_json::to_string(schema) {
            Ok(json) => tags.push(format!(
                "<script type=\"{}\">{}</script>",
                JSON_LD_TYPE,
                escape_json_for_script(&json)
            )),
            Err(e) => error!("Failed to stringify schema: {}", e),
        }
    }

    for (key, value) in &s.custom_meta {
        meta(&mut tags, "name", key.as_str(), Some(value));
    }

    tags.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: serde_json::Value) -> String {
        render_seo_tags(&serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_basic_order() {
        let out = render(json!({"title": "T", "description": "D", "htmlLang": "en"}));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "<html lang=\"en\">");
        assert_eq!(lines[1], "<meta charset=\"UTF-8\">");
        assert_eq!(lines[2], "<title>T</title>");
        assert!(out.contains("<meta property=\"og:title\" content=\"T\">"));
        assert!(out.contains("<meta name=\"twitter:title\" content=\"T\">"));
        assert!(out.contains("<meta property=\"og:type\" content=\"website\">"));
        assert!(out.contains("<meta name=\"twitter:card\" content=\"summary_large_image\">"));
    }

    #[test]
    fn test_render_escapes_values() {
        let out = render(json!({"title": "A <b> & \"c\""}));
        assert!(out.contains("<title>A &lt;b&gt; &amp; &quot;c&quot;</title>"));
    }

    #[test]
    fn test_render_secure_url_only_for_https() {
        let out = render(json!({"ogImage": "https://x/y.png"}));
        assert!(out.contains("<meta property=\"og:image:secure_url\" content=\"https://x/y.png\">"));

        let out = render(json!({"ogImage": "http://x/y.png"}));
        assert!(!out.contains("og:image:secure_url"));
    }

    #[test]
    fn test_render_article_tags_and_schema() {
        let out = render(json!({
            "ogType": "article",
            "articleTag": ["rust", "seo"],
            "schema": {"@context": "https://schema.org", "@type": "Article", "headline": "H"},
            "customMeta": {"rating": "general"}
        }));
        assert!(out.contains("<meta property=\"article:tag\" content=\"rust\">"));
        assert!(out.contains("<meta property=\"article:tag\" content=\"seo\">"));
        assert!(out.contains("<script type=\"application/ld+json\">{\"@context\":\"https://schema.org\",\"@type\":\"Article\",\"headline\":\"H\"}</script>"));
        assert!(out.ends_with("<meta name=\"rating\" content=\"general\">"));
    }

    #[test]
    fn test_escape_json_for_script() {
        let value = json!({"name": "</script><b>&"});
        let escaped = escape_json_for_script(&serde_json::to_string(&value).unwrap());
        assert_eq!(escaped, r#"{"name":"\u003c/script\u003e\u003cb\u003e\u0026"}"#);
        assert_eq!(serde_json::from_str::<serde_json::Value>(&escaped).unwrap(), value);
    }

    #[test]
    fn test_render_schema_cannot_close_script() {
        let out = render(json!({
            "schema": {"@type": "Thing", "name": "</script><script>alert(1)</script>"}
        }));
        assert!(!out.contains("</script><script>alert(1)"));
        assert_eq!(out.matches("</script>").count(), 1);

        let line = out
            .lines()
            .find(|l| l.starts_with("<script type=\"application/ld+json\">"))
            .unwrap();
        let body = line
            .trim_start_matches("<script type=\"application/ld+json\">")
            .trim_end_matches("</script>");
        let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(parsed["name"], "</script><script>alert(1)</script>");
    }

    #[test]
    fn test_render_relative_canonical_dropped() {
        let out = render(json!({"canonical": "/page"}));
        assert!(!out.contains("canonical"));
        assert!(!out.contains("og:url"));
    }
}
