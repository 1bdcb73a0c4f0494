//! Vocabulary shared by the reconciler, the SSR formatter and the CLI
//!
//! Schema.org context, JSON-LD markers and the defaults applied to
//! page metadata when the caller leaves a field unset.

/// The schema.org context every generated schema carries
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// MIME type of the structured-data script element
pub const JSON_LD_TYPE: &str = "application/ld+json";

/// HTML comment placed right before an injected structured-data block
pub const STRUCTURED_DATA_MARKER: &str = "<!-- Structured Data for Search Engines -->";

/// Default `og:type`
pub const DEFAULT_OG_TYPE: &str = "website";

/// `og:type` value that enables the `article:*` tags
pub const ARTICLE_OG_TYPE: &str = "article";

/// Default `twitter:card`
pub const DEFAULT_TWITTER_CARD: &str = "summary_large_image";

/// Default `<meta charset>`
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Default `inLanguage` of generated WebPage schemas
pub const DEFAULT_PAGE_LANGUAGE: &str = "es";

/// Smallest Open Graph image edge (in pixels) that does not trigger a warning
pub const MIN_OG_IMAGE_EDGE: i64 = 200;

/// Graph wrapper for several schemas emitted as one document
pub fn graph_wrapper(members: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "@context": SCHEMA_CONTEXT,
        "@graph": members
    })
}
