//! Page metadata input and its resolved snapshot
//!
//! [`SeoProps`] is what the caller hands in: every field optional, with
//! the raw values the page knows about. [`MetadataSnapshot::resolve`]
//! turns it into the exact tag values to emit, applying defaults,
//! fallback chains and validation. The reconciler and the SSR formatter
//! both work from snapshots only.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::merge::{merge_schemas, validate_schema, SchemaInput};
use crate::validation::{validate_canonical_url, validate_image_dimensions};
use crate::vocab::{ARTICLE_OG_TYPE, DEFAULT_CHARSET, DEFAULT_OG_TYPE, DEFAULT_TWITTER_CARD};

/// Page metadata as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoProps {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub canonical: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_url: Option<String>,
    pub og_image: Option<String>,
    /// Defaults to "website"
    pub og_type: Option<String>,
    pub og_image_width: Option<String>,
    pub og_image_height: Option<String>,
    pub og_image_alt: Option<String>,
    pub og_image_secure_url: Option<String>,
    pub og_site_name: Option<String>,
    pub og_locale: Option<String>,
    /// Defaults to "summary_large_image"
    pub twitter_card: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub twitter_image_alt: Option<String>,
    pub twitter_site: Option<String>,
    pub twitter_creator: Option<String>,
    pub schema: Option<SchemaInput>,
    /// Takes precedence over `schema`
    pub structured_data: Option<SchemaInput>,
    pub robots: Option<String>,
    pub author: Option<String>,
    pub html_lang: Option<String>,
    pub theme_color: Option<String>,
    pub viewport: Option<String>,
    /// Defaults to "UTF-8"
    pub charset: Option<String>,
    pub article_published_time: Option<String>,
    pub article_modified_time: Option<String>,
    pub article_author: Option<String>,
    pub article_section: Option<String>,
    pub article_tag: Vec<String>,
    /// Extra `meta[name]` tags, emitted after the managed ones
    ///
    /// A key equal to a managed name (`robots`, `description`, ...) writes
    /// to that same element. Dropping such a key later leaves the element
    /// in place, like any other managed tag.
    pub custom_meta: BTreeMap<String, String>,
}

/// Resolved page metadata: exactly what should be in the head
///
/// Captured once and never mutated; each reconciliation replaces the
/// previous snapshot as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataSnapshot {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    /// Validated absolute URL, or absent
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub author: Option<String>,
    pub html_lang: Option<String>,
    pub theme_color: Option<String>,
    pub viewport: Option<String>,
    pub charset: Option<String>,

    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_url: Option<String>,
    pub og_type: Option<String>,
    pub og_image: Option<String>,
    pub og_image_secure_url: Option<String>,
    pub og_image_width: Option<String>,
    pub og_image_height: Option<String>,
    pub og_image_alt: Option<String>,
    pub og_site_name: Option<String>,
    pub og_locale: Option<String>,

    pub twitter_card: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub twitter_image_alt: Option<String>,
    pub twitter_site: Option<String>,
    pub twitter_creator: Option<String>,

    pub article_published_time: Option<String>,
    pub article_modified_time: Option<String>,
    pub article_author: Option<String>,
    pub article_section: Option<String>,
    /// Positional: index i maps to the i-th `article:tag` element
    pub article_tags: Vec<String>,

    pub custom_meta: BTreeMap<String, String>,
    pub structured_data: Option<Value>,
}

/// Empty strings count as absent
fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl MetadataSnapshot {
    /// Resolve caller props into the tag values to emit
    ///
    /// Never fails: an invalid canonical URL is logged and dropped, and
    /// quality problems (og:url/canonical mismatch, small images, schema
    /// structure) are logged as warnings.
    pub fn resolve(props: &SeoProps) -> Self {
        let title = present(&props.title);
        let description = present(&props.description);

        let canonical = present(&props.canonical).and_then(|c| match validate_canonical_url(&c) {
            Ok(valid) => valid,
            Err(e) => {
                error!("Canonical URL validation error: {}", e);
                None
            }
        });

        let og_url = present(&props.og_url).or_else(|| canonical.clone());
        if let (Some(og), Some(canon)) = (&og_url, &canonical) {
            if og != canon {
                warn!(og_url = %og, canonical = %canon, "og:url and canonical should match for optimal SEO");
            }
        }

        let og_image = present(&props.og_image);
        let og_image_secure_url = og_image.as_ref().and_then(|image| {
            present(&props.og_image_secure_url)
                .or_else(|| image.starts_with("https://").then(|| image.clone()))
        });
        if og_image.is_some() {
            validate_image_dimensions(
                props.og_image_width.as_deref(),
                props.og_image_height.as_deref(),
            );
        }

        let og_type = present(&props.og_type).unwrap_or_else(|| DEFAULT_OG_TYPE.to_string());
        let is_article = og_type == ARTICLE_OG_TYPE;
        let article = |value: &Option<String>| if is_article { present(value) } else { None };

        let structured_data = merge_schemas(props.structured_data.as_ref().or(props.schema.as_ref()));
        if let Some(schema) = &structured_data {
            let validation = validate_schema(schema);
            if !validation.valid {
                warn!(problems = ?validation.problems, "Schema validation warnings");
            }
        }

        Self {
            og_title: present(&props.og_title).or_else(|| title.clone()),
            og_description: present(&props.og_description).or_else(|| description.clone()),
            twitter_title: present(&props.twitter_title).or_else(|| title.clone()),
            twitter_description: present(&props.twitter_description)
                .or_else(|| description.clone()),
            twitter_image: present(&props.twitter_image).or_else(|| og_image.clone()),
            title,
            description,
            keywords: present(&props.keywords),
            canonical,
            robots: present(&props.robots),
            author: present(&props.author),
            html_lang: present(&props.html_lang),
            theme_color: present(&props.theme_color),
            viewport: present(&props.viewport),
            charset: Some(present(&props.charset).unwrap_or_else(|| DEFAULT_CHARSET.to_string())),

            og_url,
            og_image,
            og_image_secure_url,
            og_image_width: present(&props.og_image_width),
            og_image_height: present(&props.og_image_height),
            og_image_alt: present(&props.og_image_alt),
            og_site_name: present(&props.og_site_name),
            og_locale: present(&props.og_locale),

            twitter_card: Some(
                present(&props.twitter_card).unwrap_or_else(|| DEFAULT_TWITTER_CARD.to_string()),
            ),
            twitter_image_alt: present(&props.twitter_image_alt),
            twitter_site: present(&props.twitter_site),
            twitter_creator: present(&props.twitter_creator),

            article_published_time: article(&props.article_published_time),
            article_modified_time: article(&props.article_modified_time),
            article_author: article(&props.article_author),
            article_section: article(&props.article_section),
            article_tags: if is_article {
                props.article_tag.clone()
            } else {
                Vec::new()
            },
            og_type: Some(og_type),

            custom_meta: props.custom_meta.clone(),
            structured_data,
        }
    }

    pub fn is_article(&self) -> bool {
        self.og_type.as_deref() == Some(ARTICLE_OG_TYPE)
    }
}
