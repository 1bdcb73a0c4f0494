//! Incremental head reconciliation
//!
//! Given the previously applied [`MetadataSnapshot`] and a desired one,
//! performs only the head writes needed to get from one to the other.
//!
//! Field groups follow two different rules:
//!
//! - Scalar tags are written when the desired value is present and differs
//!   from the previous one. An absent desired value leaves the element in
//!   place, so once set these tags never disappear on their own.
//! - Structured data, article tags and custom meta keys are removed when
//!   they are no longer desired.
//!
//! Every write looks its element up again through the [`Head`], so tags
//! removed or added by other code between passes are recreated or reused
//! rather than tracked.

use serde_json::Value;
use tracing::{debug, error, trace};

use crate::head::{Head, HeadElementRef, Position, Tag};
use crate::snapshot::{MetadataSnapshot, SeoProps};
use crate::ssr::escape_json_for_script;

/// Which attribute identifies a meta tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaKey {
    Name(&'static str),
    Property(&'static str),
}

impl MetaKey {
    fn selector(self) -> HeadElementRef {
        match self {
            MetaKey::Name(n) => HeadElementRef::meta("name", n),
            MetaKey::Property(p) => HeadElementRef::meta("property", p),
        }
    }
}

/// Scalar meta tags of a snapshot, in emission order
fn scalar_tags(s: &MetadataSnapshot) -> Vec<(MetaKey, Option<&str>)> {
    vec![
        (MetaKey::Name("viewport"), s.viewport.as_deref()),
        (MetaKey::Name("theme-color"), s.theme_color.as_deref()),
        (MetaKey::Name("description"), s.description.as_deref()),
        (MetaKey::Name("keywords"), s.keywords.as_deref()),
        (MetaKey::Name("robots"), s.robots.as_deref()),
        (MetaKey::Name("author"), s.author.as_deref()),
        (MetaKey::Property("og:title"), s.og_title.as_deref()),
        (MetaKey::Property("og:description"), s.og_description.as_deref()),
        (MetaKey::Property("og:url"), s.og_url.as_deref()),
        (MetaKey::Property("og:type"), s.og_type.as_deref()),
        (MetaKey::Property("og:image"), s.og_image.as_deref()),
        (MetaKey::Property("og:image:secure_url"), s.og_image_secure_url.as_deref()),
        (MetaKey::Property("og:image:width"), s.og_image_width.as_deref()),
        (MetaKey::Property("og:image:height"), s.og_image_height.as_deref()),
        (MetaKey::Property("og:image:alt"), s.og_image_alt.as_deref()),
        (MetaKey::Property("og:site_name"), s.og_site_name.as_deref()),
        (MetaKey::Property("og:locale"), s.og_locale.as_deref()),
        (MetaKey::Property("article:published_time"), s.article_published_time.as_deref()),
        (MetaKey::Property("article:modified_time"), s.article_modified_time.as_deref()),
        (MetaKey::Property("article:author"), s.article_author.as_deref()),
        (MetaKey::Property("article:section"), s.article_section.as_deref()),
        (MetaKey::Name("twitter:card"), s.twitter_card.as_deref()),
        (MetaKey::Name("twitter:site"), s.twitter_site.as_deref()),
        (MetaKey::Name("twitter:creator"), s.twitter_creator.as_deref()),
        (MetaKey::Name("twitter:title"), s.twitter_title.as_deref()),
        (MetaKey::Name("twitter:description"), s.twitter_description.as_deref()),
        (MetaKey::Name("twitter:url"), s.og_url.as_deref()),
        (MetaKey::Name("twitter:image"), s.twitter_image.as_deref()),
        (MetaKey::Name("twitter:image:alt"), s.twitter_image_alt.as_deref()),
    ]
}

const ARTICLE_TAG: &str = "article:tag";

/// Counts of head writes made by one pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Elements or document properties created or updated
    pub upserted: usize,
    /// Elements removed
    pub removed: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.upserted == 0 && self.removed == 0
    }
}

/// Keeps one document head in sync with successive snapshots
///
/// Passes are strictly sequential: `reconcile` takes `&mut self`.
#[derive(Debug)]
pub struct Reconciler<H> {
    head: H,
    previous: MetadataSnapshot,
}

impl<H: Head> Reconciler<H> {
    pub fn new(head: H) -> Self {
        Self {
            head,
            previous: MetadataSnapshot::default(),
        }
    }

    /// Resolve props and reconcile against them
    pub fn update(&mut self, props: &SeoProps) -> ReconcileStats {
        self.reconcile(MetadataSnapshot::resolve(props))
    }

    /// Bring the head in line with `desired` and remember it
    ///
    /// Reconciling the same snapshot twice writes nothing the second time.
    pub fn reconcile(&mut self, desired: MetadataSnapshot) -> ReconcileStats {
        let stats = apply(&mut self.head, &self.previous, &desired);
        if stats.is_noop() {
            trace!("Head already up to date");
        } else {
            debug!(
                upserted = stats.upserted,
                removed = stats.removed,
                "Reconciled head metadata"
            );
        }
        self.previous = desired;
        stats
    }

    /// The snapshot applied by the last pass
    pub fn previous(&self) -> &MetadataSnapshot {
        &self.previous
    }

    pub fn head(&self) -> &H {
        &self.head
    }

    pub fn head_mut(&mut self) -> &mut H {
        &mut self.head
    }

    pub fn into_head(self) -> H {
        self.head
    }
}

/// Apply the difference between two snapshots to a head
pub fn apply<H: Head + ?Sized>(
    head: &mut H,
    previous: &MetadataSnapshot,
    desired: &MetadataSnapshot,
) -> ReconcileStats {
    let mut stats = ReconcileStats::default();

    if let Some(lang) = changed(desired.html_lang.as_deref(), previous.html_lang.as_deref()) {
        head.set_lang(lang);
        stats.upserted += 1;
    }

    if let Some(charset) = changed(desired.charset.as_deref(), previous.charset.as_deref()) {
        match HeadElementRef::charset().resolve(&*head) {
            Some(node) => head.set_attribute(node, "charset", charset),
            None => {
                head.create(Tag::Meta, &[("charset", charset)], Position::First);
            }
        }
        stats.upserted += 1;
    }

    if let Some(title) = changed(desired.title.as_deref(), previous.title.as_deref()) {
        head.set_title(title);
        stats.upserted += 1;
    }

    if let Some(href) = changed(desired.canonical.as_deref(), previous.canonical.as_deref()) {
        upsert(head, &HeadElementRef::link("canonical"), "href", href);
        stats.upserted += 1;
    }

    for ((key, want), (_, had)) in scalar_tags(desired).into_iter().zip(scalar_tags(previous)) {
        if let Some(content) = changed(want, had) {
            upsert(head, &key.selector(), "content", content);
            stats.upserted += 1;
        }
    }

    apply_article_tags(head, &previous.article_tags, &desired.article_tags, &mut stats);
    apply_structured_data(
        head,
        previous.structured_data.as_ref(),
        desired.structured_data.as_ref(),
        &mut stats,
    );

    for (key, value) in &desired.custom_meta {
        if previous.custom_meta.get(key) != Some(value) {
            upsert(head, &HeadElementRef::meta("name", key), "content", value);
            stats.upserted += 1;
        }
    }
    // A custom key naming a managed tag shares its element, which stays sticky
    for key in previous.custom_meta.keys() {
        if !desired.custom_meta.contains_key(key) && !is_managed_name(key) {
            if let Some(node) = HeadElementRef::meta("name", key).resolve(&*head) {
                head.remove(node);
                stats.removed += 1;
            }
        }
    }

    stats
}

/// Whether `key` is the `name` of one of the scalar meta tags
fn is_managed_name(key: &str) -> bool {
    scalar_tags(&MetadataSnapshot::default())
        .into_iter()
        .any(|(meta_key, _)| matches!(meta_key, MetaKey::Name(name) if name == key))
}

/// The desired value, if it is present and differs from the previous one
fn changed<'a>(desired: Option<&'a str>, previous: Option<&str>) -> Option<&'a str> {
    match desired {
        Some(d) if Some(d) != previous => Some(d),
        _ => None,
    }
}

/// Update `attribute` of the matching element, creating it if missing
fn upsert<H: Head + ?Sized>(head: &mut H, selector: &HeadElementRef, attribute: &str, value: &str) {
    trace!(%selector, value, "upsert");
    match selector.resolve(&*head) {
        Some(node) => head.set_attribute(node, attribute, value),
        None => {
            let identity = (
                selector.attribute.as_str(),
                selector.value.as_deref().unwrap_or(""),
            );
            head.create(selector.tag, &[identity, (attribute, value)], Position::Last);
        }
    }
}

/// Index-aligned diff of the `article:tag` list
fn apply_article_tags<H: Head + ?Sized>(
    head: &mut H,
    previous: &[String],
    desired: &[String],
    stats: &mut ReconcileStats,
) {
    let selector = HeadElementRef::meta("property", ARTICLE_TAG);

    for (index, tag) in desired.iter().enumerate() {
        if previous.get(index) == Some(tag) {
            continue;
        }
        let existing = head.query_all(&selector);
        match existing.get(index) {
            Some(&node) => head.set_attribute(node, "content", tag),
            None => {
                head.create(
                    Tag::Meta,
                    &[("property", ARTICLE_TAG), ("content", tag.as_str())],
                    Position::Last,
                );
            }
        }
        stats.upserted += 1;
    }

    if desired.len() < previous.len() {
        for node in head.query_all(&selector).into_iter().skip(desired.len()) {
            head.remove(node);
            stats.removed += 1;
        }
    }
}

/// Emit, replace or remove the single JSON-LD script
fn apply_structured_data<H: Head + ?Sized>(
    head: &mut H,
    previous: Option<&Value>,
    desired: Option<&Value>,
    stats: &mut ReconcileStats,
) {
    let selector = HeadElementRef::json_ld();

    match desired {
        Some(schema) if Some(schema) != previous => {
            let text = match serde_json::to_string(schema) {
                Ok(t) => escape_json_for_script(&t),
                Err(e) => {
                    error!("Failed to serialize structured data: {}", e);
                    return;
                }
            };
            let node = match selector.resolve(&*head) {
                Some(node) => node,
                None => head.create(
                    Tag::Script,
                    &[("type", crate::vocab::JSON_LD_TYPE)],
                    Position::Last,
                ),
            };
            head.set_text(node, &text);
            stats.upserted += 1;
        }
        None if previous.is_some() => {
            if let Some(node) = selector.resolve(&*head) {
                head.remove(node);
                stats.removed += 1;
            }
        }
        _ => {}
    }
}
