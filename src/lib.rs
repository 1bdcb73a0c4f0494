//! Head Metadata Synchronization Library
//!
//! This library keeps a document head's SEO surface (title, meta tags,
//! canonical link and JSON-LD structured data) in sync with a page's
//! current metadata, and builds schema.org structured data.
//!
//! # Overview
//!
//! 1. The caller describes the page with [`SeoProps`]
//! 2. [`MetadataSnapshot::resolve`] applies defaults, fallbacks
//!    (`og:title` from the title, `og:url` from the validated canonical,
//!    ...) and merges structured data
//! 3. A [`Reconciler`] compares the new snapshot with the last one it
//!    applied and performs only the head writes needed to catch up
//!
//! The head itself is injected through the [`Head`] trait. [`MemoryHead`]
//! is an in-memory implementation for tests and server-side use.
//!
//! Structured data comes from the `generate_*_schema` builders in
//! [`schema`]; several schemas are emitted together as one `@graph`.
//!
//! # Usage
//!
//! ## Keep a head in sync
//!
//! ```ignore
//! use seoptimize::{MemoryHead, Reconciler, SeoProps};
//!
//! let mut reconciler = Reconciler::new(MemoryHead::new());
//! reconciler.update(&SeoProps {
//!     title: Some("Home".to_string()),
//!     canonical: Some("https://example.com/".to_string()),
//!     ..Default::default()
//! });
//! ```
//!
//! ## Render tags on the server
//!
//! ```ignore
//! use seoptimize::{render_seo_tags, generate_breadcrumb_schema, BreadcrumbItem, SeoProps};
//!
//! let breadcrumbs = generate_breadcrumb_schema(&[
//!     BreadcrumbItem::new("Home", "https://example.com/"),
//!     BreadcrumbItem::new("Blog", "https://example.com/blog"),
//! ])?;
//! let html = render_seo_tags(&SeoProps {
//!     title: Some("Blog".to_string()),
//!     structured_data: Some(breadcrumbs.into()),
//!     ..Default::default()
//! });
//! ```

pub mod config;
pub mod error;
pub mod head;
pub mod inject;
pub mod merge;
pub mod reconcile;
pub mod schema;
pub mod snapshot;
pub mod ssr;
pub mod validation;
pub mod vocab;

// Re-export main types for convenience
pub use crate::config::{load_organization_config, CONFIG_FILE_NAME};
pub use crate::error::SeoError;
pub use crate::head::{Head, HeadElement, HeadElementRef, MemoryHead, NodeId, Position, Tag};
pub use crate::inject::{find_project_root, inject_schema, InjectOutcome, Injection};
pub use crate::merge::{merge_schemas, validate_schema, SchemaInput, SchemaValidation};
pub use crate::reconcile::{apply, ReconcileStats, Reconciler};
pub use crate::schema::{
    generate_article_schema, generate_breadcrumb_schema, generate_faq_page_schema,
    generate_how_to_schema, generate_local_business_schema, generate_organization_schema,
    generate_product_schema, generate_professional_service_schema, generate_web_page_schema,
    BreadcrumbItem, OrganizationConfig,
};
pub use crate::snapshot::{MetadataSnapshot, SeoProps};
pub use crate::ssr::{escape_html, escape_json_for_script, render_seo_tags};
pub use crate::vocab::SCHEMA_CONTEXT;
