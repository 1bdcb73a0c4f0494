//! Schema.org JSON-LD builders
//!
//! Each builder takes a typed config and returns a tagged JSON-LD object.
//! Required fields and URLs are validated up front; a bad config is an
//! error for the caller, never a partially filled schema.
//!
//! Nested schema.org objects whose shape varies (addresses, offers,
//! ratings, ...) are passed through as JSON values.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::SeoError;
use crate::validation::{validate_required, validate_url};
use crate::vocab::{DEFAULT_PAGE_LANGUAGE, SCHEMA_CONTEXT};

/// Config for an Organization schema
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationConfig {
    pub name: String,
    pub alternate_name: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub address: Option<Value>,
    pub contact_point: Option<Value>,
    pub same_as: Vec<String>,
    pub area_served: Option<Value>,
    pub has_offer_catalog: Option<Value>,
}

/// Config for a ProfessionalService schema
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalServiceConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub area_served: Option<Value>,
    pub service_type: Option<String>,
    pub provider: Option<Value>,
}

/// One entry of a breadcrumb trail
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BreadcrumbItem {
    pub name: String,
    pub url: String,
}

impl BreadcrumbItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Config for a WebPage schema
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebPageConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub in_language: Option<String>,
    pub is_part_of: Option<Value>,
}

impl Default for WebPageConfig {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            url: None,
            in_language: Some(DEFAULT_PAGE_LANGUAGE.to_string()),
            is_part_of: None,
        }
    }
}

/// Config for an Article schema
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleConfig {
    pub headline: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub date_published: Option<String>,
    pub date_modified: Option<String>,
    pub author: Option<Value>,
    pub publisher: Option<Value>,
    pub article_section: Option<String>,
    pub article_tag: Vec<String>,
    pub url: Option<String>,
}

/// Config for a Product schema
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductConfig {
    pub name: String,
    pub description: Option<String>,
    /// A single image URL or a list of them
    pub image: Option<Value>,
    pub brand: Option<Value>,
    pub sku: Option<String>,
    pub offers: Option<Value>,
    pub aggregate_rating: Option<Value>,
    pub review: Vec<Value>,
    pub url: Option<String>,
}

/// A question and its accepted answer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaqQuestion {
    pub name: String,
    pub accepted_answer: FaqAnswer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FaqAnswer {
    pub text: String,
}

impl FaqQuestion {
    pub fn new(name: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepted_answer: FaqAnswer {
                text: answer.into(),
            },
        }
    }
}

/// Config for an FAQPage schema
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaqPageConfig {
    pub main_entity: Option<Vec<FaqQuestion>>,
}

/// A single HowTo step
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HowToStep {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub url: Option<String>,
}

/// Config for a HowTo schema
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HowToConfig {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<Value>,
    pub total_time: Option<String>,
    pub estimated_cost: Option<Value>,
    /// Names of the supplies needed
    pub supply: Vec<String>,
    /// Names of the tools needed
    pub tool: Vec<String>,
    pub step: Option<Vec<HowToStep>>,
}

/// Config for a LocalBusiness schema
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalBusinessConfig {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub address: Option<Value>,
    pub telephone: Option<String>,
    pub price_range: Option<String>,
    pub opening_hours_specification: Vec<Value>,
    pub serves_cuisine: Option<String>,
    pub accepts_reservations: Option<bool>,
    pub url: Option<String>,
    pub same_as: Vec<String>,
}

/// Start a schema object with `@context` and `@type`
fn schema_object(type_name: &str) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("@context".to_string(), json!(SCHEMA_CONTEXT));
    obj.insert("@type".to_string(), json!(type_name));
    obj
}

/// Insert a string unless it is absent or empty
fn insert_str(obj: &mut Map<String, Value>, key: &str, value: Option<&String>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        obj.insert(key.to_string(), json!(v));
    }
}

/// Insert a JSON value unless it is absent or null
fn insert_value(obj: &mut Map<String, Value>, key: &str, value: Option<&Value>) {
    if let Some(v) = value.filter(|v| !v.is_null()) {
        obj.insert(key.to_string(), v.clone());
    }
}

/// Insert a list unless it is empty
fn insert_list<T: serde::Serialize>(obj: &mut Map<String, Value>, key: &str, values: &[T]) {
    if !values.is_empty() {
        obj.insert(key.to_string(), json!(values));
    }
}

pub fn generate_organization_schema(config: &OrganizationConfig) -> Result<Value, SeoError> {
    validate_required(&config.name, "name")?;
    validate_url(config.url.as_deref(), "url")?;
    validate_url(config.logo.as_deref(), "logo")?;

    let mut obj = schema_object("Organization");
    obj.insert("name".to_string(), json!(config.name));
    insert_str(&mut obj, "alternateName", config.alternate_name.as_ref());
    insert_str(&mut obj, "url", config.url.as_ref());
    insert_str(&mut obj, "logo", config.logo.as_ref());
    insert_str(&mut obj, "description", config.description.as_ref());
    insert_value(&mut obj, "address", config.address.as_ref());
    insert_value(&mut obj, "contactPoint", config.contact_point.as_ref());
    insert_list(&mut obj, "sameAs", &config.same_as);
    insert_value(&mut obj, "areaServed", config.area_served.as_ref());
    insert_value(&mut obj, "hasOfferCatalog", config.has_offer_catalog.as_ref());

    Ok(Value::Object(obj))
}

pub fn generate_professional_service_schema(
    config: &ProfessionalServiceConfig,
) -> Result<Value, SeoError> {
    validate_url(config.url.as_deref(), "url")?;

    let mut obj = schema_object("ProfessionalService");
    insert_str(&mut obj, "name", config.name.as_ref());
    insert_str(&mut obj, "description", config.description.as_ref());
    insert_str(&mut obj, "url", config.url.as_ref());
    insert_value(&mut obj, "areaServed", config.area_served.as_ref());
    insert_str(&mut obj, "serviceType", config.service_type.as_ref());
    insert_value(&mut obj, "provider", config.provider.as_ref());

    Ok(Value::Object(obj))
}

/// Build a BreadcrumbList; positions are 1-based in input order
pub fn generate_breadcrumb_schema(items: &[BreadcrumbItem]) -> Result<Value, SeoError> {
    if items.is_empty() {
        return Err(SeoError::InvalidStructure(
            "Breadcrumb items array cannot be empty.".to_string(),
        ));
    }

    let mut elements = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if item.name.is_empty() {
            return Err(SeoError::BreadcrumbItemMissing { index, field: "name" });
        }
        if item.url.is_empty() {
            return Err(SeoError::BreadcrumbItemMissing { index, field: "url" });
        }
        validate_url(Some(item.url.as_str()), &format!("items[{}].url", index))?;

        elements.push(json!({
            "@type": "ListItem",
            "position": index + 1,
            "name": item.name,
            "item": item.url
        }));
    }

    let mut obj = schema_object("BreadcrumbList");
    obj.insert("itemListElement".to_string(), Value::Array(elements));
    Ok(Value::Object(obj))
}

pub fn generate_web_page_schema(config: &WebPageConfig) -> Result<Value, SeoError> {
    validate_url(config.url.as_deref(), "url")?;

    let mut obj = schema_object("WebPage");
    insert_str(&mut obj, "name", config.name.as_ref());
    insert_str(&mut obj, "description", config.description.as_ref());
    insert_str(&mut obj, "url", config.url.as_ref());
    insert_str(&mut obj, "inLanguage", config.in_language.as_ref());
    insert_value(&mut obj, "isPartOf", config.is_part_of.as_ref());

    Ok(Value::Object(obj))
}

pub fn generate_article_schema(config: &ArticleConfig) -> Result<Value, SeoError> {
    validate_required(&config.headline, "headline")?;
    validate_url(config.url.as_deref(), "url")?;
    validate_url(config.image.as_deref(), "image")?;

    let mut obj = schema_object("Article");
    obj.insert("headline".to_string(), json!(config.headline));
    insert_str(&mut obj, "description", config.description.as_ref());
    insert_str(&mut obj, "image", config.image.as_ref());
    insert_str(&mut obj, "datePublished", config.date_published.as_ref());
    insert_str(&mut obj, "dateModified", config.date_modified.as_ref());
    insert_value(&mut obj, "author", config.author.as_ref());
    insert_value(&mut obj, "publisher", config.publisher.as_ref());
    insert_str(&mut obj, "articleSection", config.article_section.as_ref());
    insert_list(&mut obj, "articleTag", &config.article_tag);
    insert_str(&mut obj, "url", config.url.as_ref());

    Ok(Value::Object(obj))
}

pub fn generate_product_schema(config: &ProductConfig) -> Result<Value, SeoError> {
    validate_required(&config.name, "name")?;
    validate_url(config.url.as_deref(), "url")?;

    let mut obj = schema_object("Product");
    obj.insert("name".to_string(), json!(config.name));
    insert_str(&mut obj, "description", config.description.as_ref());
    insert_value(&mut obj, "image", config.image.as_ref());
    insert_value(&mut obj, "brand", config.brand.as_ref());
    insert_str(&mut obj, "sku", config.sku.as_ref());
    insert_value(&mut obj, "offers", config.offers.as_ref());
    insert_value(&mut obj, "aggregateRating", config.aggregate_rating.as_ref());
    insert_list(&mut obj, "review", &config.review);
    insert_str(&mut obj, "url", config.url.as_ref());

    Ok(Value::Object(obj))
}

pub fn generate_faq_page_schema(config: &FaqPageConfig) -> Result<Value, SeoError> {
    let questions = config
        .main_entity
        .as_ref()
        .ok_or_else(|| SeoError::MissingField("mainEntity".to_string()))?;
    if questions.is_empty() {
        return Err(SeoError::InvalidStructure(
            "FAQ mainEntity array cannot be empty.".to_string(),
        ));
    }

    let main_entity: Vec<Value> = questions
        .iter()
        .map(|q| {
            json!({
                "@type": "Question",
                "name": q.name,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": q.accepted_answer.text
                }
            })
        })
        .collect();

    let mut obj = schema_object("FAQPage");
    obj.insert("mainEntity".to_string(), Value::Array(main_entity));
    Ok(Value::Object(obj))
}

pub fn generate_how_to_schema(config: &HowToConfig) -> Result<Value, SeoError> {
    validate_required(&config.name, "name")?;
    let steps = config
        .step
        .as_ref()
        .ok_or_else(|| SeoError::MissingField("step".to_string()))?;
    if steps.is_empty() {
        return Err(SeoError::InvalidStructure(
            "HowTo step array cannot be empty.".to_string(),
        ));
    }

    let mut step_values = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        validate_url(step.url.as_deref(), &format!("step[{}].url", i))?;
        let mut s = Map::new();
        s.insert("@type".to_string(), json!("HowToStep"));
        s.insert("name".to_string(), json!(step.name));
        s.insert("text".to_string(), json!(step.text));
        insert_str(&mut s, "image", step.image.as_ref());
        insert_str(&mut s, "url", step.url.as_ref());
        step_values.push(Value::Object(s));
    }

    let mut obj = schema_object("HowTo");
    obj.insert("name".to_string(), json!(config.name));
    insert_str(&mut obj, "description", config.description.as_ref());
    insert_value(&mut obj, "image", config.image.as_ref());
    insert_str(&mut obj, "totalTime", config.total_time.as_ref());
    insert_value(&mut obj, "estimatedCost", config.estimated_cost.as_ref());
    if !config.supply.is_empty() {
        let supply: Vec<Value> = config
            .supply
            .iter()
            .map(|name| json!({"@type": "HowToSupply", "name": name}))
            .collect();
        obj.insert("supply".to_string(), Value::Array(supply));
    }
    if !config.tool.is_empty() {
        let tool: Vec<Value> = config
            .tool
            .iter()
            .map(|name| json!({"@type": "HowToTool", "name": name}))
            .collect();
        obj.insert("tool".to_string(), Value::Array(tool));
    }
    obj.insert("step".to_string(), Value::Array(step_values));

    Ok(Value::Object(obj))
}

pub fn generate_local_business_schema(config: &LocalBusinessConfig) -> Result<Value, SeoError> {
    validate_required(&config.name, "name")?;
    let address = config
        .address
        .as_ref()
        .filter(|a| !a.is_null())
        .ok_or_else(|| SeoError::MissingField("address".to_string()))?;
    validate_url(config.url.as_deref(), "url")?;

    let mut obj = schema_object("LocalBusiness");
    obj.insert("name".to_string(), json!(config.name));
    insert_str(&mut obj, "description", config.description.as_ref());
    insert_str(&mut obj, "image", config.image.as_ref());
    obj.insert("address".to_string(), address.clone());
    insert_str(&mut obj, "telephone", config.telephone.as_ref());
    insert_str(&mut obj, "priceRange", config.price_range.as_ref());
    insert_list(
        &mut obj,
        "openingHoursSpecification",
        &config.opening_hours_specification,
    );
    insert_str(&mut obj, "servesCuisine", config.serves_cuisine.as_ref());
    if let Some(accepts) = config.accepts_reservations {
        obj.insert("acceptsReservations".to_string(), json!(accepts));
    }
    insert_str(&mut obj, "url", config.url.as_ref());
    insert_list(&mut obj, "sameAs", &config.same_as);

    Ok(Value::Object(obj))
}
