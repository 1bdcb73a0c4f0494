//! Merging and structural validation of structured data
//!
//! Normalizes "one schema or many" into a single emittable JSON-LD value
//! and reports structural problems without failing.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::vocab::{graph_wrapper, SCHEMA_CONTEXT};

/// Structured data as supplied by the caller: one schema or a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaInput {
    Many(Vec<Value>),
    One(Value),
}

impl From<Value> for SchemaInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => SchemaInput::Many(items),
            other => SchemaInput::One(other),
        }
    }
}

impl From<Vec<Value>> for SchemaInput {
    fn from(items: Vec<Value>) -> Self {
        SchemaInput::Many(items)
    }
}

/// Merge one or many schemas into a single emittable value
///
/// - Absent input, null, or an empty list: `None`
/// - A single schema: returned as-is
/// - Several schemas: wrapped in a `@graph` container, order kept
pub fn merge_schemas(input: Option<&SchemaInput>) -> Option<Value> {
    let items: Vec<&Value> = match input? {
        SchemaInput::One(Value::Null) => return None,
        SchemaInput::One(Value::Array(items)) | SchemaInput::Many(items) => items.iter().collect(),
        SchemaInput::One(value) => vec![value],
    };

    match items.len() {
        0 => None,
        1 => Some(items[0].clone()),
        _ => Some(graph_wrapper(items.into_iter().cloned().collect())),
    }
}

/// Result of a structural check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidation {
    pub valid: bool,
    pub problems: Vec<String>,
}

impl SchemaValidation {
    fn from_problems(problems: Vec<String>) -> Self {
        Self {
            valid: problems.is_empty(),
            problems,
        }
    }
}

/// Extract @type as a list of type names
pub fn extract_types(schema: &Value) -> Vec<String> {
    match schema.get("@type") {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => vec![],
    }
}

/// Check a single schema object for `@context` and `@type`
///
/// An unexpected context is logged but not reported as a problem.
pub fn validate_schema_structure(schema: &Value) -> SchemaValidation {
    check_object(schema, false)
}

fn check_object(schema: &Value, context_inherited: bool) -> SchemaValidation {
    let obj = match schema.as_object() {
        Some(o) => o,
        None => return SchemaValidation::from_problems(vec!["Schema must be an object".to_string()]),
    };

    let mut problems = Vec::new();

    match obj.get("@context") {
        None | Some(Value::Null) if !context_inherited => {
            problems.push("Schema must include @context".to_string());
        }
        Some(Value::String(ctx)) if ctx != SCHEMA_CONTEXT => {
            warn!(context = %ctx, "Unexpected @context, expected {}", SCHEMA_CONTEXT);
        }
        _ => {}
    }

    if extract_types(schema).is_empty() {
        problems.push("Schema must include @type".to_string());
    }

    SchemaValidation::from_problems(problems)
}

/// Validate a merged structured-data value
///
/// Lists are checked member by member and are valid only if every member
/// is. A `@graph` wrapper provides `@context` to its members, which are
/// then checked for `@type`.
pub fn validate_schema(value: &Value) -> SchemaValidation {
    match value {
        Value::Null => SchemaValidation::from_problems(vec![]),
        Value::Array(items) => validate_members(items, false),
        Value::Object(obj) => match obj.get("@graph") {
            Some(Value::Array(members)) => {
                let mut problems = Vec::new();
                if obj.get("@context").map_or(true, Value::is_null) {
                    problems.push("Schema must include @context".to_string());
                }
                problems.extend(validate_members(members, true).problems);
                SchemaValidation::from_problems(problems)
            }
            _ => validate_schema_structure(value),
        },
        _ => validate_schema_structure(value),
    }
}

fn validate_members(members: &[Value], context_inherited: bool) -> SchemaValidation {
    let problems = members
        .iter()
        .enumerate()
        .flat_map(|(i, member)| {
            check_object(member, context_inherited)
                .problems
                .into_iter()
                .map(move |p| format!("[{}] {}", i, p))
        })
        .collect();
    SchemaValidation::from_problems(problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn org() -> Value {
        json!({"@context": "https://schema.org", "@type": "Organization", "name": "A"})
    }

    fn page() -> Value {
        json!({"@context": "https://schema.org", "@type": "WebPage", "name": "P"})
    }

    #[test]
    fn test_merge_absent_and_empty() {
        assert_eq!(merge_schemas(None), None);
        assert_eq!(merge_schemas(Some(&SchemaInput::Many(vec![]))), None);
        assert_eq!(merge_schemas(Some(&SchemaInput::One(Value::Null))), None);
    }

    #[test]
    fn test_merge_single_unchanged() {
        assert_eq!(merge_schemas(Some(&SchemaInput::One(org()))), Some(org()));
        assert_eq!(merge_schemas(Some(&SchemaInput::Many(vec![org()]))), Some(org()));
    }

    #[test]
    fn test_merge_many_wraps_in_graph() {
        let merged = merge_schemas(Some(&SchemaInput::Many(vec![org(), page()]))).unwrap();
        assert_eq!(merged["@context"], "https://schema.org");
        assert_eq!(merged["@graph"], json!([org(), page()]));
    }

    #[test]
    fn test_schema_input_deserialize() {
        let one: SchemaInput = serde_json::from_value(org()).unwrap();
        assert_eq!(one, SchemaInput::One(org()));
        let many: SchemaInput = serde_json::from_value(json!([org(), page()])).unwrap();
        assert_eq!(many, SchemaInput::Many(vec![org(), page()]));
    }

    #[test]
    fn test_validate_structure() {
        assert!(validate_schema_structure(&org()).valid);

        let result = validate_schema_structure(&json!({"name": "x"}));
        assert!(!result.valid);
        assert_eq!(
            result.problems,
            vec!["Schema must include @context", "Schema must include @type"]
        );

        let result = validate_schema_structure(&json!("text"));
        assert_eq!(result.problems, vec!["Schema must be an object"]);

        // Unexpected context is only a warning
        assert!(validate_schema_structure(&json!({"@context": "https://other.org", "@type": "X"})).valid);
    }

    #[test]
    fn test_validate_graph_wrapper() {
        let merged = merge_schemas(Some(&SchemaInput::Many(vec![org(), page()]))).unwrap();
        assert!(validate_schema(&merged).valid);

        let merged = merge_schemas(Some(&SchemaInput::Many(vec![org(), json!({"name": "no type"})])))
            .unwrap();
        let result = validate_schema(&merged);
        assert!(!result.valid);
        assert_eq!(result.problems, vec!["[1] Schema must include @type"]);
    }

    #[test]
    fn test_validate_list_is_logical_and() {
        assert!(validate_schema(&json!([org(), page()])).valid);

        let result = validate_schema(&json!([org(), {"@type": "Thing"}]));
        assert!(!result.valid);
        assert_eq!(result.problems, vec!["[1] Schema must include @context"]);
    }
}
