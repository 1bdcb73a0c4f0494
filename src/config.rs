//! Loading of the organization schema config file

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::error::SeoError;
use crate::schema::OrganizationConfig;

/// Default config file name, looked up in the project root
pub const CONFIG_FILE_NAME: &str = "schema.config.json";

/// Load and check an organization config
///
/// The file must exist, parse as JSON, and carry a non-empty `name`.
pub fn load_organization_config(path: &Path) -> Result<OrganizationConfig, SeoError> {
    if !path.is_file() {
        return Err(SeoError::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| SeoError::ConfigRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let config: OrganizationConfig =
        serde_json::from_str(&content).map_err(|e| SeoError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    if config.name.is_empty() {
        return Err(SeoError::MissingConfigField {
            field: "name".to_string(),
            file: file_label(path),
        });
    }

    Ok(config)
}

/// Minimal config shown to users who have none yet
pub fn example_config() -> serde_json::Value {
    json!({
        "name": "Your Organization",
        "url": "https://example.com",
        "description": "Your description"
    })
}

/// File name for messages, falling back to the full path
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"name": "Acme", "url": "https://acme.test", "sameAs": []}"#).unwrap();

        let config = load_organization_config(&path).unwrap();
        assert_eq!(config.name, "Acme");
        assert_eq!(config.url.as_deref(), Some("https://acme.test"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_organization_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, SeoError::ConfigNotFound(_)));
        assert!(err.to_string().starts_with("Config file not found at"));
    }

    #[test]
    fn test_missing_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"url": "https://example.com"}"#).unwrap();

        let err = load_organization_config(&path).unwrap_err();
        assert_eq!(err.to_string(), "\"name\" is required in schema.config.json");
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_organization_config(&path),
            Err(SeoError::ConfigRead { .. })
        ));
    }
}
