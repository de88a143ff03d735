//! Component type definitions.
//!
//! A definition declares the tag and the fixed set of mirrored properties
//! for one component type, with their default values. Definitions can be
//! built programmatically or loaded from a TOML file:
//!
//! ```toml
//! tag = "my-counter"
//!
//! [properties]
//! count = 0
//! label = "Counter"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when loading or validating a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to read definition file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse definition: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Definition validation failed: {message}")]
    ValidationError { message: String },
}

/// Static description of one component type: its tag and the mirrored
/// properties with their defaults.
///
/// The property set is fixed for the lifetime of every instance created
/// from the definition; writes to names outside this set are rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentDefinition {
    /// Tag identifying the component type (e.g. "my-counter").
    pub tag: String,
    /// Mirrored property names and their default values.
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl ComponentDefinition {
    /// Create a definition programmatically.
    pub fn new(
        tag: impl Into<String>,
        properties: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self, DefinitionError> {
        let definition = Self {
            tag: tag.into(),
            properties: properties.into_iter().collect(),
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Parse a definition from a TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionError> {
        let definition: Self = toml::from_str(content)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load a definition from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DefinitionError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Validates the definition.
    ///
    /// Checks:
    /// - The tag is a well-formed name
    /// - Every property name is a well-formed name
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if !is_valid_name(&self.tag) {
            return Err(DefinitionError::ValidationError {
                message: format!("Invalid component tag '{}'", self.tag),
            });
        }

        for name in self.properties.keys() {
            if !is_valid_name(name) {
                return Err(DefinitionError::ValidationError {
                    message: format!("Invalid property name '{}'", name),
                });
            }
        }

        Ok(())
    }
}

/// Names must start with a letter and contain only letters, digits,
/// hyphens and underscores. Keeps arbitrary payload keys out of the
/// property namespace.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_definition() {
        let definition = ComponentDefinition::from_toml_str(
            r#"
tag = "my-counter"

[properties]
count = 0
label = "Counter"
"#,
        )
        .unwrap();

        assert_eq!(definition.tag, "my-counter");
        assert_eq!(definition.properties.len(), 2);
        assert_eq!(definition.properties["count"], json!(0));
        assert_eq!(definition.properties["label"], json!("Counter"));
    }

    #[test]
    fn test_parse_definition_no_properties() {
        let definition = ComponentDefinition::from_toml_str(r#"tag = "plain-badge""#).unwrap();
        assert!(definition.properties.is_empty());
    }

    #[test]
    fn test_invalid_tag_fails() {
        let result = ComponentDefinition::from_toml_str(r#"tag = "1bad tag""#);
        assert!(matches!(
            result,
            Err(DefinitionError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_invalid_property_name_fails() {
        let result = ComponentDefinition::from_toml_str(
            r#"
tag = "my-counter"

[properties]
"__proto__" = 1
"#,
        );
        assert!(matches!(
            result,
            Err(DefinitionError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_new_validates() {
        let result = ComponentDefinition::new("", Vec::new());
        assert!(matches!(
            result,
            Err(DefinitionError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ComponentDefinition::load_from("/nonexistent/definition.toml");
        assert!(matches!(result, Err(DefinitionError::ReadError { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("counter.toml");
        fs::write(
            &path,
            r#"
tag = "my-counter"

[properties]
count = 0
"#,
        )
        .unwrap();

        let definition = ComponentDefinition::load_from(&path).unwrap();
        assert_eq!(definition.tag, "my-counter");
        assert_eq!(definition.properties["count"], json!(0));
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("count"));
        assert!(is_valid_name("my-counter"));
        assert!(is_valid_name("snake_case_2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("2fast"));
        assert!(!is_valid_name("has space"));
        assert!(!is_valid_name("dotted.name"));
    }
}
