//! Document configuration
//!
//! Loaded from TOML or built in code. All fields have defaults, so an empty
//! string is a valid configuration.

use scenedoc_core::Result;
use serde::{Deserialize, Serialize};

/// Configuration of a [`Document`](crate::Document)
///
/// # Example
///
/// ```toml
/// # Mint UUID v4 uids instead of sequential integers (default: false)
/// use_uuid = false
///
/// # Reject loaded documents written for another schema version (default: false)
/// strict_schema_version = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Mint UUID uids when the caller supplies none
    #[serde(default)]
    pub use_uuid: bool,
    /// Fail instead of warning when a loaded schema version differs
    #[serde(default)]
    pub strict_schema_version: bool,
}

impl DocumentConfig {
    /// Parse a TOML configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid TOML or has
    /// mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# scenedoc document configuration
#
# Mint UUID v4 uids instead of sequential integers (default: false)
use_uuid = false

# Reject loaded documents written for another schema version (default: false)
# When false, a mismatch is logged as a warning and loading continues.
strict_schema_version = false
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenedoc_core::Error;

    #[test]
    fn test_default_toml_parses_to_default() {
        let config = DocumentConfig::from_toml_str(DocumentConfig::default_toml()).unwrap();
        assert_eq!(config, DocumentConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = DocumentConfig::from_toml_str("").unwrap();
        assert!(!config.use_uuid);
        assert!(!config.strict_schema_version);
    }

    #[test]
    fn test_toml_overrides() {
        let config = DocumentConfig::from_toml_str("use_uuid = true\nstrict_schema_version = true\n").unwrap();
        assert!(config.use_uuid);
        assert!(config.strict_schema_version);
    }

    #[test]
    fn test_mistyped_field_is_config_error() {
        let err = DocumentConfig::from_toml_str("use_uuid = \"yes\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
