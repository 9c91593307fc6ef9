//! Negotiation configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::parser::QualityParsing;

/// Representations a server can produce and how to advertise them.
///
/// ```yaml
/// supported:
///   - application/json
///   - text/json
/// charset: utf-8
/// quality_parsing: lenient
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NegotiationConfig {
    /// Media types in server preference order. The first one is the default.
    #[serde(default)]
    pub supported: Vec<String>,

    /// Appended to the negotiated Content-Type as `;charset=<value>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,

    #[serde(default)]
    pub quality_parsing: QualityParsing,
}

impl NegotiationConfig {
    pub fn new<I, S>(supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: supported.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the charset appended to the Content-Type.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Set the quality parsing mode.
    pub fn with_quality_parsing(mut self, mode: QualityParsing) -> Self {
        self.quality_parsing = mode;
        self
    }

    /// Load a configuration file. `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, anyhow::Error> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.supported.is_empty() {
            anyhow::bail!("No supported media types configured. Add at least one entry to 'supported'");
        }

        if let Some(media_type) = self
            .supported
            .iter()
            .find(|t| t.is_empty() || t.contains('*') || !t.contains('/'))
        {
            anyhow::bail!(
                "Invalid supported media type: '{media_type}'. Expected a concrete 'type/subtype'"
            );
        }

        if self.charset.as_deref().is_some_and(|c| c.trim().is_empty()) {
            anyhow::bail!("Charset must not be empty when set");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_yaml_with_defaults() {
        let config = NegotiationConfig::from_yaml_str("supported: [application/json]").unwrap();
        assert_eq!(config.supported, vec!["application/json"]);
        assert!(config.charset.is_none());
        assert_eq!(config.quality_parsing, QualityParsing::Lenient);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
supported:
  - application/json
  - text/json
charset: utf-8
quality_parsing: strict
"#;
        let config = NegotiationConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(
            config,
            NegotiationConfig::new(["application/json", "text/json"])
                .with_charset("utf-8")
                .with_quality_parsing(QualityParsing::Strict)
        );
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"supported": ["text/html"], "charset": "utf-8"}}"#).unwrap();

        let config = NegotiationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.supported, vec!["text/html"]);
        assert_eq!(config.charset.as_deref(), Some("utf-8"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "supported:\n  - application/xml").unwrap();

        let config = NegotiationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.supported, vec!["application/xml"]);
    }

    #[test]
    fn test_from_missing_file() {
        assert!(NegotiationConfig::from_file("/nonexistent/parley.yaml").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(NegotiationConfig::new(["application/json"]).validate().is_ok());
        assert!(NegotiationConfig::default().validate().is_err());
        assert!(NegotiationConfig::new(["image/*"]).validate().is_err());
        assert!(NegotiationConfig::new(["json"]).validate().is_err());
        assert!(NegotiationConfig::new(["application/json"])
            .with_charset(" ")
            .validate()
            .is_err());
    }
}
