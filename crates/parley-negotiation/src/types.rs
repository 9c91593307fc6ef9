//! Value types shared by the parser, ranker and matcher.

use indexmap::IndexMap;
use serde::Serialize;

/// Media range parameters other than `q`, in the order the client sent them.
pub type Parameters = IndexMap<String, String>;

/// One comma-separated range of an `Accept` header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceEntry {
    /// Media range: `type/subtype`, `type/*` or `*/*`.
    pub value: String,
    /// Client preference weight. Defaults to 1.0, never clamped.
    pub quality: f64,
    /// Non-`q` parameters, `None` when the range carried none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    /// Position of the range in the original header.
    pub index: usize,
}

impl PreferenceEntry {
    /// Create an entry with the default quality and no parameters.
    pub fn new(value: impl Into<String>, index: usize) -> Self {
        Self {
            value: value.into(),
            quality: 1.0,
            parameters: None,
            index,
        }
    }

    /// Set the quality for this entry.
    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    /// Add a parameter, replacing an earlier one with the same name.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .get_or_insert_with(Parameters::new)
            .insert(name.into(), value.into());
        self
    }

    /// `*/*`-suffixed ranges.
    pub fn is_catch_all(&self) -> bool {
        self.value.ends_with("*/*")
    }

    /// `type/*` ranges. Also true for `*/*`.
    pub fn is_wildcard_subtype(&self) -> bool {
        self.value.ends_with("/*")
    }
}

/// The representation selected for a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Concrete media type taken from the supported list.
    pub value: String,
    /// Quality of the preference entry that produced this match.
    pub quality: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

impl MatchResult {
    /// Create a result without parameters.
    pub fn new(value: impl Into<String>, quality: f64) -> Self {
        Self {
            value: value.into(),
            quality,
            parameters: None,
        }
    }

    /// Build a result from an entry whose value was matched as-is.
    pub fn from_entry(entry: &PreferenceEntry) -> Self {
        Self::expanded(entry, &entry.value)
    }

    /// Build a result for a wildcard entry resolved to `media_type`.
    pub fn expanded(entry: &PreferenceEntry, media_type: &str) -> Self {
        Self {
            value: media_type.to_string(),
            quality: entry.quality,
            parameters: entry.parameters.clone(),
        }
    }

    /// Set the parameters for this result.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}
