/*!
 * Embed provider table.
 *
 * Each row says how to recognise one provider's embed snippets (a URL marker
 * substring), how to pull the provider id out of the snippet, which words in
 * the preceding line mark it as a title, and how to build the canonical URL.
 * Rows are evaluated in order and the first marker found in a snippet wins.
 */

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ExtractionError;

/// Kind of resource a provider hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Game,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Game => write!(f, "game"),
        }
    }
}

/// Serializable description of one provider row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Which list matched snippets go into
    pub kind: ResourceKind,

    /// Display name, e.g. "YouTube"
    pub name: String,

    /// Substring identifying this provider's embed URLs
    pub url_marker: String,

    /// Words that mark the preceding line as this resource's title
    #[serde(default)]
    pub cue_words: Vec<String>,

    /// Canonical URL template, `{id}` is replaced by the provider id
    pub canonical_url: String,

    /// Label used for synthesized titles ("Video 1", "Game 2", ...)
    pub placeholder: String,
}

impl ProviderSpec {
    pub fn youtube() -> Self {
        Self {
            kind: ResourceKind::Video,
            name: "YouTube".to_string(),
            url_marker: "youtube.com/embed".to_string(),
            cue_words: ["VIDEO", "SONG", "FILM", "SKIT"].iter().map(|w| w.to_string()).collect(),
            canonical_url: "https://www.youtube.com/watch?v={id}".to_string(),
            placeholder: "Video".to_string(),
        }
    }

    pub fn wordwall() -> Self {
        Self {
            kind: ResourceKind::Game,
            name: "Wordwall".to_string(),
            url_marker: "wordwall.net/embed".to_string(),
            cue_words: ["GAME", "WORDWALL"].iter().map(|w| w.to_string()).collect(),
            canonical_url: "https://wordwall.net/resource/{id}".to_string(),
            placeholder: "Game".to_string(),
        }
    }

    /// The two providers found in the resource documents
    pub fn defaults() -> Vec<Self> {
        vec![Self::youtube(), Self::wordwall()]
    }
}

/// A provider row with its compiled id regex
#[derive(Debug, Clone)]
pub struct ProviderRule {
    pub spec: ProviderSpec,
    id_regex: Regex,
}

/// Sentinel id used when a snippet carries the marker but no capturable id
pub const UNKNOWN_ID: &str = "unknown";

impl ProviderRule {
    fn new(spec: ProviderSpec) -> Result<Self, ExtractionError> {
        if spec.url_marker.trim().is_empty() {
            return Err(ExtractionError::InvalidProviderTable(format!(
                "provider '{}' has an empty URL marker",
                spec.name
            )));
        }

        // Path segment right after the marker, stopping at a query string or quote
        let pattern = format!(r#"{}/([^?"'&\s<>/]+)"#, regex::escape(&spec.url_marker));
        let id_regex = Regex::new(&pattern)
            .map_err(|e| ExtractionError::InvalidProviderTable(e.to_string()))?;

        Ok(Self { spec, id_regex })
    }

    /// Whether the snippet belongs to this provider
    pub fn matches(&self, snippet: &str) -> bool {
        snippet.contains(&self.spec.url_marker)
    }

    /// Provider id from the snippet, if one can be captured
    pub fn extract_id(&self, snippet: &str) -> Option<String> {
        self.id_regex
            .captures(snippet)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Whether a line of text names a resource of this provider
    pub fn is_title_line(&self, line: &str) -> bool {
        self.spec.cue_words.iter().any(|cue| !cue.is_empty() && line.contains(cue.as_str()))
    }

    pub fn canonical_url(&self, id: &str) -> String {
        self.spec.canonical_url.replace("{id}", id)
    }

    pub fn placeholder_title(&self, position: usize) -> String {
        format!("{} {}", self.spec.placeholder, position)
    }
}

/// Ordered provider rules, first match wins
#[derive(Debug, Clone)]
pub struct ProviderTable {
    rules: Vec<ProviderRule>,
}

impl ProviderTable {
    pub fn new(specs: &[ProviderSpec]) -> Result<Self, ExtractionError> {
        if specs.is_empty() {
            return Err(ExtractionError::InvalidProviderTable(
                "at least one provider is required".to_string(),
            ));
        }

        let mut rules: Vec<ProviderRule> = Vec::with_capacity(specs.len());
        for spec in specs {
            if rules.iter().any(|r| r.spec.url_marker == spec.url_marker) {
                return Err(ExtractionError::InvalidProviderTable(format!(
                    "duplicate URL marker '{}'",
                    spec.url_marker
                )));
            }
            rules.push(ProviderRule::new(spec.clone())?);
        }

        Ok(Self { rules })
    }

    /// First rule whose marker appears in the snippet
    pub fn classify(&self, snippet: &str) -> Option<&ProviderRule> {
        self.rules.iter().find(|rule| rule.matches(snippet))
    }

    pub fn rules(&self) -> &[ProviderRule] {
        &self.rules
    }
}

impl Default for ProviderTable {
    fn default() -> Self {
        let rules = ProviderSpec::defaults()
            .into_iter()
            .filter_map(|spec| ProviderRule::new(spec).ok())
            .collect();
        Self { rules }
    }
}
