use serde::{Deserialize, Serialize};

/// Source patterns used when no `sources` entry is configured
pub const DEFAULT_SOURCE_PATTERN: &str = "**/*.{ts,tsx,mts,cts,js,jsx,mjs,cjs}";

/// Exclusions applied when no `exclude` entry is configured
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["**/node_modules/**"];

/// Extensions tried, in order, when a module specifier omits one
pub const DEFAULT_RESOLVE_EXTENSIONS: &[&str] =
    &[".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs"];

/// Configuration for a single project.
///
/// Every field is optional; a missing config file behaves like `PlanConfig::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    /// Which files the project considers source files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<SourcesConfig>,

    /// File patterns to exclude from the project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Extension probing order for extensionless module specifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_extensions: Option<Vec<String>>,
}

impl PlanConfig {
    /// Source patterns, falling back to the default pattern
    #[must_use]
    pub fn source_patterns(&self) -> Vec<&str> {
        self.sources
            .as_ref()
            .map_or_else(|| vec![DEFAULT_SOURCE_PATTERN], SourcesConfig::patterns)
    }

    /// Exclude patterns, falling back to the defaults
    #[must_use]
    pub fn exclude_patterns(&self) -> Vec<&str> {
        self.exclude.as_ref().map_or_else(
            || DEFAULT_EXCLUDE_PATTERNS.to_vec(),
            |patterns| patterns.iter().map(String::as_str).collect(),
        )
    }

    /// Resolve extensions, falling back to the defaults
    #[must_use]
    pub fn resolve_extensions(&self) -> Vec<&str> {
        self.resolve_extensions.as_ref().map_or_else(
            || DEFAULT_RESOLVE_EXTENSIONS.to_vec(),
            |extensions| extensions.iter().map(String::as_str).collect(),
        )
    }
}

/// Source file pattern configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourcesConfig {
    /// Single pattern
    Pattern(String),
    /// Multiple patterns
    Patterns(Vec<String>),
}

impl SourcesConfig {
    /// Get all source patterns as a slice
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            Self::Pattern(pattern) => vec![pattern.as_str()],
            Self::Patterns(patterns) => patterns.iter().map(String::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_defaults() {
        let config = PlanConfig::default();

        assert_eq!(config.source_patterns(), vec![DEFAULT_SOURCE_PATTERN]);
        assert_eq!(config.exclude_patterns(), vec!["**/node_modules/**"]);
        assert_eq!(config.resolve_extensions().first(), Some(&".ts"));
    }

    #[test]
    fn test_sources_config_patterns() {
        let single = SourcesConfig::Pattern("src/**/*.ts".to_string());
        assert_eq!(single.patterns(), vec!["src/**/*.ts"]);

        let multiple =
            SourcesConfig::Patterns(vec!["src/**/*.ts".to_string(), "lib/**/*.js".to_string()]);
        assert_eq!(multiple.patterns(), vec!["src/**/*.ts", "lib/**/*.js"]);
    }

    #[test]
    fn test_explicit_empty_exclude_disables_defaults() {
        let config = PlanConfig {
            exclude: Some(vec![]),
            ..PlanConfig::default()
        };

        assert!(config.exclude_patterns().is_empty());
    }

    #[test]
    fn test_camel_case_deserialization() {
        let json = r#"{ "sources": ["src/**/*.ts"], "resolveExtensions": [".ts", ".js"] }"#;
        let config: PlanConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.source_patterns(), vec!["src/**/*.ts"]);
        assert_eq!(config.resolve_extensions(), vec![".ts", ".js"]);
        assert!(config.exclude.is_none());
    }
}
