//! Report configuration
//!
//! Loaded from a JSON or YAML file. Every section is optional and unknown
//! keys are ignored.
//!
//! ```yaml
//! properties:
//!   available_to_hide: [tags, tags_all]
//!   hidden_by_default: [tags_all]
//! display:
//!   show_sensitive: false
//!   expand_all: false
//! build_url: https://ci.example.com/builds/42
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::traits::FileSystem;

/// Most property filters offered in the report
pub const MAX_FILTER_PROPERTIES: usize = 5;

/// Environment variable that overrides `build_url`
pub const BUILD_URL_ENV: &str = "BUILD_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub properties: PropertiesConfig,
    pub display: DisplayConfig,
    pub build_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesConfig {
    /// Property names offered as filters; all seen properties when absent
    pub available_to_hide: Option<Vec<String>>,
    /// Filters checked when the report opens
    pub hidden_by_default: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Reveal sensitive values instead of a placeholder
    pub show_sensitive: bool,
    /// Resource blocks start expanded
    pub expand_all: bool,
}

/// One property filter checkbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyFilter {
    pub name: String,
    pub hidden: bool,
}

impl ReportConfig {
    /// Load a config file, choosing the format from its extension
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if !fs.exists(path) {
            bail!("Config file not found: {:?}", path);
        }

        let content = fs.read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {:?}", path))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {:?}", path))?,
            _ => bail!(
                "Unsupported config format {:?}: expected .json, .yaml or .yml",
                path
            ),
        };

        log::debug!("Loaded report config from {:?}", path);
        Ok(config)
    }

    /// Apply build URL overrides: environment over file, command line over both
    pub fn with_build_url_overrides(mut self, env_value: Option<String>, cli_value: Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(cli_value).or_else(|| non_empty(env_value)) {
            self.build_url = Some(url);
        }
        self
    }

    /// The filter checkboxes for a report with the given property names
    pub fn property_filters(&self, seen: &BTreeSet<String>) -> Vec<PropertyFilter> {
        let candidates: Vec<&str> = match &self.properties.available_to_hide {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => seen.iter().map(String::as_str).collect(),
        };

        candidates
            .into_iter()
            .take(MAX_FILTER_PROPERTIES)
            .map(|name| PropertyFilter {
                name: name.to_string(),
                hidden: self.properties.hidden_by_default.iter().any(|h| h == name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;

    fn seen(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_load_yaml() {
        let fs = MockFileSystem::new();
        let path = Path::new("/work/planlens.yaml");
        fs.write(
            path,
            "properties:\n  available_to_hide: [tags]\n  hidden_by_default: [tags]\ndisplay:\n  expand_all: true\nbuild_url: https://ci/1\n",
        )
        .unwrap();

        let config = ReportConfig::load(&fs, path).unwrap();

        assert_eq!(config.properties.available_to_hide, Some(vec!["tags".to_string()]));
        assert_eq!(config.properties.hidden_by_default, vec!["tags".to_string()]);
        assert!(config.display.expand_all);
        assert!(!config.display.show_sensitive);
        assert_eq!(config.build_url.as_deref(), Some("https://ci/1"));
    }

    #[test]
    fn test_load_json_ignores_unknown_keys() {
        let fs = MockFileSystem::new();
        let path = Path::new("/work/config.json");
        fs.write(path, r#"{"display": {"show_sensitive": true}, "theme": "dark"}"#)
            .unwrap();

        let config = ReportConfig::load(&fs, path).unwrap();

        assert!(config.display.show_sensitive);
        assert_eq!(config.properties, PropertiesConfig::default());
    }

    #[test]
    fn test_load_missing_and_unsupported() {
        let fs = MockFileSystem::new();
        assert!(ReportConfig::load(&fs, Path::new("/nope.yaml")).is_err());

        fs.write(Path::new("/work/config.toml"), "a = 1").unwrap();
        let err = ReportConfig::load(&fs, Path::new("/work/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let fs = MockFileSystem::new();
        let path = Path::new("/work/bad.yml");
        fs.write(path, "display: [unclosed").unwrap();

        assert!(ReportConfig::load(&fs, path).is_err());
    }

    #[test]
    fn test_build_url_precedence() {
        let file = ReportConfig {
            build_url: Some("from-file".to_string()),
            ..Default::default()
        };

        let kept = file.clone().with_build_url_overrides(None, None);
        assert_eq!(kept.build_url.as_deref(), Some("from-file"));

        let env = file.clone().with_build_url_overrides(Some("from-env".to_string()), None);
        assert_eq!(env.build_url.as_deref(), Some("from-env"));

        let cli = file
            .clone()
            .with_build_url_overrides(Some("from-env".to_string()), Some("from-cli".to_string()));
        assert_eq!(cli.build_url.as_deref(), Some("from-cli"));

        let blank = file.with_build_url_overrides(Some("  ".to_string()), None);
        assert_eq!(blank.build_url.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_property_filters_default_to_seen_names() {
        let config = ReportConfig::default();
        let filters = config.property_filters(&seen(&["a", "b", "c", "d", "e", "f", "g"]));

        let names: Vec<&str> = filters.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
        assert!(filters.iter().all(|f| !f.hidden));
    }

    #[test]
    fn test_property_filters_from_config() {
        let mut config = ReportConfig::default();
        config.properties.available_to_hide = Some(vec!["tags_all".to_string(), "tags".to_string()]);
        config.properties.hidden_by_default = vec!["tags_all".to_string()];

        let filters = config.property_filters(&seen(&["ami"]));

        assert_eq!(
            filters,
            vec![
                PropertyFilter {
                    name: "tags_all".to_string(),
                    hidden: true
                },
                PropertyFilter {
                    name: "tags".to_string(),
                    hidden: false
                },
            ]
        );
    }
}
