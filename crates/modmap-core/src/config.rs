use crate::error::Error;
use crate::resolver::MappingTable;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;

/// Default time to wait for a module before giving up, in milliseconds.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 7000;

/// Default ceiling for combo URL length.
pub const DEFAULT_URL_MAX_LENGTH: usize = 2000;

/// Scalar loader options. Missing keys take their defaults at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderOptions {
    /// Report how each module name was resolved.
    pub explain_resolutions: bool,

    /// Milliseconds to wait for a module.
    pub wait_timeout: u64,

    /// Prefix for module paths.
    pub base_path: String,

    /// Whether requests are combined into combo URLs.
    pub combine: bool,

    /// Server URL.
    pub url: String,

    /// Maximum length of a combo URL.
    pub url_max_length: usize,

    /// Query parameters added to every module URL.
    #[serde(rename = "defaultURLParams", skip_serializing_if = "Option::is_none")]
    pub default_url_params: Option<Map<String, Value>>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            explain_resolutions: false,
            wait_timeout: DEFAULT_WAIT_TIMEOUT_MS,
            base_path: String::new(),
            combine: false,
            url: String::new(),
            url_max_length: DEFAULT_URL_MAX_LENGTH,
            default_url_params: None,
        }
    }
}

impl LoaderOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_explain_resolutions(mut self, explain: bool) -> Self {
        self.explain_resolutions = explain;
        self
    }

    #[must_use]
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    #[must_use]
    pub fn with_combine(mut self, combine: bool) -> Self {
        self.combine = combine;
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_url_max_length(mut self, max: usize) -> Self {
        self.url_max_length = max;
        self
    }

    #[must_use]
    pub fn with_default_url_params(mut self, params: Map<String, Value>) -> Self {
        self.default_url_params = Some(params);
        self
    }
}

/// Bootstrap configuration: options plus initial maps, paths and modules.
///
/// ```json
/// {
///   "combine": true,
///   "url": "http://localhost/combo",
///   "maps": { "liferay": "liferay@1.0.0", "jquery": { "value": "jquery@3", "exactMatch": true } },
///   "paths": { "liferay@1.0.0": "/o/liferay" },
///   "modules": ["liferay@1.0.0/index"]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(flatten)]
    pub options: LoaderOptions,

    /// Global alias table. Malformed entries are dropped.
    #[serde(default)]
    pub maps: MappingTable,

    #[serde(default)]
    pub paths: IndexMap<String, String>,

    /// Module names registered at startup.
    #[serde(default)]
    pub modules: Vec<String>,
}

impl LoaderConfig {
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        read_json(path)
    }
}

/// Load a standalone mapping table (same shape as `maps`), e.g. a
/// contextual map for one load operation.
pub fn load_mapping_table(path: &Path) -> Result<MappingTable, Error> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MappingEntry;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_for_missing_keys() {
        let config = LoaderConfig::from_json("{}").unwrap();
        assert_eq!(config.options, LoaderOptions::default());
        assert!(!config.options.explain_resolutions);
        assert_eq!(config.options.wait_timeout, 7000);
        assert_eq!(config.options.base_path, "");
        assert!(!config.options.combine);
        assert_eq!(config.options.url, "");
        assert_eq!(config.options.url_max_length, 2000);
        assert!(config.options.default_url_params.is_none());
        assert!(config.maps.is_empty());
        assert!(config.paths.is_empty());
        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_camel_case_keys() {
        let config = LoaderConfig::from_json(
            r#"{
                "explainResolutions": true,
                "waitTimeout": 500,
                "basePath": "/o/js",
                "combine": true,
                "url": "http://localhost/combo",
                "urlMaxLength": 100,
                "defaultURLParams": { "languageId": "en_US" }
            }"#,
        )
        .unwrap();

        let opts = &config.options;
        assert!(opts.explain_resolutions);
        assert_eq!(opts.wait_timeout, 500);
        assert_eq!(opts.base_path, "/o/js");
        assert!(opts.combine);
        assert_eq!(opts.url, "http://localhost/combo");
        assert_eq!(opts.url_max_length, 100);
        assert_eq!(
            opts.default_url_params.as_ref().unwrap().get("languageId"),
            Some(&json!("en_US"))
        );
    }

    #[test]
    fn test_bootstrap_tables() {
        let config = LoaderConfig::from_json(
            r#"{
                "maps": {
                    "liferay": "liferay@1.0.0",
                    "broken": 12,
                    "jquery": { "value": "jquery@3.0.0", "exactMatch": true }
                },
                "paths": { "liferay@1.0.0": "/o/liferay" },
                "modules": ["liferay@1.0.0/index", "jquery@3.0.0"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.maps.len(), 2);
        assert_eq!(config.maps.get("jquery"), Some(&MappingEntry::exact("jquery@3.0.0")));
        assert_eq!(config.paths.get("liferay@1.0.0").map(String::as_str), Some("/o/liferay"));
        assert_eq!(config.modules, ["liferay@1.0.0/index", "jquery@3.0.0"]);
    }

    #[test]
    fn test_builder_setters() {
        let opts = LoaderOptions::new()
            .with_explain_resolutions(true)
            .with_wait_timeout(Duration::from_secs(2))
            .with_base_path("/base")
            .with_combine(true)
            .with_url("http://x")
            .with_url_max_length(10);
        assert!(opts.explain_resolutions);
        assert_eq!(opts.wait_timeout, 2000);
        assert_eq!(opts.base_path, "/base");
        assert!(opts.combine);
        assert_eq!(opts.url, "http://x");
        assert_eq!(opts.url_max_length, 10);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "combine": true, "maps": {{ "a": "b" }} }}"#).unwrap();

        let config = LoaderConfig::load(file.path()).unwrap();
        assert!(config.options.combine);
        assert_eq!(config.maps.resolve_one("a/c"), "b/c");
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = LoaderConfig::load(Path::new("/nonexistent/modmap.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = load_mapping_table(file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
