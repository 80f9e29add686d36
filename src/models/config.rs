//! Configuration options for the store client and the resolver.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

/// Connection settings for the remote document store.
///
/// Built once at start-up and handed to the repository; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StoreConfig {
    /// Base URL of the REST API, including the version segment.
    #[serde(default = "default_endpoint")]
    #[validate(url)]
    pub endpoint: String,
    #[validate(length(min = 1))]
    pub project_id: String,
    #[validate(length(min = 1))]
    pub database_id: String,
    #[validate(length(min = 1))]
    pub products_collection_id: String,
    #[validate(length(min = 1))]
    pub users_collection_id: String,
    /// Documents requested per list call.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 5000))]
    pub page_size: usize,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

/// Where suggestions are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionMode {
    /// No suggestions are computed.
    Disabled,
    /// Reuse the collection fetched for the lookup.
    #[default]
    Snapshot,
    /// Issue a second list query for suggestions.
    Refetch,
}

/// Which auxiliary results the resolver computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    #[serde(default = "default_true")]
    pub alternatives: bool,
    #[serde(default)]
    pub suggestions: SuggestionMode,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            alternatives: true,
            suggestions: SuggestionMode::Snapshot,
        }
    }
}

impl ResolverOptions {
    /// Lookup only: no alternative, no suggestions.
    pub fn reduced() -> Self {
        Self {
            alternatives: false,
            suggestions: SuggestionMode::Disabled,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub store: StoreConfig,
    #[serde(default)]
    pub resolver: ResolverOptions,
}

#[cfg(feature = "scanner")]
mod loading {
    use std::collections::HashMap;
    use std::path::Path;

    use thiserror::Error;
    use validator::{Validate, ValidationErrors};

    use super::AppConfig;

    /// Location searched when no explicit config file is given.
    pub const DEFAULT_CONFIG_PATH: &str = "config/default";
    /// Prefix of environment overrides, e.g. `ARQR__STORE__PROJECT_ID`.
    pub const ENV_PREFIX: &str = "ARQR";

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Load(#[from] ::config::ConfigError),
        #[error("invalid configuration: {0}")]
        Invalid(#[from] ValidationErrors),
    }

    impl AppConfig {
        /// Load configuration from a YAML file and `ARQR__*` environment
        /// variables, which take precedence.
        pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
            Self::load_with_env(path, None)
        }

        /// Same as [`Self::load`] but reads overrides from `env` instead of
        /// the process environment when provided.
        pub fn load_with_env(
            path: Option<&Path>,
            env: Option<HashMap<String, String>>,
        ) -> Result<Self, ConfigError> {
            let file = match path {
                Some(path) => ::config::File::from(path).required(true),
                None => ::config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
            };

            let settings = ::config::Config::builder()
                .add_source(file)
                .add_source(
                    ::config::Environment::with_prefix(ENV_PREFIX)
                        .separator("__")
                        .try_parsing(true)
                        .source(env),
                )
                .build()?;

            let config: AppConfig = settings.try_deserialize()?;
            config.validate()?;
            Ok(config)
        }
    }
}

#[cfg(feature = "scanner")]
pub use loading::{ConfigError, DEFAULT_CONFIG_PATH, ENV_PREFIX};

#[cfg(all(test, feature = "scanner"))]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    const YAML: &str = "\
store:
  project_id: proj
  database_id: db
  products_collection_id: products
  users_collection_id: users
resolver:
  suggestions: refetch
";

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write yaml");
        file
    }

    #[test]
    fn loads_file_with_defaults() {
        let file = yaml_file(YAML);

        let config = AppConfig::load_with_env(Some(file.path()), Some(HashMap::new())).unwrap();

        assert_eq!(config.store.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.store.project_id, "proj");
        assert_eq!(config.store.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.resolver.alternatives);
        assert_eq!(config.resolver.suggestions, SuggestionMode::Refetch);
    }

    #[test]
    fn environment_overrides_file() {
        let file = yaml_file(YAML);
        let env = HashMap::from([
            ("ARQR__STORE__PROJECT_ID".to_string(), "other".to_string()),
            ("ARQR__STORE__PAGE_SIZE".to_string(), "25".to_string()),
        ]);

        let config = AppConfig::load_with_env(Some(file.path()), Some(env)).unwrap();

        assert_eq!(config.store.project_id, "other");
        assert_eq!(config.store.page_size, 25);
    }

    #[test]
    fn rejects_invalid_values() {
        let file = yaml_file(&YAML.replace("project_id: proj", "project_id: \"\""));

        let result = AppConfig::load_with_env(Some(file.path()), Some(HashMap::new()));

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_required_ids_fail_to_load() {
        let file = yaml_file("store:\n  project_id: proj\n");

        let result = AppConfig::load_with_env(Some(file.path()), Some(HashMap::new()));

        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn reduced_options_disable_extras() {
        let options = ResolverOptions::reduced();
        assert!(!options.alternatives);
        assert_eq!(options.suggestions, SuggestionMode::Disabled);
    }
}
