use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Typesense connection settings
    pub typesense: TypesenseConfig,

    /// Indexing behavior
    #[serde(default)]
    pub indexing: IndexingConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: AMB_IDX)
            .add_source(
                config::Environment::with_prefix("AMB_IDX")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// Typesense connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypesenseConfig {
    /// Base URL of the Typesense server, e.g. `http://localhost:8108`
    pub host: String,

    /// API key sent as `X-TYPESENSE-API-KEY` on every request
    pub api_key: String,

    /// Collection holding the resource documents
    pub collection: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Fields searched by full-text queries (`query_by`)
    #[serde(default = "default_query_by")]
    pub query_by: Vec<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_query_by() -> Vec<String> {
    vec!["name".to_string(), "description".to_string()]
}

/// Indexing behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// The only event kind accepted for indexing
    #[serde(default = "default_accepted_kind")]
    pub accepted_kind: u32,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            accepted_kind: default_accepted_kind(),
        }
    }
}

fn default_accepted_kind() -> u32 {
    crate::models::LEARNING_RESOURCE_KIND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_deserialize() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.typesense.host, "http://localhost:8108");
        assert_eq!(config.typesense.collection, "learning-resources");
        assert_eq!(config.typesense.query_by, vec!["name", "description"]);
        assert_eq!(config.indexing.accepted_kind, 30142);
    }
}
