use std::env;

use crate::error::{SearchError, SearchResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Elasticsearch configuration
    pub elasticsearch: ElasticsearchConfig,
    /// Origins allowed by the CORS layer
    pub cors_allowed_origins: Vec<String>,
    /// Debug endpoint flag, resolved once at startup
    pub enable_debug_endpoints: bool,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Elasticsearch configuration
#[derive(Debug, Clone)]
pub struct ElasticsearchConfig {
    /// Base URL of the cluster
    pub url: String,
    /// Index holding the posts
    pub index: String,
    /// Verify TLS certificates when connecting
    pub verify_certs: bool,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> SearchResult<Self> {
        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            tracing::warn!("Could not load .env file: {}", e);
        }

        let config = Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .map_err(|e| SearchError::Config(format!("Invalid SERVER_PORT: {}", e)))?,
            },
            elasticsearch: ElasticsearchConfig {
                url: env::var("ELASTICSEARCH_URL")
                    .unwrap_or_else(|_| "http://elasticsearch:9200".to_string()),
                index: env::var("ELASTICSEARCH_INDEX").unwrap_or_else(|_| "posts".to_string()),
                verify_certs: env::var("ELASTICSEARCH_VERIFY_CERTS")
                    .unwrap_or_else(|_| "true".to_string())
                    .to_lowercase()
                    == "true",
                request_timeout_ms: env::var("ELASTICSEARCH_TIMEOUT_MS")
                    .unwrap_or_else(|_| "30000".to_string())
                    .parse()
                    .map_err(|e| {
                        SearchError::Config(format!("Invalid ELASTICSEARCH_TIMEOUT_MS: {}", e))
                    })?,
            },
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:4321".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            enable_debug_endpoints: env::var("ENABLE_DEBUG_ENDPOINTS")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                == "true",
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> SearchResult<()> {
        if self.server.port == 0 {
            return Err(SearchError::Config("Server port cannot be 0".to_string()));
        }

        if !self.elasticsearch.url.starts_with("http://")
            && !self.elasticsearch.url.starts_with("https://")
        {
            return Err(SearchError::Config(
                "ELASTICSEARCH_URL must start with http:// or https://".to_string(),
            ));
        }

        if self.elasticsearch.index.is_empty() {
            return Err(SearchError::Config(
                "ELASTICSEARCH_INDEX cannot be empty".to_string(),
            ));
        }

        if self.elasticsearch.request_timeout_ms == 0 {
            return Err(SearchError::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            elasticsearch: ElasticsearchConfig {
                url: "http://elasticsearch:9200".to_string(),
                index: "posts".to_string(),
                verify_certs: true,
                request_timeout_ms: 30000,
            },
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:4321".to_string(),
            ],
            enable_debug_endpoints: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.elasticsearch.index, "posts");
        assert!(!config.enable_debug_endpoints);
    }

    #[test]
    fn test_config_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_bad_elasticsearch_url() {
        let mut config = Config::default();
        config.elasticsearch.url = "elasticsearch:9200".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_empty_index() {
        let mut config = Config::default();
        config.elasticsearch.index = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let mut config = Config::default();
        config.elasticsearch.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
