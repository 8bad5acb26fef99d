use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;

use crate::domain::errors::ConfigError;
use crate::domain::models::config::Config;

/// Project-local configuration file, lowest-priority file layer
pub const PROJECT_CONFIG_PATH: &str = ".record-enricher/config.yaml";

/// Optional local overrides on top of the project file
pub const LOCAL_CONFIG_PATH: &str = ".record-enricher/local.yaml";

/// Prefix of environment variable overrides; `__` separates nested keys
pub const ENV_PREFIX: &str = "RECORD_ENRICHER_";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .record-enricher/config.yaml
    /// 3. .record-enricher/local.yaml (optional)
    /// 4. Environment variables (RECORD_ENRICHER_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .merge(Yaml::file(PROJECT_CONFIG_PATH))
            .merge(Yaml::file(LOCAL_CONFIG_PATH))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    ///
    /// Unlike the project layers, an explicitly named file must exist.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        if !path.as_ref().is_file() {
            return Err(ConfigError::FileNotFound(path.as_ref().to_path_buf()).into());
        }

        let config: Config = Self::figment()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    /// Validate configuration after loading
    ///
    /// The API key is not checked here; it may come from `OPENAI_API_KEY`
    /// and is resolved when the provider is constructed.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Embedding provider
        if config.embedding.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if config.embedding.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if config.embedding.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.embedding.timeout_secs));
        }

        // Enrichment stage
        if config.enrichment.source_field.is_empty() {
            return Err(ConfigError::EmptyFieldName("source_field"));
        }
        if config.enrichment.target_field.is_empty() {
            return Err(ConfigError::EmptyFieldName("target_field"));
        }
        if config.enrichment.source_field == config.enrichment.target_field {
            return Err(ConfigError::ValidationFailed(format!(
                "source_field and target_field are both `{}`",
                config.enrichment.source_field
            )));
        }
        if let Some(limit @ 0) = config.enrichment.max_concurrency {
            return Err(ConfigError::InvalidMaxConcurrency(limit));
        }

        // Pipeline wiring
        for name in [&config.pipeline.source, &config.pipeline.destination] {
            if !config.resources.contains_key(name) {
                return Err(ConfigError::UnknownResource(name.clone()));
            }
        }
        if config.pipeline.stream.is_empty() || config.pipeline.collection.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "pipeline stream and collection cannot be empty".to_string(),
            ));
        }

        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
