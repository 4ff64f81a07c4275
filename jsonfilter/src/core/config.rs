use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::CONFIG_FILE_NAME;
use crate::filters::{JsonFilter, RawPropertyConfig, ResourceSchema};
use crate::utils::sql::is_safe_identifier;

/// Resource section (from JSON config file)
///
/// Schema fields (`table`, `alias`, `columns`) sit next to `filters`.
/// A filter entry of `null` enables the property with default type and strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceFileConfig {
    #[serde(flatten)]
    pub schema: ResourceSchema,
    #[serde(default)]
    pub filters: BTreeMap<String, Option<RawPropertyConfig>>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub resources: Option<BTreeMap<String, ResourceFileConfig>>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

/// A filterable resource: where its rows live and which JSON properties filter them
#[derive(Debug, Clone)]
pub struct Resource {
    pub name: String,
    pub schema: ResourceSchema,
    pub filter: JsonFilter,
}

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub resources: BTreeMap<String, Resource>,
}

impl AppConfig {
    /// Load configuration with layered priority
    ///
    /// 1. CLI-specified config path, or `jsonfilter.json` in the working directory
    /// 2. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let path = match &cli.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.clone())
            }
            None => {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                if local.exists() { Some(local) } else { None }
            }
        };

        let file_config = match path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                config
            }
            None => {
                tracing::debug!("No config file found, no resources configured");
                FileConfig::default()
            }
        };

        Self::from_file_config(file_config, cli)
    }

    /// Build from a parsed file, CLI values taking precedence
    pub fn from_file_config(file: FileConfig, cli: &CliConfig) -> Result<Self> {
        let mut resources = BTreeMap::new();

        for (name, resource) in file.resources.unwrap_or_default() {
            let raw = resource
                .filters
                .into_iter()
                .map(|(property, config)| (property, config.unwrap_or_default()));
            let filter = JsonFilter::from_raw(raw)
                .with_context(|| format!("Invalid filters for resource '{}'", name))?;

            tracing::debug!(
                resource = %name,
                table = %resource.schema.table,
                filters = filter.config().len(),
                "Resource configured"
            );

            resources.insert(
                name.clone(),
                Resource {
                    name,
                    schema: resource.schema,
                    filter,
                },
            );
        }

        let config = Self {
            database_url: cli.database_url.clone().or(file.database_url),
            resources,
        };
        config.validate()?;
        Ok(config)
    }

    /// Look up a resource by name
    pub fn resource(&self, name: &str) -> Result<&Resource> {
        self.resources.get(name).with_context(|| {
            let known = self
                .resources
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Unknown resource '{}'. Configured resources: [{}]", name, known)
        })
    }

    /// Table, alias and column names end up in SQL text
    fn validate(&self) -> Result<()> {
        for (name, resource) in &self.resources {
            let schema = &resource.schema;
            if !is_safe_identifier(&schema.table) {
                anyhow::bail!(
                    "Configuration error: resources.{}.table '{}' is not a valid identifier",
                    name,
                    schema.table
                );
            }
            if !is_safe_identifier(&schema.alias) {
                anyhow::bail!(
                    "Configuration error: resources.{}.alias '{}' is not a valid identifier",
                    name,
                    schema.alias
                );
            }
            if let Some(column) = schema.columns.keys().find(|c| !is_safe_identifier(c)) {
                anyhow::bail!(
                    "Configuration error: resources.{}.columns '{}' is not a valid identifier",
                    name,
                    column
                );
            }
        }
        Ok(())
    }
}
