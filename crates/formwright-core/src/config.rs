//! Configuration management
//!
//! Configuration is layered:
//! - Default values
//! - Configuration files (TOML or JSON)
//! - Environment variables (`FORMWRIGHT_*`)

use crate::emitter::escape::is_js_identifier;
use crate::error::{Error, Result, StrictMode};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub emitter: EmitterConfig,
    pub schema: SchemaConfig,
    pub logging: LoggingConfig,
}

/// Settings for generated source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Name of the exported component
    pub component_name: String,

    /// Spaces per indentation level
    pub indent_width: usize,

    /// Text of the submit button
    pub submit_label: String,
}

/// Settings for record conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub mode: StrictMode,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            component_name: "GeneratedForm".to_string(),
            indent_width: 2,
            submit_label: "Submit".to_string(),
        }
    }
}

impl EmitterConfig {
    pub const MAX_INDENT_WIDTH: usize = 8;

    pub fn validate(&self) -> Result<()> {
        let starts_upper = self
            .component_name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase());
        if !is_js_identifier(&self.component_name) || !starts_upper {
            return Err(Error::configuration(format!(
                "Component name '{}' must be an identifier starting with an uppercase letter",
                self.component_name
            )));
        }

        if !(1..=Self::MAX_INDENT_WIDTH).contains(&self.indent_width) {
            return Err(Error::configuration(format!(
                "Indent width {} is outside 1..={}",
                self.indent_width,
                Self::MAX_INDENT_WIDTH
            )));
        }

        Ok(())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

impl Config {
    /// Load configuration from a `.toml` file, or JSON for any other extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Config = if is_toml(path) {
            toml::from_str(&content).map_err(|e| Error::Configuration {
                message: format!("Invalid TOML in {}", path.display()),
                source: Some(anyhow::Error::new(e)),
            })?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        Ok(config)
    }

    /// Apply `FORMWRIGHT_*` and logging environment overrides
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())?;
        self.logging.merge_with_env();
        Ok(())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(name) = lookup("FORMWRIGHT_COMPONENT_NAME") {
            self.emitter.component_name = name;
        }

        if let Some(width) = lookup("FORMWRIGHT_INDENT_WIDTH") {
            self.emitter.indent_width = width.trim().parse().map_err(|e| Error::Configuration {
                message: format!("Invalid FORMWRIGHT_INDENT_WIDTH '{}'", width),
                source: Some(anyhow::Error::new(e)),
            })?;
        }

        if let Some(label) = lookup("FORMWRIGHT_SUBMIT_LABEL") {
            self.emitter.submit_label = label;
        }

        if let Some(mode) = lookup("FORMWRIGHT_STRICT_MODE") {
            self.schema.mode = mode.parse()?;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        self.emitter.validate()
    }

    /// Save configuration as TOML or JSON, by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_toml(path) {
            toml::to_string_pretty(self).map_err(|e| Error::Configuration {
                message: "Failed to serialize configuration".to_string(),
                source: Some(anyhow::Error::new(e)),
            })?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
