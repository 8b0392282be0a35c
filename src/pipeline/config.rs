use crate::error::ConfigError;
use crate::pipeline::filter::FilterCriteria;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a column gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Dotted path into the entry
    #[serde(rename = "path", alias = "entry path")]
    Path,
    /// Named function from the custom-function registry
    #[serde(rename = "custom", alias = "custom function")]
    Custom,
}

/// One output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub title: String,
    #[serde(alias = "type")]
    pub kind: FieldKind,
    pub value: String,
}

impl FieldDescriptor {
    pub fn path(title: &str, path: &str) -> Self {
        FieldDescriptor {
            title: title.to_string(),
            kind: FieldKind::Path,
            value: path.to_string(),
        }
    }

    pub fn custom(title: &str, function: &str) -> Self {
        FieldDescriptor {
            title: title.to_string(),
            kind: FieldKind::Custom,
            value: function.to_string(),
        }
    }
}

/// Field document picked up from the working directory when no config is named
pub const DEFAULT_CONFIG_FILE: &str = "config-har-data-processing.json";

/// Declarative field document (`{"entryFields": [...]}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub entry_fields: Vec<FieldDescriptor>,
}

impl FieldConfig {
    /// Field list used when no config file is given: the columns of the
    /// script timing report.
    pub fn builtin() -> Self {
        FieldConfig {
            entry_fields: vec![
                FieldDescriptor::path("URL", "request.url"),
                FieldDescriptor::custom("Initiator Stack", "initiatorStack"),
                FieldDescriptor::path("Wait for server response", "timings.wait"),
                FieldDescriptor::path("Downloading from server", "timings.receive"),
                FieldDescriptor::path("Total Wait and Downloading", "timings.totalWaitReceive"),
                FieldDescriptor::path("Total", "time"),
            ],
        }
    }

    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load from disk. `.yaml` and `.yml` files are read as YAML, anything
    /// else as JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: origin.clone(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml_str(&text, &origin)?
        } else {
            Self::from_json_str(&text, &origin)?
        };
        tracing::debug!(
            path = %origin,
            fields = config.entry_fields.len(),
            "loaded field config"
        );
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to [`FieldConfig::builtin`].
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_builtin(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no field config, using built-in fields");
            Ok(Self::builtin())
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.entry_fields.iter().map(|f| f.title.clone()).collect()
    }
}

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub filters: FilterCriteria,
    pub fields: FieldConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            filters: FilterCriteria::default(),
            fields: FieldConfig::builtin(),
        }
    }
}
