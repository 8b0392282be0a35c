use crate::error::ConfigError;
use crate::path::resolve;
use indexmap::IndexSet;
use serde_json::Value;

/// Raw filter parameters as supplied by the caller.
///
/// At most one of the two lists may be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub file_types: Vec<String>,
    pub resource_types: Vec<String>,
}

impl FilterCriteria {
    pub fn new(file_types: Vec<String>, resource_types: Vec<String>) -> Self {
        FilterCriteria {
            file_types,
            resource_types,
        }
    }

    pub fn file_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(types.into_iter().map(Into::into).collect(), Vec::new())
    }

    pub fn resource_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Vec::new(), types.into_iter().map(Into::into).collect())
    }

    /// Check the criteria and settle on a filter mode.
    ///
    /// Needs no input, so callers run it before touching the archive.
    pub fn validate(&self) -> Result<FilterMode, ConfigError> {
        match (self.file_types.is_empty(), self.resource_types.is_empty()) {
            (false, false) => Err(ConfigError::ConflictingFilters),
            (false, true) => Ok(FilterMode::FileTypes(
                self.file_types.iter().cloned().collect(),
            )),
            (true, false) => Ok(FilterMode::ResourceTypes(
                self.resource_types.iter().cloned().collect(),
            )),
            (true, true) => Ok(FilterMode::All),
        }
    }
}

/// Which entries a run keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    All,
    FileTypes(IndexSet<String>),
    ResourceTypes(IndexSet<String>),
}

impl FilterMode {
    /// Both predicates, ANDed. Only one of them can be active at a time, the
    /// other always passes.
    pub fn keeps(&self, entry: &Value) -> bool {
        self.file_type_matches(entry) && self.resource_type_matches(entry)
    }

    fn file_type_matches(&self, entry: &Value) -> bool {
        match self {
            FilterMode::FileTypes(types) => resolve(entry, "request.url")
                .and_then(Value::as_str)
                .is_some_and(|url| types.contains(file_type_of(url))),
            _ => true,
        }
    }

    fn resource_type_matches(&self, entry: &Value) -> bool {
        match self {
            FilterMode::ResourceTypes(types) => entry
                .get("_resourceType")
                .and_then(Value::as_str)
                .is_some_and(|kind| types.contains(kind)),
            _ => true,
        }
    }

    /// Short label used to name output files: `all`, or the members joined
    /// with `-`.
    pub fn label(&self) -> String {
        match self {
            FilterMode::All => "all".to_string(),
            FilterMode::FileTypes(types) | FilterMode::ResourceTypes(types) => types
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("-"),
        }
    }
}

/// Final dot-segment of a URL, without the dot. A URL with no dot yields the
/// whole string.
pub fn file_type_of(url: &str) -> &str {
    url.rsplit('.').next().unwrap_or(url)
}
