// src/pipeline.rs - filter → extract → assemble over HAR entries
pub mod config;
pub mod custom;
pub mod extract;
pub mod filter;
pub mod stats;

use crate::error::{ConfigError, ProcessingError};
use serde_json::Value;
use std::time::Instant;

use config::{FieldConfig, FieldDescriptor, PipelineConfig};
use custom::CustomFunctionRegistry;
use extract::CompiledField;
use filter::FilterMode;
use stats::ProcessingStats;

/// One output row: a cell per field, `Null` for empty cells
pub type Row = Vec<Value>;

/// Column titles plus rows, ready for an output writer
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub titles: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Filters HAR entries and turns each survivor into a row.
///
/// All configuration is checked in [`EntryPipeline::new`]; processing itself
/// cannot fail and keeps no state between runs.
#[derive(Debug)]
pub struct EntryPipeline {
    mode: FilterMode,
    titles: Vec<String>,
    fields: Vec<CompiledField>,
}

impl EntryPipeline {
    pub fn new(
        config: &PipelineConfig,
        registry: &CustomFunctionRegistry,
    ) -> Result<Self, ConfigError> {
        let mode = config.filters.validate()?;
        Self::with_mode(mode, &config.fields, registry)
    }

    /// Build from an already validated filter mode
    pub fn with_mode(
        mode: FilterMode,
        fields: &FieldConfig,
        registry: &CustomFunctionRegistry,
    ) -> Result<Self, ConfigError> {
        if fields.entry_fields.is_empty() {
            return Err(ConfigError::EmptyFieldList);
        }

        let compiled = fields
            .entry_fields
            .iter()
            .map(|descriptor| CompiledField::compile(descriptor, registry))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            filter = %mode.label(),
            fields = compiled.len(),
            "pipeline ready"
        );

        Ok(EntryPipeline {
            mode,
            titles: fields.titles(),
            fields: compiled,
        })
    }

    /// Shorthand for a pipeline over a list of descriptors
    pub fn from_descriptors(
        mode: FilterMode,
        descriptors: Vec<FieldDescriptor>,
        registry: &CustomFunctionRegistry,
    ) -> Result<Self, ConfigError> {
        let fields = FieldConfig {
            entry_fields: descriptors,
        };
        Self::with_mode(mode, &fields, registry)
    }

    pub fn mode(&self) -> &FilterMode {
        &self.mode
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Entries that pass the filter, in input order
    pub fn filter<'a>(&'a self, entries: &'a [Value]) -> impl Iterator<Item = &'a Value> + 'a {
        entries.iter().filter(move |entry| self.mode.keeps(entry))
    }

    /// One cell per field, in field order
    pub fn extract_row(&self, entry: &Value) -> Row {
        self.fields.iter().map(|field| field.extract(entry)).collect()
    }

    pub fn process(&self, entries: &[Value]) -> Table {
        self.process_with_stats(entries).0
    }

    pub fn process_with_stats(&self, entries: &[Value]) -> (Table, ProcessingStats) {
        let start_time = Instant::now();
        let mut stats = ProcessingStats {
            entries_read: entries.len(),
            ..ProcessingStats::default()
        };

        let rows: Vec<Row> = self.filter(entries).map(|e| self.extract_row(e)).collect();

        stats.entries_kept = rows.len();
        stats.entries_skipped = entries.len() - rows.len();
        stats.empty_cells = rows.iter().flatten().filter(|cell| cell.is_null()).count();
        stats.processing_time = start_time.elapsed();

        tracing::info!(
            read = stats.entries_read,
            kept = stats.entries_kept,
            skipped = stats.entries_skipped,
            "processed entries"
        );

        let table = Table {
            titles: self.titles.clone(),
            rows,
        };
        (table, stats)
    }

    /// Run over a whole HAR document (`{"log": {"entries": [...]}}`)
    pub fn process_document(
        &self,
        document: &Value,
        source_name: &str,
    ) -> Result<(Table, ProcessingStats), ProcessingError> {
        let entries = crate::har::entries(document, source_name)?;
        Ok(self.process_with_stats(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::filter::FilterCriteria;
    use serde_json::json;

    fn sample_entries() -> Vec<Value> {
        vec![
            json!({
                "request": {"url": "https://x.test/a.js"},
                "_resourceType": "script",
                "_initiator": {"type": "parser", "url": "https://x.test/", "lineNumber": 4},
                "timings": {"wait": 10, "receive": 5},
                "time": 20
            }),
            json!({
                "request": {"url": "https://x.test/b.png"},
                "_resourceType": "image",
                "_initiator": {"type": "other"},
                "timings": {"wait": 2, "receive": 1},
                "time": 4
            }),
        ]
    }

    #[test]
    fn test_default_config_all_entries() {
        let pipeline =
            EntryPipeline::new(&PipelineConfig::default(), &CustomFunctionRegistry::builtin())
                .unwrap();
        let table = pipeline.process(&sample_entries());

        assert_eq!(table.titles.len(), 6);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows[0],
            vec![
                json!("https://x.test/a.js"),
                json!("https://x.test/ line 4"),
                json!(10),
                json!(5),
                json!(15),
                json!(20),
            ]
        );
        assert_eq!(table.rows[1][1], Value::Null);
        assert!(table.rows.iter().all(|row| row.len() == table.titles.len()));
    }

    #[test]
    fn test_file_type_filter_keeps_js_only() {
        let config = PipelineConfig {
            filters: FilterCriteria::file_types(["js"]),
            ..PipelineConfig::default()
        };
        let pipeline = EntryPipeline::new(&config, &CustomFunctionRegistry::builtin()).unwrap();
        let (table, stats) = pipeline.process_with_stats(&sample_entries());

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][0], json!("https://x.test/a.js"));
        assert_eq!(stats.entries_read, 2);
        assert_eq!(stats.entries_kept, 1);
        assert_eq!(stats.entries_skipped, 1);
    }

    #[test]
    fn test_stats_count_empty_cells() {
        let pipeline =
            EntryPipeline::new(&PipelineConfig::default(), &CustomFunctionRegistry::builtin())
                .unwrap();
        let (table, stats) = pipeline.process_with_stats(&sample_entries());

        assert_eq!(stats.entries_kept, table.len());
        assert_eq!(stats.entries_kept + stats.entries_skipped, stats.entries_read);
        // b.png has an "other" initiator, so no stack
        assert_eq!(stats.empty_cells, 1);
    }

    #[test]
    fn test_conflicting_filters_rejected() {
        let config = PipelineConfig {
            filters: FilterCriteria::new(vec!["js".into()], vec!["script".into()]),
            ..PipelineConfig::default()
        };
        let err = EntryPipeline::new(&config, &CustomFunctionRegistry::builtin()).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingFilters));
    }

    #[test]
    fn test_unknown_function_with_empty_registry() {
        let err = EntryPipeline::from_descriptors(
            FilterMode::All,
            vec![FieldDescriptor::custom("Mystery", "doesNotExist")],
            &CustomFunctionRegistry::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCustomFunction { .. }));
    }

    #[test]
    fn test_empty_field_list_rejected() {
        let err =
            EntryPipeline::from_descriptors(FilterMode::All, vec![], &CustomFunctionRegistry::new())
                .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyFieldList));
    }

    #[test]
    fn test_caller_supplied_function() {
        let registry = CustomFunctionRegistry::new().with("host", |entry| {
            entry["request"]["url"]
                .as_str()
                .and_then(|url| url.split('/').nth(2))
                .map_or(Value::Null, |host| json!(host))
        });
        let pipeline = EntryPipeline::from_descriptors(
            FilterMode::All,
            vec![
                FieldDescriptor::custom("Host", "host"),
                FieldDescriptor::path("Type", "_resourceType"),
            ],
            &registry,
        )
        .unwrap();

        let table = pipeline.process(&sample_entries());
        assert_eq!(table.rows[0], vec![json!("x.test"), json!("script")]);
        assert_eq!(table.rows[1], vec![json!("x.test"), json!("image")]);
    }

    #[test]
    fn test_process_is_repeatable() {
        let pipeline =
            EntryPipeline::new(&PipelineConfig::default(), &CustomFunctionRegistry::builtin())
                .unwrap();
        let entries = sample_entries();
        assert_eq!(pipeline.process(&entries), pipeline.process(&entries));
    }

    #[test]
    fn test_process_document_missing_entries() {
        let pipeline =
            EntryPipeline::new(&PipelineConfig::default(), &CustomFunctionRegistry::builtin())
                .unwrap();
        let err = pipeline
            .process_document(&json!({"log": {"version": "1.2"}}), "broken.har")
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MissingEntries { .. }));
    }
}
