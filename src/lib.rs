pub mod error;
pub mod har;
pub mod logging;
pub mod output_format;
pub mod path;
pub mod pipeline;

pub use error::*;
pub use pipeline::*;

pub use pipeline::config::{
    FieldConfig, FieldDescriptor, FieldKind, PipelineConfig, DEFAULT_CONFIG_FILE,
};
pub use pipeline::custom::{initiator_stack, CustomFunction, CustomFunctionRegistry};
pub use pipeline::filter::{FilterCriteria, FilterMode};
pub use pipeline::stats::ProcessingStats;
pub use output_format::{write_table, OutputFormat};
