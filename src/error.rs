#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to parse {source_name}: {message}")]
    InputParse {
        source_name: String,
        message: String,
    },

    #[error("{source_name} has no 'log.entries' array")]
    MissingEntries { source_name: String },

    #[error("Output error: {0}")]
    Output(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("You can only specify file types or resource types, not both")]
    ConflictingFilters,

    #[error("Field '{title}' uses unknown custom function '{name}'")]
    UnknownCustomFunction { name: String, title: String },

    #[error("Field configuration has no entryFields")]
    EmptyFieldList,

    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {message}")]
    Parse { path: String, message: String },
}
