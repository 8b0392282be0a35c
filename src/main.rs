use anyhow::Context;
use clap::{ArgAction, Parser};
use std::io::Write;
use std::path::{Path, PathBuf};

use harcsv::har::{base_name, read_har};
use harcsv::{
    write_table, CustomFunctionRegistry, EntryPipeline, FieldConfig, FilterCriteria, FilterMode,
    OutputFormat, DEFAULT_CONFIG_FILE,
};

#[derive(Parser)]
#[command(name = "harcsv")]
#[command(about = "Turn HTTP Archive (HAR) captures into CSV reports")]
#[command(version)]
struct Args {
    /// HAR file to process ('-' for stdin)
    #[arg(value_name = "HAR_FILE")]
    har_file: PathBuf,

    /// Only keep requests whose URL ends in one of these extensions (e.g. js,mjs)
    #[arg(short = 't', long = "file-types", value_delimiter = ',', action = ArgAction::Append)]
    file_types: Vec<String>,

    /// Only keep requests of these resource types (e.g. script,image)
    #[arg(short = 'r', long = "resource-types", value_delimiter = ',', action = ArgAction::Append)]
    resource_types: Vec<String>,

    /// Field configuration file (JSON, or YAML with a .yaml/.yml extension).
    /// Defaults to ./config-har-data-processing.json if present, else the built-in fields
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output file ('-' for stdout). Defaults to <output-dir>/<har name>-<filter>.<ext>
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Directory for generated reports when --output is not given
    #[arg(long = "output-dir", default_value = "generated-csv")]
    output_dir: PathBuf,

    /// Output format
    #[arg(short = 'F', long = "output-format", value_enum, default_value_t = OutputFormat::Csv)]
    output_format: OutputFormat,

    /// Debug mode - verbose logging and final statistics
    #[arg(long)]
    debug: bool,
}

impl Args {
    /// Filter lists with empty items and the legacy `null` placeholder dropped
    fn filter_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            clean_list(&self.file_types),
            clean_list(&self.resource_types),
        )
    }

    fn destination(&self, mode: &FilterMode) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.output_dir.join(format!(
                "{}-{}.{}",
                base_name(&self.har_file),
                mode.label(),
                self.output_format.extension()
            )),
        }
    }
}

fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty() && *item != "null")
        .map(str::to_string)
        .collect()
}

fn main() {
    let args = Args::parse();
    harcsv::logging::init_logging(args.debug);

    if let Err(e) = run(args) {
        eprintln!("harcsv: error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Checked before any file is opened.
    let mode = args.filter_criteria().validate()?;

    let fields = match &args.config {
        Some(path) => FieldConfig::load(path)?,
        None => FieldConfig::load_or_builtin(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let registry = CustomFunctionRegistry::builtin();
    let pipeline = EntryPipeline::with_mode(mode, &fields, &registry)?;

    let source_name = args.har_file.display().to_string();
    let document = read_har(&args.har_file)
        .with_context(|| format!("Failed to read HAR file '{}'", source_name))?;
    let (table, stats) = pipeline.process_document(&document, &source_name)?;

    // Serialize fully before touching the destination so a failure leaves no file.
    let mut buffer = Vec::new();
    write_table(&mut buffer, &table, args.output_format)?;

    let destination = args.destination(pipeline.mode());
    if destination == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&buffer)?;
        stdout.flush()?;
    } else {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory '{}'", parent.display())
            })?;
        }
        std::fs::write(&destination, &buffer).with_context(|| {
            format!("Failed to write output file '{}'", destination.display())
        })?;
        tracing::info!(path = %destination.display(), rows = table.len(), "report written");
        eprintln!("harcsv: wrote {} rows to {}", table.len(), destination.display());
    }

    if args.debug {
        stats.report();
    }

    Ok(())
}
