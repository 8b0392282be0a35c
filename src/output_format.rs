use crate::error::ProcessingError;
use crate::pipeline::extract::render_cell;
use crate::pipeline::Table;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    #[value(name = "csv", help = "Comma-separated values")]
    Csv,
    #[value(name = "tsv", help = "Tab-separated values")]
    Tsv,
    #[value(name = "jsonl", help = "JSON Lines format (one JSON object per row)")]
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "jsonl" => Ok(OutputFormat::Jsonl),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl OutputFormat {
    /// File extension used for generated output names
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Serialize a whole table: header row first, then one row per entry.
pub fn write_table<W: Write>(
    output: &mut W,
    table: &Table,
    format: OutputFormat,
) -> Result<(), ProcessingError> {
    match format {
        OutputFormat::Csv => write_separated_values(output, table, b','),
        OutputFormat::Tsv => write_separated_values(output, table, b'\t'),
        OutputFormat::Jsonl => write_jsonl(output, table),
    }
}

fn write_separated_values<W: Write>(
    output: &mut W,
    table: &Table,
    delimiter: u8,
) -> Result<(), ProcessingError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(output);

    writer.write_record(&table.titles)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(render_cell))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_jsonl<W: Write>(output: &mut W, table: &Table) -> Result<(), ProcessingError> {
    for row in &table.rows {
        // Map keeps insertion order (preserve_order), so keys follow the titles.
        let mut obj = serde_json::Map::new();
        for (title, cell) in table.titles.iter().zip(row) {
            obj.insert(title.clone(), cell.clone());
        }
        let line = serde_json::to_string(&obj)
            .map_err(|e| ProcessingError::Output(format!("JSON encoding error: {}", e)))?;
        writeln!(output, "{}", line)?;
    }
    Ok(())
}
