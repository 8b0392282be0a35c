use std::time::Duration;

/// Runtime statistics for one pipeline run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub entries_read: usize,
    pub entries_kept: usize,
    pub entries_skipped: usize,
    pub empty_cells: usize,
    pub processing_time: Duration,
}

impl ProcessingStats {
    /// Print the summary block shown in debug mode
    pub fn report(&self) {
        eprintln!("Final statistics:");
        eprintln!("  Entries read: {}", self.entries_read);
        eprintln!("  Entries kept: {}", self.entries_kept);
        eprintln!("  Entries skipped: {}", self.entries_skipped);
        eprintln!("  Empty cells: {}", self.empty_cells);
        eprintln!(
            "  Processing time: {}",
            humantime::format_duration(self.processing_time)
        );
    }
}
