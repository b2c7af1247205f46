/// Counters collected during one import pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub entries_total: u64,
    pub entries_processed: u64,
    pub records_written: u64,
    pub files_copied: u64,
    pub files_hashed: u64,
    pub entries_dropped: u64,
    pub bytes_copied: u64,
    pub lines_skipped: u64,
}

impl ImportStats {
    pub fn new(entries_total: u64) -> Self {
        Self {
            entries_total,
            ..Self::default()
        }
    }

    /// Marks one entry done and returns the integer progress percentage.
    pub fn advance(&mut self) -> u32 {
        self.entries_processed += 1;
        self.percent()
    }

    pub fn percent(&self) -> u32 {
        if self.entries_total == 0 {
            return crate::config::PROGRESS_SCALE;
        }
        (self.entries_processed * u64::from(crate::config::PROGRESS_SCALE) / self.entries_total)
            as u32
    }

    pub fn inc_records(&mut self, skipped_lines: usize) {
        self.records_written += 1;
        self.lines_skipped += skipped_lines as u64;
    }

    pub fn inc_copied(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied += bytes;
    }

    pub fn inc_hashed(&mut self, bytes: u64) {
        self.files_hashed += 1;
        self.bytes_copied += bytes;
    }

    pub fn inc_dropped(&mut self) {
        self.entries_dropped += 1;
    }
}
