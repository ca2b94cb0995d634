use crate::filter::SkipReason;

/// Counters for one pass over the dump
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub pages_read: u64,
    pub pages_processed: u64,
    pub skipped_redirects: u64,
    pub skipped_namespace: u64,
    pub skipped_revisions: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_read(&mut self) {
        self.pages_read += 1;
    }

    pub fn inc_processed(&mut self) {
        self.pages_processed += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Redirect => self.skipped_redirects += 1,
            SkipReason::Namespace => self.skipped_namespace += 1,
            SkipReason::RevisionCount => self.skipped_revisions += 1,
        }
    }

    pub fn read(&self) -> u64 {
        self.pages_read
    }

    pub fn processed(&self) -> u64 {
        self.pages_processed
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_redirects + self.skipped_namespace + self.skipped_revisions
    }
}
