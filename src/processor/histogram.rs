use super::Processor;
use crate::config::MAX_UNIQUE_PER_PAGE;
use crate::counter::SaturatingCount;
use crate::models::{CompactEntry, Page};
use crate::scan::qualifying;
use anyhow::Result;
use rustc_hash::FxHashMap;
use std::mem::size_of;
use tracing::debug;

/// Running totals over the pages the collector has kept or dropped
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HistogramDiagnostics {
    pub pages_kept: u64,
    pub pages_overflowed: u64,
    pub pages_empty: u64,
    pub total_codepoints: u64,
    pub distinct_codepoints: u64,
}

impl HistogramDiagnostics {
    /// Pooled length-to-richness ratio: total occurrences over total distinct
    /// counts across kept pages, not a mean of per-page ratios
    pub fn mean_ratio(&self) -> Option<f64> {
        richness(self.total_codepoints, self.distinct_codepoints)
    }
}

/// Occurrences per distinct code point; undefined for a page with no Han at all.
pub fn richness(total: u64, distinct: u64) -> Option<f64> {
    (distinct > 0).then(|| total as f64 / distinct as f64)
}

/// Keeps a compact histogram per page title, dropping pages that are too varied.
///
/// A page is dropped as soon as its distinct code point count passes the
/// limit, so character tables and similar outliers never grow a full map.
/// Pages with no qualifying code points are kept with an empty histogram;
/// only their ratio is undefined.
#[derive(Debug)]
pub struct HistogramCollector {
    pages: FxHashMap<String, Vec<CompactEntry>>,
    limit: usize,
    retained_entries: usize,
    diagnostics: HistogramDiagnostics,
}

impl Default for HistogramCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramCollector {
    pub fn new() -> Self {
        Self::with_limit(MAX_UNIQUE_PER_PAGE)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            pages: FxHashMap::default(),
            limit,
            retained_entries: 0,
            diagnostics: HistogramDiagnostics::default(),
        }
    }

    pub fn get(&self, title: &str) -> Option<&[CompactEntry]> {
        self.pages.get(title).map(Vec::as_slice)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.pages.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &FxHashMap<String, Vec<CompactEntry>> {
        &self.pages
    }

    pub fn into_pages(self) -> FxHashMap<String, Vec<CompactEntry>> {
        self.pages
    }

    pub fn diagnostics(&self) -> &HistogramDiagnostics {
        &self.diagnostics
    }

    /// Rough size of the kept histograms, excluding map and title overhead
    pub fn retained_bytes(&self) -> usize {
        self.retained_entries * size_of::<CompactEntry>()
    }
}

impl Processor for HistogramCollector {
    fn name(&self) -> &'static str {
        "page histogram"
    }

    fn process(&mut self, page: &Page) -> Result<()> {
        let mut counts: FxHashMap<char, SaturatingCount> = FxHashMap::default();
        let mut total = 0u64;

        for c in qualifying(page.text()) {
            counts.entry(c).or_default().incr();
            total += 1;
            if counts.len() > self.limit {
                debug!(title = %page.title, limit = self.limit, "Skipping page: too many unique codepoints");
                self.diagnostics.pages_overflowed += 1;
                return Ok(());
            }
        }

        let distinct = counts.len() as u64;
        let mut entries: Vec<CompactEntry> = counts
            .into_iter()
            .map(|(c, n)| CompactEntry::saturating(c, n.get()))
            .collect();
        entries.sort_unstable_by_key(|e| e.codepoint);

        match richness(total, distinct) {
            Some(ratio) => {
                debug!(
                    title = %page.title,
                    length = total,
                    unique = distinct,
                    ratio = ratio,
                    "Page histogram"
                );
                self.diagnostics.total_codepoints += total;
                self.diagnostics.distinct_codepoints += distinct;
            }
            None => {
                debug!(title = %page.title, "Page has no Han codepoints, ratio undefined");
                self.diagnostics.pages_empty += 1;
            }
        }
        self.diagnostics.pages_kept += 1;

        self.retained_entries += entries.len();
        if let Some(previous) = self.pages.insert(page.title.clone(), entries) {
            self.retained_entries -= previous.len();
        }

        debug!(
            pages = self.pages.len(),
            retained_bytes = self.retained_bytes(),
            bytes_per_page = self.retained_bytes() / self.pages.len(),
            "Histogram memory"
        );
        Ok(())
    }
}
