//! Per-page accumulation strategies driven by [`crate::pipeline::run`].

pub mod difficulty;
pub mod frequency;
pub mod histogram;

pub use difficulty::{DifficultyConfig, DifficultyScorer, PageScore, Tier, Tiers};
pub use frequency::{FrequencyTable, PresenceFrequency, RawFrequency};
pub use histogram::{HistogramCollector, HistogramDiagnostics};

use crate::models::Page;
use anyhow::Result;

/// Receives each eligible page once and folds it into state it owns exclusively.
pub trait Processor {
    /// Short label for logs and error context
    fn name(&self) -> &'static str;

    /// An error aborts the whole run; pages a strategy rejects are not errors.
    fn process(&mut self, page: &Page) -> Result<()>;
}
