//! Hanstat: Han ideograph statistics over Wikipedia dumps
//!
//! This crate streams a MediaWiki XML export (plain or bzip2-compressed) one page at a
//! time and folds every eligible article into a pluggable accumulator:
//!
//! 1. **Source** -- Pick a raw or bzip2-decoded byte stream from the file suffix
//! 2. **Parse** -- Pull `<page>` records out of the XML stream with bounded memory
//! 3. **Filter** -- Skip redirects, non-article namespaces, and pages without exactly
//!    one revision
//! 4. **Process** -- Hand each surviving page to one [`processor::Processor`]
//! 5. **Rank** -- Sort accumulated counts, highest first
//!
//! # Processors
//!
//! - [`processor::RawFrequency`] -- Every occurrence of every Han code point
//! - [`processor::PresenceFrequency`] -- Number of pages each code point appears on
//! - [`processor::HistogramCollector`] -- Compact per-page histograms, dropping pages with
//!   more than 1500 distinct code points
//! - [`processor::DifficultyScorer`] -- Known / learning / unknown counts per page against
//!   a frequency-ranked reference list, keeping pages a learner can read
//!
//! # Key Modules
//!
//! - [`source`] -- Decompression selection
//! - [`parser`] -- Streaming XML dump reader
//! - [`filter`] -- Page eligibility rules
//! - [`scan`] -- Which code points count
//! - [`pipeline`] -- The read / filter / process loop
//! - [`rank`] -- Descending-frequency ranking
//! - [`report`] -- Text, CSV and JSON rendering
//! - [`store`] -- Persisted per-page histograms
//! - [`reference`] -- Reference list loading for difficulty tiers
//! - [`counter`] -- Saturating counters
//! - [`stats`] -- Per-run page counters
//! - [`config`] -- Constants
//!
//! # Example Usage
//!
//! ```bash
//! # Rank characters by raw frequency over the first 100k pages
//! hanstat raw zhwiki-latest-pages-articles.xml.bz2 --max-pages 100000 > freq.txt
//!
//! # Find articles readable with the 1000 most common characters plus 500 in progress
//! hanstat difficulty zhwiki-latest-pages-articles.xml.bz2 --reference freq.txt \
//!     --known 1000 --learning 500 --max-unknown 3
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod filter;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod processor;
pub mod rank;
pub mod reference;
pub mod report;
pub mod scan;
pub mod source;
pub mod stats;
pub mod store;
