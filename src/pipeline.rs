use crate::config::PROGRESS_INTERVAL;
use crate::filter;
use crate::parser::{DumpParser, WikiReader};
use crate::processor::Processor;
use crate::stats::RunStats;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::Path;
use tracing::{debug, info, trace};

/// Pulls pages from `parser`, filters them, and feeds eligible ones to `processor`.
///
/// Reads at most `max_pages` pages (skipped ones included), or the whole dump
/// when `max_pages <= 0`. End of dump finishes the run normally. A parser or
/// processor error stops the run at once; parser errors keep their
/// [`DumpError`](crate::error::DumpError) type inside the returned error.
pub fn run<D, P>(parser: &mut D, processor: &mut P, max_pages: i64) -> Result<RunStats>
where
    D: DumpParser + ?Sized,
    P: Processor + ?Sized,
{
    let site = parser.site_info();
    info!(site = %site.name, base = %site.base_url, processor = processor.name(), "Reading dump");

    let pb = ProgressBar::new_spinner();
    let result = drive(parser, processor, max_pages, &pb);
    pb.finish_and_clear();
    let stats = result?;

    info!(
        read = stats.read(),
        processed = stats.processed(),
        redirects = stats.skipped_redirects,
        namespace = stats.skipped_namespace,
        revisions = stats.skipped_revisions,
        "Dump pass complete"
    );
    Ok(stats)
}

fn drive<D, P>(parser: &mut D, processor: &mut P, max_pages: i64, pb: &ProgressBar) -> Result<RunStats>
where
    D: DumpParser + ?Sized,
    P: Processor + ?Sized,
{
    let limit = u64::try_from(max_pages).ok().filter(|&n| n > 0);
    let mut stats = RunStats::new();

    while limit.is_none_or(|n| stats.read() < n) {
        let Some(page) = parser.next_page()? else {
            debug!("End of dump");
            break;
        };
        stats.inc_read();
        if stats.read() % PROGRESS_INTERVAL == 0 {
            pb.set_message(format!("{} pages", stats.read()));
            pb.tick();
        }
        trace!(
            title = %page.title,
            id = page.id,
            ns = page.namespace,
            nrevs = page.revisions.len(),
            "Page"
        );

        if let Some(reason) = filter::check(&page) {
            debug!(title = %page.title, %reason, "Skipping page");
            stats.record_skip(reason);
            continue;
        }

        processor.process(&page).with_context(|| {
            format!(
                "{} failed on page {:?} (id {})",
                processor.name(),
                page.title,
                page.id
            )
        })?;
        stats.inc_processed();
    }

    Ok(stats)
}

/// Opens `path` (bzip2 when it ends in `.bz2`) and runs the pipeline over it.
pub fn run_file<P>(path: impl AsRef<Path>, processor: &mut P, max_pages: i64) -> Result<RunStats>
where
    P: Processor + ?Sized,
{
    let path = path.as_ref();
    let mut reader = WikiReader::open(path)
        .with_context(|| format!("Failed to open wiki dump at: {}", path.display()))?;
    run(&mut reader, processor, max_pages)
}
