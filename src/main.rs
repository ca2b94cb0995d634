use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hanstat::pipeline;
use hanstat::processor::{
    DifficultyConfig, DifficultyScorer, HistogramCollector, PresenceFrequency, RawFrequency,
};
use hanstat::rank::rank;
use hanstat::reference;
use hanstat::report::{self, ReportFormat};
use hanstat::stats::RunStats;
use hanstat::store;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "hanstat")]
#[command(about = "Han ideograph frequency and difficulty statistics from Wikipedia dumps")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank Han characters by total number of occurrences
    Raw(CountArgs),
    /// Rank Han characters by number of pages they appear on
    Presence(CountArgs),
    /// Collect compact per-page histograms
    Histogram(HistogramArgs),
    /// Select pages readable with a known and a learning character set
    Difficulty(DifficultyArgs),
}

#[derive(Args)]
struct DumpArgs {
    /// Path to the Wikipedia dump (.xml or .xml.bz2)
    input: PathBuf,

    /// Stop after this many pages (0 or negative = whole dump)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    max_pages: i64,
}

#[derive(Args)]
struct OutputArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct CountArgs {
    #[command(flatten)]
    dump: DumpArgs,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args)]
struct HistogramArgs {
    #[command(flatten)]
    dump: DumpArgs,

    /// Save the collected histograms to this file
    #[arg(long)]
    histograms_out: Option<PathBuf>,
}

#[derive(Args)]
struct DifficultyArgs {
    #[command(flatten)]
    dump: DumpArgs,

    #[command(flatten)]
    out: OutputArgs,

    /// Frequency-ranked reference list (one character per line, or a `raw` report)
    #[arg(long)]
    reference: PathBuf,

    /// Number of top reference characters treated as known
    #[arg(long, default_value_t = 1000)]
    known: usize,

    /// Number of following reference characters treated as being learned
    #[arg(long, default_value_t = 500)]
    learning: usize,

    /// Maximum number of unknown distinct characters an accepted page may contain
    #[arg(long, default_value_t = 0)]
    max_unknown: usize,
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::with_capacity(128 * 1024, file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn print_summary(stats: &RunStats, started: Instant) {
    eprintln!();
    eprintln!("=== Summary ===");
    eprintln!("Elapsed:            {:.2}s", started.elapsed().as_secs_f64());
    eprintln!("Pages read:         {}", stats.read());
    eprintln!("Pages processed:    {}", stats.processed());
    eprintln!("Redirects skipped:  {}", stats.skipped_redirects);
    eprintln!("Other namespaces:   {}", stats.skipped_namespace);
    eprintln!("Bad revision count: {}", stats.skipped_revisions);
}

fn run_raw(args: CountArgs) -> Result<()> {
    let started = Instant::now();
    let mut raw = RawFrequency::new();
    let stats = pipeline::run_file(&args.dump.input, &mut raw, args.dump.max_pages)?;

    let ranked = rank(raw.table());
    info!(codepoints = ranked.len(), total = raw.table().total(), "Ranking complete");
    report::write_ranking(&ranked, args.out.format, open_output(args.out.output.as_deref())?)?;

    print_summary(&stats, started);
    Ok(())
}

fn run_presence(args: CountArgs) -> Result<()> {
    let started = Instant::now();
    let mut presence = PresenceFrequency::new();
    let stats = pipeline::run_file(&args.dump.input, &mut presence, args.dump.max_pages)?;

    let ranked = rank(presence.table());
    info!(codepoints = ranked.len(), "Ranking complete");
    report::write_ranking(&ranked, args.out.format, open_output(args.out.output.as_deref())?)?;

    print_summary(&stats, started);
    Ok(())
}

fn run_histogram(args: HistogramArgs) -> Result<()> {
    let started = Instant::now();
    let mut collector = HistogramCollector::new();
    let stats = pipeline::run_file(&args.dump.input, &mut collector, args.dump.max_pages)?;

    if let Some(ref path) = args.histograms_out {
        let input = args.dump.input.to_string_lossy();
        store::save_histograms(path, &input, collector.pages())?;
    }

    print_summary(&stats, started);
    let d = collector.diagnostics();
    eprintln!("Histograms kept:    {}", d.pages_kept);
    eprintln!("Too many uniques:   {}", d.pages_overflowed);
    eprintln!("No Han characters:  {}", d.pages_empty);
    eprintln!("Han characters:     {}", d.total_codepoints);
    if let Some(ratio) = d.mean_ratio() {
        eprintln!("Length/richness:    {:.3}", ratio);
    }
    eprintln!("Retained bytes:     {}", collector.retained_bytes());
    Ok(())
}

fn run_difficulty(args: DifficultyArgs) -> Result<()> {
    let started = Instant::now();
    let ranked = reference::load_ranked_list(&args.reference)?;
    let config = DifficultyConfig {
        known: args.known,
        learning: args.learning,
        max_unknown: args.max_unknown,
    };
    let mut scorer = DifficultyScorer::from_reference(&ranked, config);
    let stats = pipeline::run_file(&args.dump.input, &mut scorer, args.dump.max_pages)?;

    report::write_scores(
        &scorer.ranked(),
        args.out.format,
        open_output(args.out.output.as_deref())?,
    )?;

    print_summary(&stats, started);
    eprintln!("Pages accepted:     {}", scorer.accepted().len());
    eprintln!("Pages too hard:     {}", scorer.rejected());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Raw(args) => run_raw(args),
        Commands::Presence(args) => run_presence(args),
        Commands::Histogram(args) => run_histogram(args),
        Commands::Difficulty(args) => run_difficulty(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
