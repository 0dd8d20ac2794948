//! `qsched batch` command - Derive schedules for a directory of quotes

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::error;
use walkdir::WalkDir;

use crate::cli::helpers::{load_catalog, load_config, load_rules};
use crate::cli::output::serialize;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::SchedulePipeline;
use crate::entities::Schedule;

/// Suffix of the schedule written for each quote
pub const SCHEDULE_SUFFIX: &str = ".schedule.json";

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Directory searched recursively for `.txt` quotes
    pub dir: PathBuf,

    /// Destination country for every quote (default: detected per quote)
    #[arg(long, short = 'c')]
    pub country: Option<String>,

    /// Equipment catalog (JSON or YAML)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Directory for schedules (default: next to each quote)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

pub fn run(args: BatchArgs, global: &GlobalOpts) -> Result<()> {
    if !args.dir.is_dir() {
        return Err(miette::miette!("Not a directory: {}", args.dir.display()));
    }

    let config = load_config(global)?;
    let rules = load_rules(&config)?;
    let catalog = load_catalog(args.catalog.as_deref(), &config)?;
    let pipeline = SchedulePipeline::new(&catalog, &rules)?;

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir).into_diagnostic()?;
    }

    let mut quotes: Vec<PathBuf> = WalkDir::new(&args.dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
        })
        .collect();
    quotes.sort();

    let mut failed = 0;
    for quote in &quotes {
        let target = schedule_path(quote, args.output_dir.as_deref());
        match process(&pipeline, quote, &target, args.country.as_deref()) {
            Ok(schedule) => {
                if !global.quiet {
                    println!(
                        "{} {} → {} ({} rows, {} motors, {:.2} A)",
                        style("✓").green(),
                        quote.display(),
                        style(target.display()).cyan(),
                        schedule.items.len(),
                        schedule.total_motors,
                        schedule.total_amps
                    );
                }
            }
            Err(e) => {
                failed += 1;
                error!(quote = %quote.display(), "Schedule failed");
                eprintln!("{} {}: {}", style("✗").red(), quote.display(), e);
            }
        }
    }

    if !global.quiet {
        println!();
        println!(
            "{} quote(s) processed, {} failed",
            style(quotes.len()).bold(),
            style(failed).bold()
        );
    }

    if failed > 0 {
        return Err(miette::miette!("{} of {} quotes failed", failed, quotes.len()));
    }
    Ok(())
}

fn process(
    pipeline: &SchedulePipeline<'_>,
    quote: &Path,
    target: &Path,
    country: Option<&str>,
) -> Result<Schedule> {
    let text = std::fs::read_to_string(quote).into_diagnostic()?;
    let schedule = pipeline.derive(&text, country)?;
    std::fs::write(target, serialize(&schedule, OutputFormat::Json)?).into_diagnostic()?;
    Ok(schedule)
}

/// `<stem>.schedule.json`, in `output_dir` or beside the quote
pub fn schedule_path(quote: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = quote
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "quote".to_string());
    let dir = output_dir
        .or_else(|| quote.parent())
        .unwrap_or_else(|| Path::new("."));
    dir.join(format!("{}{}", stem, SCHEDULE_SUFFIX))
}
