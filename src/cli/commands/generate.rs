//! `qsched generate` command - Derive a schedule from one quote

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{
    effective_format, load_catalog, load_config, load_rules, read_quote, write_output,
};
use crate::cli::output::render_schedule;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::SchedulePipeline;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Quote text file (`-` for stdin)
    pub quote: PathBuf,

    /// Destination country (default: detected from the ship-to address)
    #[arg(long, short = 'c')]
    pub country: Option<String>,

    /// Equipment catalog (JSON or YAML)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Write to `<project>_Schedule.<ext>` in the current directory
    #[arg(long, conflicts_with = "output")]
    pub save: bool,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let rules = load_rules(&config)?;
    let catalog = load_catalog(args.catalog.as_deref(), &config)?;
    let text = read_quote(&args.quote)?;

    let pipeline = SchedulePipeline::new(&catalog, &rules)?;
    let schedule = pipeline.derive(&text, args.country.as_deref())?;

    if schedule.items.is_empty() && !global.quiet {
        eprintln!(
            "{} No schedule rows produced from {}",
            style("!").yellow(),
            args.quote.display()
        );
    }

    let requested = effective_format(global, &config);
    let output = if args.save {
        Some(PathBuf::from(format!(
            "{}.{}",
            schedule.file_stem(),
            requested.extension()
        )))
    } else {
        args.output
    };

    let format = match requested {
        OutputFormat::Auto | OutputFormat::Table if args.save => OutputFormat::Json,
        OutputFormat::Auto => output
            .as_deref()
            .and_then(OutputFormat::from_extension)
            .unwrap_or(OutputFormat::Table),
        format => format,
    };

    let content = render_schedule(&schedule, format)?;
    write_output(&content, output.as_deref(), global.quiet)
}
