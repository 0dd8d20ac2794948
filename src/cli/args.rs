//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    batch::BatchArgs, completions::CompletionsArgs, config::ConfigCommands,
    extract::ExtractArgs, generate::GenerateArgs, resolve::ResolveArgs,
};

#[derive(Parser)]
#[command(name = "qsched")]
#[command(author, version, about = "Quote-to-Schedule derivation")]
#[command(long_about = "Turns the plain text of an equipment quote into a hierarchically-numbered electrical equipment schedule.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file to use instead of ./qsched.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive an equipment schedule from a quote
    Generate(GenerateArgs),

    /// Show the line items and metadata recognized in a quote
    Extract(ExtractArgs),

    /// Look up part numbers in the catalog
    Resolve(ResolveArgs),

    /// List voltage tables by country
    Countries,

    /// Derive schedules for every quote in a directory
    Batch(BatchArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal, otherwise inferred from the output file
    #[default]
    Auto,
    /// Human-readable table with summary
    Table,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Tab-separated values (for piping)
    Tsv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Format implied by an output file extension
    pub fn from_extension(path: &std::path::Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            "csv" => Some(OutputFormat::Csv),
            "tsv" => Some(OutputFormat::Tsv),
            "md" => Some(OutputFormat::Md),
            _ => None,
        }
    }

    /// File extension for saved output; table previews are saved as JSON
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Auto | OutputFormat::Table | OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Md => "md",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_extension(Path::new("a.JSON")), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_extension(Path::new("a.yml")), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_extension(Path::new("a.xlsx")), None);
        assert_eq!(OutputFormat::from_extension(Path::new("a")), None);
    }

    #[test]
    fn test_saved_extension_round_trips() {
        for format in [OutputFormat::Json, OutputFormat::Yaml, OutputFormat::Csv, OutputFormat::Md] {
            let path = format!("schedule.{}", format.extension());
            assert_eq!(OutputFormat::from_extension(Path::new(&path)), Some(format));
        }
        assert_eq!(OutputFormat::Table.extension(), "json");
    }
}
