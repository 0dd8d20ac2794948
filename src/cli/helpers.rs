//! Shared helper functions for CLI commands
//!
//! Loading of configuration, rules and catalog, quote input and output
//! writing used across the command modules.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Catalog, Config};
use crate::engine::ScheduleRules;

/// Effective configuration for this invocation
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    Ok(Config::load(global.config.as_deref())?)
}

/// Derivation rules from the effective configuration
pub fn load_rules(config: &Config) -> Result<ScheduleRules> {
    Ok(ScheduleRules::from_config(config)?)
}

/// Load the catalog named on the command line or in the configuration
pub fn load_catalog(arg: Option<&Path>, config: &Config) -> Result<Catalog> {
    let path: PathBuf = match arg.or(config.catalog.as_deref()) {
        Some(path) => path.to_path_buf(),
        None => {
            return Err(miette::miette!(
                help = "Pass --catalog <FILE>, set QSCHED_CATALOG or add `catalog:` to qsched.yaml",
                "No equipment catalog configured"
            ))
        }
    };
    Ok(Catalog::load(&path)?)
}

/// Output format after applying the configured default to `auto`
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    match config.default_format.as_deref() {
        Some(name) => match <OutputFormat as clap::ValueEnum>::from_str(name, true) {
            Ok(format) => format,
            Err(_) => {
                warn!(format = name, "Ignoring unknown default_format");
                OutputFormat::Auto
            }
        },
        None => OutputFormat::Auto,
    }
}

/// Read quote text from a file, or stdin for `-`
pub fn read_quote(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).into_diagnostic()?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("Cannot read quote {}: {}", path.display(), e))
}

/// Write to a file, or stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !quiet {
                println!(
                    "{} Schedule written to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a cell for a markdown table
pub fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
