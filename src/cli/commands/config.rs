//! `qsched config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("catalog", "Equipment catalog file (JSON or YAML)"),
    ("default_country", "Country used when the quote names none"),
    (
        "default_format",
        "Default output format (table, json, yaml, csv, tsv, md)",
    ),
    ("excluded_parts", "Replaces the built-in exclusion list"),
    ("extra_excluded_parts", "Appended to the exclusion list"),
    ("motor_keywords", "Description keywords marking a motor"),
    ("voltages", "Per-country {three_phase, one_phase} overrides"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    let yaml = serde_yml::to_string(&config).into_diagnostic()?;
    if yaml.trim().is_empty() || yaml.trim() == "{}" {
        println!("  {}", style("(defaults only)").dim());
    } else {
        for line in yaml.lines() {
            println!("  {}", line);
        }
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--catalog, --country, --format)");
    println!("  2. Environment variables (QSCHED_CATALOG, QSCHED_COUNTRY)");
    println!("  3. Local config (./qsched.yaml or --config)");
    println!("  4. Global config (~/.config/qsched/config.yaml)");
    println!("  5. Built-in defaults");
    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => print_path("Global:", &path),
        None => println!(
            "  {} {}",
            style("Global:").cyan(),
            style("(no config directory)").dim()
        ),
    }

    let local = global
        .config
        .clone()
        .unwrap_or_else(Config::local_config_path);
    println!();
    print_path("Local:", &local);
    Ok(())
}

fn print_path(label: &str, path: &std::path::Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("         {}", style("(exists)").green());
    } else {
        println!("         {}", style("(not created)").dim());
    }
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<22} {}", style(key).cyan(), style(description).dim());
    }
    println!();
    println!(
        "{}",
        style("Set keys in ./qsched.yaml or the global config file.").dim()
    );
    Ok(())
}
